//! Pin configuration sequencer.
//!
//! Built on the generic field accessor, plus the two places the
//! hardware refuses to be regular:
//!
//! - function select packs ten 3-bit fields per register (30 of 32
//!   bits used), so its addressing is special-cased in
//!   [`Gpio::set_function`];
//! - latching a pull resistor is a timed multi-register handshake, not
//!   a single write, reproduced step for step in [`Gpio::set_pull`].

use crate::field::{write_field, FieldBank, GpioError, Result};
use crate::mmio::{Delay, RegisterBus};

/// Start of the BCM2711 peripheral window (low-peripheral mode).
pub const PERIPHERAL_BASE: usize = 0xFE00_0000;

/// Function select register 0 (3-bit fields, ten pins per register).
pub const GPFSEL0: usize = PERIPHERAL_BASE + 0x0020_0000;
/// Pin output set register 0 (write-only, self-clearing).
pub const GPSET0: usize = PERIPHERAL_BASE + 0x0020_001C;
/// Pin output clear register 0 (write-only, self-clearing).
pub const GPCLR0: usize = PERIPHERAL_BASE + 0x0020_0028;
/// Global pull-up/down control register (latch sequence).
pub const GPPUD: usize = PERIPHERAL_BASE + 0x0020_0094;
/// Pull-up/down clock-enable register 0 (one bit per pin, two registers).
pub const GPPUDCLK0: usize = PERIPHERAL_BASE + 0x0020_0098;
/// Per-pin pull-resistor control register 0 (2-bit fields).
pub const GPPUPPDN0: usize = PERIPHERAL_BASE + 0x0020_00E4;

/// Last valid pin index on this hardware generation.
pub const GPIO_MAX_PIN: u32 = 53;

/// Settle delay between pull-latch steps, in collaborator time-units.
pub const SETTLE_UNITS: u32 = 150;

/// Pin function, with the hardware field encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum PinFunction {
    Input = 0,
    Output = 1,
    Alt0 = 4,
    Alt1 = 5,
    Alt2 = 6,
    Alt3 = 7,
    Alt4 = 3,
    Alt5 = 2,
}

/// Pull-resistor mode, with the hardware field encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum PullMode {
    None = 0,
    Up = 1,
    Down = 2,
}

/// GPIO controller.
///
/// Owns the register bus and delay collaborators; constructed once
/// during single-threaded bring-up and passed by reference thereafter.
/// Register access is not synchronized against interrupt-context use
/// of the same block; configure pins before interrupt-driven paths
/// are enabled.
pub struct Gpio<B: RegisterBus, D: Delay> {
    bus: B,
    delay: D,
}

impl<B: RegisterBus, D: Delay> Gpio<B, D> {
    /// Create a controller over the given bus and delay.
    pub fn new(bus: B, delay: D) -> Self {
        Self { bus, delay }
    }

    /// Select a pin's function.
    ///
    /// Function select uses the irregular ten-fields-per-register
    /// packing: register `GPFSEL0 + (pin / 10) * 4`, bit offset
    /// `(pin * 3) % 30`. This is a genuine hardware inconsistency with
    /// the other banks and is deliberately not routed through the
    /// generic accessor.
    pub fn set_function(&mut self, pin: u32, function: PinFunction) -> Result<()> {
        if pin > GPIO_MAX_PIN {
            return Err(GpioError::PinOutOfRange {
                pin,
                max: GPIO_MAX_PIN,
            });
        }

        let register = GPFSEL0 + ((pin / 10) * 4) as usize;
        let shift = (pin * 3) % 30;

        let mut selector = self.bus.read(register);
        selector &= !(0b111 << shift);
        selector |= (function as u32) << shift;
        self.bus.write(register, selector);

        Ok(())
    }

    /// Assert a pin's output latch.
    pub fn set(&mut self, pin: u32) -> Result<()> {
        write_field(&mut self.bus, &FieldBank::SET, pin, 1)
    }

    /// Clear a pin's output latch.
    pub fn clear(&mut self, pin: u32) -> Result<()> {
        write_field(&mut self.bus, &FieldBank::CLEAR, pin, 1)
    }

    /// Drive a pin's output level.
    ///
    /// SET and CLEAR are two disjoint write-only registers (the
    /// hardware self-clears them), so this dispatches rather than
    /// read-modify-writing a level register.
    pub fn drive(&mut self, pin: u32, level: bool) -> Result<()> {
        if level {
            self.set(pin)
        } else {
            self.clear(pin)
        }
    }

    /// Write a pin's 2-bit pull-control field directly.
    ///
    /// The BCM2711 exposes pull state as ordinary per-pin fields; this
    /// is the plain field-accessor path, kept alongside the legacy
    /// latch sequence in [`Gpio::set_pull`].
    pub fn pull(&mut self, pin: u32, mode: PullMode) -> Result<()> {
        write_field(&mut self.bus, &FieldBank::PULL, pin, mode as u32)
    }

    /// Latch a pin's pull state via the timed handshake.
    ///
    /// This is a hardware contract: the steps must run exactly in this order,
    /// with a settle wait after steps 1 and 3:
    ///
    /// 1. write the no-pull code to the global GPPUD register;
    /// 2. wait [`SETTLE_UNITS`];
    /// 3. assert the pin's bit in its GPPUDCLK register;
    /// 4. wait [`SETTLE_UNITS`];
    /// 5. clear GPPUD;
    /// 6. clear the GPPUDCLK register.
    ///
    /// The requested mode never reaches the bus: step 1 always carries
    /// the no-pull code, a quirk of this handshake that is kept
    /// write-for-write. The mode bits themselves live in the GPPUPPDN
    /// bank and are written by [`Gpio::pull`].
    ///
    /// Skipping or reordering a step risks latching the wrong pin or
    /// leaving the pull state unlatched. An out-of-range pin is
    /// rejected before step 1; the sequence is never partially
    /// applied.
    pub fn set_pull(&mut self, pin: u32, _mode: PullMode) -> Result<()> {
        if pin > GPIO_MAX_PIN {
            return Err(GpioError::PinOutOfRange {
                pin,
                max: GPIO_MAX_PIN,
            });
        }

        let clock_register = GPPUDCLK0 + ((pin / 32) * 4) as usize;
        let clock_bit = 1u32 << (pin % 32);

        self.bus.write(GPPUD, PullMode::None as u32);
        self.delay.wait(SETTLE_UNITS);
        self.bus.write(clock_register, clock_bit);
        self.delay.wait(SETTLE_UNITS);
        self.bus.write(GPPUD, 0);
        self.bus.write(clock_register, 0);

        Ok(())
    }
}
