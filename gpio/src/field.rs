//! Generic register-field accessor.
//!
//! The BCM2711 GPIO block packs several identical per-pin fields into
//! each 32-bit register (32 one-bit fields across two SET registers,
//! 16 two-bit fields across four pull-control registers, and so on).
//! [`write_field`] is the one read-modify-write primitive behind every
//! regularly-packed pin operation; a [`FieldBank`] names a register
//! run plus its packing.
//!
//! Function select is *not* one of those operations: its 3-bit fields
//! pack ten to a register (30 of 32 bits used), which no
//! `32 / field_width` formula reaches. That path lives in
//! [`crate::pin::Gpio::set_function`] on purpose.

use core::fmt;

use crate::mmio::RegisterBus;
use crate::pin::{GPCLR0, GPIO_MAX_PIN, GPPUPPDN0, GPSET0};

/// Result type for GPIO operations.
pub type Result<T> = core::result::Result<T, GpioError>;

/// GPIO access errors.
///
/// These are bring-up-time programmer errors, not runtime faults; a
/// rejected call performs no register access at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpioError {
    /// Pin index beyond the bank's last valid pin.
    PinOutOfRange {
        /// Requested pin.
        pin: u32,
        /// Last valid pin for the bank.
        max: u32,
    },
    /// Value does not fit in the bank's field width.
    ValueTooWide {
        /// Requested value.
        value: u32,
        /// Field width in bits.
        width: u32,
    },
    /// Field width does not evenly divide a 32-bit register.
    UnsupportedFieldWidth(u32),
}

impl fmt::Display for GpioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PinOutOfRange { pin, max } => {
                write!(f, "pin {} out of range (max {})", pin, max)
            }
            Self::ValueTooWide { value, width } => {
                write!(f, "value {} too wide for {}-bit field", value, width)
            }
            Self::UnsupportedFieldWidth(width) => {
                write!(f, "field width {} does not divide 32", width)
            }
        }
    }
}

/// A run of registers holding one fixed-width field per pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldBank {
    /// Address of the first register in the run.
    pub base: usize,
    /// Field width in bits. Must divide 32 evenly.
    pub field_width: u32,
    /// Last valid pin index.
    pub max_pin: u32,
}

impl FieldBank {
    /// Pin output set bank (write-only, one bit per pin).
    pub const SET: Self = Self {
        base: GPSET0,
        field_width: 1,
        max_pin: GPIO_MAX_PIN,
    };

    /// Pin output clear bank (write-only, one bit per pin).
    pub const CLEAR: Self = Self {
        base: GPCLR0,
        field_width: 1,
        max_pin: GPIO_MAX_PIN,
    };

    /// Pull-resistor control bank (two bits per pin).
    pub const PULL: Self = Self {
        base: GPPUPPDN0,
        field_width: 2,
        max_pin: GPIO_MAX_PIN,
    };

    /// Validate the request and locate the field.
    ///
    /// Returns `(register_address, bit_shift, field_mask)`.
    fn locate(&self, pin: u32) -> Result<(usize, u32, u32)> {
        if self.field_width == 0 || 32 % self.field_width != 0 {
            return Err(GpioError::UnsupportedFieldWidth(self.field_width));
        }
        if pin > self.max_pin {
            return Err(GpioError::PinOutOfRange {
                pin,
                max: self.max_pin,
            });
        }

        let mask = (1u32 << self.field_width) - 1;
        let fields_per_register = 32 / self.field_width;
        let register = self.base + ((pin / fields_per_register) * 4) as usize;
        let shift = (pin % fields_per_register) * self.field_width;

        Ok((register, shift, mask))
    }
}

/// Write one pin's field in a bank.
///
/// Performs exactly one register read and one register write: the
/// current register value is re-read on every call (no caching), the
/// target field's bits are cleared, and the new value is OR-ed into
/// place. A rejected call touches no register.
pub fn write_field<B: RegisterBus>(
    bus: &mut B,
    bank: &FieldBank,
    pin: u32,
    value: u32,
) -> Result<()> {
    let (register, shift, mask) = bank.locate(pin)?;
    if value > mask {
        return Err(GpioError::ValueTooWide {
            value,
            width: bank.field_width,
        });
    }

    let mut current = bus.read(register);
    current &= !(mask << shift);
    current |= value << shift;
    bus.write(register, current);

    Ok(())
}

/// Read one pin's field from a bank.
///
/// Single register read; same validation and addressing as
/// [`write_field`].
pub fn read_field<B: RegisterBus>(bus: &mut B, bank: &FieldBank, pin: u32) -> Result<u32> {
    let (register, shift, mask) = bank.locate(pin)?;
    Ok((bus.read(register) >> shift) & mask)
}
