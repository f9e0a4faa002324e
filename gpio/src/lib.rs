//! EmberPi GPIO Core
//!
//! Memory-mapped GPIO register-field access and pin configuration for
//! the BCM2711 (Raspberry Pi 4), usable from bare-metal bring-up code.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      GPIO Crate Structure                       │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                                                                 │
//! │  ┌────────────┐  ┌────────────┐  ┌────────────┐                 │
//! │  │    Mmio    │  │   Field    │  │    Pin     │                 │
//! │  │            │  │  Accessor  │  │ Sequencer  │                 │
//! │  │ RegisterBus│  │            │  │            │                 │
//! │  │ Delay      │  │ FieldBank  │  │ Gpio<B, D> │                 │
//! │  │ Mmio       │  │ write_field│  │ set_pull   │                 │
//! │  └────────────┘  └────────────┘  └────────────┘                 │
//! │                                                                 │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use emberpi_gpio::{Gpio, Mmio, PinFunction, PullMode};
//!
//! // Safety: the peripheral window is identity-mapped at this point.
//! let bus = unsafe { Mmio::new() };
//! let mut gpio = Gpio::new(bus, timer_delay);
//!
//! gpio.set_function(42, PinFunction::Output)?;
//! gpio.set_pull(42, PullMode::Down)?;
//! gpio.drive(42, true)?;
//! ```
//!
//! All register traffic goes through the [`RegisterBus`] seam, so host
//! tests substitute a fake bus and assert on the exact access pattern.

#![no_std]

#[cfg(test)]
extern crate std;

mod field;
mod mmio;
mod pin;

pub use field::{read_field, write_field, FieldBank, GpioError, Result};
pub use mmio::{Delay, Mmio, RegisterBus};
pub use pin::{Gpio, PinFunction, PullMode, GPIO_MAX_PIN, SETTLE_UNITS};
