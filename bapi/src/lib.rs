//! Interfaces between board bring-up code and the drivers it leans on.
//!
//! The platform crate never talks to a GPIO bank, the PMIC or the PWM block directly. Instead it
//! drives the collaborator traits defined here, which lets the same bring-up sequence run on real
//! hardware and against recording doubles in tests.
#![no_std]
#![deny(missing_docs)]

pub mod gpio;
pub mod mmio;
pub mod pmic;
pub mod pwm;

pub use gpio::{Direction, Gpio, GpioPin, Pull};
pub use mmio::{Mmio, PhysicalAddress};
pub use pmic::{Pmic, PmicError, PmicInstance, RailId, RegulatorDirective, RegulatorOutput};
pub use pwm::{Pwm, PwmChannel, PwmChannelConfig, PwmController};

/// A source of busy-wait delays.
pub trait Delay {
    /// Block for at least `us` microseconds.
    fn delay_us(&mut self, us: u32);
}
