//! General purpose I/O addressing and the GPIO driver interface.
use core::fmt;

/// Pin indices within a bank.
///
/// Rockchip banks have 32 pins split into four ports of eight (`A0`..`D7`).
#[allow(missing_docs)]
pub mod pin {
    macro_rules! port_pins {
        ($base:expr; $($name:ident = $offset:expr),+) => {
            $(pub const $name: u8 = $base + $offset;)+
        };
    }

    port_pins!(0; PA0 = 0, PA1 = 1, PA2 = 2, PA3 = 3, PA4 = 4, PA5 = 5, PA6 = 6, PA7 = 7);
    port_pins!(8; PB0 = 0, PB1 = 1, PB2 = 2, PB3 = 3, PB4 = 4, PB5 = 5, PB6 = 6, PB7 = 7);
    port_pins!(16; PC0 = 0, PC1 = 1, PC2 = 2, PC3 = 3, PC4 = 4, PC5 = 5, PC6 = 6, PC7 = 7);
    port_pins!(24; PD0 = 0, PD1 = 1, PD2 = 2, PD3 = 3, PD4 = 4, PD5 = 5, PD6 = 6, PD7 = 7);
}

/// Number of pins in one GPIO bank.
pub const PINS_PER_BANK: u8 = 32;

/// A single pin, addressed by bank and index within the bank.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GpioPin {
    /// GPIO bank (0..=4 on RK3588).
    pub bank: u8,
    /// Index within the bank, see [pin].
    pub pin: u8,
}

impl GpioPin {
    /// Address `pin` in `bank`.
    pub const fn new(bank: u8, pin: u8) -> Self {
        assert!(pin < PINS_PER_BANK);
        Self { bank, pin }
    }

    /// The port letter (`A`..`D`) this pin belongs to.
    pub const fn port(self) -> char {
        (b'A' + self.pin / 8) as char
    }
}

impl fmt::Display for GpioPin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GPIO{}_{}{}", self.bank, self.port(), self.pin % 8)
    }
}

/// Direction a pin is driven in.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    /// The pin is sampled.
    Input,
    /// The pin is driven.
    Output,
}

/// Pull resistor configuration of a pin.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Pull {
    /// No pull resistor.
    None,
    /// Pull up.
    Up,
    /// Pull down.
    Down,
    /// Leave whatever the pin is configured with alone.
    Keep,
}

/// Pin-level operations provided by the GPIO driver.
///
/// All operations are fire-and-forget register writes: nothing is read back.
pub trait Gpio {
    /// Set the direction of `pin`.
    fn set_direction(&mut self, pin: GpioPin, direction: Direction);
    /// Drive `pin` to `level`. Only observable once the pin is an output.
    fn write(&mut self, pin: GpioPin, level: bool);
    /// Route `pin` to one of its multiplexed functions. Function 0 is plain GPIO.
    fn set_function(&mut self, pin: GpioPin, function: u8);
    /// Configure the pull resistor of `pin`.
    fn set_pull(&mut self, pin: GpioPin, pull: Pull);
}

impl<G: Gpio + ?Sized> Gpio for &mut G {
    fn set_direction(&mut self, pin: GpioPin, direction: Direction) {
        (**self).set_direction(pin, direction)
    }

    fn write(&mut self, pin: GpioPin, level: bool) {
        (**self).write(pin, level)
    }

    fn set_function(&mut self, pin: GpioPin, function: u8) {
        (**self).set_function(pin, function)
    }

    fn set_pull(&mut self, pin: GpioPin, pull: Pull) {
        (**self).set_pull(pin, pull)
    }
}
