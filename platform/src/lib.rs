//! Early platform bring-up for the Radxa ROCK 5B+ (Rockchip RK3588).
//!
//! Everything here runs once, single threaded, very early in firmware boot: pin multiplexing,
//! regulator rails on the RK806 PMIC, PCIe slot power and reset, and a handful of GPIO-driven
//! peripherals. The drivers that actually touch GPIO banks, the PMIC and the PWM block are
//! collaborators supplied by the caller through the traits in [bapi].
//!
//! The usual order of a boot is:
//! 1. [iomux::rk806_spi_iomux] and [regulator::RegulatorInitializer::configure]
//! 2. the per-device iomux functions (storage, flash, I2C, HDMI)
//! 3. [pcie::PcieSequencer] for each slot that should come up
//! 4. [dtb::select] once the compatibility mode is known
//!
//! [Board] bundles the collaborators and owns the little state there is.
#![cfg_attr(not(test), no_std)]

pub mod board;
pub mod dtb;
pub mod error;
pub mod iomux;
pub mod pcie;
pub mod peripherals;
pub mod regulator;
pub mod uart;

#[cfg(test)]
mod testing;

pub use board::Board;
pub use error::Error;
