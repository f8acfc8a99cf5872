//! PCIe slot power and reset sequencing.
//!
//! Each link segment may have a power-enable GPIO (active high) and a PERST# GPIO (active low).
//! The primitive operations map one-to-one onto pin writes and do not wait: a caller using them
//! directly must call [PcieSequencer::configure_io] first and let power settle before releasing
//! reset. [PcieSequencer::bring_up] does the whole dance including the delay.
//!
//! The 3.0 x4 and x2 segments share one power switch, so powering either powers both.

use bapi::{gpio::pin::*, Delay, Direction, Gpio, GpioPin};
use bytemuck::Contiguous;
use snafu::OptionExt;

use crate::error::{Error, UnknownIdSnafu};

/// PCIe link segments on the board.
#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Contiguous)]
pub enum PcieSegment {
    /// PCIe 3.0 x4, M.2 M key.
    Pcie30x4 = 0,
    /// PCIe 3.0 x2, bifurcated from the x4 controller.
    Pcie30x2,
    /// PCIe 2.0 lane 0, M.2 A+E key (Wi-Fi).
    Pcie20L0,
    /// PCIe 2.0 lane 1, not wired out.
    Pcie20L1,
    /// PCIe 2.0 lane 2, onboard RTL8125B.
    Pcie20L2,
}

impl PcieSegment {
    pub const ALL: [PcieSegment; 5] = [
        PcieSegment::Pcie30x4,
        PcieSegment::Pcie30x2,
        PcieSegment::Pcie20L0,
        PcieSegment::Pcie20L1,
        PcieSegment::Pcie20L2,
    ];

    /// Look up a segment by its firmware segment number.
    pub fn from_raw(id: u32) -> Result<Self, Error> {
        Self::from_integer(id).context(UnknownIdSnafu {
            kind: "PCIe segment",
            id,
        })
    }

    /// Control pins of this segment.
    pub const fn mapping(self) -> PcieSegmentMapping {
        match self {
            PcieSegment::Pcie30x4 => PcieSegmentMapping {
                power: Some(GpioPin::new(1, PA4)),
                reset: Some(GpioPin::new(4, PB6)),
            },
            PcieSegment::Pcie30x2 => PcieSegmentMapping {
                power: Some(GpioPin::new(1, PA4)),
                reset: Some(GpioPin::new(4, PB0)),
            },
            PcieSegment::Pcie20L0 => PcieSegmentMapping {
                power: Some(GpioPin::new(1, PD2)),
                reset: Some(GpioPin::new(4, PA5)),
            },
            PcieSegment::Pcie20L1 => PcieSegmentMapping {
                power: None,
                reset: None,
            },
            PcieSegment::Pcie20L2 => PcieSegmentMapping {
                power: None,
                reset: Some(GpioPin::new(3, PB0)),
            },
        }
    }
}

/// The GPIOs controlling one segment. A missing pin makes the matching operation a no-op.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PcieSegmentMapping {
    pub power: Option<GpioPin>,
    pub reset: Option<GpioPin>,
}

/// Minimum time from stable power to PERST# deassertion (T_PVPERL).
pub const POWER_SETTLE_US: u32 = 100_000;

pub struct PcieSequencer<G> {
    gpio: G,
}

impl<G: Gpio> PcieSequencer<G> {
    pub fn new(gpio: G) -> Self {
        Self { gpio }
    }

    /// Make the power and reset pins of `segment` outputs.
    pub fn configure_io(&mut self, segment: PcieSegment) {
        let map = segment.mapping();
        for pin in [map.reset, map.power].into_iter().flatten() {
            self.gpio.set_direction(pin, Direction::Output);
        }
    }

    /// Switch slot power of `segment`.
    pub fn set_power(&mut self, segment: PcieSegment, enabled: bool) {
        if let Some(pin) = segment.mapping().power {
            log::debug!("{segment:?} power {}", if enabled { "on" } else { "off" });
            self.gpio.write(pin, enabled);
        }
    }

    /// Assert (`enabled`) or release PERST# of `segment`.
    pub fn set_reset(&mut self, segment: PcieSegment, enabled: bool) {
        if let Some(pin) = segment.mapping().reset {
            log::debug!(
                "{segment:?} reset {}",
                if enabled { "asserted" } else { "released" }
            );
            self.gpio.write(pin, !enabled);
        }
    }

    /// Power `segment` and take it out of reset, waiting [POWER_SETTLE_US] in between.
    pub fn bring_up<D: Delay>(&mut self, segment: PcieSegment, delay: &mut D) {
        log::info!("bringing up {segment:?}");
        self.configure_io(segment);
        self.set_reset(segment, true);
        self.set_power(segment, true);
        delay.delay_us(POWER_SETTLE_US);
        self.set_reset(segment, false);
    }

    /// Hold `segment` in reset and remove its power.
    pub fn power_down(&mut self, segment: PcieSegment) {
        self.set_reset(segment, true);
        self.set_power(segment, false);
    }

    pub fn into_inner(self) -> G {
        self.gpio
    }
}
