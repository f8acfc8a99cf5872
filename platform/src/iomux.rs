//! Pin multiplexing.
//!
//! RK3588 IO controller registers use a write-mask layout: the upper half of every 32-bit write
//! selects which of the lower 16 bits the hardware latches, everything else in the register keeps
//! its value. No read-modify-write is ever needed, so a write only has to name the fields it
//! changes.
//!
//! Each pin has a 4-bit function select field, four pins to a register. Bank 0 is split between
//! the PMU1 (`A0..B3`) and PMU2 (`B4..D7`) IO controllers; banks 1 to 4 live in the BUS IO
//! controller at `bank * 0x20`.
//!
//! Peripherals are described by [PinMuxEntry] tables and applied either with raw register writes
//! ([apply_via_registers]) or through the GPIO driver's function select ([apply_via_gpio]).

use bapi::{
    gpio::pin::*,
    Gpio, GpioPin, Mmio, PhysicalAddress, Pull,
};
use bitfield::bitfield;
use bytemuck::Contiguous;
use snafu::OptionExt;

use crate::error::{Error, UnknownIdSnafu};

bitfield! {
    /// One write to a write-masked register.
    pub struct MaskedWrite(u32);
    impl Debug;
    u16;
    /// Bits of the register the hardware will update.
    pub mask, set_mask: 31, 16;
    /// New contents of the masked bits.
    pub value, set_value: 15, 0;
}

impl Copy for MaskedWrite {}
impl Clone for MaskedWrite {
    fn clone(&self) -> Self {
        *self
    }
}

impl PartialEq for MaskedWrite {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}
impl Eq for MaskedWrite {}

impl MaskedWrite {
    /// Update the bits in `mask` to `value`. Value bits outside the mask are dropped.
    pub fn new(mask: u16, value: u16) -> Self {
        let mut w = MaskedWrite(0);
        w.set_mask(mask);
        w.set_value(value & mask);
        w
    }

    /// Set the `width`-bit field starting at bit `shift` to `value`.
    pub fn field(shift: u32, width: u32, value: u16) -> Self {
        assert!(shift + width <= 16);
        let mask = ((1u32 << width) - 1) << shift;
        Self::new(mask as u16, ((value as u32) << shift) as u16)
    }

    /// Combine two writes to the same register. Where the masks overlap `other` wins.
    pub fn merge(self, other: MaskedWrite) -> Self {
        let value = (self.value() & !other.mask()) | other.value();
        Self::new(self.mask() | other.mask(), value)
    }

    /// What the hardware latches when this is written over a register holding `current`.
    pub fn apply_to(self, current: u16) -> u16 {
        (current & !self.mask()) | self.value()
    }

    /// The raw 32-bit value put on the bus.
    pub fn raw(self) -> u32 {
        self.0
    }
}

/// Write `write` to the register at `addr`.
pub fn write_masked<M: Mmio>(mmio: &mut M, addr: PhysicalAddress, write: MaskedWrite) {
    mmio.write32(addr, write.raw());
}

/// IO controller register blocks that hold IOMUX select registers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum IoController {
    /// Bank 0, pins `A0..B3`.
    Pmu1,
    /// Bank 0, pins `B4..D7`.
    Pmu2,
    /// Banks 1 to 4.
    Bus,
}

impl IoController {
    /// Physical base address of the register block.
    pub const fn base(self) -> PhysicalAddress {
        match self {
            IoController::Pmu1 => PhysicalAddress(0xFD5F_0000),
            IoController::Pmu2 => PhysicalAddress(0xFD5F_4000),
            IoController::Bus => PhysicalAddress(0xFD5F_8000),
        }
    }
}

/// Clock and reset unit, non-secure block.
pub const CRU_BASE: PhysicalAddress = PhysicalAddress(0xFD7C_0000);
const CRU_CLKSEL_CON59: usize = 0x03EC;
const CRU_CLKSEL_CON78: usize = 0x0438;
const CRU_FSPI_GATE_CON: usize = 0x087C;

/// Width of a function select field.
const FUNCTION_BITS: u32 = 4;
const PINS_PER_REGISTER: u8 = 4;
const PMU1_PINS: u8 = 12;
const BUS_BANK_STRIDE: usize = 0x20;

/// The IOMUX select register controlling `pin`, and the shift of its field within it.
pub fn iomux_location(pin: GpioPin) -> (IoController, usize, u32) {
    let shift = (pin.pin % PINS_PER_REGISTER) as u32 * FUNCTION_BITS;
    let reg = |index: u8| index as usize / PINS_PER_REGISTER as usize * 4;
    if pin.bank == 0 {
        if pin.pin < PMU1_PINS {
            (IoController::Pmu1, reg(pin.pin), shift)
        } else {
            (IoController::Pmu2, reg(pin.pin - PMU1_PINS), shift)
        }
    } else {
        (
            IoController::Bus,
            pin.bank as usize * BUS_BANK_STRIDE + reg(pin.pin),
            shift,
        )
    }
}

/// Physical address of the IOMUX select register for `pin`.
pub fn iomux_register(pin: GpioPin) -> PhysicalAddress {
    let (ioc, offset, _) = iomux_location(pin);
    ioc.base().add(offset)
}

/// One pin routed to one function.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PinMuxEntry {
    pub pin: GpioPin,
    pub function: u8,
    pub pull: Pull,
}

impl PinMuxEntry {
    /// Route `pin` of `bank` to `function`, leaving the pull alone.
    pub const fn new(bank: u8, pin: u8, function: u8) -> Self {
        Self {
            pin: GpioPin::new(bank, pin),
            function,
            pull: Pull::Keep,
        }
    }

    /// The same assignment with the pull set to `pull`.
    pub const fn with_pull(self, pull: Pull) -> Self {
        Self { pull, ..self }
    }
}

/// Apply `entries` with direct register writes.
///
/// Consecutive entries that fall in the same select register are merged into one write. Pulls
/// cannot be set this way; entries must use [Pull::Keep].
pub fn apply_via_registers<M: Mmio>(mmio: &mut M, entries: &[PinMuxEntry]) {
    let mut pending: Option<(PhysicalAddress, MaskedWrite)> = None;
    for entry in entries {
        debug_assert!(entry.function < 1 << FUNCTION_BITS);
        debug_assert_eq!(entry.pull, Pull::Keep);
        let (ioc, offset, shift) = iomux_location(entry.pin);
        let addr = ioc.base().add(offset);
        let w = MaskedWrite::field(shift, FUNCTION_BITS, entry.function as u16);
        log::trace!("{} -> function {} via {ioc:?}", entry.pin, entry.function);
        pending = match pending {
            Some((cur, acc)) if cur == addr => Some((cur, acc.merge(w))),
            Some((cur, acc)) => {
                write_masked(mmio, cur, acc);
                Some((addr, w))
            }
            None => Some((addr, w)),
        };
    }
    if let Some((cur, acc)) = pending {
        write_masked(mmio, cur, acc);
    }
}

/// Apply `entries` through the GPIO driver.
pub fn apply_via_gpio<G: Gpio>(gpio: &mut G, entries: &[PinMuxEntry]) {
    for entry in entries {
        log::trace!("{} -> function {}", entry.pin, entry.function);
        gpio.set_function(entry.pin, entry.function);
        if entry.pull != Pull::Keep {
            gpio.set_pull(entry.pin, entry.pull);
        }
    }
}

/// microSD socket: SDMMC_D0..D3, SDMMC_CLK, SDMMC_CMD, SDMMC_DET.
pub const SDMMC_PINS: &[PinMuxEntry] = &[
    PinMuxEntry::new(4, PD0, 1),
    PinMuxEntry::new(4, PD1, 1),
    PinMuxEntry::new(4, PD2, 1),
    PinMuxEntry::new(4, PD3, 1),
    PinMuxEntry::new(4, PD4, 1),
    PinMuxEntry::new(4, PD5, 1),
    PinMuxEntry::new(0, PA4, 1),
];

/// eMMC: EMMC_CMD, EMMC_CLKOUT, EMMC_DATASTROBE, EMMC_RSTN, EMMC_D0..D7.
pub const SDHCI_EMMC_PINS: &[PinMuxEntry] = &[
    PinMuxEntry::new(2, PA0, 1),
    PinMuxEntry::new(2, PA1, 1),
    PinMuxEntry::new(2, PA2, 1),
    PinMuxEntry::new(2, PA3, 1),
    PinMuxEntry::new(2, PD0, 1),
    PinMuxEntry::new(2, PD1, 1),
    PinMuxEntry::new(2, PD2, 1),
    PinMuxEntry::new(2, PD3, 1),
    PinMuxEntry::new(2, PD4, 1),
    PinMuxEntry::new(2, PD5, 1),
    PinMuxEntry::new(2, PD6, 1),
    PinMuxEntry::new(2, PD7, 1),
];

/// SPI link to the RK806.
pub const RK806_SPI_PINS: &[PinMuxEntry] = &[
    PinMuxEntry::new(0, PA5, 1),
    PinMuxEntry::new(0, PA6, 1),
    PinMuxEntry::new(0, PB0, 1),
    PinMuxEntry::new(0, PB1, 1),
    PinMuxEntry::new(0, PB3, 1),
];

/// Pin groups the FSPI controller can be routed to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FspiMux {
    M0,
    M1,
    M2,
}

#[cfg(any(
    all(feature = "fspi-m0", feature = "fspi-m1"),
    all(feature = "fspi-m0", feature = "fspi-m2"),
    all(feature = "fspi-m1", feature = "fspi-m2"),
))]
compile_error!("only one of the `fspi-m0`, `fspi-m1` and `fspi-m2` features may be enabled");

/// The group the SPI NOR flash is wired to on this board.
#[cfg(feature = "fspi-m0")]
pub const BOARD_FSPI_MUX: FspiMux = FspiMux::M0;
#[cfg(feature = "fspi-m2")]
pub const BOARD_FSPI_MUX: FspiMux = FspiMux::M2;
#[cfg(not(any(feature = "fspi-m0", feature = "fspi-m2")))]
pub const BOARD_FSPI_MUX: FspiMux = FspiMux::M1;

const FSPI_M0_PINS: &[PinMuxEntry] = &[
    PinMuxEntry::new(2, PA0, 2),
    PinMuxEntry::new(2, PD0, 2),
    PinMuxEntry::new(2, PD1, 2),
    PinMuxEntry::new(2, PD2, 2),
    PinMuxEntry::new(2, PD3, 2),
    PinMuxEntry::new(2, PD6, 2),
];

const FSPI_M1_PINS: &[PinMuxEntry] = &[
    PinMuxEntry::new(2, PA6, 3),
    PinMuxEntry::new(2, PA7, 3),
    PinMuxEntry::new(2, PB0, 3),
    PinMuxEntry::new(2, PB1, 3),
    PinMuxEntry::new(2, PB3, 3),
    PinMuxEntry::new(2, PB4, 3),
];

const FSPI_M2_PINS: &[PinMuxEntry] = &[
    PinMuxEntry::new(3, PA0, 5),
    PinMuxEntry::new(3, PA1, 5),
    PinMuxEntry::new(3, PA2, 5),
    PinMuxEntry::new(3, PA3, 5),
    PinMuxEntry::new(3, PA5, 5),
    PinMuxEntry::new(3, PC4, 2),
];

impl FspiMux {
    /// Pins of this group: data lines, clock, chip select.
    pub fn pins(self) -> &'static [PinMuxEntry] {
        match self {
            FspiMux::M0 => FSPI_M0_PINS,
            FspiMux::M1 => FSPI_M1_PINS,
            FspiMux::M2 => FSPI_M2_PINS,
        }
    }
}

/// I2C controllers of the SoC.
#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Contiguous)]
pub enum I2cBus {
    I2c0 = 0,
    I2c1,
    I2c2,
    I2c3,
    I2c4,
    I2c5,
    I2c6,
    I2c7,
    I2c8,
}

const I2C0_PINS: &[PinMuxEntry] = &[PinMuxEntry::new(0, PD1, 3), PinMuxEntry::new(0, PD2, 3)];
const I2C1_PINS: &[PinMuxEntry] = &[PinMuxEntry::new(0, PD4, 9), PinMuxEntry::new(0, PD5, 9)];
const I2C4_PINS: &[PinMuxEntry] = &[PinMuxEntry::new(2, PB5, 9), PinMuxEntry::new(2, PB4, 9)];
const I2C6_PINS: &[PinMuxEntry] = &[PinMuxEntry::new(0, PD0, 9), PinMuxEntry::new(0, PC7, 9)];
const I2C7_PINS: &[PinMuxEntry] = &[PinMuxEntry::new(1, PD0, 9), PinMuxEntry::new(1, PD1, 9)];

impl I2cBus {
    /// Look up a controller by number.
    pub fn from_raw(id: u32) -> Result<Self, Error> {
        Self::from_integer(id).context(UnknownIdSnafu { kind: "I2C bus", id })
    }

    /// SCL and SDA of this controller. Controllers not routed out on this board have none.
    pub fn pins(self) -> &'static [PinMuxEntry] {
        match self {
            I2cBus::I2c0 => I2C0_PINS,
            I2cBus::I2c1 => I2C1_PINS,
            I2cBus::I2c4 => I2C4_PINS,
            I2cBus::I2c6 => I2C6_PINS,
            I2cBus::I2c7 => I2C7_PINS,
            I2cBus::I2c2 | I2cBus::I2c3 | I2cBus::I2c5 | I2cBus::I2c8 => &[],
        }
    }
}

/// HDMI transmitters.
#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Contiguous)]
pub enum HdmiTx {
    Tx0 = 0,
    Tx1,
}

const HDMI_TX0_PINS: &[PinMuxEntry] = &[
    PinMuxEntry::new(4, PC1, 5).with_pull(Pull::None),
    PinMuxEntry::new(1, PA5, 5).with_pull(Pull::None),
    PinMuxEntry::new(4, PB7, 5).with_pull(Pull::None),
    PinMuxEntry::new(4, PC0, 5).with_pull(Pull::None),
];

const HDMI_TX1_PINS: &[PinMuxEntry] = &[
    PinMuxEntry::new(2, PC4, 4).with_pull(Pull::None),
    PinMuxEntry::new(1, PA6, 5).with_pull(Pull::None),
    PinMuxEntry::new(3, PC6, 5).with_pull(Pull::None),
    PinMuxEntry::new(3, PC5, 5).with_pull(Pull::None),
];

impl HdmiTx {
    /// Look up a transmitter by number.
    pub fn from_raw(id: u32) -> Result<Self, Error> {
        Self::from_integer(id).context(UnknownIdSnafu { kind: "HDMI TX", id })
    }

    /// CEC, HPD, SCL, SDA of this transmitter. All without pulls.
    pub fn pins(self) -> &'static [PinMuxEntry] {
        match self {
            HdmiTx::Tx0 => HDMI_TX0_PINS,
            HdmiTx::Tx1 => HDMI_TX1_PINS,
        }
    }
}

/// Route the microSD socket.
pub fn sdmmc_iomux<M: Mmio>(mmio: &mut M) {
    log::debug!("sdmmc0 iomux");
    apply_via_registers(mmio, SDMMC_PINS);
}

/// Route the eMMC socket.
pub fn sdhci_emmc_iomux<M: Mmio>(mmio: &mut M) {
    log::debug!("sdhci iomux");
    apply_via_registers(mmio, SDHCI_EMMC_PINS);
}

/// Route the SPI link to the PMIC and select its clock source.
pub fn rk806_spi_iomux<M: Mmio>(mmio: &mut M) {
    log::debug!("rk806 spi iomux");
    apply_via_registers(mmio, RK806_SPI_PINS);
    write_masked(
        mmio,
        CRU_BASE.add(CRU_CLKSEL_CON59),
        MaskedWrite::new(0x00C0, 0x0080),
    );
}

/// Select the FSPI clock and route the SPI NOR flash to the pins of `mux`.
pub fn nor_fspi_iomux<M: Mmio>(mmio: &mut M, mux: FspiMux) {
    log::debug!("fspi iomux {mux:?}");
    write_masked(
        mmio,
        CRU_BASE.add(CRU_CLKSEL_CON78),
        MaskedWrite::new((0x3 << 12) | (0x3F << 6), 0x3F << 6),
    );
    apply_via_registers(mmio, mux.pins());
}

/// Ungate the FSPI clocks in the CRU at `cru_base`.
pub fn nor_fspi_enable_clock<M: Mmio>(mmio: &mut M, cru_base: PhysicalAddress) {
    write_masked(
        mmio,
        cru_base.add(CRU_FSPI_GATE_CON),
        MaskedWrite::new(0x0E00, 0),
    );
}

/// Ethernet MAC pins. The ROCK 5B+ has no GMAC (its NIC hangs off PCIe), so this does nothing.
pub fn gmac_iomux(id: u32) {
    log::trace!("no GMAC{id} on this board");
}

/// Route the pins of I2C controller `bus`, if it is wired out.
pub fn i2c_iomux<G: Gpio>(gpio: &mut G, bus: I2cBus) {
    log::debug!("i2c iomux {bus:?}");
    apply_via_gpio(gpio, bus.pins());
}

/// Route the DDC/CEC/HPD pins of HDMI transmitter `tx`.
pub fn hdmi_tx_iomux<G: Gpio>(gpio: &mut G, tx: HdmiTx) {
    log::debug!("hdmi iomux {tx:?}");
    apply_via_gpio(gpio, tx.pins());
}
