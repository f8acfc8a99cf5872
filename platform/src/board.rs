//! The boot-stage view of the board: one owner for every collaborator and every bit of state.
use bapi::{Delay, Gpio, Mmio, PhysicalAddress, Pmic, Pwm};

use crate::{
    dtb::{self, CompatMode, Guid},
    error::Error,
    iomux::{self, FspiMux, HdmiTx, I2cBus, BOARD_FSPI_MUX},
    pcie::{PcieSegment, PcieSequencer},
    peripherals::{self, FanController, RadioPower, HP_JACK_DETECT},
    regulator::RegulatorInitializer,
};

/// Radxa ROCK 5B+.
pub struct Board<G, M, P, W> {
    gpio: G,
    mmio: M,
    regulators: RegulatorInitializer<P>,
    pwm: W,
    radio: RadioPower,
    fan: FanController,
}

impl<G: Gpio, M: Mmio, P: Pmic, W: Pwm> Board<G, M, P, W> {
    pub fn new(gpio: G, mmio: M, pmic: P, pwm: W) -> Self {
        Self {
            gpio,
            mmio,
            regulators: RegulatorInitializer::new(pmic),
            pwm,
            radio: RadioPower::new(),
            fan: FanController::new(),
        }
    }

    /// Platform-specific setup run once at the very start of bring-up.
    pub fn early_init(&mut self) {
        log::info!("ROCK 5B+ early init");
        self.radio.set_enabled(&mut self.gpio, true);
        self.gpio.set_function(HP_JACK_DETECT, 0);
    }

    pub fn sdmmc_iomux(&mut self) {
        iomux::sdmmc_iomux(&mut self.mmio);
    }

    pub fn sdhci_emmc_iomux(&mut self) {
        iomux::sdhci_emmc_iomux(&mut self.mmio);
    }

    pub fn rk806_spi_iomux(&mut self) {
        iomux::rk806_spi_iomux(&mut self.mmio);
    }

    /// Route the SPI NOR flash to the pin group it is wired to on this board.
    pub fn nor_fspi_iomux(&mut self) {
        self.nor_fspi_iomux_with(BOARD_FSPI_MUX);
    }

    pub fn nor_fspi_iomux_with(&mut self, mux: FspiMux) {
        iomux::nor_fspi_iomux(&mut self.mmio, mux);
    }

    pub fn nor_fspi_enable_clock(&mut self, cru_base: PhysicalAddress) {
        iomux::nor_fspi_enable_clock(&mut self.mmio, cru_base);
    }

    pub fn gmac_iomux(&mut self, id: u32) {
        iomux::gmac_iomux(id);
    }

    pub fn i2c_iomux(&mut self, bus: I2cBus) {
        iomux::i2c_iomux(&mut self.gpio, bus);
    }

    pub fn hdmi_tx_iomux(&mut self, tx: HdmiTx) {
        iomux::hdmi_tx_iomux(&mut self.gpio, tx);
    }

    /// Bring up the PMIC and program the boot rail table.
    pub fn configure_regulators(&mut self) -> Result<(), Error> {
        self.regulators.configure()?;
        Ok(())
    }

    pub fn set_cpu_little_voltage(&mut self, microvolts: u32) -> Result<(), Error> {
        self.regulators.set_cpu_little_voltage(microvolts)?;
        Ok(())
    }

    pub fn regulators(&mut self) -> &mut RegulatorInitializer<P> {
        &mut self.regulators
    }

    /// Power and reset control for the PCIe slots.
    pub fn pcie(&mut self) -> PcieSequencer<&mut G> {
        PcieSequencer::new(&mut self.gpio)
    }

    pub fn pcie_bring_up<D: Delay>(&mut self, segment: PcieSegment, delay: &mut D) {
        self.pcie().bring_up(segment, delay);
    }

    /// File GUID of the device tree to hand to the OS. Needs no hardware access.
    pub fn dtb_file_guid(mode: CompatMode) -> &'static Guid {
        dtb::select(mode)
    }

    pub fn init_leds(&mut self) {
        peripherals::init_leds(&mut self.gpio);
    }

    pub fn set_status_led(&mut self, enabled: bool) {
        peripherals::set_status_led(&mut self.gpio, enabled);
    }

    pub fn usb_port_power_enable(&mut self) {
        peripherals::usb_port_power_enable(&mut self.gpio);
    }

    pub fn usb2_phy_resume(&mut self) {
        peripherals::usb2_phy_resume(&mut self.mmio);
    }

    pub fn set_radio_power(&mut self, enabled: bool) {
        self.radio.set_enabled(&mut self.gpio, enabled);
    }

    pub fn init_fan(&mut self) {
        self.fan.init(&mut self.gpio, &mut self.pwm);
    }

    pub fn set_fan_speed(&mut self, percent: u32) {
        self.fan.set_speed_percent(&mut self.pwm, percent);
    }

    pub fn fan(&self) -> &FanController {
        &self.fan
    }

    pub fn gpio(&self) -> &G {
        &self.gpio
    }

    pub fn mmio(&self) -> &M {
        &self.mmio
    }

    pub fn pwm(&self) -> &W {
        &self.pwm
    }
}

#[cfg(test)]
mod tests {
    use bapi::{gpio::pin::*, GpioPin};

    use super::*;
    use crate::{
        peripherals::{BT_ENABLE, WIFI_ENABLE},
        testing::{FakePmic, GpioCall, RecordingGpio, RecordingMmio, RecordingPwm},
    };

    type TestBoard = Board<RecordingGpio, RecordingMmio, FakePmic, RecordingPwm>;

    fn board() -> TestBoard {
        Board::new(
            RecordingGpio::default(),
            RecordingMmio::default(),
            FakePmic::default(),
            RecordingPwm::default(),
        )
    }

    #[test]
    fn early_init_powers_radios_and_frees_jack_detect() {
        let mut b = board();
        b.early_init();
        let gpio = b.gpio();
        for pin in WIFI_ENABLE.into_iter().chain([BT_ENABLE]) {
            assert_eq!(gpio.level(pin), Some(true));
        }
        assert_eq!(gpio.outputs().len(), 3);
        assert_eq!(
            gpio.calls.last(),
            Some(&GpioCall::Function(HP_JACK_DETECT, 0))
        );
    }

    #[test]
    #[cfg(not(any(feature = "fspi-m0", feature = "fspi-m2")))]
    fn board_fspi_default_is_m1() {
        let mut b = board();
        b.nor_fspi_iomux();
        assert_eq!(b.mmio().writes.len(), 4);
        assert_eq!(b.mmio().writes[1].0, PhysicalAddress(0xFD5F_8044));
    }

    #[test]
    fn pcie_goes_through_board_gpio() {
        let mut b = board();
        b.pcie().configure_io(PcieSegment::Pcie30x2);
        b.pcie().set_power(PcieSegment::Pcie30x2, true);
        assert_eq!(b.gpio().level(GpioPin::new(1, PA4)), Some(true));
    }

    #[test]
    fn regulator_failure_reaches_caller() {
        let mut b = Board::new(
            RecordingGpio::default(),
            RecordingMmio::default(),
            FakePmic {
                fail_init: true,
                ..Default::default()
            },
            RecordingPwm::default(),
        );
        assert!(matches!(
            b.configure_regulators(),
            Err(Error::Regulator { .. })
        ));
    }

    #[test]
    fn dtb_guid_needs_no_board() {
        assert_eq!(
            TestBoard::dtb_file_guid(CompatMode::Vendor),
            &dtb::VENDOR_DTB_FILE_GUID
        );
        assert_eq!(
            TestBoard::dtb_file_guid(CompatMode::Mainline),
            &dtb::MAINLINE_DTB_FILE_GUID
        );
    }

    #[test]
    fn fan_state_lives_in_the_board() {
        let mut b = board();
        b.init_fan();
        b.set_fan_speed(50);
        assert_eq!(b.fan().state().config.duty_ns, 2_000_000);
        assert_eq!(b.pwm().calls.len(), 3);
    }
}
