mod common;

use bapi::{gpio::pin::*, Direction, GpioPin};
use common::{Call, CountingDelay, Hardware};
use platform::{
    dtb::CompatMode,
    iomux::{HdmiTx, I2cBus},
    pcie::{PcieSegment, POWER_SETTLE_US},
    peripherals::{BT_ENABLE, WIFI_ENABLE},
    regulator::RK806_INIT_TABLE,
    Board,
};

type TestBoard = Board<Hardware, Hardware, Hardware, Hardware>;

fn board() -> TestBoard {
    Board::new(
        Hardware::default(),
        Hardware::default(),
        Hardware::default(),
        Hardware::default(),
    )
}

const RADIO_PINS: [GpioPin; 3] = [WIFI_ENABLE[0], WIFI_ENABLE[1], BT_ENABLE];

#[test]
fn early_init_then_radio_off() {
    let mut b = board();
    b.early_init();

    for pin in RADIO_PINS {
        assert!(b.gpio().log.contains(&Call::Write(pin, true)));
        assert!(b.gpio().log.contains(&Call::Direction(pin, Direction::Output)));
    }
    let before = b.gpio().log.len();

    b.set_radio_power(false);
    assert_eq!(
        b.gpio().log[before..],
        [
            Call::Write(RADIO_PINS[0], false),
            Call::Write(RADIO_PINS[1], false),
            Call::Write(RADIO_PINS[2], false),
        ]
    );
}

#[test]
fn full_boot_sequence() {
    let mut b = board();
    let mut delay = CountingDelay::default();

    b.early_init();
    b.rk806_spi_iomux();
    b.configure_regulators().expect("regulators");
    b.sdmmc_iomux();
    b.sdhci_emmc_iomux();
    b.nor_fspi_iomux();
    b.i2c_iomux(I2cBus::I2c0);
    b.hdmi_tx_iomux(HdmiTx::Tx0);
    b.usb_port_power_enable();
    b.usb2_phy_resume();
    b.init_leds();
    b.init_fan();
    for segment in PcieSegment::ALL {
        b.pcie_bring_up(segment, &mut delay);
    }
    b.set_status_led(true);

    let rails: Vec<_> = b
        .regulators()
        .pmic()
        .log
        .iter()
        .filter_map(|c| match c {
            Call::Rail(d) => Some(*d),
            _ => None,
        })
        .collect();
    assert_eq!(rails, RK806_INIT_TABLE);

    // every slot with a reset line ends up out of reset
    for segment in PcieSegment::ALL {
        if let Some(reset) = segment.mapping().reset {
            let last = b
                .gpio()
                .log
                .iter()
                .rev()
                .find_map(|c| match c {
                    Call::Write(p, l) if *p == reset => Some(*l),
                    _ => None,
                });
            assert_eq!(last, Some(true), "{segment:?}");
        }
    }
    assert_eq!(delay.total_us, 5 * POWER_SETTLE_US as u64);

    assert_eq!(
        TestBoard::dtb_file_guid(CompatMode::Mainline).to_string(),
        "117855c9-fa71-43d8-8937-37d81b19cd02"
    );
    assert_eq!(b.fan().speed_percent(), 100);
    assert!(b.gpio().log.contains(&Call::Write(GpioPin::new(0, PB7), true)));
}

#[test]
fn cpu_little_retune_after_boot() {
    let mut b = board();
    b.configure_regulators().unwrap();
    b.set_cpu_little_voltage(1_000_000).unwrap();
    assert!(matches!(
        b.regulators().pmic().log.last(),
        Some(Call::Rail(d)) if d.microvolts == 1_000_000
    ));
}
