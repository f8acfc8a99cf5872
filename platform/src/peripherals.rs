//! GPIO and PWM driven board peripherals.

use bapi::{
    gpio::pin::*, Direction, Gpio, GpioPin, Mmio, PhysicalAddress, Pwm, PwmChannel,
    PwmChannelConfig, PwmController,
};

use crate::iomux::{write_masked, MaskedWrite};

/// Blue status LED.
pub const STATUS_LED: GpioPin = GpioPin::new(0, PB7);
/// USB host port VBUS switch.
pub const USB_HOST_PWREN: GpioPin = GpioPin::new(1, PA1);
/// USB Type-C port VBUS switch.
pub const USB_TYPEC_PWREN: GpioPin = GpioPin::new(2, PB6);
/// Wi-Fi module enables on the M.2 E key.
pub const WIFI_ENABLE: [GpioPin; 2] = [GpioPin::new(0, PC4), GpioPin::new(4, PA2)];
/// Bluetooth enable on the M.2 E key.
pub const BT_ENABLE: GpioPin = GpioPin::new(3, PD5);
/// Headphone jack detect.
pub const HP_JACK_DETECT: GpioPin = GpioPin::new(1, PD5);
/// Fan PWM output (PWM1_M0).
pub const FAN_PWM_PIN: GpioPin = GpioPin::new(0, PC0);
const FAN_PWM_FUNCTION: u8 = 3;

/// Drive `pin` to `level`, then make it an output, so it never glitches to a stale level.
fn drive_output<G: Gpio>(gpio: &mut G, pin: GpioPin, level: bool) {
    gpio.write(pin, level);
    gpio.set_direction(pin, Direction::Output);
}

/// Make the status LED an output, switched off.
pub fn init_leds<G: Gpio>(gpio: &mut G) {
    drive_output(gpio, STATUS_LED, false);
}

pub fn set_status_led<G: Gpio>(gpio: &mut G, enabled: bool) {
    gpio.write(STATUS_LED, enabled);
}

/// Turn on VBUS for every USB port. There is no way back.
pub fn usb_port_power_enable<G: Gpio>(gpio: &mut G) {
    log::debug!("enabling USB port power");
    drive_output(gpio, USB_HOST_PWREN, true);
    drive_output(gpio, USB_TYPEC_PWREN, true);
}

const USB2PHY_GRF_CON2: [PhysicalAddress; 4] = [
    PhysicalAddress(0xFD5D_0008),
    PhysicalAddress(0xFD5D_4008),
    PhysicalAddress(0xFD5D_8008),
    PhysicalAddress(0xFD5D_C008),
];
const USB2PHY_SUSPEND: u16 = 1 << 13;
const USB2PHY_PORT_RESET: PhysicalAddress = PhysicalAddress(0xFD7F_0A10);

/// Take the four USB2 PHYs out of suspend and pulse their port reset.
pub fn usb2_phy_resume<M: Mmio>(mmio: &mut M) {
    for grf in USB2PHY_GRF_CON2 {
        write_masked(mmio, grf, MaskedWrite::new(USB2PHY_SUSPEND, 0));
    }
    write_masked(mmio, USB2PHY_PORT_RESET, MaskedWrite::new(0x0700, 0x0700));
    write_masked(mmio, USB2PHY_PORT_RESET, MaskedWrite::new(0x0700, 0));
}

/// Wi-Fi and Bluetooth power on the M.2 E key.
///
/// Pins are made outputs on the first call only; later calls just change levels.
#[derive(Debug, Default)]
pub struct RadioPower {
    configured: bool,
}

impl RadioPower {
    pub const fn new() -> Self {
        Self { configured: false }
    }

    pub fn set_enabled<G: Gpio>(&mut self, gpio: &mut G, enabled: bool) {
        log::debug!("radio power {}", if enabled { "on" } else { "off" });
        for pin in WIFI_ENABLE.into_iter().chain([BT_ENABLE]) {
            if self.configured {
                gpio.write(pin, enabled);
            } else {
                drive_output(gpio, pin, enabled);
            }
        }
        self.configured = true;
    }
}

/// Fan PWM period, 250 Hz.
pub const FAN_PERIOD_NS: u32 = 4_000_000;

/// State of the fan PWM channel.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PwmFanState {
    pub config: PwmChannelConfig,
}

impl PwmFanState {
    /// Full speed, the safe default.
    pub const fn new() -> Self {
        Self {
            config: PwmChannelConfig {
                controller: PwmController::Pwm0,
                channel: PwmChannel::Ch1,
                period_ns: FAN_PERIOD_NS,
                duty_ns: FAN_PERIOD_NS,
                inverted: false,
            },
        }
    }
}

impl Default for PwmFanState {
    fn default() -> Self {
        Self::new()
    }
}

/// The cooling fan. Owns the channel configuration; nothing else writes to it.
#[derive(Debug, Default)]
pub struct FanController {
    state: PwmFanState,
}

impl FanController {
    pub const fn new() -> Self {
        Self {
            state: PwmFanState::new(),
        }
    }

    /// Route the PWM pin and start the channel at full speed.
    pub fn init<G: Gpio, W: Pwm>(&mut self, gpio: &mut G, pwm: &mut W) {
        log::debug!("starting fan PWM");
        self.state = PwmFanState::new();
        gpio.set_function(FAN_PWM_PIN, FAN_PWM_FUNCTION);
        pwm.set_config(&self.state.config);
        pwm.enable(&self.state.config);
    }

    /// Set the duty cycle to `percent` of the period. Values above 100 are treated as 100.
    pub fn set_speed_percent<W: Pwm>(&mut self, pwm: &mut W, percent: u32) {
        let percent = if percent > 100 {
            log::warn!("fan speed {percent}% out of range, using 100%");
            100
        } else {
            percent
        };
        let cfg = &mut self.state.config;
        cfg.duty_ns = cfg.period_ns * percent / 100;
        log::trace!("fan duty {} / {} ns", cfg.duty_ns, cfg.period_ns);
        pwm.set_config(cfg);
    }

    /// Current speed in percent of full, rounded down.
    pub fn speed_percent(&self) -> u32 {
        let cfg = &self.state.config;
        cfg.duty_ns * 100 / cfg.period_ns
    }

    pub fn state(&self) -> &PwmFanState {
        &self.state
    }
}
