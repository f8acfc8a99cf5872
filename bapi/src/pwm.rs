//! PWM peripheral interface.

/// A PWM controller block.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum PwmController {
    Pwm0,
    Pwm1,
    Pwm2,
    Pwm3,
}

/// A channel within a PWM controller.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum PwmChannel {
    Ch0,
    Ch1,
    Ch2,
    Ch3,
}

/// Full configuration of one PWM channel.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PwmChannelConfig {
    /// Controller the channel belongs to.
    pub controller: PwmController,
    /// Channel within the controller.
    pub channel: PwmChannel,
    /// Length of one period in nanoseconds.
    pub period_ns: u32,
    /// Active time within each period in nanoseconds.
    pub duty_ns: u32,
    /// Invert the output when set.
    pub inverted: bool,
}

/// Operations provided by the PWM driver.
pub trait Pwm {
    /// Program period, duty and polarity of the channel described by `config`.
    fn set_config(&mut self, config: &PwmChannelConfig);
    /// Start the channel described by `config`.
    fn enable(&mut self, config: &PwmChannelConfig);
}

impl<W: Pwm + ?Sized> Pwm for &mut W {
    fn set_config(&mut self, config: &PwmChannelConfig) {
        (**self).set_config(config)
    }

    fn enable(&mut self, config: &PwmChannelConfig) {
        (**self).enable(config)
    }
}
