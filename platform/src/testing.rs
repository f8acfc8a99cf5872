//! Recording stand-ins for the hardware collaborators.
use std::cell::RefCell;

use bapi::{
    Delay, Direction, Gpio, GpioPin, Mmio, PhysicalAddress, Pmic, PmicError, PmicInstance,
    Pull, Pwm, PwmChannelConfig, RailId, RegulatorDirective,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GpioCall {
    Direction(GpioPin, Direction),
    Write(GpioPin, bool),
    Function(GpioPin, u8),
    Pull(GpioPin, Pull),
}

#[derive(Default, Debug)]
pub struct RecordingGpio {
    pub calls: Vec<GpioCall>,
}

impl RecordingGpio {
    /// Every level written, in order.
    pub fn writes(&self) -> Vec<(GpioPin, bool)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                GpioCall::Write(p, l) => Some((*p, *l)),
                _ => None,
            })
            .collect()
    }

    /// Every pin switched to an output, in order.
    pub fn outputs(&self) -> Vec<GpioPin> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                GpioCall::Direction(p, Direction::Output) => Some(*p),
                _ => None,
            })
            .collect()
    }

    /// Last level written to `pin`.
    pub fn level(&self, pin: GpioPin) -> Option<bool> {
        self.writes()
            .into_iter()
            .rev()
            .find(|(p, _)| *p == pin)
            .map(|(_, l)| l)
    }
}

impl Gpio for RecordingGpio {
    fn set_direction(&mut self, pin: GpioPin, direction: Direction) {
        self.calls.push(GpioCall::Direction(pin, direction));
    }

    fn write(&mut self, pin: GpioPin, level: bool) {
        self.calls.push(GpioCall::Write(pin, level));
    }

    fn set_function(&mut self, pin: GpioPin, function: u8) {
        self.calls.push(GpioCall::Function(pin, function));
    }

    fn set_pull(&mut self, pin: GpioPin, pull: Pull) {
        self.calls.push(GpioCall::Pull(pin, pull));
    }
}

#[derive(Default, Debug)]
pub struct RecordingMmio {
    pub writes: Vec<(PhysicalAddress, u32)>,
}

impl Mmio for RecordingMmio {
    fn write32(&mut self, addr: PhysicalAddress, value: u32) {
        self.writes.push((addr, value));
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PmicCall {
    Init,
    PinFunction(PmicInstance, u8, u8),
    Regulator(RegulatorDirective),
}

#[derive(Default, Debug)]
pub struct FakePmic {
    pub calls: Vec<PmicCall>,
    pub fail_init: bool,
    pub fail_rail: Option<RailId>,
}

impl Pmic for FakePmic {
    fn init(&mut self) -> Result<(), PmicError> {
        self.calls.push(PmicCall::Init);
        if self.fail_init {
            Err(PmicError::Timeout)
        } else {
            Ok(())
        }
    }

    fn set_pin_function(
        &mut self,
        instance: PmicInstance,
        pin: u8,
        function: u8,
    ) -> Result<(), PmicError> {
        self.calls
            .push(PmicCall::PinFunction(instance, pin, function));
        Ok(())
    }

    fn regulator_init(&mut self, directive: &RegulatorDirective) -> Result<(), PmicError> {
        self.calls.push(PmicCall::Regulator(*directive));
        if self.fail_rail == Some(directive.rail) {
            Err(PmicError::Bus)
        } else {
            Ok(())
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PwmCall {
    SetConfig(PwmChannelConfig),
    Enable(PwmChannelConfig),
}

#[derive(Default, Debug)]
pub struct RecordingPwm {
    pub calls: Vec<PwmCall>,
}

impl Pwm for RecordingPwm {
    fn set_config(&mut self, config: &PwmChannelConfig) {
        self.calls.push(PwmCall::SetConfig(*config));
    }

    fn enable(&mut self, config: &PwmChannelConfig) {
        self.calls.push(PwmCall::Enable(*config));
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Gpio(GpioCall),
    Delay(u32),
}

/// One log shared by a GPIO and a delay source, so the interleaving of the two can be checked.
#[derive(Default, Debug)]
pub struct Timeline {
    pub events: RefCell<Vec<Event>>,
}

impl Timeline {
    pub fn gpio(&self) -> TimelineGpio<'_> {
        TimelineGpio(self)
    }

    pub fn delay(&self) -> TimelineDelay<'_> {
        TimelineDelay(self)
    }

    pub fn take(&self) -> Vec<Event> {
        self.events.take()
    }
}

pub struct TimelineGpio<'t>(&'t Timeline);

impl Gpio for TimelineGpio<'_> {
    fn set_direction(&mut self, pin: GpioPin, direction: Direction) {
        self.0.events.borrow_mut().push(Event::Gpio(GpioCall::Direction(pin, direction)));
    }

    fn write(&mut self, pin: GpioPin, level: bool) {
        self.0.events.borrow_mut().push(Event::Gpio(GpioCall::Write(pin, level)));
    }

    fn set_function(&mut self, pin: GpioPin, function: u8) {
        self.0.events.borrow_mut().push(Event::Gpio(GpioCall::Function(pin, function)));
    }

    fn set_pull(&mut self, pin: GpioPin, pull: Pull) {
        self.0.events.borrow_mut().push(Event::Gpio(GpioCall::Pull(pin, pull)));
    }
}

pub struct TimelineDelay<'t>(&'t Timeline);

impl Delay for TimelineDelay<'_> {
    fn delay_us(&mut self, us: u32) {
        self.0.events.borrow_mut().push(Event::Delay(us));
    }
}
