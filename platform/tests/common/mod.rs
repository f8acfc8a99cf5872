use bapi::{
    Delay, Direction, Gpio, GpioPin, Mmio, PhysicalAddress, Pmic, PmicError, PmicInstance,
    Pull, Pwm, PwmChannelConfig, RegulatorDirective,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Call {
    Direction(GpioPin, Direction),
    Write(GpioPin, bool),
    Function(GpioPin, u8),
    Pull(GpioPin, Pull),
    Mmio(PhysicalAddress, u32),
    PmicInit,
    PmicPin(PmicInstance, u8, u8),
    Rail(RegulatorDirective),
    PwmConfig(PwmChannelConfig),
    PwmEnable(PwmChannelConfig),
}

/// Stands in for every collaborator at once and keeps a single ordered log.
#[derive(Default, Debug)]
pub struct Hardware {
    pub log: Vec<Call>,
}

impl Gpio for Hardware {
    fn set_direction(&mut self, pin: GpioPin, direction: Direction) {
        self.log.push(Call::Direction(pin, direction));
    }

    fn write(&mut self, pin: GpioPin, level: bool) {
        self.log.push(Call::Write(pin, level));
    }

    fn set_function(&mut self, pin: GpioPin, function: u8) {
        self.log.push(Call::Function(pin, function));
    }

    fn set_pull(&mut self, pin: GpioPin, pull: Pull) {
        self.log.push(Call::Pull(pin, pull));
    }
}

impl Mmio for Hardware {
    fn write32(&mut self, addr: PhysicalAddress, value: u32) {
        self.log.push(Call::Mmio(addr, value));
    }
}

impl Pmic for Hardware {
    fn init(&mut self) -> Result<(), PmicError> {
        self.log.push(Call::PmicInit);
        Ok(())
    }

    fn set_pin_function(
        &mut self,
        instance: PmicInstance,
        pin: u8,
        function: u8,
    ) -> Result<(), PmicError> {
        self.log.push(Call::PmicPin(instance, pin, function));
        Ok(())
    }

    fn regulator_init(&mut self, directive: &RegulatorDirective) -> Result<(), PmicError> {
        self.log.push(Call::Rail(*directive));
        Ok(())
    }
}

impl Pwm for Hardware {
    fn set_config(&mut self, config: &PwmChannelConfig) {
        self.log.push(Call::PwmConfig(*config));
    }

    fn enable(&mut self, config: &PwmChannelConfig) {
        self.log.push(Call::PwmEnable(*config));
    }
}

#[derive(Default, Debug)]
pub struct CountingDelay {
    pub total_us: u64,
}

impl Delay for CountingDelay {
    fn delay_us(&mut self, us: u32) {
        self.total_us += us as u64;
    }
}
