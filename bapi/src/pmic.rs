//! Power management IC interface and regulator addressing.
use core::fmt;

use snafu::Snafu;

/// Errors reported by the PMIC communication driver.
#[derive(Debug, Snafu, Copy, Clone, PartialEq, Eq)]
pub enum PmicError {
    /// The transfer on the PMIC control bus failed.
    #[snafu(display("PMIC bus transfer failed"))]
    Bus,
    /// The PMIC did not respond in time.
    #[snafu(display("PMIC did not respond"))]
    Timeout,
    /// The requested voltage cannot be produced by the rail.
    #[snafu(display("rail cannot produce {microvolts} uV"))]
    UnsupportedVoltage {
        /// The rejected target.
        microvolts: u32,
    },
}

/// One PMIC on a board that may carry a master/slave pair.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PmicInstance {
    /// The master PMIC.
    Master,
    /// The slave PMIC of a dual-PMIC board.
    Slave,
}

/// A regulator output of an RK806-class PMIC.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum RegulatorOutput {
    Buck1,
    Buck2,
    Buck3,
    Buck4,
    Buck5,
    Buck6,
    Buck7,
    Buck8,
    Buck9,
    Buck10,
    Nldo1,
    Nldo2,
    Nldo3,
    Nldo4,
    Nldo5,
    Pldo1,
    Pldo2,
    Pldo3,
    Pldo4,
    Pldo5,
    Pldo6,
}

impl fmt::Display for RegulatorOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use RegulatorOutput::*;
        let (kind, n) = match self {
            Buck1 => ("BUCK", 1),
            Buck2 => ("BUCK", 2),
            Buck3 => ("BUCK", 3),
            Buck4 => ("BUCK", 4),
            Buck5 => ("BUCK", 5),
            Buck6 => ("BUCK", 6),
            Buck7 => ("BUCK", 7),
            Buck8 => ("BUCK", 8),
            Buck9 => ("BUCK", 9),
            Buck10 => ("BUCK", 10),
            Nldo1 => ("NLDO", 1),
            Nldo2 => ("NLDO", 2),
            Nldo3 => ("NLDO", 3),
            Nldo4 => ("NLDO", 4),
            Nldo5 => ("NLDO", 5),
            Pldo1 => ("PLDO", 1),
            Pldo2 => ("PLDO", 2),
            Pldo3 => ("PLDO", 3),
            Pldo4 => ("PLDO", 4),
            Pldo5 => ("PLDO", 5),
            Pldo6 => ("PLDO", 6),
        };
        write!(f, "{kind}{n}")
    }
}

/// Identifies one rail: an output on a particular PMIC.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct RailId {
    /// Which PMIC the rail lives on.
    pub instance: PmicInstance,
    /// Which output of that PMIC.
    pub output: RegulatorOutput,
}

impl RailId {
    /// A rail on the master PMIC.
    pub const fn master(output: RegulatorOutput) -> Self {
        Self {
            instance: PmicInstance::Master,
            output,
        }
    }

    /// A rail on the slave PMIC.
    pub const fn slave(output: RegulatorOutput) -> Self {
        Self {
            instance: PmicInstance::Slave,
            output,
        }
    }
}

impl fmt::Display for RailId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.instance {
            PmicInstance::Master => "MASTER",
            PmicInstance::Slave => "SLAVE",
        };
        write!(f, "{prefix}_{}", self.output)
    }
}

/// Bring one rail to a target voltage.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RegulatorDirective {
    /// The rail to configure.
    pub rail: RailId,
    /// Target output in microvolts.
    pub microvolts: u32,
}

impl RegulatorDirective {
    /// Directive setting `rail` to `microvolts`.
    pub const fn new(rail: RailId, microvolts: u32) -> Self {
        Self { rail, microvolts }
    }
}

/// Operations provided by the PMIC communication driver.
pub trait Pmic {
    /// Bring up the control channel and put the PMIC state machine into a known state.
    fn init(&mut self) -> Result<(), PmicError>;

    /// Configure auxiliary pin `pin` of `instance` (e.g. a DVS/power-down line) to `function`.
    fn set_pin_function(
        &mut self,
        instance: PmicInstance,
        pin: u8,
        function: u8,
    ) -> Result<(), PmicError>;

    /// Program and enable the rail named by `directive`.
    fn regulator_init(&mut self, directive: &RegulatorDirective) -> Result<(), PmicError>;
}

impl<P: Pmic + ?Sized> Pmic for &mut P {
    fn init(&mut self) -> Result<(), PmicError> {
        (**self).init()
    }

    fn set_pin_function(
        &mut self,
        instance: PmicInstance,
        pin: u8,
        function: u8,
    ) -> Result<(), PmicError> {
        (**self).set_pin_function(instance, pin, function)
    }

    fn regulator_init(&mut self, directive: &RegulatorDirective) -> Result<(), PmicError> {
        (**self).regulator_init(directive)
    }
}
