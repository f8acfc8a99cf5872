//! RK806 regulator setup.
//!
//! The board has a single RK806 on SPI. At boot every rail the OS expects to find powered is
//! programmed from [RK806_INIT_TABLE]; rails missing from the table keep their hardware default.
//! The CPU little-cluster supply (BUCK2) is left out on purpose and retuned later through
//! [RegulatorInitializer::set_cpu_little_voltage].

use bapi::{
    Pmic, PmicError, PmicInstance, RailId, RegulatorDirective,
    RegulatorOutput::{self, *},
};
use snafu::{ResultExt, Snafu};

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum RegulatorError {
    #[snafu(display("failed to initialize PMIC"))]
    Controller { source: PmicError },
    #[snafu(display("failed to set function of PMIC {instance:?} pin {pin}"))]
    PinFunction {
        instance: PmicInstance,
        pin: u8,
        source: PmicError,
    },
    #[snafu(display("failed to configure rail {rail}"))]
    Rail { rail: RailId, source: PmicError },
}

/// Supply of the Cortex-A55 cluster.
pub const MASTER_BUCK2: RailId = RailId::master(Buck2);

const fn master(output: RegulatorOutput, microvolts: u32) -> RegulatorDirective {
    RegulatorDirective::new(RailId::master(output), microvolts)
}

/// Boot-time rail settings, applied in order.
pub const RK806_INIT_TABLE: &[RegulatorDirective] = &[
    master(Buck1, 750_000),
    master(Buck3, 750_000),
    master(Buck4, 750_000),
    master(Buck5, 850_000),
    master(Buck7, 2_000_000),
    master(Buck8, 3_300_000),
    master(Buck10, 1_800_000),
    master(Nldo1, 750_000),
    master(Nldo2, 850_000),
    master(Nldo3, 750_000),
    master(Nldo4, 850_000),
    master(Nldo5, 750_000),
    master(Pldo1, 1_800_000),
    master(Pldo2, 1_800_000),
    master(Pldo3, 1_200_000),
    master(Pldo4, 3_300_000),
    master(Pldo5, 3_300_000),
    master(Pldo6, 1_800_000),
];

/// PMIC pin carrying `DVS1`.
const DVS1_PIN: u8 = 1;
/// Pin function: power-down request input.
const PIN_FUNCTION_PWRDN: u8 = 2;

/// Drives rail configuration through a PMIC driver.
///
/// No retries and no rollback: every directive is an independent command, and a failure is
/// handed straight back to the caller with the rails before it already programmed.
pub struct RegulatorInitializer<P> {
    pmic: P,
}

impl<P: Pmic> RegulatorInitializer<P> {
    pub fn new(pmic: P) -> Self {
        Self { pmic }
    }

    /// Bring the PMIC control channel up.
    pub fn initialize_controller(&mut self) -> Result<(), RegulatorError> {
        log::debug!("initializing RK806");
        self.pmic.init().context(ControllerSnafu)
    }

    /// Configure auxiliary pin `pin` of PMIC `controller`.
    pub fn set_pin_function(
        &mut self,
        controller: PmicInstance,
        pin: u8,
        function: u8,
    ) -> Result<(), RegulatorError> {
        log::debug!("PMIC {controller:?} pin {pin} -> function {function}");
        self.pmic
            .set_pin_function(controller, pin, function)
            .context(PinFunctionSnafu {
                instance: controller,
                pin,
            })
    }

    /// Issue one rail command per directive, in table order.
    pub fn apply_table(&mut self, table: &[RegulatorDirective]) -> Result<(), RegulatorError> {
        for directive in table {
            self.apply(directive)?;
        }
        Ok(())
    }

    /// Retune a single rail. May be called any number of times after [Self::apply_table].
    pub fn set_rail_microvolts(
        &mut self,
        rail: RailId,
        microvolts: u32,
    ) -> Result<(), RegulatorError> {
        self.apply(&RegulatorDirective::new(rail, microvolts))
    }

    fn apply(&mut self, directive: &RegulatorDirective) -> Result<(), RegulatorError> {
        log::debug!("{} -> {} uV", directive.rail, directive.microvolts);
        self.pmic
            .regulator_init(directive)
            .context(RailSnafu {
                rail: directive.rail,
            })
    }

    /// Full boot configuration: controller, DVS1 as power-down input, then the rail table.
    pub fn configure(&mut self) -> Result<(), RegulatorError> {
        self.initialize_controller()?;
        self.set_pin_function(PmicInstance::Master, DVS1_PIN, PIN_FUNCTION_PWRDN)?;
        self.apply_table(RK806_INIT_TABLE)?;
        log::info!("{} regulators configured", RK806_INIT_TABLE.len());
        Ok(())
    }

    /// Set the CPU little-cluster supply.
    pub fn set_cpu_little_voltage(&mut self, microvolts: u32) -> Result<(), RegulatorError> {
        self.set_rail_microvolts(MASTER_BUCK2, microvolts)
    }

    pub fn pmic(&self) -> &P {
        &self.pmic
    }

    pub fn into_inner(self) -> P {
        self.pmic
    }
}
