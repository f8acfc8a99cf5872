//! Board-wide error type.

use snafu::Snafu;

use crate::regulator::RegulatorError;

/// Errors that can happen during platform bring-up.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// Regulator setup failed. Usually fatal to the boot.
    #[snafu(context(false), display("regulator setup failed: {source}"))]
    Regulator { source: RegulatorError },

    /// A raw identifier handed in by a caller does not name anything on this board.
    #[snafu(display("unknown {kind} id {id}"))]
    UnknownId { kind: &'static str, id: u32 },
}
