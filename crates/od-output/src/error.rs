//! Error types for od-output.

use od_core::{RoadId, UnitId};
use thiserror::Error;

/// Errors that can occur when assembling or writing records.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("{unit} has no {missing} yet")]
    UnitNotReady {
        unit:    UnitId,
        missing: &'static str,
    },

    #[error("{what} record refers to {road}, which has no road record")]
    UnknownRoad {
        road: RoadId,
        what: &'static str,
    },
}

/// Alias for `Result<T, OutputError>`.
pub type OutputResult<T> = Result<T, OutputError>;
