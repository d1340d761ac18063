//! Lane-topology error type.

use od_core::CanonicalRoadId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LaneError {
    #[error("{role} lane count {count} is invalid: {reason}")]
    InvalidLaneCount {
        role:   &'static str,
        count:  u32,
        reason: &'static str,
    },

    #[error("{role} lane width {width} must be finite and positive")]
    InvalidWidth { role: &'static str, width: f64 },

    #[error("road {road} has unusable length {length}")]
    InvalidLength { road: CanonicalRoadId, length: f64 },
}

pub type LaneResult<T> = Result<T, LaneError>;
