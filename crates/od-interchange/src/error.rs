//! Interchange error types.
//!
//! [`InterchangeError`] fails one unit; the batch carries on without it.
//! [`SpliceConflict`] never escapes the splicer: it selects the straight
//! bridge fallback and is recorded in the splice report.

use std::fmt;

use od_core::{CoreError, UnitId};
use od_lanes::LaneError;
use thiserror::Error;

use crate::link::LinkRole;

/// Which endpoint of the wedge border a search was for.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BorderEnd {
    /// First border vertex, where the wedge opens.
    Start,
    /// Last border vertex, where the wedge closes.
    End,
}

impl fmt::Display for BorderEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BorderEnd::Start => "wedge start",
            BorderEnd::End => "wedge end",
        })
    }
}

#[derive(Debug, Error)]
pub enum InterchangeError {
    #[error("{unit}: degenerate geometry: {reason}")]
    DegenerateGeometry { unit: UnitId, reason: String },

    #[error("{unit}: insufficient data past the {border_end}: {reason}")]
    InsufficientBorderData {
        unit:       UnitId,
        border_end: BorderEnd,
        reason:     String,
    },

    #[error("{unit}: no {role} link")]
    MissingLink { unit: UnitId, role: LinkRole },

    #[error("{unit}: no wedge border")]
    MissingBorder { unit: UnitId },

    #[error("lane topology: {0}")]
    Lanes(#[from] LaneError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type InterchangeResult<T> = Result<T, InterchangeError>;

/// The tail a splice precondition failed on.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TailSide {
    /// Exit of the upstream unit.
    Exit,
    /// Entry of the downstream unit.
    Entry,
}

impl fmt::Display for TailSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TailSide::Exit => "exit",
            TailSide::Entry => "entry",
        })
    }
}

#[derive(Clone, Debug, Error, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpliceConflict {
    #[error("{tail} tail would be trimmed down to its anchor")]
    TrimAtEndpoint { tail: TailSide },

    #[error("{tail} tail keeps {vertices} vertices after trimming, need {need}")]
    TooShort {
        tail:     TailSide,
        vertices: usize,
        need:     usize,
    },

    #[error("trimmed tails cross each other")]
    Crossing,
}
