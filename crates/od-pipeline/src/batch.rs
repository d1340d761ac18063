//! Results of one [`Pipeline::run`][crate::Pipeline::run].

use std::fmt;

use od_core::{JunctionId, RoadId, RoadMap, UnitId};
use od_interchange::{InterchangeUnit, SpliceReport};

/// Phase at which a unit left the batch.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Stage {
    Segment,
    Splice,
    Lanes,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Segment => "segment",
            Stage::Splice => "splice",
            Stage::Lanes => "lanes",
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FailedUnit {
    pub id:     UnitId,
    pub stage:  Stage,
    pub reason: String,
}

/// OpenDRIVE ids handed to one surviving unit.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitIds {
    pub junction:   JunctionId,
    pub roads:      RoadMap<RoadId>,
    /// Road feeding `MainPreEvent`: the previous unit's `MainPostFar` when the
    /// two were spliced.
    pub upstream:   Option<RoadId>,
    /// Road fed by `MainPostFar`: the next unit's `MainPreEvent` when the two
    /// were spliced.
    pub downstream: Option<RoadId>,
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompletedUnit {
    pub unit: InterchangeUnit,
    pub ids:  UnitIds,
}

/// Everything a run produced, in input order.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Batch {
    pub units:   Vec<CompletedUnit>,
    pub failed:  Vec<FailedUnit>,
    pub splices: Vec<SpliceReport>,
}

impl Batch {
    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    /// Splices that fell back to a straight bridge.
    pub fn approximate_splices(&self) -> impl Iterator<Item = &SpliceReport> {
        self.splices.iter().filter(|r| r.is_approximate())
    }

    pub fn unit(&self, id: UnitId) -> Option<&CompletedUnit> {
        self.units.iter().find(|c| c.unit.id == id)
    }

    pub fn road_count(&self) -> usize {
        self.units.len() * od_core::CanonicalRoadId::COUNT
    }
}
