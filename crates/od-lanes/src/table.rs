//! Per-road lane tables and junction connection rows.

use od_core::{CanonicalRoadId, ContactPoint, CubicPoly, EventKind, RoadMap};

use crate::taper::Taper;

/// Lane count and nominal width of one input link.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LaneSpec {
    pub count: u32,
    /// Metres.
    pub width: f64,
}

impl LaneSpec {
    pub fn new(count: u32, width: f64) -> Self {
        Self { count, width }
    }
}

/// Lane specs of the three links meeting at one event.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoleLanes {
    pub upstream:   LaneSpec,
    pub downstream: LaneSpec,
    pub ramp:       LaneSpec,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum MarkKind {
    Solid,
    Broken,
    None,
}

impl MarkKind {
    pub fn name(self) -> &'static str {
        match self {
            MarkKind::Solid => "solid",
            MarkKind::Broken => "broken",
            MarkKind::None => "none",
        }
    }
}

/// A lane on a specific canonical road.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LaneRef {
    pub road: CanonicalRoadId,
    pub lane: i32,
}

/// Road-level predecessor or successor.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RoadLink {
    Road { road: CanonicalRoadId, contact: ContactPoint },
    /// The unit's junction.
    Junction,
}

/// One row of a road's lane table.  Lane 0 is the centre lane.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LaneInfoRow {
    pub lane_id:     i32,
    /// Width in metres as a cubic in `s` from the road start.
    pub width:       CubicPoly,
    pub mark:        MarkKind,
    pub predecessor: Option<LaneRef>,
    pub successor:   Option<LaneRef>,
    /// Lane of the upstream unit's `MainPostFar` across a splice
    /// (`MainPreEvent` rows only).
    pub spliced_predecessor: Option<i32>,
    /// Lane of the downstream unit's `MainPreEvent` across a splice
    /// (`MainPostFar` rows only).
    pub spliced_successor:   Option<i32>,
}

/// Lanes of one canonical road.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LaneTable {
    /// Right-hand lanes, including any lane that only exists to taper.
    pub lane_count:  u32,
    /// `lane_count + 1` rows: the centre lane, then `-1, -2, …`.
    pub rows:        Vec<LaneInfoRow>,
    pub lane_offset: CubicPoly,
    pub predecessor: Option<RoadLink>,
    pub successor:   Option<RoadLink>,
    pub taper:       Option<Taper>,
}

impl LaneTable {
    pub fn row(&self, lane_id: i32) -> Option<&LaneInfoRow> {
        self.rows.iter().find(|r| r.lane_id == lane_id)
    }

    pub fn row_mut(&mut self, lane_id: i32) -> Option<&mut LaneInfoRow> {
        self.rows.iter_mut().find(|r| r.lane_id == lane_id)
    }
}

/// One lane link inside the unit's junction.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JunctionConnectionRow {
    pub incoming_road:   CanonicalRoadId,
    pub connecting_road: CanonicalRoadId,
    pub contact_point:   ContactPoint,
    pub lane_from:       i32,
    pub lane_to:         i32,
}

/// Complete lane description of one interchange unit.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LaneTopology {
    pub event:    EventKind,
    pub tables:   RoadMap<LaneTable>,
    pub junction: Vec<JunctionConnectionRow>,
}

impl LaneTopology {
    pub fn table(&self, road: CanonicalRoadId) -> &LaneTable {
        &self.tables[road]
    }

    /// Roads carrying a taper.
    pub fn tapered_roads(&self) -> impl Iterator<Item = (CanonicalRoadId, &Taper)> {
        self.tables.iter().filter_map(|(id, t)| t.taper.as_ref().map(|tp| (id, tp)))
    }
}
