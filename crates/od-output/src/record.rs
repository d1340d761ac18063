//! Plain record types, one per OpenDRIVE element written by the backends.

use std::collections::HashSet;

use od_core::{ContactPoint, CubicPoly, JunctionId, RoadId, UnitId};
use od_geometry::ParamPoly3;
use od_lanes::MarkKind;

use crate::{OutputError, OutputResult};

/// Target of a road-level predecessor or successor link.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LinkElement {
    Road(RoadId),
    Junction(JunctionId),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinkRecord {
    pub element: LinkElement,
    /// Set for road targets only.
    pub contact: Option<ContactPoint>,
}

/// Header of one road.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoadRecord {
    pub id:          RoadId,
    pub unit:        UnitId,
    /// Canonical road name, e.g. `main_pre_event`.
    pub name:        String,
    /// Set on the road that connects inside the unit's junction.
    pub junction:    Option<JunctionId>,
    pub length:      f64,
    /// Metres per second.
    pub speed_limit: f64,
    pub lane_offset: CubicPoly,
    pub predecessor: Option<LinkRecord>,
    pub successor:   Option<LinkRecord>,
}

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GeometryKind {
    Line,
    Arc { curvature: f64 },
    Spiral { curv_start: f64, curv_end: f64 },
    ParamPoly3(ParamPoly3),
}

impl GeometryKind {
    pub fn name(&self) -> &'static str {
        match self {
            GeometryKind::Line => "line",
            GeometryKind::Arc { .. } => "arc",
            GeometryKind::Spiral { .. } => "spiral",
            GeometryKind::ParamPoly3(_) => "paramPoly3",
        }
    }
}

/// One `planView` geometry element.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeometryRecord {
    pub road:   RoadId,
    pub s:      f64,
    pub x:      f64,
    pub y:      f64,
    pub hdg:    f64,
    pub length: f64,
    pub kind:   GeometryKind,
}

/// One `elevationProfile` entry: `z(ds) = a + b·ds + c·ds² + d·ds³` from `s`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElevationRecord {
    pub road: RoadId,
    pub s:    f64,
    pub a:    f64,
    pub b:    f64,
    pub c:    f64,
    pub d:    f64,
}

/// One lane of a road's single lane section.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LaneRecord {
    pub road:        RoadId,
    pub lane_id:     i32,
    pub width:       CubicPoly,
    pub mark:        MarkKind,
    pub predecessor: Option<i32>,
    pub successor:   Option<i32>,
}

/// One lane link of a junction connection.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConnectionRecord {
    pub junction:        JunctionId,
    /// Position within the junction.
    pub id:              u32,
    pub incoming_road:   RoadId,
    pub connecting_road: RoadId,
    pub contact_point:   ContactPoint,
    pub lane_from:       i32,
    pub lane_to:         i32,
}

/// Every record of one or more units.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitRecords {
    pub roads:       Vec<RoadRecord>,
    pub geometry:    Vec<GeometryRecord>,
    pub elevation:   Vec<ElevationRecord>,
    pub lanes:       Vec<LaneRecord>,
    pub connections: Vec<ConnectionRecord>,
}

impl UnitRecords {
    pub fn extend(&mut self, other: UnitRecords) {
        self.roads.extend(other.roads);
        self.geometry.extend(other.geometry);
        self.elevation.extend(other.elevation);
        self.lanes.extend(other.lanes);
        self.connections.extend(other.connections);
    }

    /// Check that every record names a road that has a [`RoadRecord`].
    pub fn check_references(&self) -> OutputResult<()> {
        let known: HashSet<RoadId> = self.roads.iter().map(|r| r.id).collect();
        let check = |road: RoadId, what| {
            if known.contains(&road) { Ok(()) } else { Err(OutputError::UnknownRoad { road, what }) }
        };
        for g in &self.geometry {
            check(g.road, "geometry")?;
        }
        for e in &self.elevation {
            check(e.road, "elevation")?;
        }
        for l in &self.lanes {
            check(l.road, "lane")?;
        }
        for c in &self.connections {
            check(c.incoming_road, "connection")?;
            check(c.connecting_road, "connection")?;
        }
        Ok(())
    }
}
