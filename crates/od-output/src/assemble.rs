//! Turn completed units into records.

use od_core::{CanonicalRoadId, ContactPoint, JunctionId, Polyline, RoadId, RoadMap};
use od_geometry::{to_param_poly3, Classification, SegmentKind};
use od_lanes::{LaneTable, LaneTopology, RoadLink};
use od_pipeline::{Batch, CompletedUnit, UnitIds};

use crate::record::{
    ConnectionRecord, ElevationRecord, GeometryKind, GeometryRecord, LaneRecord, LinkElement, LinkRecord,
    RoadRecord, UnitRecords,
};
use crate::{OutputError, OutputResult};

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AssembleOptions {
    /// Emit spirals as `paramPoly3` for consumers without clothoid support.
    pub spirals_as_param_poly3: bool,
}

/// Records of every unit in `batch`, in unit order.
pub fn assemble_batch(batch: &Batch, opts: &AssembleOptions) -> OutputResult<UnitRecords> {
    let mut out = UnitRecords::default();
    for done in &batch.units {
        out.extend(assemble(done, opts)?);
    }
    Ok(out)
}

/// Records of one completed unit.
///
/// Fails with [`OutputError::UnitNotReady`] if the unit has not been
/// classified or has no lane topology.
pub fn assemble(done: &CompletedUnit, opts: &AssembleOptions) -> OutputResult<UnitRecords> {
    let unit = &done.unit;
    let ids = &done.ids;
    let classes = unit
        .classifications
        .as_ref()
        .ok_or(OutputError::UnitNotReady { unit: unit.id, missing: "classification" })?;
    let lanes = unit.lanes.as_ref().ok_or(OutputError::UnitNotReady { unit: unit.id, missing: "lane topology" })?;

    let mut out = UnitRecords::default();
    for road in CanonicalRoadId::ALL {
        let id = ids.roads[road];
        let class = &classes[road];
        let table = lanes.table(road);
        if class.stations.len() != unit.roads[road].len() {
            return Err(OutputError::UnitNotReady { unit: unit.id, missing: "classification of the current roads" });
        }
        let (predecessor, successor) = road_links(road, table, ids);

        out.roads.push(RoadRecord {
            id,
            unit: unit.id,
            name: road.name().to_string(),
            junction: (road == CanonicalRoadId::Wedge).then_some(ids.junction),
            length: class.length(),
            speed_limit: unit.speed_limits[road],
            lane_offset: table.lane_offset,
            predecessor,
            successor,
        });
        out.geometry.extend(geometry_records(id, class, opts));
        out.elevation.extend(elevation_records(id, &unit.roads[road], class));
        out.lanes.extend(table.rows.iter().map(|row| LaneRecord {
            road:        id,
            lane_id:     row.lane_id,
            width:       row.width,
            mark:        row.mark,
            predecessor: row.predecessor.map(|l| l.lane).or(row.spliced_predecessor),
            successor:   row.successor.map(|l| l.lane).or(row.spliced_successor),
        }));
    }
    out.connections = connection_records(ids.junction, &ids.roads, lanes);
    Ok(out)
}

// ── Per-element helpers ───────────────────────────────────────────────────────

fn road_links(road: CanonicalRoadId, table: &LaneTable, ids: &UnitIds) -> (Option<LinkRecord>, Option<LinkRecord>) {
    let resolve = |link: RoadLink| match link {
        RoadLink::Road { road, contact } => {
            LinkRecord { element: LinkElement::Road(ids.roads[road]), contact: Some(contact) }
        }
        RoadLink::Junction => LinkRecord { element: LinkElement::Junction(ids.junction), contact: None },
    };
    let spliced = |other: Option<RoadId>, contact| {
        other.map(|r| LinkRecord { element: LinkElement::Road(r), contact: Some(contact) })
    };
    let mut predecessor = table.predecessor.map(resolve);
    let mut successor = table.successor.map(resolve);
    if road == CanonicalRoadId::MainPreEvent && predecessor.is_none() {
        predecessor = spliced(ids.upstream, ContactPoint::End);
    }
    if road == CanonicalRoadId::MainPostFar && successor.is_none() {
        successor = spliced(ids.downstream, ContactPoint::Start);
    }
    (predecessor, successor)
}

fn geometry_records(road: RoadId, class: &Classification, opts: &AssembleOptions) -> Vec<GeometryRecord> {
    class
        .segments
        .iter()
        .map(|seg| {
            let kind = match seg.kind {
                SegmentKind::Line => GeometryKind::Line,
                SegmentKind::Arc { radius } => GeometryKind::Arc { curvature: 1.0 / radius },
                SegmentKind::Spiral { .. } if opts.spirals_as_param_poly3 => {
                    GeometryKind::ParamPoly3(to_param_poly3(seg))
                }
                SegmentKind::Spiral { start_curvature, end_curvature } => {
                    GeometryKind::Spiral { curv_start: start_curvature, curv_end: end_curvature }
                }
            };
            GeometryRecord { road, s: seg.s, x: seg.x, y: seg.y, hdg: seg.heading, length: seg.length, kind }
        })
        .collect()
}

/// One record per vertex transition, stationed on the analytic reference
/// line.  Each vertex cubic is fitted against polyline arclength, so its
/// coefficients are rescaled by the analytic/polyline length ratio of the
/// transition.
fn elevation_records(road: RoadId, polyline: &Polyline, class: &Classification) -> Vec<ElevationRecord> {
    let chord = polyline.arclengths();
    let stations = &class.stations;
    polyline
        .vertices()
        .windows(2)
        .enumerate()
        .map(|(i, pair)| {
            let along = chord[i + 1] - chord[i];
            let analytic = stations[i + 1] - stations[i];
            let k = if along > 0.0 && analytic > 0.0 { analytic / along } else { 1.0 };
            let e = pair[0].elev;
            ElevationRecord { road, s: stations[i], a: e.a, b: e.b / k, c: e.c / (k * k), d: e.d / (k * k * k) }
        })
        .collect()
}

fn connection_records(
    junction: JunctionId,
    roads:    &RoadMap<RoadId>,
    lanes:    &LaneTopology,
) -> Vec<ConnectionRecord> {
    lanes
        .junction
        .iter()
        .enumerate()
        .map(|(i, row)| ConnectionRecord {
            junction,
            id:              i as u32,
            incoming_road:   roads[row.incoming_road],
            connecting_road: roads[row.connecting_road],
            contact_point:   row.contact_point,
            lane_from:       row.lane_from,
            lane_to:         row.lane_to,
        })
        .collect()
}
