//! CSV loader for interchange unit inputs.
//!
//! # CSV format
//!
//! Link vertices, one row per vertex, ordered within a link by `seq`.  Lane
//! attributes are read from the first row of each link.
//!
//! ```csv
//! unit,role,seq,x,y,z,lane_count,lane_width,speed_limit
//! 0,upstream,0,0.0,0.0,12.0,3,3.5,27.8
//! 0,upstream,1,2.0,0.0,12.0,3,3.5,27.8
//! 0,ramp,0,40.0,-60.0,9.5,1,3.75,16.7
//! ```
//!
//! `role` is `ramp`, `upstream` or `downstream`.
//!
//! Wedge borders, one row per border vertex; `event` is `merge` or `branch`
//! and is read from the first row of each unit.
//!
//! ```csv
//! unit,event,seq,x,y,z
//! 0,merge,0,180.0,-3.0,12.0
//! 0,merge,1,260.0,-1.0,12.0
//! ```
//!
//! A malformed row fails the whole load.  A unit with a missing link, a
//! missing border or a one-vertex polyline is rejected on its own.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use od_core::{CoreError, EventKind, Polyline, UnitId};
use od_lanes::LaneSpec;

use crate::error::{InterchangeError, InterchangeResult};
use crate::link::{Border, LinkGroup, LinkRole, LinkSet};
use crate::unit::UnitInput;

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct LinkRecord {
    unit:        u32,
    role:        String,
    seq:         u32,
    x:           f64,
    y:           f64,
    z:           f64,
    lane_count:  u32,
    lane_width:  f64,
    speed_limit: f64,
}

#[derive(Deserialize)]
struct BorderRecord {
    unit:  u32,
    event: String,
    seq:   u32,
    x:     f64,
    y:     f64,
    z:     f64,
}

/// Units assembled from the two CSV sources, in ascending unit id order.
#[derive(Debug, Default)]
pub struct LoadedUnits {
    pub units:    Vec<UnitInput>,
    pub rejected: Vec<(UnitId, InterchangeError)>,
}

// ── Public API ────────────────────────────────────────────────────────────────

pub fn load_units_csv(links: &Path, borders: &Path) -> InterchangeResult<LoadedUnits> {
    let links = std::fs::File::open(links).map_err(CoreError::Io)?;
    let borders = std::fs::File::open(borders).map_err(CoreError::Io)?;
    load_units_reader(links, borders)
}

/// Like [`load_units_csv`] but accepts any `Read` sources.
pub fn load_units_reader<L: Read, B: Read>(links: L, borders: B) -> InterchangeResult<LoadedUnits> {
    // ── Parse CSV rows ────────────────────────────────────────────────────
    let mut by_link: BTreeMap<(u32, LinkRole), Vec<LinkRecord>> = BTreeMap::new();
    for result in csv::Reader::from_reader(links).deserialize::<LinkRecord>() {
        let row = result.map_err(|e| CoreError::Parse(e.to_string()))?;
        let role: LinkRole = row.role.parse()?;
        by_link.entry((row.unit, role)).or_default().push(row);
    }

    let mut by_unit: BTreeMap<u32, Vec<BorderRecord>> = BTreeMap::new();
    for result in csv::Reader::from_reader(borders).deserialize::<BorderRecord>() {
        let row = result.map_err(|e| CoreError::Parse(e.to_string()))?;
        by_unit.entry(row.unit).or_default().push(row);
    }

    // ── Assemble one input per unit ───────────────────────────────────────
    let mut ids: Vec<u32> = by_unit.keys().copied().collect();
    ids.extend(by_link.keys().map(|&(unit, _)| unit));
    ids.sort_unstable();
    ids.dedup();

    let mut out = LoadedUnits::default();
    for raw in ids {
        let unit = UnitId(raw);
        let mut take = |role| by_link.remove(&(raw, role));
        let rows = (take(LinkRole::Ramp), take(LinkRole::Upstream), take(LinkRole::Downstream));
        match assemble(unit, rows, by_unit.remove(&raw)) {
            Ok(input) => out.units.push(input),
            Err(e) => out.rejected.push((unit, e)),
        }
    }
    Ok(out)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

type LinkRows = Option<Vec<LinkRecord>>;

fn assemble(
    unit:   UnitId,
    links:  (LinkRows, LinkRows, LinkRows),
    border: Option<Vec<BorderRecord>>,
) -> InterchangeResult<UnitInput> {
    let (ramp, upstream, downstream) = links;
    let link = |role, rows: LinkRows| -> InterchangeResult<LinkGroup> {
        let mut rows = rows.ok_or(InterchangeError::MissingLink { unit, role })?;
        rows.sort_by_key(|r| r.seq);
        let first = &rows[0];
        let lanes = LaneSpec::new(first.lane_count, first.lane_width);
        let speed_limit = first.speed_limit;
        let centerline = polyline(unit, rows.iter().map(|r| (r.x, r.y, r.z)))?;
        Ok(LinkGroup { role, centerline, lanes, speed_limit })
    };
    let links = LinkSet {
        ramp:       link(LinkRole::Ramp, ramp)?,
        upstream:   link(LinkRole::Upstream, upstream)?,
        downstream: link(LinkRole::Downstream, downstream)?,
    };

    let mut rows = border.ok_or(InterchangeError::MissingBorder { unit })?;
    rows.sort_by_key(|r| r.seq);
    let event: EventKind = rows[0].event.parse()?;
    let border = Border::new(polyline(unit, rows.iter().map(|r| (r.x, r.y, r.z)))?);

    Ok(UnitInput { id: unit, event, links, border })
}

fn polyline(unit: UnitId, points: impl IntoIterator<Item = (f64, f64, f64)>) -> InterchangeResult<Polyline> {
    Polyline::from_xyz(points).map_err(|e| InterchangeError::DegenerateGeometry { unit, reason: e.to_string() })
}
