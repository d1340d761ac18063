//! CSV output backend.
//!
//! Creates five files in the configured output directory:
//! - `roads.csv`
//! - `plan_view.csv`
//! - `elevation.csv`
//! - `lanes.csv`
//! - `junctions.csv`
//!
//! Every real number is written with [`num`]; fields that do not apply to a
//! row are left empty.  A road without a junction has `junction = -1`.

use std::fs::File;
use std::path::Path;

use csv::Writer;
use od_core::CubicPoly;

use crate::record::{
    ConnectionRecord, ElevationRecord, GeometryKind, GeometryRecord, LaneRecord, LinkElement, LinkRecord,
    RoadRecord,
};
use crate::writer::RecordWriter;
use crate::OutputResult;

pub const ROADS_HEADER: [&str; 16] = [
    "road",
    "unit",
    "name",
    "junction",
    "length",
    "speed_limit",
    "offset_a",
    "offset_b",
    "offset_c",
    "offset_d",
    "pred_type",
    "pred_id",
    "pred_contact",
    "succ_type",
    "succ_id",
    "succ_contact",
];

pub const PLAN_VIEW_HEADER: [&str; 18] = [
    "road",
    "s",
    "x",
    "y",
    "hdg",
    "length",
    "kind",
    "curvature",
    "curv_start",
    "curv_end",
    "au",
    "bu",
    "cu",
    "du",
    "av",
    "bv",
    "cv",
    "dv",
];

pub const ELEVATION_HEADER: [&str; 6] = ["road", "s", "a", "b", "c", "d"];

pub const LANES_HEADER: [&str; 9] = [
    "road",
    "lane",
    "width_a",
    "width_b",
    "width_c",
    "width_d",
    "mark",
    "predecessor",
    "successor",
];

pub const JUNCTIONS_HEADER: [&str; 7] = [
    "junction",
    "connection",
    "incoming_road",
    "connecting_road",
    "contact_point",
    "lane_from",
    "lane_to",
];

/// Full-precision scientific notation: 17 significant digits.
pub fn num(v: f64) -> String {
    format!("{v:.16e}")
}

fn poly(p: &CubicPoly) -> [String; 4] {
    [num(p.a), num(p.b), num(p.c), num(p.d)]
}

fn link(link: Option<LinkRecord>) -> [String; 3] {
    match link {
        None => Default::default(),
        Some(l) => {
            let (kind, id) = match l.element {
                LinkElement::Road(r) => ("road", r.0),
                LinkElement::Junction(j) => ("junction", j.0),
            };
            let contact = l.contact.map(|c| c.name().to_string()).unwrap_or_default();
            [kind.to_string(), id.to_string(), contact]
        }
    }
}

fn opt_lane(lane: Option<i32>) -> String {
    lane.map(|l| l.to_string()).unwrap_or_default()
}

/// Writes records to five CSV files.
pub struct CsvWriter {
    roads:     Writer<File>,
    plan_view: Writer<File>,
    elevation: Writer<File>,
    lanes:     Writer<File>,
    junctions: Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Open (or create) the five CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let open = |name: &str, header: &[&str]| -> OutputResult<Writer<File>> {
            let mut w = Writer::from_path(dir.join(name))?;
            w.write_record(header)?;
            Ok(w)
        };
        Ok(Self {
            roads:     open("roads.csv", &ROADS_HEADER[..])?,
            plan_view: open("plan_view.csv", &PLAN_VIEW_HEADER[..])?,
            elevation: open("elevation.csv", &ELEVATION_HEADER[..])?,
            lanes:     open("lanes.csv", &LANES_HEADER[..])?,
            junctions: open("junctions.csv", &JUNCTIONS_HEADER[..])?,
            finished:  false,
        })
    }
}

impl RecordWriter for CsvWriter {
    fn write_roads(&mut self, rows: &[RoadRecord]) -> OutputResult<()> {
        for row in rows {
            let junction = row.junction.map_or(-1, |j| i64::from(j.0));
            let mut record = vec![
                row.id.0.to_string(),
                row.unit.0.to_string(),
                row.name.clone(),
                junction.to_string(),
                num(row.length),
                num(row.speed_limit),
            ];
            record.extend(poly(&row.lane_offset));
            record.extend(link(row.predecessor));
            record.extend(link(row.successor));
            self.roads.write_record(&record)?;
        }
        Ok(())
    }

    fn write_geometry(&mut self, rows: &[GeometryRecord]) -> OutputResult<()> {
        for row in rows {
            let mut record = vec![
                row.road.0.to_string(),
                num(row.s),
                num(row.x),
                num(row.y),
                num(row.hdg),
                num(row.length),
                row.kind.name().to_string(),
            ];
            let mut params: [String; 11] = Default::default();
            match row.kind {
                GeometryKind::Line => {}
                GeometryKind::Arc { curvature } => params[0] = num(curvature),
                GeometryKind::Spiral { curv_start, curv_end } => {
                    params[1] = num(curv_start);
                    params[2] = num(curv_end);
                }
                GeometryKind::ParamPoly3(p) => {
                    for (slot, v) in params[3..].iter_mut().zip([p.au, p.bu, p.cu, p.du, p.av, p.bv, p.cv, p.dv]) {
                        *slot = num(v);
                    }
                }
            }
            record.extend(params);
            self.plan_view.write_record(&record)?;
        }
        Ok(())
    }

    fn write_elevation(&mut self, rows: &[ElevationRecord]) -> OutputResult<()> {
        for row in rows {
            self.elevation.write_record(&[
                row.road.0.to_string(),
                num(row.s),
                num(row.a),
                num(row.b),
                num(row.c),
                num(row.d),
            ])?;
        }
        Ok(())
    }

    fn write_lanes(&mut self, rows: &[LaneRecord]) -> OutputResult<()> {
        for row in rows {
            let mut record = vec![row.road.0.to_string(), row.lane_id.to_string()];
            record.extend(poly(&row.width));
            record.push(row.mark.name().to_string());
            record.push(opt_lane(row.predecessor));
            record.push(opt_lane(row.successor));
            self.lanes.write_record(&record)?;
        }
        Ok(())
    }

    fn write_connections(&mut self, rows: &[ConnectionRecord]) -> OutputResult<()> {
        for row in rows {
            self.junctions.write_record(&[
                row.junction.0.to_string(),
                row.id.to_string(),
                row.incoming_road.0.to_string(),
                row.connecting_road.0.to_string(),
                row.contact_point.name().to_string(),
                row.lane_from.to_string(),
                row.lane_to.to_string(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.roads.flush()?;
        self.plan_view.flush()?;
        self.elevation.flush()?;
        self.lanes.flush()?;
        self.junctions.flush()?;
        Ok(())
    }
}
