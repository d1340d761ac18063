//! Lanes across a splice between two interchange units.
//!
//! The exit unit's `MainPostFar` runs on into the entry unit's
//! `MainPreEvent`.  Lanes are linked by id up to the smaller count.  A count
//! change of up to [`LaneConfig::max_taper_mismatch`] lanes becomes a taper
//! on the shorter of the two roads, the same rule as a boundary inside one
//! unit.

use log::{debug, warn};
use od_core::{CanonicalRoadId, CubicPoly};

use crate::builder::LaneConfig;
use crate::table::{LaneInfoRow, LaneTable, LaneTopology, MarkKind};
use crate::taper::{taper_width, Taper, TaperKind};

use CanonicalRoadId::{MainPostFar, MainPreEvent};

/// Link the exit unit's `MainPostFar` lanes to the entry unit's
/// `MainPreEvent` lanes, tapering a small count change.
///
/// `exit_length` and `entry_length` are the lengths of those two roads.
/// Returns the number of lanes linked across the join.
pub fn link_spliced_lanes(
    exit:         &mut LaneTopology,
    exit_length:  f64,
    entry:        &mut LaneTopology,
    entry_length: f64,
    cfg:          &LaneConfig,
) -> u32 {
    let far = &mut exit.tables[MainPostFar];
    let pre = &mut entry.tables[MainPreEvent];
    let (from, to) = (far.lane_count, pre.lane_count);
    let (lo, hi) = (from.min(to), from.max(to));

    if lo != hi {
        if hi - lo > cfg.max_taper_mismatch {
            warn!("{from} lanes step to {to} across a splice; left untapered");
        } else {
            let kind = if from > to { TaperKind::Closing } else { TaperKind::Opening };
            // Width of the extra lanes where they are at full width.
            let nominal: Vec<f64> = {
                let (wider, at) = if from > to { (&*far, exit_length) } else { (&*pre, 0.0) };
                (lo + 1..=hi)
                    .map(|k| wider.row(-(k as i32)).map_or(0.0, |r| r.width.eval(at)))
                    .collect()
            };
            let (carrier, length) =
                if exit_length <= entry_length { (far, exit_length) } else { (pre, entry_length) };
            apply_taper(carrier, kind, lo, &nominal, length);
            return link(&mut exit.tables[MainPostFar], &mut entry.tables[MainPreEvent]);
        }
    }
    link(far, pre)
}

fn apply_taper(carrier: &mut LaneTable, kind: TaperKind, lo: u32, nominal: &[f64], length: f64) {
    if carrier.taper.is_some() {
        warn!("taper already present; lane change across a splice left as a step");
        return;
    }
    let hi = lo + nominal.len() as u32;
    widen(carrier, hi);
    for (k, &w) in (lo + 1..=hi).zip(nominal) {
        if let Some(row) = carrier.row_mut(-(k as i32)) {
            row.width = taper_width(w, length, kind);
        }
    }
    debug!("{kind:?} taper of {} lane(s) across a splice over {length:.1} m", hi - lo);
    carrier.taper = Some(Taper { kind, lanes: (lo + 1..=hi).map(|k| -(k as i32)).collect(), length });
}

/// Grow `table` to `lanes` right-hand lanes; only the outermost keeps a
/// solid mark.
fn widen(table: &mut LaneTable, lanes: u32) {
    while table.lane_count < lanes {
        table.lane_count += 1;
        table.rows.push(LaneInfoRow {
            lane_id:     -(table.lane_count as i32),
            width:       CubicPoly::constant(0.0),
            mark:        MarkKind::Solid,
            predecessor: None,
            successor:   None,
            spliced_predecessor: None,
            spliced_successor:   None,
        });
    }
    let outer = -(table.lane_count as i32);
    for row in table.rows.iter_mut().filter(|r| r.lane_id < 0) {
        row.mark = if row.lane_id == outer { MarkKind::Solid } else { MarkKind::Broken };
    }
}

fn link(far: &mut LaneTable, pre: &mut LaneTable) -> u32 {
    let linked = far.lane_count.min(pre.lane_count);
    for k in 1..=linked as i32 {
        if let Some(row) = far.row_mut(-k) {
            row.spliced_successor = Some(-k);
        }
        if let Some(row) = pre.row_mut(-k) {
            row.spliced_predecessor = Some(-k);
        }
    }
    linked
}
