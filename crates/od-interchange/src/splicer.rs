//! Join the mainline exit of one unit to the mainline entry of the next.
//!
//! The exit tail is `MainPostNear ⊕ MainPostFar` of the upstream unit, the
//! entry tail is `MainPreEvent` of the downstream unit.  Both are trimmed at
//! the vertex nearest a join target and swung rigidly about their far anchor
//! (exit: first vertex, entry: last vertex) until their free ends meet on the
//! target.  When trimming is not possible the tails are replaced by a
//! two-leg bridge between the anchors.

use std::f64::consts::PI;

use log::{info, warn};
use od_core::{
    branch_shift, linalg::polyfit, CanonicalRoadId, CoreError, CoreResult, Polyline, SearchWindow,
    Vertex, VertexIndex, UnitId,
};
use od_geometry::ClassifyConfig;
use od_lanes::{link_spliced_lanes, LaneConfig};

use crate::error::{InterchangeError, InterchangeResult, SpliceConflict, TailSide};
use crate::segmenter::{split_near, TAPER_VERTICES};
use crate::unit::InterchangeUnit;

use CanonicalRoadId::{MainPostFar, MainPostNear, MainPreEvent, Wedge};

/// Fewest vertices a trimmed tail may keep.
pub const MIN_SPLICE_VERTICES: usize = 20;

/// Original vertices consulted for each bridge vertex's elevation.
pub const BRIDGE_ELEVATION_NEIGHBOURS: usize = 4;

const COINCIDENT_EPS: f64 = 1e-6;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SpliceConfig {
    pub min_splice_vertices: usize,
    pub taper_vertices:      usize,
    /// Vertex spacing of bridge polylines; the tails' mean spacing if unset.
    pub bridge_spacing:      Option<f64>,
}

impl Default for SpliceConfig {
    fn default() -> Self {
        Self {
            min_splice_vertices: MIN_SPLICE_VERTICES,
            taper_vertices:      TAPER_VERTICES,
            bridge_spacing:      None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpliceMethod {
    /// Trimmed tails swung onto the join target.
    Rigid,
    /// Two-leg bridge from anchor to anchor through their offset midpoint;
    /// an approximation of the surveyed alignment.
    Bridge { conflict: SpliceConflict },
}

/// Every heading of the entry unit was moved by `shift` (a multiple of 2π)
/// onto the exit unit's branch.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeadingBranchCorrected {
    pub shift: f64,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpliceReport {
    pub exit:               UnitId,
    pub entry:              UnitId,
    /// Where the two tails meet, `[x, y, z]`.
    pub join:               [f64; 3],
    pub method:             SpliceMethod,
    pub heading_correction: Option<HeadingBranchCorrected>,
}

impl SpliceReport {
    pub fn is_approximate(&self) -> bool {
        matches!(self.method, SpliceMethod::Bridge { .. })
    }
}

// ── Join target ───────────────────────────────────────────────────────────────

/// Unit left normal of the direction `from → to`, zero when they coincide.
fn left_normal(from: &Vertex, to: &Vertex) -> [f64; 2] {
    let (dx, dy) = (to.x - from.x, to.y - from.y);
    let len = dx.hypot(dy);
    if len > 0.0 { [-dy / len, dx / len] } else { [0.0, 0.0] }
}

/// Midpoint of the exit's last and entry's first vertex, shifted
/// `lateral_offset` metres to the left of `exit.first → entry.last`.
pub fn join_target(exit: &Polyline, entry: &Polyline, lateral_offset: f64) -> [f64; 3] {
    let (p, q) = (exit.last(), entry.first());
    let n = left_normal(exit.first(), entry.last());
    [
        0.5 * (p.x + q.x) + lateral_offset * n[0],
        0.5 * (p.y + q.y) + lateral_offset * n[1],
        0.5 * (p.z + q.z),
    ]
}

// ── Rigid path ────────────────────────────────────────────────────────────────

/// Trim both tails at the vertex nearest `join` and swing them onto it.
///
/// Returns the new `(exit, entry)` tails; the exit ends and the entry starts
/// exactly at `join`.  Anchors do not move and nothing is rescaled: every
/// edge keeps its length except the single edge ending at the free vertex,
/// which absorbs the distance between the trimmed vertex and `join`.
pub fn splice_tails(
    exit:  &Polyline,
    entry: &Polyline,
    join:  [f64; 3],
    cfg:   &SpliceConfig,
) -> Result<(Polyline, Polyline), SpliceConflict> {
    let ia = exit.nearest_vertex(join, SearchWindow::Full);
    let ib = entry.nearest_vertex(join, SearchWindow::Full);
    if ia == 0 {
        return Err(SpliceConflict::TrimAtEndpoint { tail: TailSide::Exit });
    }
    if ib == entry.last_index() {
        return Err(SpliceConflict::TrimAtEndpoint { tail: TailSide::Entry });
    }

    let need = cfg.min_splice_vertices.max(Polyline::MIN_VERTICES);
    let too_short = |tail, vertices| SpliceConflict::TooShort { tail, vertices, need };
    let kept_exit = ia + 1;
    let kept_entry = entry.len() - ib;
    if kept_exit < need {
        return Err(too_short(TailSide::Exit, kept_exit));
    }
    if kept_entry < need {
        return Err(too_short(TailSide::Entry, kept_entry));
    }
    let mut a = exit.slice(0, ia).map_err(|_| too_short(TailSide::Exit, kept_exit))?;
    let mut b = entry.slice(ib, entry.last_index()).map_err(|_| too_short(TailSide::Entry, kept_entry))?;

    let (pa, pb) = (*a.first(), *b.last());
    let toward = (join[0] - pa.x) * (pb.x - join[0]) + (join[1] - pa.y) * (pb.y - join[1]);
    if toward <= 0.0 || tails_cross(&a, &b) {
        return Err(SpliceConflict::Crossing);
    }

    let exit_end = a.last_index();
    let entry_end = b.last_index();
    swing_onto(&mut a, 0, exit_end, join);
    swing_onto(&mut b, entry_end, 0, join);
    Ok((a, b))
}

/// Rotate `line` about vertex `anchor` until vertex `free` points at
/// `target`, then place `free` on it.
fn swing_onto(line: &mut Polyline, anchor: usize, free: usize, target: [f64; 3]) {
    let p = line.vertices()[anchor];
    let e = line.vertices()[free];
    let angle = (target[1] - p.y).atan2(target[0] - p.x) - (e.y - p.y).atan2(e.x - p.x);
    line.rotate_about(p.x, p.y, angle);
    let v = &mut line.vertices_mut()[free];
    v.x = target[0];
    v.y = target[1];
    line.refit_elevation();
}

fn orient(p: &Vertex, q: &Vertex, r: &Vertex) -> f64 {
    (q.x - p.x) * (r.y - p.y) - (q.y - p.y) * (r.x - p.x)
}

/// `true` if any edge of `a` properly intersects any edge of `b`.
fn tails_cross(a: &Polyline, b: &Polyline) -> bool {
    let (va, vb) = (a.vertices(), b.vertices());
    va.windows(2).any(|ea| {
        vb.windows(2).any(|eb| {
            let d1 = orient(&ea[0], &ea[1], &eb[0]);
            let d2 = orient(&ea[0], &ea[1], &eb[1]);
            let d3 = orient(&eb[0], &eb[1], &ea[0]);
            let d4 = orient(&eb[0], &eb[1], &ea[1]);
            d1 * d2 < 0.0 && d3 * d4 < 0.0
        })
    })
}

// ── Bridge fallback ───────────────────────────────────────────────────────────

/// Two straight, evenly sampled legs replacing both tails.
///
/// Runs from the exit's first vertex through the midpoint of the two anchors
/// (shifted `lateral_offset` to the left) to the entry's last vertex, split
/// at that midpoint.  Each new vertex takes its elevation from a cubic fit
/// over the nearest surveyed tail vertices.
pub fn bridge_tails(
    exit:           &Polyline,
    entry:          &Polyline,
    lateral_offset: f64,
    cfg:            &SpliceConfig,
) -> CoreResult<(Polyline, Polyline)> {
    let (p, q) = (*exit.first(), *entry.last());
    let n = left_normal(&p, &q);
    let mid = Vertex::new(
        0.5 * (p.x + q.x) + lateral_offset * n[0],
        0.5 * (p.y + q.y) + lateral_offset * n[1],
        0.5 * (p.z + q.z),
    );

    let spacing = cfg
        .bridge_spacing
        .unwrap_or_else(|| 0.5 * (exit.mean_spacing() + entry.mean_spacing()));
    if !(spacing.is_finite() && spacing > 0.0) {
        return Err(CoreError::Config(format!("bridge spacing must be positive, got {spacing}")));
    }

    // Overlapping tails repeat positions; keep one of each.
    let mut originals = exit.vertices().to_vec();
    originals.extend(
        entry
            .vertices()
            .iter()
            .filter(|v| exit.vertices().iter().all(|u| u.distance_2d(v) > COINCIDENT_EPS)),
    );
    let index = VertexIndex::build(&originals);
    let min_edges = cfg.taper_vertices + 1;

    let mut a = Polyline::new(sample_leg(&p, &mid, spacing, min_edges, &originals, &index))?;
    let mut b = Polyline::new(sample_leg(&mid, &q, spacing, min_edges, &originals, &index))?;
    a.vertices_mut()[0].z = p.z;
    let last = b.last_index();
    b.vertices_mut()[last].z = q.z;
    let joint = b.first().z;
    let end = a.last_index();
    a.vertices_mut()[end].z = joint;
    a.refit_elevation();
    b.refit_elevation();
    Ok((a, b))
}

fn sample_leg(
    from:      &Vertex,
    to:        &Vertex,
    spacing:   f64,
    min_edges: usize,
    originals: &[Vertex],
    index:     &VertexIndex,
) -> Vec<Vertex> {
    let len = from.distance_2d(to);
    let edges = ((len / spacing).ceil() as usize).max(min_edges).max(1);
    let dir = if len > 0.0 { [(to.x - from.x) / len, (to.y - from.y) / len] } else { [1.0, 0.0] };
    (0..=edges)
        .map(|i| {
            let t = i as f64 / edges as f64;
            let x = from.x + t * (to.x - from.x);
            let y = from.y + t * (to.y - from.y);
            Vertex::new(x, y, local_elevation(x, y, dir, originals, index))
        })
        .collect()
}

/// Cubic least-squares elevation at `(x, y)` from the nearest original
/// vertices, parameterized by their offset along `dir`.  Clamped to the
/// neighbours' elevation range.
fn local_elevation(x: f64, y: f64, dir: [f64; 2], originals: &[Vertex], index: &VertexIndex) -> f64 {
    let near = index.k_nearest(x, y, BRIDGE_ELEVATION_NEIGHBOURS);
    let samples: Vec<(f64, f64)> = near
        .iter()
        .map(|&i| {
            let v = &originals[i];
            ((v.x - x) * dir[0] + (v.y - y) * dir[1], v.z)
        })
        .collect();
    let (lo, hi) = samples
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(_, z)| (lo.min(z), hi.max(z)));
    match polyfit(&samples, 3) {
        Some(c) if c[0].is_finite() => c[0].clamp(lo, hi),
        _ => 0.0,
    }
}

// ── Unit-level splice ─────────────────────────────────────────────────────────

/// Splice `exit`'s mainline exit onto `entry`'s mainline entry.
///
/// Replaces `MainPostNear`/`MainPostFar` of `exit` and `MainPreEvent` of
/// `entry` and reclassifies them on their unit's heading branch.  Then
/// [`align_entry_headings`] moves `entry` onto `exit`'s branch.  Lane
/// topologies of both units are cleared since road lengths change.
pub fn splice_units(
    exit:           &mut InterchangeUnit,
    entry:          &mut InterchangeUnit,
    lateral_offset: f64,
    cfg:            &SpliceConfig,
    classify_cfg:   &ClassifyConfig,
) -> InterchangeResult<SpliceReport> {
    let exit_tail = exit.roads[MainPostNear].concat(&exit.roads[MainPostFar]);
    let entry_tail = entry.roads[MainPreEvent].clone();
    let join = join_target(&exit_tail, &entry_tail, lateral_offset);

    let (new_exit, new_entry, method) = match splice_tails(&exit_tail, &entry_tail, join, cfg) {
        Ok((a, b)) => (a, b, SpliceMethod::Rigid),
        Err(conflict) => {
            warn!("{} → {}: {conflict}; bridging with an approximation", exit.id, entry.id);
            let (a, b) = bridge_tails(&exit_tail, &entry_tail, lateral_offset, cfg).map_err(|e| {
                InterchangeError::DegenerateGeometry { unit: exit.id, reason: format!("splice bridge: {e}") }
            })?;
            (a, b, SpliceMethod::Bridge { conflict })
        }
    };
    let join = {
        let v = new_entry.first();
        [v.x, v.y, v.z]
    };

    let (mut near, far) = split_near(&new_exit, cfg.taper_vertices, true)
        .map_err(|e| InterchangeError::DegenerateGeometry { unit: exit.id, reason: e.to_string() })?;
    near.regrade_linear(exit.roads[Wedge].last().z, far.first().z);
    exit.roads[MainPostNear] = near;
    exit.roads[MainPostFar] = far;
    entry.roads[MainPreEvent] = new_entry;

    exit.reclassify(&[MainPostNear, MainPostFar], classify_cfg);
    entry.reclassify(&[MainPreEvent], classify_cfg);
    exit.lanes = None;
    entry.lanes = None;

    let heading_correction = align_entry_headings(exit, entry);
    Ok(SpliceReport { exit: exit.id, entry: entry.id, join, method, heading_correction })
}

/// Shift every heading of `entry` by whole turns when its first mainline
/// heading is π or more away from `exit`'s last one.
///
/// Units spliced at both ends may need this again after a later splice
/// shifts their exit unit.
pub fn align_entry_headings(exit: &InterchangeUnit, entry: &mut InterchangeUnit) -> Option<HeadingBranchCorrected> {
    let h_exit = exit.classification(MainPostFar)?.last_heading()?;
    let h_entry = entry.classification(MainPreEvent)?.first_heading()?;
    if (h_entry - h_exit).abs() < PI {
        return None;
    }
    let shift = branch_shift(h_exit, h_entry);
    for (_, classification) in entry.classifications.as_mut()?.iter_mut() {
        classification.shift_headings(shift);
    }
    info!(
        "{} → {}: entry headings shifted by {shift:.6} rad onto the exit branch ({h_exit:.4} vs {h_entry:.4})",
        exit.id, entry.id
    );
    Some(HeadingBranchCorrected { shift })
}

/// Link lanes across a completed splice once both units have lane
/// topologies; returns the number of lanes linked.
pub fn join_spliced_lanes(exit: &mut InterchangeUnit, entry: &mut InterchangeUnit, cfg: &LaneConfig) -> Option<u32> {
    let exit_length = exit.road_lengths()[MainPostFar];
    let entry_length = entry.road_lengths()[MainPreEvent];
    let (Some(a), Some(b)) = (exit.lanes.as_mut(), entry.lanes.as_mut()) else {
        return None;
    };
    let linked = link_spliced_lanes(a, exit_length, b, entry_length, cfg);
    info!("{} → {}: {linked} lane(s) linked across the splice", exit.id, entry.id);
    Some(linked)
}
