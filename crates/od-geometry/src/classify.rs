//! Polyline → line / arc / spiral classification.
//!
//! # Passes
//!
//! 1. Signed radius at every vertex ([`radius_profile`]).
//! 2. **Arcs.**  Local `|curvature|` extrema are taken as seeds, strongest
//!    first.  Each seed grows over unassigned same-sign neighbours whose
//!    radius stays within `arc_radius_tolerance` of the seed radius.
//! 3. **Lines.**  Unassigned vertices with a large radius are grown into
//!    runs while every edge stays within `line_angle_threshold` of the run's
//!    first edge.
//! 4. **Spirals.**  Everything between two runs (at least one edge) becomes
//!    a clothoid whose end curvatures equal those of its neighbours, so
//!    curvature is continuous across primitives.  Gaps between two straight
//!    neighbours are lines, and adjacent collinear lines are merged.
//!
//! Each primitive is anchored at its first vertex.  Lines and arcs pass
//! through their last vertex exactly; spirals keep the polyline length and
//! aim their analytic chord at the last vertex.

use log::debug;
use od_core::{angle_diff, normalize_angle, Polyline, Pose};

use crate::clothoid::{clothoid_pose, subdivide_at_zero_curvature};
use crate::config::ClassifyConfig;
use crate::fit::{radius_profile, radius_to_curvature};
use crate::segment::{Classification, GeometrySegment, SegmentKind};

/// A run of vertices `start..=end` with a provisional kind.
#[derive(Copy, Clone, Debug)]
struct Piece {
    start: usize,
    end:   usize,
    kind:  SegmentKind,
}

/// Classify `polyline` into analytic primitives.
pub fn classify(polyline: &Polyline, cfg: &ClassifyConfig) -> Classification {
    let n = polyline.len();
    let radii = radius_profile(polyline, &cfg.fit);
    let curvatures: Vec<f64> = radii.iter().map(|&r| radius_to_curvature(r)).collect();

    let mut assigned = vec![false; n];
    let mut runs = arc_runs(&radii, &curvatures, &mut assigned, cfg);
    runs.extend(line_runs(polyline, &radii, &mut assigned, cfg));
    runs.sort_by_key(|p| p.start);

    let pieces = merge_lines(polyline, fill_gaps(&runs, &curvatures, n, cfg), cfg);
    let out = build(polyline, &pieces, cfg);

    debug!(
        "classified {} vertices ({:.1} m) into {} segments: {}",
        n,
        out.length(),
        out.segments.len(),
        out.segments.iter().map(|s| s.kind.name()).collect::<Vec<_>>().join(" ")
    );
    out
}

// ── Pass 2: arcs ──────────────────────────────────────────────────────────────

fn is_local_extremum(curvatures: &[f64], i: usize) -> bool {
    let k = curvatures[i].abs();
    let left = i == 0 || k >= curvatures[i - 1].abs();
    let right = i + 1 == curvatures.len() || k >= curvatures[i + 1].abs();
    left && right
}

fn similar_radius(r: f64, r_ext: f64, tol: f64) -> bool {
    r.signum() == r_ext.signum() && (r - r_ext).abs() < tol * r_ext.abs()
}

fn arc_runs(radii: &[f64], curvatures: &[f64], assigned: &mut [bool], cfg: &ClassifyConfig) -> Vec<Piece> {
    let n = radii.len();
    let mut seeds: Vec<usize> = (0..n)
        .filter(|&i| radii[i].abs() < cfg.line_radius_threshold && is_local_extremum(curvatures, i))
        .collect();
    seeds.sort_by(|&a, &b| curvatures[b].abs().total_cmp(&curvatures[a].abs()).then(a.cmp(&b)));

    let tol = cfg.arc_radius_tolerance;
    let mut runs = Vec::new();
    for seed in seeds {
        if assigned[seed] {
            continue;
        }
        let r_ext = radii[seed];
        let mut lo = seed;
        while lo > 0 && !assigned[lo - 1] && similar_radius(radii[lo - 1], r_ext, tol) {
            lo -= 1;
        }
        let mut hi = seed;
        while hi + 1 < n && !assigned[hi + 1] && similar_radius(radii[hi + 1], r_ext, tol) {
            hi += 1;
        }
        let count = hi - lo + 1;
        if count < cfg.min_run_vertices {
            continue;
        }
        let mean = radii[lo..=hi].iter().sum::<f64>() / count as f64;
        assigned[lo..=hi].fill(true);
        runs.push(Piece { start: lo, end: hi, kind: SegmentKind::Arc { radius: mean } });
    }
    runs
}

// ── Pass 3: lines ─────────────────────────────────────────────────────────────

fn line_runs(polyline: &Polyline, radii: &[f64], assigned: &mut [bool], cfg: &ClassifyConfig) -> Vec<Piece> {
    let n = radii.len();
    let straight = |i: usize| radii[i].abs() > cfg.line_radius_threshold;
    let mut runs = Vec::new();
    let mut i = 0;
    while i + 1 < n {
        if assigned[i] || !straight(i) {
            i += 1;
            continue;
        }
        let h = polyline.edge_heading(i);
        let mut j = i + 1;
        while j < n
            && !assigned[j]
            && straight(j)
            && angle_diff(polyline.edge_heading(j - 1), h).abs() < cfg.line_angle_threshold
        {
            j += 1;
        }
        let end = j - 1;
        if end + 1 - i >= cfg.min_run_vertices {
            assigned[i..=end].fill(true);
            runs.push(Piece { start: i, end, kind: SegmentKind::Line });
            i = end + 1;
        } else {
            i += 1;
        }
    }
    runs
}

// ── Pass 4: spirals between runs ──────────────────────────────────────────────

fn end_curvature(kind: &SegmentKind) -> f64 {
    match *kind {
        SegmentKind::Line => 0.0,
        SegmentKind::Arc { radius } => 1.0 / radius,
        SegmentKind::Spiral { end_curvature, .. } => end_curvature,
    }
}

fn start_curvature(kind: &SegmentKind) -> f64 {
    match *kind {
        SegmentKind::Line => 0.0,
        SegmentKind::Arc { radius } => 1.0 / radius,
        SegmentKind::Spiral { start_curvature, .. } => start_curvature,
    }
}

/// Interleave `runs` (sorted, disjoint) with gap pieces so that consecutive
/// pieces share their boundary vertex and together cover `0..n`.
fn fill_gaps(runs: &[Piece], curvatures: &[f64], n: usize, cfg: &ClassifyConfig) -> Vec<Piece> {
    let straight_k = 1.0 / cfg.line_radius_threshold;
    let gap = |start: usize, end: usize, prev: Option<&Piece>, next: Option<&Piece>| {
        let k0 = prev.map_or(curvatures[start], |p| end_curvature(&p.kind));
        let k1 = next.map_or(curvatures[end], |p| start_curvature(&p.kind));
        let kind = if k0.abs() < straight_k && k1.abs() < straight_k {
            SegmentKind::Line
        } else {
            SegmentKind::Spiral { start_curvature: k0, end_curvature: k1 }
        };
        Piece { start, end, kind }
    };

    let mut pieces = Vec::with_capacity(2 * runs.len() + 1);
    let mut cursor = 0;
    let mut prev: Option<&Piece> = None;
    for run in runs {
        if run.start > cursor {
            pieces.push(gap(cursor, run.start, prev, Some(run)));
        }
        pieces.push(*run);
        cursor = run.end;
        prev = Some(run);
    }
    if cursor < n - 1 || prev.is_none() {
        pieces.push(gap(cursor, n - 1, prev, None));
    }
    pieces
}

/// Join neighbouring line pieces whose chords agree within
/// `line_angle_threshold`.  Survey noise breaks long straights into many
/// short runs separated by one-edge gaps.
fn merge_lines(polyline: &Polyline, pieces: Vec<Piece>, cfg: &ClassifyConfig) -> Vec<Piece> {
    let v = polyline.vertices();
    let chord = |p: &Piece| v[p.start].heading_to(&v[p.end]);
    let mut out: Vec<Piece> = Vec::with_capacity(pieces.len());
    for piece in pieces {
        if let Some(last) = out.last_mut() {
            if last.kind == SegmentKind::Line
                && piece.kind == SegmentKind::Line
                && angle_diff(chord(&piece), chord(&*last)).abs() < cfg.line_angle_threshold
            {
                last.end = piece.end;
                continue;
            }
        }
        out.push(piece);
    }
    out
}

// ── Geometry ──────────────────────────────────────────────────────────────────

fn build(polyline: &Polyline, pieces: &[Piece], cfg: &ClassifyConfig) -> Classification {
    let v = polyline.vertices();
    let s_poly = polyline.arclengths();
    let n = v.len();

    let mut stations = vec![0.0; n];
    let mut segments = Vec::with_capacity(pieces.len());
    let mut s = 0.0;

    for piece in pieces {
        let (a, b) = (piece.start, piece.end);
        let poly_len = s_poly[b] - s_poly[a];
        let chord = v[a].distance_2d(&v[b]);
        let chord_hdg = v[a].heading_to(&v[b]);

        let (kind, heading, length) = match piece.kind {
            SegmentKind::Line => (SegmentKind::Line, chord_hdg, chord),
            SegmentKind::Arc { radius } => {
                let r = radius.abs().max(0.5 * chord);
                let mut sweep = 2.0 * (chord / (2.0 * r)).min(1.0).asin();
                if poly_len > std::f64::consts::PI * r {
                    sweep = std::f64::consts::TAU - sweep;
                }
                let signed = r.copysign(radius);
                (SegmentKind::Arc { radius: signed }, chord_hdg - radius.signum() * 0.5 * sweep, sweep * r)
            }
            SegmentKind::Spiral { start_curvature: k0, end_curvature: k1 } => {
                let end = clothoid_pose(Pose::default(), k0, k1, poly_len, poly_len);
                let local_chord = if end.x == 0.0 && end.y == 0.0 { 0.0 } else { end.y.atan2(end.x) };
                (piece.kind, chord_hdg - local_chord, poly_len)
            }
        };

        for k in a..=b {
            let frac = if poly_len > 0.0 { (s_poly[k] - s_poly[a]) / poly_len } else { 0.0 };
            stations[k] = s + length * frac;
        }

        let seg = GeometrySegment {
            kind,
            start_vertex: a,
            end_vertex: b,
            s,
            x: v[a].x,
            y: v[a].y,
            heading: normalize_angle(heading),
            length,
        };
        s += length;

        match cfg.split_inflections.then(|| subdivide_at_zero_curvature(&seg)).flatten() {
            Some((mut first, mut second)) => {
                let split = second.s;
                let m = (a..=b).rev().find(|&k| stations[k] <= split).unwrap_or(a);
                first.end_vertex = m;
                second.start_vertex = m;
                segments.push(first);
                segments.push(second);
            }
            None => segments.push(seg),
        }
    }

    let mut out = Classification {
        segments,
        headings: Vec::with_capacity(n),
        curvatures: Vec::with_capacity(n),
        stations,
    };
    for k in 0..n {
        let st = out.stations[k];
        let (h, c) = match out.segment_at(st) {
            Some(seg) => (seg.heading_at(st - seg.s), seg.curvature_at(st - seg.s)),
            None => (0.0, 0.0),
        };
        out.headings.push(h);
        out.curvatures.push(c);
    }
    out
}
