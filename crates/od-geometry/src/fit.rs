//! Least-squares circle fitting and per-vertex curvature estimation.
//!
//! The fit is the algebraic circle `x² + y² + a·x + b·y + c = 0` under
//! Pratt's normalization, solved from the centred moment matrix by Newton
//! iteration on its characteristic polynomial.  It never fails: singular
//! windows (collinear or duplicated points) are perturbed and re-solved, and
//! anything that still does not yield a finite circle is reported as the
//! straight sentinel.

use od_core::{Polyline, Vertex};

use crate::config::{FitConfig, MIN_POINT_SPACING, STRAIGHT_RADIUS};

/// Jitter applied to singular windows before re-solving (metres).
const DEGENERATE_PERTURBATION: f64 = 1e-6;

/// Golden angle; spreads the perturbation pattern so no three jittered
/// points are collinear.
const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;

/// Relative determinant below which the moment system is singular.
const SINGULAR_EPS: f64 = 1e-12;

const NEWTON_MAX_ITER: usize = 20;

/// Result of a circle fit.
///
/// `radius` is signed: positive when the window turns left
/// (counter-clockwise), negative when it turns right.  Its magnitude never
/// exceeds [`STRAIGHT_RADIUS`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CircleFit {
    pub cx:     f64,
    pub cy:     f64,
    pub radius: f64,
}

impl CircleFit {
    pub fn straight() -> Self {
        Self { cx: f64::INFINITY, cy: f64::INFINITY, radius: STRAIGHT_RADIUS }
    }

    #[inline]
    pub fn is_straight(&self) -> bool {
        self.radius.abs() >= STRAIGHT_RADIUS
    }

    /// Signed curvature `1/radius`; exactly zero for the straight sentinel.
    #[inline]
    pub fn curvature(&self) -> f64 {
        radius_to_curvature(self.radius)
    }
}

/// Signed curvature of a signed radius, mapping the sentinel to zero.
#[inline]
pub fn radius_to_curvature(radius: f64) -> f64 {
    if radius.abs() >= STRAIGHT_RADIUS { 0.0 } else { 1.0 / radius }
}

/// Fit a circle to a window of vertices (planar coordinates only).
pub fn fit_circle(window: &[Vertex]) -> CircleFit {
    let pts: Vec<[f64; 2]> = window.iter().map(Vertex::xy).collect();
    fit_circle_xy(&pts)
}

/// [`fit_circle`] over raw `[x, y]` points.
pub fn fit_circle_xy(pts: &[[f64; 2]]) -> CircleFit {
    if pts.len() < 3 {
        return CircleFit::straight();
    }

    let n = pts.len() as f64;
    let mx = pts.iter().map(|p| p[0]).sum::<f64>() / n;
    let my = pts.iter().map(|p| p[1]).sum::<f64>() / n;
    let local: Vec<[f64; 2]> = pts.iter().map(|p| [p[0] - mx, p[1] - my]).collect();

    let solution = solve_pratt(&local).or_else(|| {
        let jittered: Vec<[f64; 2]> = local
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let (s, c) = (i as f64 * GOLDEN_ANGLE).sin_cos();
                [p[0] + DEGENERATE_PERTURBATION * c, p[1] + DEGENERATE_PERTURBATION * s]
            })
            .collect();
        solve_pratt(&jittered)
    });

    let Some((ucx, ucy, radius)) = solution else {
        return CircleFit::straight();
    };
    let sign = turn_sign(&local, ucx, ucy);
    if radius >= STRAIGHT_RADIUS {
        return CircleFit { radius: sign * STRAIGHT_RADIUS, ..CircleFit::straight() };
    }
    CircleFit { cx: ucx + mx, cy: ucy + my, radius: sign * radius }
}

/// Pratt fit of mean-centred points: `(cx, cy, r)` in the centred frame, or
/// `None` when the moment system is singular.
fn solve_pratt(pts: &[[f64; 2]]) -> Option<(f64, f64, f64)> {
    let n = pts.len() as f64;
    let (mut mxx, mut myy, mut mxy, mut mxz, mut myz, mut mzz) = (0.0, 0.0, 0.0, 0.0, 0.0, 0.0);
    for p in pts {
        let (x, y) = (p[0], p[1]);
        let z = x * x + y * y;
        mxx += x * x;
        myy += y * y;
        mxy += x * y;
        mxz += x * z;
        myz += y * z;
        mzz += z * z;
    }
    mxx /= n;
    myy /= n;
    mxy /= n;
    mxz /= n;
    myz /= n;
    mzz /= n;

    let mz = mxx + myy;
    let cov = mxx * myy - mxy * mxy;
    let a2 = 4.0 * cov - 3.0 * mz * mz - mzz;
    let a1 = mzz * mz + 4.0 * cov * mz - mxz * mxz - myz * myz - mz * mz * mz;
    let a0 = mxz * mxz * myy + myz * myz * mxx - mzz * cov - 2.0 * mxz * myz * mxy + mz * mz * cov;

    // Smallest non-negative root, Newton from zero.
    let mut x = 0.0_f64;
    let mut y = f64::INFINITY;
    for _ in 0..NEWTON_MAX_ITER {
        let y_old = y;
        y = a0 + x * (a1 + x * (a2 + 4.0 * x * x));
        if y.abs() > y_old.abs() {
            x = 0.0;
            break;
        }
        let dy = a1 + x * (2.0 * a2 + 16.0 * x * x);
        if dy == 0.0 {
            break;
        }
        let x_old = x;
        x = x_old - y / dy;
        if x < 0.0 {
            x = 0.0;
            break;
        }
        if (x - x_old).abs() <= 1e-12 * x.abs() {
            break;
        }
    }

    let det = x * x - x * mz + cov;
    if !(det.abs() > SINGULAR_EPS * mz * mz) {
        return None;
    }
    let cx = (mxz * (myy - x) - myz * mxy) / det / 2.0;
    let cy = (myz * (mxx - x) - mxz * mxy) / det / 2.0;
    let r2 = cx * cx + cy * cy + mz + 2.0 * x;
    (r2 > 0.0 && r2.is_finite()).then(|| (cx, cy, r2.sqrt()))
}

/// `+1` for a left (counter-clockwise) turn, `-1` for a right turn.
///
/// Sign of `cross(chord, midpoint → centre)`; when the chord is too short to
/// decide (near-closed windows) the summed edge turning is used instead.
fn turn_sign(pts: &[[f64; 2]], cx: f64, cy: f64) -> f64 {
    let first = pts[0];
    let last = pts[pts.len() - 1];
    let mid = pts[pts.len() / 2];
    let chord = [last[0] - first[0], last[1] - first[1]];
    let to_center = [cx - mid[0], cy - mid[1]];
    let cross = chord[0] * to_center[1] - chord[1] * to_center[0];

    let scale = chord[0].hypot(chord[1]) * to_center[0].hypot(to_center[1]);
    if cross.abs() > 1e-9 * scale {
        return cross.signum();
    }
    let turning: f64 = pts
        .windows(3)
        .map(|w| {
            let e1 = [w[1][0] - w[0][0], w[1][1] - w[0][1]];
            let e2 = [w[2][0] - w[1][0], w[2][1] - w[1][1]];
            e1[0] * e2[1] - e1[1] * e2[0]
        })
        .sum();
    if turning < 0.0 { -1.0 } else { 1.0 }
}

/// Signed radius at vertex `i` of `polyline`.
///
/// Windows of decreasing arclength (see [`FitConfig::lookaheads`]) centred on
/// `i` are tried until the fitted radius magnitude exceeds the window length;
/// the last lookahead is accepted as-is.  Fewer than three usable points
/// yields the straight sentinel.
pub fn local_radius(polyline: &Polyline, i: usize, cfg: &FitConfig) -> CircleFit {
    let s = polyline.arclengths();
    local_radius_with(polyline.vertices(), &s, i, cfg)
}

/// [`local_radius`] with precomputed arclengths, for whole-polyline scans.
pub fn local_radius_with(vertices: &[Vertex], s: &[f64], i: usize, cfg: &FitConfig) -> CircleFit {
    let n = vertices.len();
    let last_try = cfg.lookaheads.len().saturating_sub(1);

    for (attempt, &look) in cfg.lookaheads.iter().enumerate() {
        let mut lo = i.saturating_sub(1);
        while lo > 0 && s[i] - s[lo - 1] <= look {
            lo -= 1;
        }
        let mut hi = (i + 1).min(n - 1);
        while hi + 1 < n && s[hi + 1] - s[i] <= look {
            hi += 1;
        }

        let usable = usable_points(&vertices[lo..=hi]);
        if usable.len() < 3 {
            return CircleFit::straight();
        }
        let fit = fit_circle_xy(&usable);
        let window_len = s[hi] - s[lo];
        if fit.radius.abs() > window_len || attempt == last_try {
            return fit;
        }
    }
    CircleFit::straight()
}

/// Drop points that coincide with the previously kept point.
fn usable_points(window: &[Vertex]) -> Vec<[f64; 2]> {
    let mut out: Vec<[f64; 2]> = Vec::with_capacity(window.len());
    for v in window {
        let p = v.xy();
        match out.last() {
            Some(q) if (p[0] - q[0]).hypot(p[1] - q[1]) < MIN_POINT_SPACING => {}
            _ => out.push(p),
        }
    }
    out
}

/// Signed radius at every vertex.
pub fn radius_profile(polyline: &Polyline, cfg: &FitConfig) -> Vec<f64> {
    let s = polyline.arclengths();
    (0..polyline.len())
        .map(|i| local_radius_with(polyline.vertices(), &s, i, cfg).radius)
        .collect()
}

/// Tangent heading at every vertex from central differences (one-sided at
/// the ends), radians in `(-π, π]`.
pub fn vertex_headings(polyline: &Polyline) -> Vec<f64> {
    let v = polyline.vertices();
    let n = v.len();
    (0..n)
        .map(|i| {
            let lo = i.saturating_sub(1);
            let hi = (i + 1).min(n - 1);
            v[lo].heading_to(&v[hi])
        })
        .collect()
}
