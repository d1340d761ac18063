//! Clothoid (Euler spiral) evaluation.
//!
//! A clothoid with entry curvature `k0`, exit curvature `k1` and length `L`
//! has curvature `k0 + rate·s` with `rate = (k1 − k0)/L`.  Positions come
//! from the canonical clothoid `(a·C(u/a), ±a·S(u/a))`, `a = √(π/|rate|)`,
//! shifted so that parameter `u0 = k0/rate` maps onto the entry pose.

use od_core::{normalize_angle, Pose};

use crate::fresnel::fresnel;
use crate::segment::{GeometrySegment, SegmentKind};

/// Smallest curvature rate (1/m²) the Fresnel scaling can represent.  Flatter
/// spirals are evaluated with this rate instead.
pub const CLOTHOID_RATE_EPS: f64 = 1e-10;

fn effective_rate(k0: f64, k1: f64, length: f64) -> f64 {
    let rate = if length > 0.0 { (k1 - k0) / length } else { 0.0 };
    if rate.abs() >= CLOTHOID_RATE_EPS {
        rate
    } else if rate < 0.0 {
        -CLOTHOID_RATE_EPS
    } else {
        CLOTHOID_RATE_EPS
    }
}

/// Point on the canonical clothoid at parameter `u`.
fn canonical(u: f64, a: f64, sign: f64) -> (f64, f64) {
    let (c, s) = fresnel(u / a);
    (a * c, sign * a * s)
}

/// Pose `ds` metres along the clothoid leaving `start` with curvature `k0`
/// and reaching `k1` after `length` metres.
pub fn clothoid_pose(start: Pose, k0: f64, k1: f64, length: f64, ds: f64) -> Pose {
    let rate = effective_rate(k0, k1, length);
    let a = (std::f64::consts::PI / rate.abs()).sqrt();
    let sign = rate.signum();
    let u0 = k0 / rate;

    let (x0, y0) = canonical(u0, a, sign);
    let (x1, y1) = canonical(u0 + ds, a, sign);
    let rot = start.hdg - 0.5 * rate * u0 * u0;
    let (sin, cos) = rot.sin_cos();
    let (dx, dy) = (x1 - x0, y1 - y0);

    Pose {
        x:   start.x + dx * cos - dy * sin,
        y:   start.y + dx * sin + dy * cos,
        hdg: start.hdg + k0 * ds + 0.5 * rate * ds * ds,
    }
}

/// `steps + 1` evenly spaced poses from `s = 0` to `s = length` inclusive.
pub fn clothoid_sample(start: Pose, k0: f64, k1: f64, length: f64, steps: usize) -> Vec<Pose> {
    let steps = steps.max(1);
    (0..=steps)
        .map(|i| clothoid_pose(start, k0, k1, length, length * i as f64 / steps as f64))
        .collect()
}

/// Split a spiral whose end curvatures have opposite signs at its
/// zero-curvature point `s0 = L·k0/(k0 − k1)`.
///
/// Both halves share the pose at `s0` and have one zero end curvature.
/// Returns `None` for non-spirals and spirals without a sign change.
pub fn subdivide_at_zero_curvature(seg: &GeometrySegment) -> Option<(GeometrySegment, GeometrySegment)> {
    let SegmentKind::Spiral { start_curvature: k0, end_curvature: k1 } = seg.kind else {
        return None;
    };
    if k0 * k1 >= 0.0 {
        return None;
    }
    let s0 = seg.length * k0 / (k0 - k1);
    if !(s0 > 0.0 && s0 < seg.length) {
        return None;
    }
    let mid = seg.pose_at(s0);

    let first = GeometrySegment {
        kind: SegmentKind::Spiral { start_curvature: k0, end_curvature: 0.0 },
        length: s0,
        ..*seg
    };
    let second = GeometrySegment {
        kind:    SegmentKind::Spiral { start_curvature: 0.0, end_curvature: k1 },
        s:       seg.s + s0,
        x:       mid.x,
        y:       mid.y,
        heading: normalize_angle(mid.hdg),
        length:  seg.length - s0,
        ..*seg
    };
    Some((first, second))
}
