//! Parametric cubic (`paramPoly3`) approximation of a primitive.
//!
//! The curve is expressed in the segment's local frame (origin at the start
//! pose, `u` along the start heading) with normalized parameter
//! `p ∈ [0, 1]`.  Coefficients come from cubic Hermite interpolation of the
//! end points and tangents, with tangent magnitude equal to the segment
//! length.

use od_core::Pose;

use crate::segment::GeometrySegment;

/// `u(p) = aU + bU·p + cU·p² + dU·p³`, likewise `v(p)`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParamPoly3 {
    pub au: f64,
    pub bu: f64,
    pub cu: f64,
    pub du: f64,
    pub av: f64,
    pub bv: f64,
    pub cv: f64,
    pub dv: f64,
}

impl ParamPoly3 {
    /// Local `(u, v)` at normalized parameter `p`.
    pub fn eval(&self, p: f64) -> (f64, f64) {
        let u = self.au + p * (self.bu + p * (self.cu + p * self.du));
        let v = self.av + p * (self.bv + p * (self.cv + p * self.dv));
        (u, v)
    }

    /// World position at `p` given the segment's start pose.
    pub fn eval_world(&self, start: Pose, p: f64) -> (f64, f64) {
        let (u, v) = self.eval(p);
        let (sin, cos) = start.hdg.sin_cos();
        (start.x + u * cos - v * sin, start.y + u * sin + v * cos)
    }
}

pub fn to_param_poly3(seg: &GeometrySegment) -> ParamPoly3 {
    let start = seg.start_pose();
    let end = seg.end_pose();
    let len = seg.length;

    let (sin, cos) = start.hdg.sin_cos();
    let (dx, dy) = (end.x - start.x, end.y - start.y);
    let ue = dx * cos + dy * sin;
    let ve = -dx * sin + dy * cos;
    let (sin_t, cos_t) = (end.hdg - start.hdg).sin_cos();

    ParamPoly3 {
        au: 0.0,
        bu: len,
        cu: 3.0 * ue - 2.0 * len - len * cos_t,
        du: -2.0 * ue + len + len * cos_t,
        av: 0.0,
        bv: 0.0,
        cv: 3.0 * ve - len * sin_t,
        dv: -2.0 * ve + len * sin_t,
    }
}
