//! Heading arithmetic.
//!
//! OpenDRIVE consumers read `hdg` literally: `π − ε` and `−π + ε` are two
//! headings almost 2π apart as far as they are concerned.  Headings stored
//! in a classification are therefore kept on one continuous branch per
//! primitive, and the helpers here move values between branches explicitly.

use std::f64::consts::{PI, TAU};

/// Wrap `a` into `(-π, π]`.
#[inline]
pub fn normalize_angle(a: f64) -> f64 {
    let mut r = a % TAU;
    if r <= -PI {
        r += TAU;
    } else if r > PI {
        r -= TAU;
    }
    r
}

/// Signed smallest rotation taking `from` onto `to`, in `(-π, π]`.
#[inline]
pub fn angle_diff(to: f64, from: f64) -> f64 {
    normalize_angle(to - from)
}

/// Multiple of 2π to add to `value` so that it lies within π of `reference`.
///
/// Returns `0.0` when the two are already on the same branch.
#[inline]
pub fn branch_shift(reference: f64, value: f64) -> f64 {
    let turns = ((reference - value) / TAU).round();
    turns * TAU
}

/// Remove 2π jumps between consecutive samples in place.
pub fn unwrap_in_place(headings: &mut [f64]) {
    for i in 1..headings.len() {
        let prev = headings[i - 1];
        headings[i] += branch_shift(prev, headings[i]);
    }
}
