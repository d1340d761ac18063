//! Cubic lane-width transitions.
//!
//! A taper runs over the full length `L` of its road with zero width slope at
//! both ends: `w(s) = w·(1 − 3t² + 2t³)` when closing and `w·(3t² − 2t³)`
//! when opening, with `t = s / L`.

use od_core::CubicPoly;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TaperKind {
    /// Full width at the start, zero at the end.
    Closing,
    /// Zero width at the start, full width at the end.
    Opening,
}

/// Width polynomial in `s` (metres from road start).
///
/// A non-positive `length` yields a constant: full width for closing lanes,
/// zero for opening ones.
pub fn taper_width(width: f64, length: f64, kind: TaperKind) -> CubicPoly {
    if !(length > 0.0) {
        return match kind {
            TaperKind::Closing => CubicPoly::constant(width),
            TaperKind::Opening => CubicPoly::constant(0.0),
        };
    }
    let c = 3.0 * width / (length * length);
    let d = 2.0 * width / (length * length * length);
    match kind {
        TaperKind::Closing => CubicPoly::new(width, 0.0, -c, d),
        TaperKind::Opening => CubicPoly::new(0.0, 0.0, c, -d),
    }
}

/// One width transition, carried by exactly one road.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Taper {
    pub kind:   TaperKind,
    /// Lane ids (negative, right-hand side) whose width varies.
    pub lanes:  Vec<i32>,
    /// Length over which the width changes, i.e. the carrying road's length.
    pub length: f64,
}
