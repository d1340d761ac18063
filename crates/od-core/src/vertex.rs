//! Planar survey vertex, local elevation cubic, and pose types.
//!
//! Coordinates are metres in a local planar frame (projection from WGS-84 is
//! done upstream).  Everything is `f64`: the serialized plan view must be
//! bit-stable at 17 significant digits, which rules out single precision.

use std::fmt;

/// Cubic polynomial `a + b·t + c·t² + d·t³`.
///
/// Used for lane widths, lane offsets, and elevation records.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CubicPoly {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl CubicPoly {
    #[inline]
    pub fn new(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self { a, b, c, d }
    }

    /// The constant polynomial `a`.
    #[inline]
    pub fn constant(a: f64) -> Self {
        Self { a, b: 0.0, c: 0.0, d: 0.0 }
    }

    #[inline]
    pub fn eval(&self, t: f64) -> f64 {
        self.a + t * (self.b + t * (self.c + t * self.d))
    }

    #[inline]
    pub fn derivative(&self, t: f64) -> f64 {
        self.b + t * (2.0 * self.c + t * 3.0 * self.d)
    }
}

/// Local cubic fit of elevation against arclength, valid from `s` up to the
/// next vertex: `z(ds) = a + b·ds + c·ds² + d·ds³` with `ds = s' − s`.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElevCubic {
    pub s: f64,
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl ElevCubic {
    /// Flat profile at height `z` starting at `s`.
    pub fn flat(s: f64, z: f64) -> Self {
        Self { s, a: z, b: 0.0, c: 0.0, d: 0.0 }
    }

    #[inline]
    pub fn poly(&self) -> CubicPoly {
        CubicPoly::new(self.a, self.b, self.c, self.d)
    }

    /// Elevation at `ds` metres past the owning vertex.
    #[inline]
    pub fn eval(&self, ds: f64) -> f64 {
        self.poly().eval(ds)
    }
}

/// A surveyed centreline vertex.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vertex {
    pub x:    f64,
    pub y:    f64,
    /// Surveyed elevation, metres.
    pub z:    f64,
    pub elev: ElevCubic,
}

impl Vertex {
    /// A vertex with a flat elevation cubic.  Owning polylines refit the
    /// cubic once the neighbourhood is known.
    #[inline]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z, elev: ElevCubic::flat(0.0, z) }
    }

    #[inline]
    pub fn xy(&self) -> [f64; 2] {
        [self.x, self.y]
    }

    #[inline]
    pub fn xyz(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Planar distance in metres.
    #[inline]
    pub fn distance_2d(&self, other: &Vertex) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Euclidean distance including elevation.
    #[inline]
    pub fn distance_3d(&self, other: &Vertex) -> f64 {
        distance_3d(self.xyz(), other.xyz())
    }

    /// Heading of the chord `self → other`, radians in `(-π, π]`.
    #[inline]
    pub fn heading_to(&self, other: &Vertex) -> f64 {
        (other.y - self.y).atan2(other.x - self.x)
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3}, {:.3})", self.x, self.y, self.z)
    }
}

#[inline]
pub fn distance_3d(a: [f64; 3], b: [f64; 3]) -> f64 {
    let dx = b[0] - a[0];
    let dy = b[1] - a[1];
    let dz = b[2] - a[2];
    (dx * dx + dy * dy + dz * dz).sqrt()
}

/// Planar position plus heading.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pose {
    pub x:   f64,
    pub y:   f64,
    /// Tangent direction, radians.  Not necessarily normalized.
    pub hdg: f64,
}

impl Pose {
    #[inline]
    pub fn new(x: f64, y: f64, hdg: f64) -> Self {
        Self { x, y, hdg }
    }

    /// Planar distance to `(x, y)`.
    #[inline]
    pub fn distance_to(&self, x: f64, y: f64) -> f64 {
        (x - self.x).hypot(y - self.y)
    }
}
