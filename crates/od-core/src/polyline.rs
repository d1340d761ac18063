//! Owned centreline polyline.
//!
//! A `Polyline` always holds at least two vertices; every operation that can
//! shrink it (slicing, splitting) is fallible and reports
//! [`CoreError::Degenerate`] instead of producing a stub.

use crate::vertex::{distance_3d, ElevCubic, Vertex};
use crate::{CoreError, CoreResult};

/// Two vertices closer than this (metres) are treated as coincident.
pub const COINCIDENT_EPS: f64 = 1e-9;

/// Which vertices a nearest-vertex query may consider.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SearchWindow {
    /// Every vertex.
    Full,
    /// Only the first `n` vertices.
    FromStart(usize),
    /// Only the last `n` vertices (a look-back from the end).
    FromEnd(usize),
    /// Only the `len` vertices starting at index `start`.
    Range { start: usize, len: usize },
}

/// Ordered sequence of at least two vertices.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Polyline {
    vertices: Vec<Vertex>,
}

impl Polyline {
    pub const MIN_VERTICES: usize = 2;

    /// Wrap `vertices`, keeping their elevation cubics as given.
    pub fn new(vertices: Vec<Vertex>) -> CoreResult<Self> {
        if vertices.len() < Self::MIN_VERTICES {
            return Err(CoreError::Degenerate {
                what: "polyline",
                got:  vertices.len(),
                need: Self::MIN_VERTICES,
            });
        }
        Ok(Self { vertices })
    }

    /// Build from raw `(x, y, z)` survey points and fit elevation cubics.
    pub fn from_xyz<I>(points: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = (f64, f64, f64)>,
    {
        let vertices = points.into_iter().map(|(x, y, z)| Vertex::new(x, y, z)).collect();
        let mut line = Self::new(vertices)?;
        line.refit_elevation();
        Ok(line)
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Mutable access to the vertices.  The slice cannot change length, so
    /// the two-vertex invariant holds.
    #[inline]
    pub fn vertices_mut(&mut self) -> &mut [Vertex] {
        &mut self.vertices
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Always `false`; present for API symmetry with collections.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    #[inline]
    pub fn first(&self) -> &Vertex {
        &self.vertices[0]
    }

    #[inline]
    pub fn last(&self) -> &Vertex {
        &self.vertices[self.vertices.len() - 1]
    }

    #[inline]
    pub fn last_index(&self) -> usize {
        self.vertices.len() - 1
    }

    // ── Measures ──────────────────────────────────────────────────────────

    /// Cumulative planar arclength at every vertex (`[0] == 0`).
    pub fn arclengths(&self) -> Vec<f64> {
        let mut s = Vec::with_capacity(self.vertices.len());
        let mut acc = 0.0;
        s.push(0.0);
        for w in self.vertices.windows(2) {
            acc += w[0].distance_2d(&w[1]);
            s.push(acc);
        }
        s
    }

    /// Total planar length in metres.
    pub fn length(&self) -> f64 {
        self.vertices.windows(2).map(|w| w[0].distance_2d(&w[1])).sum()
    }

    /// Mean spacing between consecutive vertices.
    pub fn mean_spacing(&self) -> f64 {
        self.length() / (self.vertices.len() - 1) as f64
    }

    /// Heading of edge `i → i + 1`.
    #[inline]
    pub fn edge_heading(&self, i: usize) -> f64 {
        self.vertices[i].heading_to(&self.vertices[i + 1])
    }

    // ── Slicing ───────────────────────────────────────────────────────────

    /// Vertices `start..=end` as a new polyline.
    pub fn slice(&self, start: usize, end: usize) -> CoreResult<Polyline> {
        if end >= self.vertices.len() {
            return Err(CoreError::IndexOutOfRange { index: end, len: self.vertices.len() });
        }
        if end < start + 1 {
            return Err(CoreError::Degenerate {
                what: "polyline slice",
                got:  end.saturating_sub(start) + 1,
                need: Self::MIN_VERTICES,
            });
        }
        let mut out = Polyline { vertices: self.vertices[start..=end].to_vec() };
        out.refit_elevation();
        Ok(out)
    }

    /// Split at vertex `i`; both halves contain vertex `i`.
    pub fn split_at(&self, i: usize) -> CoreResult<(Polyline, Polyline)> {
        Ok((self.slice(0, i)?, self.slice(i, self.last_index())?))
    }

    /// `self` followed by `other`.  A coincident joint vertex is kept once.
    pub fn concat(&self, other: &Polyline) -> Polyline {
        let mut vertices = self.vertices.clone();
        let skip = usize::from(self.last().distance_3d(other.first()) <= COINCIDENT_EPS);
        vertices.extend_from_slice(&other.vertices[skip..]);
        let mut out = Polyline { vertices };
        out.refit_elevation();
        out
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Index of the vertex nearest (3-D Euclidean) to `target` within `window`.
    ///
    /// Ties resolve to the earliest index.
    pub fn nearest_vertex(&self, target: [f64; 3], window: SearchWindow) -> usize {
        let n = self.vertices.len();
        let range = match window {
            SearchWindow::Full => 0..n,
            SearchWindow::FromStart(k) => 0..k.clamp(1, n),
            SearchWindow::FromEnd(k) => n - k.clamp(1, n)..n,
            SearchWindow::Range { start, len } => {
                let start = start.min(n - 1);
                start..(start + len.max(1)).min(n)
            }
        };
        let mut best = range.start;
        let mut best_d = f64::INFINITY;
        for i in range {
            let d = distance_3d(self.vertices[i].xyz(), target);
            if d < best_d {
                best_d = d;
                best = i;
            }
        }
        best
    }

    // ── Rigid motion ──────────────────────────────────────────────────────

    /// Rotate every vertex by `angle` radians about `(px, py)`.
    pub fn rotate_about(&mut self, px: f64, py: f64, angle: f64) {
        let (sin, cos) = angle.sin_cos();
        for v in &mut self.vertices {
            let dx = v.x - px;
            let dy = v.y - py;
            v.x = px + dx * cos - dy * sin;
            v.y = py + dx * sin + dy * cos;
        }
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        for v in &mut self.vertices {
            v.x += dx;
            v.y += dy;
        }
    }

    // ── Elevation ─────────────────────────────────────────────────────────

    /// Replace elevations by a linear ramp in arclength from `z_start` at the
    /// first vertex to `z_end` at the last, then refit the cubics.
    pub fn regrade_linear(&mut self, z_start: f64, z_end: f64) {
        let s = self.arclengths();
        let total = s[s.len() - 1];
        for (v, &si) in self.vertices.iter_mut().zip(&s) {
            let t = if total > 0.0 { si / total } else { 0.0 };
            v.z = z_start * (1.0 - t) + z_end * t;
        }
        self.refit_elevation();
    }

    /// Recompute every vertex's elevation cubic from the surveyed `z` values.
    ///
    /// Each cubic is a Hermite segment between this vertex and the next with
    /// finite-difference slopes at both ends, so the profile is continuous in
    /// value and slope.  The last vertex carries a linear extension.
    pub fn refit_elevation(&mut self) {
        let s = self.arclengths();
        let n = self.vertices.len();
        let slope = |i: usize| -> f64 {
            let (lo, hi) = match i {
                0 => (0, 1),
                _ if i == n - 1 => (n - 2, n - 1),
                _ => (i - 1, i + 1),
            };
            let ds = s[hi] - s[lo];
            if ds > COINCIDENT_EPS {
                (self.vertices[hi].z - self.vertices[lo].z) / ds
            } else {
                0.0
            }
        };
        let slopes: Vec<f64> = (0..n).map(slope).collect();

        for i in 0..n {
            let z0 = self.vertices[i].z;
            let m0 = slopes[i];
            let elev = if i + 1 < n && s[i + 1] - s[i] > COINCIDENT_EPS {
                let h = s[i + 1] - s[i];
                let dz = self.vertices[i + 1].z - z0;
                let m1 = slopes[i + 1];
                ElevCubic {
                    s: s[i],
                    a: z0,
                    b: m0,
                    c: (3.0 * dz / h - 2.0 * m0 - m1) / h,
                    d: (m0 + m1 - 2.0 * dz / h) / (h * h),
                }
            } else {
                ElevCubic { s: s[i], a: z0, b: m0, c: 0.0, d: 0.0 }
            };
            self.vertices[i].elev = elev;
        }
    }
}

impl TryFrom<Vec<Vertex>> for Polyline {
    type Error = CoreError;
    fn try_from(vertices: Vec<Vertex>) -> CoreResult<Polyline> {
        Polyline::new(vertices)
    }
}
