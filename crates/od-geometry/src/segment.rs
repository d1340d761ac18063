//! Analytic plan-view primitives and the classification that owns them.

use od_core::{CoreResult, Polyline, Pose};

use crate::clothoid::clothoid_pose;

/// Curvatures below this magnitude are evaluated as straight.
const ZERO_CURVATURE: f64 = 1e-12;

/// The shape of one plan-view primitive.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SegmentKind {
    Line,
    /// Constant curvature `1/radius`; positive radius turns left.
    Arc { radius: f64 },
    /// Curvature varies linearly from `start_curvature` to `end_curvature`.
    Spiral { start_curvature: f64, end_curvature: f64 },
}

impl SegmentKind {
    /// OpenDRIVE element name.
    pub fn name(&self) -> &'static str {
        match self {
            SegmentKind::Line => "line",
            SegmentKind::Arc { .. } => "arc",
            SegmentKind::Spiral { .. } => "spiral",
        }
    }
}

/// One primitive of a classified centreline.
///
/// `s` is the station of the segment start along the analytic reference
/// line; `(x, y, heading)` is the pose there.  `start_vertex..=end_vertex`
/// are the polyline vertices the segment was fitted to.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeometrySegment {
    pub kind:         SegmentKind,
    pub start_vertex: usize,
    pub end_vertex:   usize,
    pub s:            f64,
    pub x:            f64,
    pub y:            f64,
    pub heading:      f64,
    pub length:       f64,
}

impl GeometrySegment {
    #[inline]
    pub fn start_pose(&self) -> Pose {
        Pose::new(self.x, self.y, self.heading)
    }

    pub fn start_curvature(&self) -> f64 {
        self.curvature_at(0.0)
    }

    pub fn end_curvature(&self) -> f64 {
        self.curvature_at(self.length)
    }

    /// Station just past the end of this segment.
    #[inline]
    pub fn end_s(&self) -> f64 {
        self.s + self.length
    }

    pub fn curvature_at(&self, ds: f64) -> f64 {
        match self.kind {
            SegmentKind::Line => 0.0,
            SegmentKind::Arc { radius } => 1.0 / radius,
            SegmentKind::Spiral { start_curvature, end_curvature } => {
                if self.length > 0.0 {
                    start_curvature + (end_curvature - start_curvature) * ds / self.length
                } else {
                    start_curvature
                }
            }
        }
    }

    /// Tangent heading `ds` metres past the start.  Continuous within the
    /// segment; not normalized.
    pub fn heading_at(&self, ds: f64) -> f64 {
        match self.kind {
            SegmentKind::Line => self.heading,
            SegmentKind::Arc { radius } => self.heading + ds / radius,
            SegmentKind::Spiral { start_curvature: k0, end_curvature: k1 } => {
                let rate = if self.length > 0.0 { (k1 - k0) / self.length } else { 0.0 };
                self.heading + k0 * ds + 0.5 * rate * ds * ds
            }
        }
    }

    pub fn pose_at(&self, ds: f64) -> Pose {
        let h0 = self.heading;
        match self.kind {
            SegmentKind::Line => {
                Pose::new(self.x + ds * h0.cos(), self.y + ds * h0.sin(), h0)
            }
            SegmentKind::Arc { radius } => {
                let k = 1.0 / radius;
                if k.abs() < ZERO_CURVATURE {
                    return Pose::new(self.x + ds * h0.cos(), self.y + ds * h0.sin(), h0);
                }
                let h = h0 + k * ds;
                Pose::new(
                    self.x + (h.sin() - h0.sin()) / k,
                    self.y - (h.cos() - h0.cos()) / k,
                    h,
                )
            }
            SegmentKind::Spiral { start_curvature, end_curvature } => {
                clothoid_pose(self.start_pose(), start_curvature, end_curvature, self.length, ds)
            }
        }
    }

    pub fn end_pose(&self) -> Pose {
        self.pose_at(self.length)
    }

    /// Poses every `step` metres from the start, always including the end.
    pub fn sample(&self, step: f64) -> Vec<Pose> {
        let n = if step > 0.0 { (self.length / step).ceil().max(1.0) as usize } else { 1 };
        (0..=n).map(|i| self.pose_at(self.length * i as f64 / n as f64)).collect()
    }
}

/// Result of classifying one polyline.
///
/// `segments` tile `[0, total_length]` without gaps: the first starts at
/// `s = 0` and each starts where the previous ends.  `headings`,
/// `curvatures` and `stations` hold one value per input vertex.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Classification {
    pub segments:   Vec<GeometrySegment>,
    pub headings:   Vec<f64>,
    pub curvatures: Vec<f64>,
    /// Station of each input vertex along the analytic reference line.
    pub stations:   Vec<f64>,
}

impl Classification {
    /// Total analytic length.
    pub fn length(&self) -> f64 {
        self.segments.last().map_or(0.0, GeometrySegment::end_s)
    }

    /// Segment containing station `s` (the later one at a shared boundary,
    /// the last one past the end).
    pub fn segment_at(&self, s: f64) -> Option<&GeometrySegment> {
        let idx = self.segments.partition_point(|seg| seg.s <= s);
        self.segments.get(idx.saturating_sub(1))
    }

    /// Pose on the analytic reference line at station `s`.
    pub fn pose_at(&self, s: f64) -> Option<Pose> {
        self.segment_at(s).map(|seg| seg.pose_at(s - seg.s))
    }

    /// Analytic position of every input vertex.
    pub fn reconstruct(&self) -> Vec<Pose> {
        self.stations.iter().filter_map(|&s| self.pose_at(s)).collect()
    }

    /// Largest planar distance between an input vertex and its
    /// reconstruction.
    pub fn reconstruction_error(&self, polyline: &Polyline) -> f64 {
        self.reconstruct()
            .iter()
            .zip(polyline.vertices())
            .map(|(p, v)| p.distance_to(v.x, v.y))
            .fold(0.0, f64::max)
    }

    /// Add `delta` to every heading sample and segment start heading.
    pub fn shift_headings(&mut self, delta: f64) {
        for h in &mut self.headings {
            *h += delta;
        }
        for seg in &mut self.segments {
            seg.heading += delta;
        }
    }

    pub fn kinds(&self) -> Vec<SegmentKind> {
        self.segments.iter().map(|s| s.kind).collect()
    }

    pub fn first_heading(&self) -> Option<f64> {
        self.headings.first().copied()
    }

    pub fn last_heading(&self) -> Option<f64> {
        self.headings.last().copied()
    }

    /// Resample into a polyline (see [`resample`](crate::resample::resample)).
    pub fn resample(&self, step: f64) -> CoreResult<Polyline> {
        crate::resample::resample(self, step)
    }
}
