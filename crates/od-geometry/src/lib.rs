//! `od-geometry` — curvature estimation and analytic plan-view encoding.
//!
//! Turns a surveyed centreline [`Polyline`](od_core::Polyline) into a
//! sequence of OpenDRIVE plan-view primitives (line, arc, clothoid spiral)
//! with curvature continuity between neighbours.
//!
//! # Modules
//!
//! | Module         | Contents                                                 |
//! |----------------|----------------------------------------------------------|
//! | [`fit`]        | least-squares circle fit, windowed per-vertex radius     |
//! | [`classify`]   | arc / line / spiral passes over a polyline               |
//! | [`segment`]    | `GeometrySegment`, `SegmentKind`, `Classification`       |
//! | [`clothoid`]   | clothoid evaluation and inflection subdivision           |
//! | [`fresnel`]    | Fresnel integrals (series + continued fraction)          |
//! | [`resample`]   | classification → evenly sampled polyline                 |
//! | [`param_poly`] | `paramPoly3` Hermite approximation of a primitive        |
//! | [`config`]     | `FitConfig`, `ClassifyConfig`, named thresholds          |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to configs and segments.    |

pub mod classify;
pub mod clothoid;
pub mod config;
pub mod fit;
pub mod fresnel;
pub mod param_poly;
pub mod resample;
pub mod segment;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use classify::classify;
pub use clothoid::{clothoid_pose, clothoid_sample, subdivide_at_zero_curvature};
pub use config::{ClassifyConfig, FitConfig, STRAIGHT_RADIUS};
pub use fit::{fit_circle, local_radius, vertex_headings, CircleFit};
pub use param_poly::{to_param_poly3, ParamPoly3};
pub use resample::resample;
pub use segment::{Classification, GeometrySegment, SegmentKind};
