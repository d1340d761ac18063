//! `od-core` — foundational types for the interchange-to-OpenDRIVE engine.
//!
//! This crate is a dependency of every other `od-*` crate.  It has no `od-*`
//! dependencies and few external ones (`rstar` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module         | Contents                                                |
//! |----------------|---------------------------------------------------------|
//! | [`ids`]        | `UnitId`, `RoadId`, `JunctionId`                        |
//! | [`vertex`]     | `Vertex`, `ElevCubic`, `CubicPoly`, `Pose`              |
//! | [`polyline`]   | `Polyline` (≥ 2 vertices), `SearchWindow`               |
//! | [`angle`]      | heading normalization and branch arithmetic             |
//! | [`linalg`]     | small dense solves, least-squares polynomial fit        |
//! | [`index`]      | `VertexIndex` (R-tree k-nearest queries)                |
//! | [`road`]       | `CanonicalRoadId`, `EventKind`, `RoadMap<T>`            |
//! | [`error`]      | `CoreError`, `CoreResult`                               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod angle;
pub mod error;
pub mod ids;
pub mod index;
pub mod linalg;
pub mod polyline;
pub mod road;
pub mod vertex;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use angle::{angle_diff, branch_shift, normalize_angle, unwrap_in_place};
pub use error::{CoreError, CoreResult};
pub use ids::{JunctionId, RoadId, UnitId};
pub use index::VertexIndex;
pub use polyline::{Polyline, SearchWindow};
pub use road::{CanonicalRoadId, ContactPoint, EventKind, RoadMap};
pub use vertex::{CubicPoly, ElevCubic, Pose, Vertex};
