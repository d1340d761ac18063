//! `od-lanes` — lane topology of the six canonical roads of one interchange
//! event.
//!
//! # Modules
//!
//! | Module      | Contents                                                 |
//! |-------------|----------------------------------------------------------|
//! | [`builder`] | `LaneTopologyBuilder`, `LaneConfig`                      |
//! | [`splice`]  | lane links and tapers across a splice between units      |
//! | [`table`]   | lane tables, lane and road links, junction rows          |
//! | [`taper`]   | cubic width transitions                                  |
//! | [`error`]   | `LaneError`, `LaneResult`                                |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod builder;
pub mod error;
pub mod splice;
pub mod table;
pub mod taper;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use builder::{LaneConfig, LaneTopologyBuilder, MAX_TAPER_MISMATCH};
pub use error::{LaneError, LaneResult};
pub use splice::link_spliced_lanes;
pub use table::{
    JunctionConnectionRow, LaneInfoRow, LaneRef, LaneSpec, LaneTable, LaneTopology, MarkKind,
    RoadLink, RoleLanes,
};
pub use taper::{taper_width, Taper, TaperKind};
