//! `od-interchange` — interchange units and the operations that build them.
//!
//! An interchange unit is one merge or branch event: a ramp, the upstream
//! and downstream mainline links, and the painted wedge border between them.
//! The segmenter cuts those links into six canonical roads; the splicer joins
//! the mainline exit of one unit to the entry of the next.
//!
//! # Modules
//!
//! | Module        | Contents                                                |
//! |---------------|---------------------------------------------------------|
//! | [`link`]      | `LinkRole`, `LinkGroup`, `LinkSet`, `Border`            |
//! | [`unit`]      | `UnitInput`, `InterchangeUnit`, `UnitStatus`            |
//! | [`segmenter`] | wedge location and the six-road cut                     |
//! | [`splicer`]   | tail splice, bridge fallback, headings, lanes across   |
//! | [`loader`]    | CSV link and border loading                             |
//! | [`error`]     | `InterchangeError`, `SpliceConflict`                    |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to units, links and reports.|

pub mod error;
pub mod link;
pub mod loader;
pub mod segmenter;
pub mod splicer;
pub mod unit;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{BorderEnd, InterchangeError, InterchangeResult, SpliceConflict, TailSide};
pub use link::{Border, LinkGroup, LinkRole, LinkSet};
pub use loader::{load_units_csv, load_units_reader, LoadedUnits};
pub use segmenter::{
    segment, SegmenterConfig, MIN_EXTENT_VERTICES, RAMP_SEARCH_WINDOW, TAPER_VERTICES, WEDGE_SEARCH_WINDOW,
};
pub use splicer::{
    align_entry_headings, bridge_tails, join_spliced_lanes, join_target, splice_tails, splice_units,
    HeadingBranchCorrected, SpliceConfig, SpliceMethod, SpliceReport, MIN_SPLICE_VERTICES,
};
pub use unit::{CanonicalRoads, InterchangeUnit, UnitInput, UnitStatus};
