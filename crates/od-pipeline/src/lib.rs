//! `od-pipeline` — batch orchestrator for interchange units.
//!
//! # Phases
//!
//! ```text
//! ① Segment  — cut each unit into six canonical roads and classify them
//!              (parallel with the `parallel` feature).
//! ② Splice   — join configured unit pairs, one at a time, in order.
//! ③ Lanes    — lane tables and junction rows from the final road lengths
//!              (parallel with the `parallel` feature).
//! ④ Ids      — junction and road ids for surviving units, in input order.
//! ```
//!
//! A unit that fails a phase is dropped from the batch with a reason; the
//! others are unaffected.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs phases ① and ③ on Rayon's thread pool.            |
//! | `serde`    | Adds `Serialize`/`Deserialize` to configs and results. |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use od_interchange::load_units_csv;
//! use od_pipeline::{NoopObserver, PipelineBuilder};
//!
//! let loaded = load_units_csv(&links, &borders)?;
//! let batch = PipelineBuilder::new(loaded.units).build()?.run(&mut NoopObserver);
//! ```

pub mod batch;
pub mod builder;
pub mod config;
pub mod error;
pub mod observer;
pub mod pipeline;


pub use batch::{Batch, CompletedUnit, FailedUnit, Stage, UnitIds};
pub use builder::PipelineBuilder;
pub use config::PipelineConfig;
pub use error::{PipelineError, PipelineResult};
pub use observer::{NoopObserver, PipelineObserver};
pub use pipeline::{Pipeline, SplicePair};
