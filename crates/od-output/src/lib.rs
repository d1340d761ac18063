//! `od-output` — OpenDRIVE records for completed interchange batches.
//!
//! [`assemble`] turns a completed unit into plain records: road headers with
//! links, `planView` geometries, `elevationProfile` entries, lanes and
//! junction connections.  Backends implement [`RecordWriter`]:
//!
//! | Backend | Files created                                                              |
//! |---------|----------------------------------------------------------------------------|
//! | CSV     | `roads.csv`, `plan_view.csv`, `elevation.csv`, `lanes.csv`, `junctions.csv` |
//!
//! Real numbers are written in scientific notation with 17 significant
//! digits ([`csv::num`]).
//!
//! # Usage
//!
//! ```rust,ignore
//! use od_output::{AssembleOptions, BatchOutputObserver, CsvWriter};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = BatchOutputObserver::new(writer, AssembleOptions::default());
//! pipeline.run(&mut obs);
//! obs.take_error().map(|e| eprintln!("output error: {e}"));
//! ```

pub mod assemble;
pub mod csv;
pub mod error;
pub mod observer;
pub mod record;
pub mod writer;


pub use assemble::{assemble, assemble_batch, AssembleOptions};
pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::BatchOutputObserver;
pub use record::{
    ConnectionRecord, ElevationRecord, GeometryKind, GeometryRecord, LaneRecord, LinkElement, LinkRecord,
    RoadRecord, UnitRecords,
};
pub use writer::RecordWriter;
