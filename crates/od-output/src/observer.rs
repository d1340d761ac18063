//! `BatchOutputObserver<W>` — bridges `PipelineObserver` to a `RecordWriter`.

use log::debug;
use od_pipeline::{Batch, PipelineObserver};

use crate::assemble::{assemble_batch, AssembleOptions};
use crate::writer::RecordWriter;
use crate::{OutputError, OutputResult};

/// A [`PipelineObserver`] that writes the finished batch to any
/// [`RecordWriter`] backend.
///
/// Errors are stored because observer methods have no return value.  After
/// `pipeline.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct BatchOutputObserver<W: RecordWriter> {
    writer:     W,
    options:    AssembleOptions,
    last_error: Option<OutputError>,
}

impl<W: RecordWriter> BatchOutputObserver<W> {
    pub fn new(writer: W, options: AssembleOptions) -> Self {
        Self { writer, options, last_error: None }
    }

    /// Take the stored write error (if any) after `pipeline.run()` returns.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn write(&mut self, batch: &Batch) -> OutputResult<()> {
        let records = assemble_batch(batch, &self.options)?;
        debug!(
            "writing {} roads, {} geometries, {} junction connections",
            records.roads.len(),
            records.geometry.len(),
            records.connections.len()
        );
        self.writer.write_records(&records)?;
        self.writer.finish()
    }
}

impl<W: RecordWriter> PipelineObserver for BatchOutputObserver<W> {
    fn on_batch_end(&mut self, batch: &Batch) {
        if let Err(e) = self.write(batch) {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}
