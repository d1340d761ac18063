//! Batch observer trait for progress reporting and data collection.

use od_interchange::{InterchangeUnit, SpliceReport};

use crate::batch::{Batch, FailedUnit};

/// Callbacks invoked by [`Pipeline::run`][crate::Pipeline::run] as the batch
/// moves through its phases.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.  Callbacks run on the calling thread, in
/// input order, even with the `parallel` feature.
///
/// # Example: failure printer
///
/// ```rust,ignore
/// struct FailurePrinter;
///
/// impl PipelineObserver for FailurePrinter {
///     fn on_unit_failed(&mut self, failed: &FailedUnit) {
///         eprintln!("{}: {}", failed.id, failed.reason);
///     }
/// }
/// ```
pub trait PipelineObserver {
    /// Called once per unit that was segmented and classified.
    fn on_unit_segmented(&mut self, _unit: &InterchangeUnit) {}

    /// Called when a unit is dropped from the batch, at whichever phase.
    fn on_unit_failed(&mut self, _failed: &FailedUnit) {}

    /// Called after each completed splice.
    fn on_splice(&mut self, _report: &SpliceReport) {}

    /// Called once after road and junction ids have been assigned.
    fn on_batch_end(&mut self, _batch: &Batch) {}
}

/// A [`PipelineObserver`] that does nothing.
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}
