//! Fluent builder for constructing a [`Pipeline`].

use std::collections::HashMap;

use od_core::UnitId;
use od_interchange::UnitInput;

use crate::{Pipeline, PipelineConfig, PipelineError, PipelineResult, SplicePair};

/// Fluent builder for [`Pipeline`].
///
/// # Optional inputs (have defaults)
///
/// | Method          | Default                     |
/// |-----------------|-----------------------------|
/// | `.config(c)`    | `PipelineConfig::default()` |
/// | `.splices(v)`   | no splices                  |
///
/// # Example
///
/// ```rust,ignore
/// let loaded = load_units_csv(&links, &borders)?;
/// let pipeline = PipelineBuilder::new(loaded.units)
///     .splices(vec![SplicePair::new(UnitId(0), UnitId(1), 0.0)])
///     .build()?;
/// let batch = pipeline.run(&mut NoopObserver);
/// ```
pub struct PipelineBuilder {
    inputs:  Vec<UnitInput>,
    config:  Option<PipelineConfig>,
    splices: Vec<SplicePair>,
}

impl PipelineBuilder {
    pub fn new(inputs: Vec<UnitInput>) -> Self {
        Self { inputs, config: None, splices: Vec::new() }
    }

    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Unit pairs to join, applied in the given order.
    pub fn splices(mut self, splices: Vec<SplicePair>) -> Self {
        self.splices = splices;
        self
    }

    /// Validate the configuration and the splice references, and return a
    /// ready-to-run [`Pipeline`].
    pub fn build(self) -> PipelineResult<Pipeline> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        // ── Index units by id ─────────────────────────────────────────────
        let mut positions: HashMap<UnitId, usize> = HashMap::with_capacity(self.inputs.len());
        for (pos, input) in self.inputs.iter().enumerate() {
            if positions.insert(input.id, pos).is_some() {
                return Err(PipelineError::Config(format!("{} appears more than once", input.id)));
            }
        }

        // ── Resolve splice pairs ──────────────────────────────────────────
        let mut resolved = Vec::with_capacity(self.splices.len());
        for pair in &self.splices {
            if pair.exit == pair.entry {
                return Err(PipelineError::SelfSplice(pair.exit));
            }
            let exit = *positions
                .get(&pair.exit)
                .ok_or(PipelineError::UnitIndex { id: pair.exit, what: "splice exit" })?;
            let entry = *positions
                .get(&pair.entry)
                .ok_or(PipelineError::UnitIndex { id: pair.entry, what: "splice entry" })?;
            if !pair.lateral_offset.is_finite() {
                return Err(PipelineError::Config(format!(
                    "lateral offset of {} → {} is not finite",
                    pair.exit, pair.entry
                )));
            }
            resolved.push((exit, entry, pair.lateral_offset));
        }

        Ok(Pipeline { config, inputs: self.inputs, splices: resolved })
    }
}
