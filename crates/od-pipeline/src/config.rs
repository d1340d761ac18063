//! Batch-wide configuration.

use od_geometry::ClassifyConfig;
use od_interchange::{SegmenterConfig, SpliceConfig};
use od_lanes::LaneConfig;

use crate::error::{PipelineError, PipelineResult};

/// Settings for every phase of a [`Pipeline`][crate::Pipeline] run.
///
/// Every field has a default holding the named domain constants, so a JSON
/// file only needs the values it overrides.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PipelineConfig {
    pub segmenter: SegmenterConfig,
    pub classify:  ClassifyConfig,
    pub splice:    SpliceConfig,
    pub lanes:     LaneConfig,
}

impl PipelineConfig {
    /// Reject settings the phases cannot work with.
    pub fn validate(&self) -> PipelineResult<()> {
        let bad = |msg: String| Err(PipelineError::Config(msg));
        if self.segmenter.taper_vertices == 0 || self.splice.taper_vertices == 0 {
            return bad("taper_vertices must be at least 1".into());
        }
        if self.segmenter.ramp_search_window == 0 || self.segmenter.wedge_search_window == 0 {
            return bad("search windows must be at least 1 vertex".into());
        }
        if self.splice.min_splice_vertices < 2 {
            return bad(format!(
                "min_splice_vertices must be at least 2, got {}",
                self.splice.min_splice_vertices
            ));
        }
        if let Some(spacing) = self.splice.bridge_spacing {
            if !(spacing.is_finite() && spacing > 0.0) {
                return bad(format!("bridge_spacing must be positive, got {spacing}"));
            }
        }
        if self.classify.fit.lookaheads.is_empty() {
            return bad("at least one curvature lookahead is required".into());
        }
        Ok(())
    }
}
