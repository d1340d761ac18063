use od_core::UnitId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("pipeline configuration error: {0}")]
    Config(String),

    #[error("{what} refers to {id}, which is not in the batch")]
    UnitIndex {
        id:   UnitId,
        what: &'static str,
    },

    #[error("splice of {0} onto itself")]
    SelfSplice(UnitId),
}

pub type PipelineResult<T> = Result<T, PipelineError>;
