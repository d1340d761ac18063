//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]`, the same way the geometry errors bubble up to the
//! interchange unit boundary.

use thiserror::Error;

/// Errors produced by `od-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Fewer vertices than the geometry needs (e.g. a polyline after trimming).
    #[error("degenerate {what}: {got} vertices, need at least {need}")]
    Degenerate {
        what: &'static str,
        got:  usize,
        need: usize,
    },

    #[error("vertex index {index} out of range for polyline of {len} vertices")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `od-*` crates.
pub type CoreResult<T> = Result<T, CoreError>;
