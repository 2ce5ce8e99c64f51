//! Error types shared across the crate

use thiserror::Error;

/// Result alias used by every fallible operation in the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced to callers
///
/// All of these are contract violations on the caller's side. None of them
/// is retried internally, and an `update` that fails leaves the optimizer
/// state untouched.
#[derive(Debug, Error)]
pub enum Error {
    /// A gradient (or parameter slice) does not have the length fixed on first use
    #[error("dimension mismatch: expected {expected} features, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// A hyperparameter or generator table is out of its valid range
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A sampling distribution could not be built
    #[error("sampling error: {0}")]
    Sampling(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid_config(msg: impl Into<String>) -> Self {
        Error::InvalidConfig(msg.into())
    }
}
