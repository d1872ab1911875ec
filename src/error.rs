//! Error types for the dataset preparation pipeline.
//!
//! Load failures and numeric failures are fatal: they indicate data-integrity
//! problems, not transient faults, so nothing here is retried. Exhaustion is
//! the one recoverable kind — it is the expected end-of-epoch signal that
//! callers normally avoid by checking `has_next()` first.

use thiserror::Error;

/// Errors produced while loading, preprocessing, or iterating a dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// A record field could not be parsed. The whole load fails rather than
    /// skipping the row: dropping rows would desynchronize the chronological
    /// offsets the windowing depends on.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// Wavelet decomposition precondition violated (input length is not a
    /// power of two, or too short for the configured depth).
    #[error("unsupported length: {0}")]
    UnsupportedLength(String),

    /// Degenerate numeric state: a zero channel range in the normalization
    /// bounds, or a decomposition/reconstruction failure.
    #[error("numeric error: {0}")]
    NumericError(String),

    /// A batch was requested after the offset queue was drained.
    #[error("offset queue exhausted; call reset() to start a new epoch")]
    Exhausted,

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<csv::Error> for DatasetError {
    fn from(err: csv::Error) -> Self {
        if err.is_io_error() {
            match err.into_kind() {
                csv::ErrorKind::Io(io) => DatasetError::Io(io),
                _ => DatasetError::MalformedInput("CSV read failed".to_string()),
            }
        } else {
            DatasetError::MalformedInput(err.to_string())
        }
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, DatasetError>;
