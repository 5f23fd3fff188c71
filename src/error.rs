//! Error taxonomy shared by the reference filter, the batch variant and the
//! per-pixel scatter/gather job.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SobelError>;

#[derive(Error, Debug)]
pub enum SobelError {
    /// Header or body of a text matrix does not parse, or the token count
    /// disagrees with the header.
    #[error("Malformed input: {reason}")]
    MalformedInput { reason: String },

    /// A pixel reached finalization without exactly one horizontal and one
    /// vertical group, or groups arrived out of key order.
    #[error("Ordering violation at pixel ({row}, {col}): {reason}")]
    OrderingViolation {
        row: usize,
        col: usize,
        reason: String,
    },

    /// Failure of the job machinery itself (worker pool, partitioning).
    #[error("Job failed: {0}")]
    Job(String),

    #[error("Failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },

    #[error("Image codec error for {}: {reason}", path.display())]
    Image { path: PathBuf, reason: String },
}

impl SobelError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        SobelError::MalformedInput {
            reason: reason.into(),
        }
    }

    pub fn ordering(row: usize, col: usize, reason: impl Into<String>) -> Self {
        SobelError::OrderingViolation {
            row,
            col,
            reason: reason.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SobelError::Io {
            path: path.into(),
            source,
        }
    }

    /// True for the errors that signal a broken shuffle/aggregator contract.
    pub fn is_ordering_violation(&self) -> bool {
        matches!(self, SobelError::OrderingViolation { .. })
    }
}
