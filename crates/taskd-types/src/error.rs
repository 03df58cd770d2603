use thiserror::Error;

/// Errors produced by type conversions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid task id: {0}")]
    InvalidTaskId(String),

    #[error("invalid task status: {0} (expected 0 or 1)")]
    InvalidStatus(i64),
}
