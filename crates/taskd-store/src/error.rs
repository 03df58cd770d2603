use taskd_types::TaskId;

/// Errors from task store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No task with this id exists.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// A writer panicked while holding the store lock.
    #[error("store lock poisoned")]
    LockPoisoned,

    /// The record vector and the position index disagree.
    #[error("integrity violation at slot {slot}: {reason}")]
    IntegrityViolation { slot: usize, reason: String },

    /// Failure reported by a non-memory backend.
    #[error("backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Returns `true` for the "no such task" case.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
