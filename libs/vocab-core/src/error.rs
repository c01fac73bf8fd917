//! Error types for vocab-core.

use thiserror::Error;

/// Result type alias using SchedulerError.
pub type Result<T> = std::result::Result<T, SchedulerError>;

/// Errors raised by the review scheduler.
///
/// The scheduler performs no I/O, so the only failure is bad input.
/// Callers must not persist anything when this is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Errors from a review session: either the scheduler rejected the input
/// or the progress store failed.
#[derive(Debug, Error)]
pub enum SessionError<E>
where
    E: std::error::Error + 'static,
{
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),

    #[error("progress store error: {0}")]
    Store(#[source] E),
}

/// Errors from the in-memory progress store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryStoreError {
    #[error("progress {0} not found")]
    NotFound(i64),

    #[error("progress already exists for word {word_id} in language {language_id}")]
    Duplicate { word_id: i64, language_id: i64 },
}
