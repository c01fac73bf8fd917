//! Core vocabulary review library shared by the backend and clients.
//!
//! Provides:
//! - Review scheduler (interval steps, due instant, mastery status)
//! - Review session controller over a pluggable progress store
//! - Due-word selection and progress statistics
//! - Shared types (WordProgress, ProgressState, MasteryStatus, etc.)

pub mod error;
pub mod queue;
pub mod scheduler;
pub mod session;
pub mod stats;
pub mod store;
pub mod types;

pub use error::{MemoryStoreError, Result, SchedulerError, SessionError};
pub use queue::{is_due, select_due};
pub use scheduler::{apply_outcome, compute_new_status, compute_next_schedule, ReviewScheduler};
pub use session::{ReviewOutcome, ReviewSession};
pub use stats::{accuracy, StatusCounts};
pub use store::{InMemoryProgressStore, ProgressStore};
pub use types::{MasteryStatus, NewWordProgress, NextSchedule, ProgressState, WordProgress};
