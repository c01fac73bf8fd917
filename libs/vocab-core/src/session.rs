//! Review session controller.
//!
//! Reads the current progress of a word, runs the scheduler and writes the
//! result back: created on the first answer, updated afterwards. Nothing
//! is written when the scheduler rejects the input.
//!
//! The session assumes it sees a consistent snapshot. Stores shared
//! between sessions must serialize the read-compute-write sequence per
//! word themselves.

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::error::SessionError;
use crate::scheduler::ReviewScheduler;
use crate::store::ProgressStore;
use crate::types::{NewWordProgress, WordProgress};

/// Result of recording one answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewOutcome {
    pub progress: WordProgress,
    /// True when this answer created the record.
    pub created: bool,
}

/// Review session over a progress store.
#[derive(Debug)]
pub struct ReviewSession<S> {
    store: S,
    scheduler: ReviewScheduler,
}

impl<S: ProgressStore> ReviewSession<S> {
    /// Session with default scheduler thresholds.
    pub fn new(store: S) -> Self {
        Self::with_scheduler(store, ReviewScheduler::default())
    }

    pub fn with_scheduler(store: S, scheduler: ReviewScheduler) -> Self {
        Self { store, scheduler }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Record an answer for a word and persist the new schedule.
    pub fn record_answer<Tz: TimeZone>(
        &mut self,
        word_id: i64,
        language_id: i64,
        correct: bool,
        now: &DateTime<Tz>,
    ) -> Result<ReviewOutcome, SessionError<S::Error>> {
        let prior = self
            .store
            .find_by_word(word_id, language_id)
            .map_err(SessionError::Store)?;

        let state = self
            .scheduler
            .apply_outcome(prior.as_ref().map(|p| &p.state), correct, now)?;

        tracing::debug!(
            word_id,
            language_id,
            correct,
            status = %state.status,
            interval = state.interval,
            "scheduled word review"
        );

        let outcome = match prior {
            Some(existing) => ReviewOutcome {
                progress: self
                    .store
                    .update(existing.id, &state)
                    .map_err(SessionError::Store)?,
                created: false,
            },
            None => ReviewOutcome {
                progress: self
                    .store
                    .create(NewWordProgress {
                        word_id,
                        target_language_id: language_id,
                        state,
                    })
                    .map_err(SessionError::Store)?,
                created: true,
            },
        };

        Ok(outcome)
    }
}
