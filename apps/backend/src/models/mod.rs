//! Database models and API types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// Re-export shared types from vocab-core
pub use vocab_core::types::{MasteryStatus, NewWordProgress, ProgressState, WordProgress};
pub use vocab_core::{ReviewOutcome, StatusCounts};

// === Database Entity Types ===

/// Device registration info
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Device {
    pub id: Uuid,
    pub token: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
}

/// Word progress stored in PostgreSQL
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbWordProgress {
    pub id: i64,
    pub device_id: Uuid,
    pub word_id: i64,
    pub target_language_id: i64,
    pub status: String,
    pub interval_days: i32,
    pub next_review: Option<DateTime<Utc>>,
    pub review_count: i32,
    pub correct_count: i32,
    pub date_learned: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DbWordProgress {
    /// Convert to vocab-core ProgressState
    pub fn to_core_state(&self) -> ProgressState {
        ProgressState {
            status: MasteryStatus::from_str(&self.status).unwrap_or_default(),
            interval: self.interval_days,
            next_review: self.next_review,
            review_count: u32::try_from(self.review_count).unwrap_or(0),
            correct_count: u32::try_from(self.correct_count).unwrap_or(0),
            date_learned: self.date_learned,
        }
    }

    /// Convert to API progress record
    pub fn to_api_progress(&self) -> WordProgress {
        WordProgress {
            id: self.id,
            word_id: self.word_id,
            target_language_id: self.target_language_id,
            state: self.to_core_state(),
        }
    }
}

/// Row of per-language status counts
#[derive(Debug, Clone, FromRow)]
pub struct StatusCountRow {
    pub target_language_id: i64,
    pub status: String,
    pub words: i64,
    pub reviews: i64,
    pub correct: i64,
}

// === API Request/Response Types ===

#[derive(Debug, Serialize, Deserialize)]
pub struct DeviceRegisterRequest {
    pub name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeviceRegisterResponse {
    pub device_id: Uuid,
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeviceStatusResponse {
    pub device_id: Uuid,
    pub last_seen_at: DateTime<Utc>,
}

// Progress types
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ProgressListQuery {
    pub language_id: Option<i64>,
    pub word_id: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProgressListResponse {
    pub count: usize,
    pub results: Vec<WordProgress>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateWordProgressRequest {
    pub word_id: i64,
    pub target_language_id: i64,
    #[serde(default)]
    pub status: MasteryStatus,
    #[serde(default)]
    pub interval: i32,
    pub next_review: Option<DateTime<Utc>>,
    pub date_learned: Option<NaiveDate>,
    /// Learner's UTC offset; a stamped learned date is the learner's today.
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

impl CreateWordProgressRequest {
    /// Build the record to insert. Known words without a learned date get
    /// `today`.
    pub fn into_new_progress(self, today: NaiveDate) -> NewWordProgress {
        let date_learned = match self.date_learned {
            Some(date) => Some(date),
            None if self.status.is_known() => Some(today),
            None => None,
        };

        NewWordProgress {
            word_id: self.word_id,
            target_language_id: self.target_language_id,
            state: ProgressState {
                status: self.status,
                interval: self.interval,
                next_review: self.next_review,
                review_count: 0,
                correct_count: 0,
                date_learned,
            },
        }
    }
}

/// Partial update. For the nullable fields a missing key keeps the
/// stored value and an explicit `null` clears it.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateWordProgressRequest {
    pub status: Option<MasteryStatus>,
    pub interval: Option<i32>,
    #[serde(default, deserialize_with = "present")]
    pub next_review: Option<Option<DateTime<Utc>>>,
    pub review_count: Option<u32>,
    pub correct_count: Option<u32>,
    #[serde(default, deserialize_with = "present")]
    pub date_learned: Option<Option<NaiveDate>>,
}

/// Mark a field that appeared in the body, even as `null`.
fn present<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl UpdateWordProgressRequest {
    /// Apply the provided fields on top of the current state
    pub fn apply_to(&self, current: &ProgressState) -> ProgressState {
        ProgressState {
            status: self.status.unwrap_or(current.status),
            interval: self.interval.unwrap_or(current.interval),
            next_review: self.next_review.unwrap_or(current.next_review),
            review_count: self.review_count.unwrap_or(current.review_count),
            correct_count: self.correct_count.unwrap_or(current.correct_count),
            date_learned: self.date_learned.unwrap_or(current.date_learned),
        }
    }
}

// Review types
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitAnswerRequest {
    pub word_id: i64,
    pub language_id: i64,
    pub correct: bool,
    /// Learner's UTC offset; day intervals and the learned date follow
    /// the learner's calendar.
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewQueueRequest {
    pub language_id: i64,
    pub word_ids: Vec<i64>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewQueueResponse {
    pub word_ids: Vec<i64>,
    pub due_count: usize,
}

// Stats types
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct WordsStatsQuery {
    pub language_id: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LanguageBreakdown {
    pub target_language_id: i64,
    #[serde(flatten)]
    pub counts: StatusCounts,
    pub accuracy: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WordsStatsResponse {
    pub words_new: u64,
    pub words_learning: u64,
    pub words_learned: u64,
    pub words_mastered: u64,
    pub total_words: u64,
    pub accuracy: f64,
    pub language_breakdown: Vec<LanguageBreakdown>,
}
