//! Core types for word review progress.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Proficiency tier of a word for one learner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MasteryStatus {
    New,
    Learning,
    Learned,
    Mastered,
}

impl Default for MasteryStatus {
    fn default() -> Self {
        Self::New
    }
}

impl MasteryStatus {
    /// All statuses in progression order.
    pub const ALL: [MasteryStatus; 4] = [Self::New, Self::Learning, Self::Learned, Self::Mastered];

    /// Get the status name as stored and serialized.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Learning => "learning",
            Self::Learned => "learned",
            Self::Mastered => "mastered",
        }
    }

    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "new" => Some(Self::New),
            "learning" => Some(Self::Learning),
            "learned" => Some(Self::Learned),
            "mastered" => Some(Self::Mastered),
            _ => None,
        }
    }

    /// Learned and mastered words count as known.
    pub fn is_known(self) -> bool {
        matches!(self, Self::Learned | Self::Mastered)
    }
}

impl std::fmt::Display for MasteryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scheduling state of a word, without store identity.
///
/// This is what the scheduler reads and writes. `interval` is signed so
/// that corrupt values coming from storage can be rejected instead of
/// wrapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressState {
    pub status: MasteryStatus,
    pub interval: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_review: Option<DateTime<Utc>>,
    pub review_count: u32,
    pub correct_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_learned: Option<NaiveDate>,
}

impl Default for ProgressState {
    fn default() -> Self {
        Self {
            status: MasteryStatus::New,
            interval: 0,
            next_review: None,
            review_count: 0,
            correct_count: 0,
            date_learned: None,
        }
    }
}

/// Persisted progress of one word in one target language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordProgress {
    pub id: i64,
    pub word_id: i64,
    pub target_language_id: i64,
    #[serde(flatten)]
    pub state: ProgressState,
}

/// Fields needed to create a progress record for a first answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewWordProgress {
    pub word_id: i64,
    pub target_language_id: i64,
    #[serde(flatten)]
    pub state: ProgressState,
}

/// Next interval and due instant computed for an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextSchedule {
    pub next_review_at: DateTime<Utc>,
    pub interval_days: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn status_string_round_trip() {
        for status in MasteryStatus::ALL {
            assert_eq!(MasteryStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(MasteryStatus::from_str("review"), None);
    }

    #[test]
    fn status_displays_as_stored_name() {
        assert_eq!(MasteryStatus::Learning.to_string(), "learning");
    }

    #[test]
    fn only_learned_and_mastered_are_known() {
        assert!(!MasteryStatus::New.is_known());
        assert!(!MasteryStatus::Learning.is_known());
        assert!(MasteryStatus::Learned.is_known());
        assert!(MasteryStatus::Mastered.is_known());
    }

    #[test]
    fn default_state_is_unscheduled() {
        let state = ProgressState::default();
        assert_eq!(state.status, MasteryStatus::New);
        assert_eq!(state.interval, 0);
        assert_eq!(state.next_review, None);
        assert_eq!(state.date_learned, None);
    }
}
