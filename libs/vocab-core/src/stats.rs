//! Progress statistics.

use serde::{Deserialize, Serialize};

use crate::types::MasteryStatus;

/// Number of words in each mastery tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub new: u64,
    pub learning: u64,
    pub learned: u64,
    pub mastered: u64,
    pub total: u64,
}

impl StatusCounts {
    /// Count statuses.
    pub fn from_statuses<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = MasteryStatus>,
    {
        let mut counts = Self::default();
        for status in statuses {
            counts.add(status, 1);
        }
        counts
    }

    /// Add `n` words of one status.
    pub fn add(&mut self, status: MasteryStatus, n: u64) {
        match status {
            MasteryStatus::New => self.new += n,
            MasteryStatus::Learning => self.learning += n,
            MasteryStatus::Learned => self.learned += n,
            MasteryStatus::Mastered => self.mastered += n,
        }
        self.total += n;
    }

    /// Add another set of counts.
    pub fn merge(&mut self, other: &StatusCounts) {
        self.new += other.new;
        self.learning += other.learning;
        self.learned += other.learned;
        self.mastered += other.mastered;
        self.total += other.total;
    }

    /// Words counted as known (learned or mastered).
    pub fn known(&self) -> u64 {
        self.learned + self.mastered
    }
}

/// Share of correct answers as a percentage. Zero answers give 0.
pub fn accuracy(correct: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    correct as f64 / total as f64 * 100.0
}
