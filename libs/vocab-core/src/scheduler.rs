//! Review scheduler for learned words.
//!
//! A correct answer walks the interval through a fixed step table
//! (0 → 1 → 3 → 7 → 14 days) and doubles it from there up to a cap.
//! A wrong answer drops the word off the spaced schedule and brings it
//! back a few minutes later. Status follows from the new interval and
//! the outcome.
//!
//! The step table is an exact lookup: an interval that is not one of the
//! table's keys (2, 5, 10, ...) takes the doubling branch.

use chrono::{DateTime, Days, Duration, TimeZone, Utc};

use crate::error::{Result, SchedulerError};
use crate::types::{MasteryStatus, NextSchedule, ProgressState};

/// Review scheduler with configurable thresholds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewScheduler {
    /// Exact `(prior, next)` interval steps applied on a correct answer.
    pub steps: Vec<(i32, i32)>,
    pub max_interval_days: i32,
    /// Delay before a failed word comes back.
    pub retry_delay_minutes: i64,
    pub learned_threshold_days: i32,
    pub mastered_threshold_days: i32,
}

impl Default for ReviewScheduler {
    fn default() -> Self {
        Self {
            steps: vec![(0, 1), (1, 3), (3, 7), (7, 14)],
            max_interval_days: 90,
            retry_delay_minutes: 10,
            learned_threshold_days: 7,
            mastered_threshold_days: 30,
        }
    }
}

impl ReviewScheduler {
    /// Build a scheduler from explicit settings, rejecting inconsistent ones.
    pub fn new(
        steps: Vec<(i32, i32)>,
        max_interval_days: i32,
        retry_delay_minutes: i64,
        learned_threshold_days: i32,
        mastered_threshold_days: i32,
    ) -> Result<Self> {
        let scheduler = Self {
            steps,
            max_interval_days,
            retry_delay_minutes,
            learned_threshold_days,
            mastered_threshold_days,
        };
        scheduler.validate()?;
        Ok(scheduler)
    }

    /// Check that the settings keep every interval in `0..=max_interval_days`
    /// and every due instant after `now`.
    pub fn validate(&self) -> Result<()> {
        if self.max_interval_days < 1 {
            return Err(SchedulerError::InvalidArgument(format!(
                "max interval must be positive, got {}",
                self.max_interval_days
            )));
        }
        if self.retry_delay_minutes <= 0 {
            return Err(SchedulerError::InvalidArgument(format!(
                "retry delay must be positive, got {} minutes",
                self.retry_delay_minutes
            )));
        }
        if !(1..=self.mastered_threshold_days).contains(&self.learned_threshold_days)
            || self.mastered_threshold_days > self.max_interval_days
        {
            return Err(SchedulerError::InvalidArgument(format!(
                "thresholds must satisfy 1 <= learned ({}) <= mastered ({}) <= max ({})",
                self.learned_threshold_days, self.mastered_threshold_days, self.max_interval_days
            )));
        }
        for &(from, to) in &self.steps {
            if from < 0 || !(0..=self.max_interval_days).contains(&to) {
                return Err(SchedulerError::InvalidArgument(format!(
                    "step {from} -> {to} outside 0..={}",
                    self.max_interval_days
                )));
            }
        }
        Ok(())
    }

    /// Interval in days after answering a word whose current interval is
    /// `interval`.
    pub fn next_interval(&self, interval: i32, correct: bool) -> Result<i32> {
        self.validate()?;
        check_interval(interval, "prior interval")?;

        if !correct {
            return Ok(0);
        }

        let next = self
            .steps
            .iter()
            .find(|(from, _)| *from == interval)
            .map(|(_, to)| *to)
            .unwrap_or_else(|| interval.saturating_mul(2))
            .min(self.max_interval_days);

        Ok(next)
    }

    /// Compute the next interval and due instant.
    ///
    /// Day intervals are added on the local calendar of `now`, so the
    /// wall-clock time of day is kept. The returned instant is in UTC.
    pub fn compute_next_schedule<Tz: TimeZone>(
        &self,
        prior_interval: Option<i32>,
        correct: bool,
        now: &DateTime<Tz>,
    ) -> Result<NextSchedule> {
        let interval_days = self.next_interval(prior_interval.unwrap_or(0), correct)?;

        let next_review_at = if interval_days == 0 {
            now.clone()
                .checked_add_signed(Duration::minutes(self.retry_delay_minutes))
        } else {
            now.clone().checked_add_days(Days::new(interval_days as u64))
        }
        .ok_or_else(|| {
            SchedulerError::InvalidArgument(format!(
                "next review out of range for interval {interval_days}"
            ))
        })?;

        Ok(NextSchedule {
            next_review_at: next_review_at.with_timezone(&Utc),
            interval_days,
        })
    }

    /// Derive the status after an answer.
    ///
    /// `prior_status` is `None` on the first answer for a word; in that
    /// case a correct answer that leaves the interval at 0 keeps the word
    /// `New`.
    pub fn compute_new_status(
        &self,
        prior_status: Option<MasteryStatus>,
        new_interval_days: i32,
        correct: bool,
    ) -> Result<MasteryStatus> {
        self.validate()?;
        check_interval(new_interval_days, "new interval")?;

        let status = if correct {
            if new_interval_days >= self.mastered_threshold_days {
                MasteryStatus::Mastered
            } else if new_interval_days >= self.learned_threshold_days {
                MasteryStatus::Learned
            } else if prior_status.is_some() || new_interval_days >= 1 {
                MasteryStatus::Learning
            } else {
                MasteryStatus::New
            }
        } else {
            match prior_status {
                Some(prior) if prior.is_known() => MasteryStatus::Learning,
                _ => MasteryStatus::New,
            }
        };

        Ok(status)
    }

    /// Apply an answer to a word's progress and return the replacement
    /// state.
    ///
    /// `prior` is `None` when the learner has never answered the word.
    /// The caller decides whether the result is created or updated.
    pub fn apply_outcome<Tz: TimeZone>(
        &self,
        prior: Option<&ProgressState>,
        correct: bool,
        now: &DateTime<Tz>,
    ) -> Result<ProgressState> {
        if let Some(prior) = prior {
            check_prior(prior)?;
        }

        let schedule = self.compute_next_schedule(prior.map(|p| p.interval), correct, now)?;
        let status =
            self.compute_new_status(prior.map(|p| p.status), schedule.interval_days, correct)?;

        let review_count = prior
            .map_or(0, |p| p.review_count)
            .checked_add(1)
            .ok_or_else(|| SchedulerError::InvalidArgument("review count overflow".to_string()))?;
        let correct_count = prior
            .map_or(0, |p| p.correct_count)
            .checked_add(u32::from(correct))
            .ok_or_else(|| SchedulerError::InvalidArgument("correct count overflow".to_string()))?;

        // Re-stamped on every crossing, not only the first one.
        let date_learned = if correct && status.is_known() {
            Some(now.date_naive())
        } else {
            prior.and_then(|p| p.date_learned)
        };

        Ok(ProgressState {
            status,
            interval: schedule.interval_days,
            next_review: Some(schedule.next_review_at),
            review_count,
            correct_count,
            date_learned,
        })
    }
}

fn check_interval(interval: i32, what: &str) -> Result<()> {
    if interval < 0 {
        return Err(SchedulerError::InvalidArgument(format!(
            "{what} must be non-negative, got {interval}"
        )));
    }
    Ok(())
}

fn check_prior(prior: &ProgressState) -> Result<()> {
    check_interval(prior.interval, "prior interval")?;
    if prior.correct_count > prior.review_count {
        return Err(SchedulerError::InvalidArgument(format!(
            "correct count {} exceeds review count {}",
            prior.correct_count, prior.review_count
        )));
    }
    Ok(())
}

/// [`ReviewScheduler::compute_next_schedule`] with default thresholds.
pub fn compute_next_schedule<Tz: TimeZone>(
    prior_interval: Option<i32>,
    correct: bool,
    now: &DateTime<Tz>,
) -> Result<NextSchedule> {
    ReviewScheduler::default().compute_next_schedule(prior_interval, correct, now)
}

/// [`ReviewScheduler::compute_new_status`] with default thresholds.
pub fn compute_new_status(
    prior_status: Option<MasteryStatus>,
    new_interval_days: i32,
    correct: bool,
) -> Result<MasteryStatus> {
    ReviewScheduler::default().compute_new_status(prior_status, new_interval_days, correct)
}

/// [`ReviewScheduler::apply_outcome`] with default thresholds.
pub fn apply_outcome<Tz: TimeZone>(
    prior: Option<&ProgressState>,
    correct: bool,
    now: &DateTime<Tz>,
) -> Result<ProgressState> {
    ReviewScheduler::default().apply_outcome(prior, correct, now)
}
