//! Progress validation and aggregation.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;
use vocab_core::{accuracy, select_due};

use crate::db::{progress, Database};
use crate::error::{ApiError, Result};
use crate::models::*;

/// Check a state written directly by a client. `max_interval_days` is the
/// scheduler's cap.
pub fn validate_state(state: &ProgressState, max_interval_days: i32) -> Result<()> {
    if !(0..=max_interval_days).contains(&state.interval) {
        return Err(ApiError::BadRequest(format!(
            "interval must be between 0 and {max_interval_days}, got {}",
            state.interval
        )));
    }
    if state.correct_count > state.review_count {
        return Err(ApiError::BadRequest(format!(
            "correct_count {} exceeds review_count {}",
            state.correct_count, state.review_count
        )));
    }
    Ok(())
}

/// Apply a partial update to a progress record.
///
/// The row stays locked from read to write so a concurrent review of the
/// same word is not overwritten with stale counters.
pub async fn update_progress(
    db: &Database,
    device_id: Uuid,
    progress_id: i64,
    request: &UpdateWordProgressRequest,
    max_interval_days: i32,
) -> Result<DbWordProgress> {
    let mut tx = db.begin().await?;

    let current = progress::get(&mut *tx, device_id, progress_id, true)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Progress {} not found", progress_id)))?;

    let updated = request.apply_to(&current.to_core_state());
    validate_state(&updated, max_interval_days)?;

    let row = progress::write_state(&mut *tx, device_id, progress_id, &updated)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Progress {} not found", progress_id)))?;

    tx.commit().await?;

    Ok(row)
}

/// Aggregate status count rows into the words stats response.
pub fn build_words_stats(rows: &[StatusCountRow]) -> WordsStatsResponse {
    let mut per_language: BTreeMap<i64, (StatusCounts, u64, u64)> = BTreeMap::new();

    for row in rows {
        let Some(status) = MasteryStatus::from_str(&row.status) else {
            tracing::warn!("Skipping unknown progress status: {}", row.status);
            continue;
        };
        let entry = per_language.entry(row.target_language_id).or_default();
        entry.0.add(status, row.words.max(0) as u64);
        entry.1 += row.reviews.max(0) as u64;
        entry.2 += row.correct.max(0) as u64;
    }

    let mut totals = StatusCounts::default();
    let mut reviews = 0;
    let mut correct = 0;
    let mut language_breakdown = Vec::with_capacity(per_language.len());

    for (target_language_id, (counts, lang_reviews, lang_correct)) in per_language {
        totals.merge(&counts);
        reviews += lang_reviews;
        correct += lang_correct;
        language_breakdown.push(LanguageBreakdown {
            target_language_id,
            counts,
            accuracy: accuracy(lang_correct, lang_reviews),
        });
    }

    WordsStatsResponse {
        words_new: totals.new,
        words_learning: totals.learning,
        words_learned: totals.learned,
        words_mastered: totals.mastered,
        total_words: totals.total,
        accuracy: accuracy(correct, reviews),
        language_breakdown,
    }
}

/// Pick the words to review from a candidate batch.
///
/// Candidates without a progress record are due. When none is due the
/// whole batch is returned.
pub fn build_review_queue(
    word_ids: Vec<i64>,
    progress: &[DbWordProgress],
    now: DateTime<Utc>,
    limit: Option<usize>,
) -> ReviewQueueResponse {
    let next_review: BTreeMap<i64, Option<DateTime<Utc>>> = progress
        .iter()
        .map(|p| (p.word_id, p.next_review))
        .collect();
    let lookup = |id: &i64| next_review.get(id).copied().flatten();

    let due_count = word_ids
        .iter()
        .filter(|id| vocab_core::is_due(lookup(*id), now))
        .count();

    ReviewQueueResponse {
        word_ids: select_due(word_ids, now, limit, lookup),
        due_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn row(language: i64, status: &str, words: i64, reviews: i64, correct: i64) -> StatusCountRow {
        StatusCountRow {
            target_language_id: language,
            status: status.to_string(),
            words,
            reviews,
            correct,
        }
    }

    fn progress(word_id: i64, next_review: Option<DateTime<Utc>>) -> DbWordProgress {
        DbWordProgress {
            id: word_id,
            device_id: Uuid::nil(),
            word_id,
            target_language_id: 1,
            status: "learning".to_string(),
            interval_days: 1,
            next_review,
            review_count: 1,
            correct_count: 1,
            date_learned: None,
            created_at: now(),
            updated_at: now(),
        }
    }

    #[test]
    fn test_validate_accepts_scheduler_range() {
        let state = ProgressState {
            interval: 90,
            review_count: 3,
            correct_count: 3,
            ..Default::default()
        };
        assert!(validate_state(&state, 90).is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_interval() {
        for interval in [-1, 91] {
            let state = ProgressState {
                interval,
                ..Default::default()
            };
            assert!(matches!(validate_state(&state, 90), Err(ApiError::BadRequest(_))));
        }
    }

    #[test]
    fn test_validate_follows_scheduler_cap() {
        let scheduler = vocab_core::ReviewScheduler {
            max_interval_days: 60,
            ..Default::default()
        };
        let state = ProgressState {
            interval: 75,
            ..Default::default()
        };
        assert!(validate_state(&state, 90).is_ok());
        assert!(matches!(
            validate_state(&state, scheduler.max_interval_days),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn test_validate_rejects_more_correct_than_reviews() {
        let state = ProgressState {
            review_count: 1,
            correct_count: 2,
            ..Default::default()
        };
        assert!(matches!(validate_state(&state, 90), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_words_stats_totals_and_breakdown() {
        let rows = vec![
            row(1, "new", 2, 2, 0),
            row(1, "learned", 3, 12, 9),
            row(2, "mastered", 1, 8, 8),
            row(2, "bogus", 5, 5, 5),
        ];
        let stats = build_words_stats(&rows);

        assert_eq!(stats.words_new, 2);
        assert_eq!(stats.words_learned, 3);
        assert_eq!(stats.words_mastered, 1);
        assert_eq!(stats.total_words, 6);
        assert!((stats.accuracy - 77.27).abs() < 0.01);
        assert_eq!(stats.language_breakdown.len(), 2);
        assert_eq!(stats.language_breakdown[0].target_language_id, 1);
        assert_eq!(stats.language_breakdown[0].counts.total, 5);
        assert_eq!(stats.language_breakdown[1].accuracy, 100.0);
    }

    #[test]
    fn test_words_stats_empty() {
        let stats = build_words_stats(&[]);
        assert_eq!(stats.total_words, 0);
        assert_eq!(stats.accuracy, 0.0);
        assert!(stats.language_breakdown.is_empty());
    }

    #[test]
    fn test_review_queue_keeps_due_and_untracked_words() {
        let tracked = vec![
            progress(1, Some(now() - Duration::minutes(5))),
            progress(2, Some(now() + Duration::days(3))),
        ];
        let queue = build_review_queue(vec![1, 2, 3], &tracked, now(), None);
        assert_eq!(queue.word_ids, vec![1, 3]);
        assert_eq!(queue.due_count, 2);
    }

    #[test]
    fn test_review_queue_falls_back_when_nothing_due() {
        let tracked = vec![
            progress(1, Some(now() + Duration::days(1))),
            progress(2, Some(now() + Duration::days(3))),
        ];
        let queue = build_review_queue(vec![1, 2], &tracked, now(), Some(1));
        assert_eq!(queue.word_ids, vec![1]);
        assert_eq!(queue.due_count, 0);
    }
}
