//! Due-word selection for a review batch.

use chrono::{DateTime, Utc};

/// A word is due when it has never been scheduled or its next review
/// instant has been reached.
pub fn is_due(next_review: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    match next_review {
        Some(at) => at <= now,
        None => true,
    }
}

/// Keep the due candidates of a batch, in their original order.
///
/// When nothing in the batch is due the whole batch is returned, so a
/// session always has something to show. `limit` caps the result.
pub fn select_due<T, F>(
    candidates: Vec<T>,
    now: DateTime<Utc>,
    limit: Option<usize>,
    next_review: F,
) -> Vec<T>
where
    F: Fn(&T) -> Option<DateTime<Utc>>,
{
    let any_due = candidates.iter().any(|c| is_due(next_review(c), now));
    let limit = limit.unwrap_or(usize::MAX);

    if !any_due {
        return candidates.into_iter().take(limit).collect();
    }

    candidates
        .into_iter()
        .filter(|c| is_due(next_review(c), now))
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn unscheduled_word_is_due() {
        assert!(is_due(None, now()));
    }

    #[test]
    fn due_exactly_at_next_review() {
        assert!(is_due(Some(now()), now()));
        assert!(!is_due(Some(now() + Duration::seconds(1)), now()));
    }

    #[test]
    fn keeps_only_due_words_in_order() {
        let batch = vec![
            (1, Some(now() - Duration::days(1))),
            (2, Some(now() + Duration::days(3))),
            (3, None),
            (4, Some(now() - Duration::minutes(5))),
        ];
        let due: Vec<i64> = select_due(batch, now(), None, |w| w.1)
            .into_iter()
            .map(|w| w.0)
            .collect();
        assert_eq!(due, vec![1, 3, 4]);
    }

    #[test]
    fn falls_back_to_whole_batch_when_nothing_due() {
        let batch = vec![
            (1, Some(now() + Duration::days(1))),
            (2, Some(now() + Duration::days(7))),
        ];
        let picked: Vec<i64> = select_due(batch, now(), None, |w| w.1)
            .into_iter()
            .map(|w| w.0)
            .collect();
        assert_eq!(picked, vec![1, 2]);
    }

    #[test]
    fn limit_caps_selection() {
        let batch: Vec<(i64, Option<DateTime<Utc>>)> = (0..10).map(|i| (i, None)).collect();
        assert_eq!(select_due(batch, now(), Some(3), |w| w.1).len(), 3);
    }

    #[test]
    fn empty_batch_stays_empty() {
        let batch: Vec<(i64, Option<DateTime<Utc>>)> = Vec::new();
        assert!(select_due(batch, now(), None, |w| w.1).is_empty());
    }
}
