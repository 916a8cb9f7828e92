//! Day-granularity freshness filtering.
//!
//! Applied twice per candidate: cheaply before full-page extraction when the
//! feed metadata carries a date, and again after extraction using the more
//! authoritative date recovered from the page itself.

use chrono::{DateTime, Utc};

/// Whether an article published at `published_at` is within the freshness
/// window of `threshold_days` days before `now`.
///
/// Fail-open: an absent date qualifies as recent, so extraction proceeds
/// rather than discarding on ambiguous metadata.
pub fn is_recent(
    published_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    threshold_days: i64,
) -> bool {
    match published_at {
        None => true,
        Some(ts) => (now - ts).num_days() <= threshold_days,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_three_days_old_is_excluded() {
        let now = Utc::now();
        assert!(!is_recent(Some(now - Duration::days(3)), now, 2));
    }

    #[test]
    fn test_one_day_old_is_included() {
        let now = Utc::now();
        assert!(is_recent(Some(now - Duration::days(1)), now, 2));
    }

    #[test]
    fn test_exactly_at_threshold_is_included() {
        let now = Utc::now();
        assert!(is_recent(Some(now - Duration::days(2)), now, 2));
    }

    #[test]
    fn test_missing_date_is_included() {
        assert!(is_recent(None, Utc::now(), 2));
    }

    #[test]
    fn test_future_date_is_included() {
        let now = Utc::now();
        assert!(is_recent(Some(now + Duration::days(1)), now, 2));
    }
}
