//! # Recall Scheduler
//!
//! Fixed-table spaced repetition. The n-th review of a document pushes its
//! next review date out by `REVIEW_INTERVALS_DAYS[min(n, 5)]` days:
//!
//! ```text
//! review #   1   2   3   4   5   6+
//! interval   1d  2d  4d  7d  15d 30d
//! ```
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use recall_scheduler::next_review_date;
//!
//! let now = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
//! assert_eq!(next_review_date(0, now), Utc.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).unwrap());
//! ```

use chrono::{DateTime, Duration, Utc};
use recall_protocol::ReviewRecord;
use thiserror::Error;

/// Days until the next review, indexed by how many reviews happened before.
pub const REVIEW_INTERVALS_DAYS: [i64; 6] = [1, 2, 4, 7, 15, 30];

pub type Result<T> = std::result::Result<T, SchedulerError>;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("Invalid review count: {0} (must be a non-negative integer)")]
    NegativeReviewCount(i64),
}

/// Interval applied after a review when `review_count` reviews preceded it.
#[must_use]
pub fn interval_days(review_count: u32) -> i64 {
    let index = (review_count as usize).min(REVIEW_INTERVALS_DAYS.len() - 1);
    REVIEW_INTERVALS_DAYS[index]
}

#[must_use]
pub fn next_review_date(review_count: u32, now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::days(interval_days(review_count))
}

/// Same as [`next_review_date`] for counts coming from untyped input.
pub fn try_next_review_date(review_count: i64, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    if review_count < 0 {
        return Err(SchedulerError::NegativeReviewCount(review_count));
    }
    // Anything past the table saturates, so clamping huge counts is lossless.
    let count = u32::try_from(review_count).unwrap_or(u32::MAX);
    Ok(next_review_date(count, now))
}

/// State after reviewing a document at `now`.
///
/// The interval is chosen from the count *before* this review, so a first
/// review schedules the next one a day later.
#[must_use]
pub fn mark_reviewed(previous: Option<&ReviewRecord>, now: DateTime<Utc>) -> ReviewRecord {
    let review_count = previous.map_or(0, |record| record.review_count);
    ReviewRecord {
        review_count: review_count.saturating_add(1),
        last_reviewed: Some(now),
        next_review_date: Some(next_review_date(review_count, now)),
    }
}
