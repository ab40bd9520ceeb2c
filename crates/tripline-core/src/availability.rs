//! Availability normalization.
//!
//! Participants express availability in three granularities: a single broad
//! status for the whole candidate range, weekly blocks over sub-ranges, and
//! explicit per-day entries. Normalization collapses one participant's
//! submission into a canonical per-day map with precedence
//! per-day > weekly > broad, and "no data" as the implicit default.
//!
//! A submission replaces, never merges with, the participant's previous one:
//! availability reflects current intent, not history.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::date_range::DateRange;
use crate::error::ValidationError;
use crate::trip::UserId;

/// Availability status for a day (or a broader span).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayStatus {
    Available,
    Maybe,
    Unavailable,
}

/// A status applied to a contiguous sub-range of days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyBlock {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: DayStatus,
}

/// An explicit per-day status entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayEntry {
    pub day: NaiveDate,
    pub status: DayStatus,
}

/// One participant's raw availability input for a trip.
///
/// Exactly one submission is live per (trip, user) pair; a resubmission
/// fully replaces the previous one (see [`latest_per_user`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilitySubmission {
    pub user_id: UserId,
    /// Status applied to the entire candidate range, lowest precedence
    pub broad_status: Option<DayStatus>,
    /// Blocks overlaid in vector order; a later block wins on overlap
    #[serde(default)]
    pub weekly_blocks: Vec<WeeklyBlock>,
    /// Explicit per-day entries, highest precedence
    #[serde(default)]
    pub days: Vec<DayEntry>,
    pub submitted_at: DateTime<Utc>,
}

impl AvailabilitySubmission {
    /// Whether none of the three channels is populated.
    pub fn is_empty(&self) -> bool {
        self.broad_status.is_none() && self.weekly_blocks.is_empty() && self.days.is_empty()
    }
}

/// Derived per-day statuses for one participant over the candidate range.
///
/// Covers every day of the range; `None` means the participant left no
/// record for that day. Not stored anywhere: recomputed from the live
/// submission on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedAvailability {
    pub user_id: UserId,
    pub days: BTreeMap<NaiveDate, Option<DayStatus>>,
}

impl NormalizedAvailability {
    /// Status for a day, `None` when the day has no record (or lies outside
    /// the candidate range).
    pub fn status(&self, day: NaiveDate) -> Option<DayStatus> {
        self.days.get(&day).copied().flatten()
    }

    /// Whether the participant left any record for the day.
    pub fn has_record(&self, day: NaiveDate) -> bool {
        self.status(day).is_some()
    }
}

/// Normalize one submission over the trip's candidate range.
///
/// Precedence per day: explicit per-day entry > weekly block > broad status.
/// Overlapping weekly blocks resolve by vector order, later block wins.
/// Validation happens up front; an error leaves nothing applied.
pub fn normalize(
    submission: &AvailabilitySubmission,
    range: &DateRange,
) -> Result<NormalizedAvailability, ValidationError> {
    if submission.is_empty() {
        return Err(ValidationError::EmptySubmission);
    }

    let mut block_ranges = Vec::with_capacity(submission.weekly_blocks.len());
    for block in &submission.weekly_blocks {
        let block_range = DateRange::new(block.start_date, block.end_date)?;
        if !range.contains_range(&block_range) {
            let day = if range.contains(block.start_date) {
                block.end_date
            } else {
                block.start_date
            };
            return Err(ValidationError::DayOutOfRange {
                day,
                start: range.start_date,
                end: range.end_date,
            });
        }
        block_ranges.push((block_range, block.status));
    }
    for entry in &submission.days {
        if !range.contains(entry.day) {
            return Err(ValidationError::DayOutOfRange {
                day: entry.day,
                start: range.start_date,
                end: range.end_date,
            });
        }
    }

    let mut days: BTreeMap<NaiveDate, Option<DayStatus>> =
        range.days().map(|d| (d, submission.broad_status)).collect();
    for (block_range, status) in &block_ranges {
        for day in block_range.days() {
            days.insert(day, Some(*status));
        }
    }
    for entry in &submission.days {
        days.insert(entry.day, Some(entry.status));
    }

    Ok(NormalizedAvailability {
        user_id: submission.user_id,
        days,
    })
}

/// Collapse a list of submissions to the live one per user.
///
/// Last write wins: a strictly newer `submitted_at` replaces, and on equal
/// timestamps the later entry in the input wins.
pub fn latest_per_user(
    submissions: &[AvailabilitySubmission],
) -> Vec<&AvailabilitySubmission> {
    let mut latest: BTreeMap<UserId, &AvailabilitySubmission> = BTreeMap::new();
    for submission in submissions {
        match latest.get(&submission.user_id) {
            Some(existing) if existing.submitted_at > submission.submitted_at => {}
            _ => {
                latest.insert(submission.user_id, submission);
            }
        }
    }
    latest.into_values().collect()
}

/// Normalize the live submission of every participant.
pub fn normalize_all(
    submissions: &[AvailabilitySubmission],
    range: &DateRange,
) -> Result<Vec<NormalizedAvailability>, ValidationError> {
    latest_per_user(submissions)
        .into_iter()
        .map(|s| normalize(s, range))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn range() -> DateRange {
        DateRange::new(d("2026-06-01"), d("2026-06-14")).unwrap()
    }

    fn submission(user_id: UserId) -> AvailabilitySubmission {
        AvailabilitySubmission {
            user_id,
            broad_status: Some(DayStatus::Maybe),
            weekly_blocks: vec![WeeklyBlock {
                start_date: d("2026-06-03"),
                end_date: d("2026-06-07"),
                status: DayStatus::Available,
            }],
            days: vec![DayEntry {
                day: d("2026-06-05"),
                status: DayStatus::Unavailable,
            }],
            submitted_at: Utc::now(),
        }
    }

    #[test]
    fn test_precedence_per_day_over_weekly_over_broad() {
        let normalized = normalize(&submission(UserId::new()), &range()).unwrap();

        // Broad only
        assert_eq!(normalized.status(d("2026-06-01")), Some(DayStatus::Maybe));
        // Weekly block overrides broad
        assert_eq!(
            normalized.status(d("2026-06-04")),
            Some(DayStatus::Available)
        );
        // Per-day entry overrides the block it falls inside
        assert_eq!(
            normalized.status(d("2026-06-05")),
            Some(DayStatus::Unavailable)
        );
        // Every day of the range is present in the map
        assert_eq!(normalized.days.len() as i64, range().num_days());
    }

    #[test]
    fn test_later_block_wins_on_overlap() {
        let sub = AvailabilitySubmission {
            user_id: UserId::new(),
            broad_status: None,
            weekly_blocks: vec![
                WeeklyBlock {
                    start_date: d("2026-06-01"),
                    end_date: d("2026-06-10"),
                    status: DayStatus::Available,
                },
                WeeklyBlock {
                    start_date: d("2026-06-05"),
                    end_date: d("2026-06-07"),
                    status: DayStatus::Unavailable,
                },
            ],
            days: vec![],
            submitted_at: Utc::now(),
        };
        let normalized = normalize(&sub, &range()).unwrap();
        assert_eq!(
            normalized.status(d("2026-06-04")),
            Some(DayStatus::Available)
        );
        assert_eq!(
            normalized.status(d("2026-06-06")),
            Some(DayStatus::Unavailable)
        );
    }

    #[test]
    fn test_no_data_days_have_no_record() {
        let sub = AvailabilitySubmission {
            user_id: UserId::new(),
            broad_status: None,
            weekly_blocks: vec![],
            days: vec![DayEntry {
                day: d("2026-06-05"),
                status: DayStatus::Available,
            }],
            submitted_at: Utc::now(),
        };
        let normalized = normalize(&sub, &range()).unwrap();
        assert!(normalized.has_record(d("2026-06-05")));
        assert!(!normalized.has_record(d("2026-06-06")));
        assert_eq!(normalized.status(d("2026-06-06")), None);
    }

    #[test]
    fn test_rejects_empty_submission() {
        let sub = AvailabilitySubmission {
            user_id: UserId::new(),
            broad_status: None,
            weekly_blocks: vec![],
            days: vec![],
            submitted_at: Utc::now(),
        };
        assert_eq!(
            normalize(&sub, &range()).unwrap_err(),
            ValidationError::EmptySubmission
        );
    }

    #[test]
    fn test_rejects_out_of_range_day() {
        let mut sub = submission(UserId::new());
        sub.days.push(DayEntry {
            day: d("2026-07-01"),
            status: DayStatus::Available,
        });
        assert!(matches!(
            normalize(&sub, &range()).unwrap_err(),
            ValidationError::DayOutOfRange { .. }
        ));
    }

    #[test]
    fn test_rejects_malformed_block() {
        let mut sub = submission(UserId::new());
        sub.weekly_blocks.push(WeeklyBlock {
            start_date: d("2026-06-10"),
            end_date: d("2026-06-08"),
            status: DayStatus::Available,
        });
        assert!(matches!(
            normalize(&sub, &range()).unwrap_err(),
            ValidationError::InvalidDateRange { .. }
        ));
    }

    #[test]
    fn test_rejects_block_leaking_past_range() {
        let mut sub = submission(UserId::new());
        sub.weekly_blocks.push(WeeklyBlock {
            start_date: d("2026-06-10"),
            end_date: d("2026-06-20"),
            status: DayStatus::Available,
        });
        assert!(matches!(
            normalize(&sub, &range()).unwrap_err(),
            ValidationError::DayOutOfRange { day, .. } if day == d("2026-06-20")
        ));
    }

    #[test]
    fn test_latest_per_user_replaces_older_submission() {
        let user = UserId::new();
        let mut old = submission(user);
        old.broad_status = Some(DayStatus::Unavailable);
        old.submitted_at = Utc::now() - chrono::Duration::hours(2);
        let new = submission(user);

        let submissions = [old, new];
        let live = latest_per_user(&submissions);
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].broad_status, Some(DayStatus::Maybe));
    }

    #[test]
    fn test_normalize_all_one_entry_per_user() {
        let a = submission(UserId::new());
        let b = submission(UserId::new());
        let again = AvailabilitySubmission {
            submitted_at: a.submitted_at + chrono::Duration::minutes(5),
            ..a.clone()
        };
        let normalized = normalize_all(&[a, b, again], &range()).unwrap();
        assert_eq!(normalized.len(), 2);
    }
}
