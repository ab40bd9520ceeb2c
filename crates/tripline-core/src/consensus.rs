//! Consensus window scoring.
//!
//! Slides a window of the trip's target duration across the candidate range,
//! scores every position against all participants' normalized availability,
//! and returns the top non-overlapping candidates. The output is derived on
//! every call and never persisted, so it always reflects the latest
//! submissions and needs no invalidation.

use std::cmp::Ordering;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::availability::{DayStatus, NormalizedAvailability};
use crate::date_range::DateRange;
use crate::trip::Trip;

/// Maximum number of candidate windows returned per computation.
pub const MAX_WINDOWS: usize = 3;

/// Per-status day weights, shared between the window scorer and the
/// window-proposal ranking so both signals stay consistent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub available: i64,
    pub maybe: i64,
    pub unavailable: i64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            available: 3,
            maybe: 1,
            unavailable: -2,
        }
    }
}

impl ScoreWeights {
    /// Weight of one participant-day. No data contributes nothing.
    pub fn weight(&self, status: Option<DayStatus>) -> i64 {
        match status {
            Some(DayStatus::Available) => self.available,
            Some(DayStatus::Maybe) => self.maybe,
            Some(DayStatus::Unavailable) => self.unavailable,
            None => 0,
        }
    }
}

/// A scored candidate date window of the trip's target duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateWindow {
    /// Stable key `"{start}_{end}"`
    pub option_key: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Raw score normalized to [0,1] against the group's theoretical maximum
    pub score: f64,
    /// Raw weighted sum over all window days and participants
    pub total_score: i64,
    /// Fraction of window days with at least one participant record
    pub coverage: f64,
}

impl CandidateWindow {
    /// The window's date range.
    pub fn range(&self) -> DateRange {
        DateRange {
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

/// Score every possible window position and select the top non-overlapping
/// candidates.
///
/// Ranking is by normalized score descending, ties broken by earlier start
/// date. Selection is greedy: the best window, then the next-best whose
/// range does not overlap any already-selected one, up to [`MAX_WINDOWS`].
/// Deterministic given identical input.
///
/// Degenerate inputs (no participants, zero duration, duration longer than
/// the range) yield an empty result rather than an error.
pub fn score_windows(
    availability: &[NormalizedAvailability],
    range: &DateRange,
    duration_days: u32,
    weights: &ScoreWeights,
) -> Vec<CandidateWindow> {
    if availability.is_empty() || duration_days == 0 {
        return Vec::new();
    }
    let duration = i64::from(duration_days);
    if duration > range.num_days() {
        return Vec::new();
    }

    let max_raw = availability.len() as i64 * duration * weights.available;

    let mut candidates = Vec::new();
    for start in range.days() {
        let end = start + Duration::days(duration - 1);
        if end > range.end_date {
            break;
        }
        let window = DateRange {
            start_date: start,
            end_date: end,
        };

        let mut raw = 0i64;
        let mut covered = 0i64;
        for day in window.days() {
            let mut any_record = false;
            for participant in availability {
                let status = participant.status(day);
                raw += weights.weight(status);
                any_record |= status.is_some();
            }
            if any_record {
                covered += 1;
            }
        }

        let score = if max_raw > 0 {
            raw.max(0) as f64 / max_raw as f64
        } else {
            0.0
        };
        candidates.push(CandidateWindow {
            option_key: window.option_key(),
            start_date: start,
            end_date: end,
            score,
            total_score: raw,
            coverage: covered as f64 / duration as f64,
        });
    }

    candidates.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.start_date.cmp(&b.start_date))
    });

    let mut selected: Vec<CandidateWindow> = Vec::new();
    for candidate in candidates {
        if selected.len() == MAX_WINDOWS {
            break;
        }
        let overlaps = selected
            .iter()
            .any(|s| s.range().overlaps(&candidate.range()));
        if !overlaps {
            selected.push(candidate);
        }
    }
    selected
}

/// Convenience wrapper pulling range and duration from the trip, with the
/// default weights.
pub fn windows_for_trip(
    availability: &[NormalizedAvailability],
    trip: &Trip,
) -> Vec<CandidateWindow> {
    score_windows(
        availability,
        &trip.date_range,
        trip.target_duration_days,
        &ScoreWeights::default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::availability::{normalize, AvailabilitySubmission, DayEntry, WeeklyBlock};
    use crate::trip::UserId;
    use chrono::Utc;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn june() -> DateRange {
        DateRange::new(d("2026-06-01"), d("2026-06-30")).unwrap()
    }

    fn broad(status: DayStatus, range: &DateRange) -> NormalizedAvailability {
        let sub = AvailabilitySubmission {
            user_id: UserId::new(),
            broad_status: Some(status),
            weekly_blocks: vec![],
            days: vec![],
            submitted_at: Utc::now(),
        };
        normalize(&sub, range).unwrap()
    }

    #[test]
    fn test_small_group_consensus_scenario() {
        // 6 travelers, 4 of whom submit broad availability over June.
        let range = june();
        let availability: Vec<_> = (0..4).map(|_| broad(DayStatus::Available, &range)).collect();

        let windows = score_windows(&availability, &range, 3, &ScoreWeights::default());
        assert!(!windows.is_empty());

        let top = &windows[0];
        assert!(top.coverage >= 0.5);
        // All positions tie, so the earliest 3-day window wins.
        assert_eq!(top.start_date, d("2026-06-01"));
        assert_eq!(top.end_date, d("2026-06-03"));
        assert_eq!(top.range().num_days(), 3);
        assert!(range.contains_range(&top.range()));
        // 4 fully-available participants hit the theoretical maximum.
        assert_eq!(top.score, 1.0);
        assert_eq!(top.coverage, 1.0);
    }

    #[test]
    fn test_deterministic_given_identical_input() {
        let range = june();
        let availability = vec![
            broad(DayStatus::Available, &range),
            broad(DayStatus::Maybe, &range),
        ];
        let first = score_windows(&availability, &range, 4, &ScoreWeights::default());
        let second = score_windows(&availability, &range, 4, &ScoreWeights::default());
        assert_eq!(first, second);
    }

    #[test]
    fn test_selected_windows_never_overlap() {
        let range = june();
        let availability = vec![broad(DayStatus::Available, &range)];
        let windows = score_windows(&availability, &range, 5, &ScoreWeights::default());
        assert!(windows.len() >= 2);
        assert!(windows.len() <= MAX_WINDOWS);
        for (i, a) in windows.iter().enumerate() {
            for b in windows.iter().skip(i + 1) {
                assert!(!a.range().overlaps(&b.range()), "{} overlaps {}", a.option_key, b.option_key);
            }
        }
    }

    #[test]
    fn test_unavailable_days_push_the_window_later() {
        let range = june();
        let busy_early = {
            let sub = AvailabilitySubmission {
                user_id: UserId::new(),
                broad_status: Some(DayStatus::Available),
                weekly_blocks: vec![WeeklyBlock {
                    start_date: d("2026-06-01"),
                    end_date: d("2026-06-07"),
                    status: DayStatus::Unavailable,
                }],
                days: vec![],
                submitted_at: Utc::now(),
            };
            normalize(&sub, &range).unwrap()
        };
        let availability = vec![busy_early, broad(DayStatus::Available, &range)];

        let windows = score_windows(&availability, &range, 3, &ScoreWeights::default());
        let top = &windows[0];
        assert!(top.start_date >= d("2026-06-08"), "top starts {}", top.start_date);
    }

    #[test]
    fn test_coverage_counts_days_with_any_record() {
        let range = DateRange::new(d("2026-06-01"), d("2026-06-04")).unwrap();
        let sub = AvailabilitySubmission {
            user_id: UserId::new(),
            broad_status: None,
            weekly_blocks: vec![],
            days: vec![DayEntry {
                day: d("2026-06-01"),
                status: DayStatus::Available,
            }],
            submitted_at: Utc::now(),
        };
        let availability = vec![normalize(&sub, &range).unwrap()];

        let windows = score_windows(&availability, &range, 4, &ScoreWeights::default());
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].coverage, 0.25);
    }

    #[test]
    fn test_degenerate_inputs_yield_empty() {
        let range = june();
        let availability = vec![broad(DayStatus::Available, &range)];
        assert!(score_windows(&[], &range, 3, &ScoreWeights::default()).is_empty());
        assert!(score_windows(&availability, &range, 0, &ScoreWeights::default()).is_empty());
        assert!(score_windows(&availability, &range, 31, &ScoreWeights::default()).is_empty());
    }

    #[test]
    fn test_negative_raw_scores_clamp_to_zero() {
        let range = DateRange::new(d("2026-06-01"), d("2026-06-05")).unwrap();
        let availability = vec![broad(DayStatus::Unavailable, &range)];
        let windows = score_windows(&availability, &range, 3, &ScoreWeights::default());
        assert!(!windows.is_empty());
        assert_eq!(windows[0].score, 0.0);
        assert!(windows[0].total_score < 0);
    }

    #[test]
    fn test_serialized_field_names_match_consumer_contract() {
        let range = june();
        let availability = vec![broad(DayStatus::Available, &range)];
        let windows = score_windows(&availability, &range, 3, &ScoreWeights::default());
        let json = serde_json::to_value(&windows[0]).unwrap();
        for key in ["optionKey", "startDate", "endDate", "score", "totalScore", "coverage"] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        assert_eq!(json["optionKey"], "2026-06-01_2026-06-03");
    }
}
