//! Trip record and lifecycle status.
//!
//! The status is a tagged union per lifecycle stage so illegal states are
//! unrepresentable: `Locked` always carries both dates, and "locked but
//! missing dates" cannot be constructed.
//!
//! Scheduling lifecycle:
//!
//!   PROPOSED ──> SCHEDULING ──> VOTING ──> LOCKED ──> COMPLETED
//!        \             \           \
//!         +─────────────+───────────+────> CANCELED
//!
//! Hosted trips skip the funnel entirely: their dates are fixed at creation
//! and they are constructed already locked.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::date_range::DateRange;
use crate::error::{ConflictError, ValidationError};
use crate::gate::DateProposal;

/// Identifier of a traveler.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a fresh id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for UserId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// How the trip's dates are decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TripKind {
    /// Dates are converged collaboratively through the scheduling funnel.
    Collaborative,
    /// Dates are fixed by the host at creation; the funnel is bypassed.
    Hosted,
}

/// Lifecycle stage of a trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum TripStatus {
    /// Freshly created, gathering interest.
    Proposed,
    /// Participants are submitting availability and window ideas.
    Scheduling,
    /// A concrete date proposal is on the table.
    Voting,
    /// Dates are final. Terminal for scheduling purposes.
    Locked {
        start_date: NaiveDate,
        end_date: NaiveDate,
    },
    /// The trip happened.
    Completed,
    /// The trip was called off.
    Canceled,
}

impl TripStatus {
    /// Lowercase status name, for messages and denial reasons.
    pub fn name(&self) -> &'static str {
        match self {
            TripStatus::Proposed => "proposed",
            TripStatus::Scheduling => "scheduling",
            TripStatus::Voting => "voting",
            TripStatus::Locked { .. } => "locked",
            TripStatus::Completed => "completed",
            TripStatus::Canceled => "canceled",
        }
    }
}

/// A group outing whose dates are being converged.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    /// Unique identifier
    pub id: Uuid,
    /// Collaborative or hosted
    pub kind: TripKind,
    /// Lifecycle stage
    pub status: TripStatus,
    /// Candidate date range inside which all scheduling happens
    pub date_range: DateRange,
    /// Target trip duration in days, used by the consensus window scorer
    pub target_duration_days: u32,
    /// The traveler who may formalize and lock dates
    pub leader_id: UserId,
    /// The single active concrete date proposal, if any
    pub date_proposal: Option<DateProposal>,
}

impl Trip {
    /// Create a collaborative trip at the start of its scheduling funnel.
    pub fn collaborative(
        leader_id: UserId,
        date_range: DateRange,
        target_duration_days: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: TripKind::Collaborative,
            status: TripStatus::Proposed,
            date_range,
            target_duration_days,
            leader_id,
            date_proposal: None,
        }
    }

    /// Create a hosted trip. Its dates are fixed here and it never enters
    /// the scheduling funnel.
    pub fn hosted(
        leader_id: UserId,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Self, ValidationError> {
        let date_range = DateRange::new(start_date, end_date)?;
        Ok(Self {
            id: Uuid::new_v4(),
            kind: TripKind::Hosted,
            status: TripStatus::Locked {
                start_date,
                end_date,
            },
            date_range,
            target_duration_days: date_range.num_days() as u32,
            leader_id,
            date_proposal: None,
        })
    }

    /// Whether dates are final.
    pub fn is_locked(&self) -> bool {
        matches!(self.status, TripStatus::Locked { .. })
    }

    /// The locked dates, once final.
    pub fn locked_dates(&self) -> Option<DateRange> {
        match self.status {
            TripStatus::Locked {
                start_date,
                end_date,
            } => Some(DateRange {
                start_date,
                end_date,
            }),
            _ => None,
        }
    }

    /// Whether scheduling mutations are still accepted at all. False for
    /// hosted trips and once the trip is locked, completed, or canceled.
    pub fn scheduling_open(&self) -> bool {
        if self.kind == TripKind::Hosted {
            return false;
        }
        matches!(
            self.status,
            TripStatus::Proposed | TripStatus::Scheduling | TripStatus::Voting
        )
    }

    /// Whether new window proposals are refused. True as soon as a concrete
    /// date proposal exists, and whenever scheduling is closed.
    pub fn windows_frozen(&self) -> bool {
        self.date_proposal.is_some() || !self.scheduling_open()
    }
}

/// Shared write-path guard: hosted trips and closed trips refuse every
/// scheduling mutation.
pub(crate) fn check_scheduling_open(trip: &Trip) -> Result<(), ConflictError> {
    if trip.kind == TripKind::Hosted {
        return Err(ConflictError::HostedTrip);
    }
    if !trip.scheduling_open() {
        return Err(ConflictError::SchedulingClosed {
            status: trip.status.name(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_collaborative_trip_starts_open() {
        let range = DateRange::new(d("2026-06-01"), d("2026-06-30")).unwrap();
        let trip = Trip::collaborative(UserId::new(), range, 3);
        assert_eq!(trip.status, TripStatus::Proposed);
        assert!(trip.scheduling_open());
        assert!(!trip.windows_frozen());
        assert!(!trip.is_locked());
    }

    #[test]
    fn test_hosted_trip_is_born_locked() {
        let trip = Trip::hosted(UserId::new(), d("2026-07-10"), d("2026-07-14")).unwrap();
        assert!(trip.is_locked());
        assert!(!trip.scheduling_open());
        assert!(trip.windows_frozen());
        assert_eq!(
            trip.locked_dates().unwrap().option_key(),
            "2026-07-10_2026-07-14"
        );
    }

    #[test]
    fn test_hosted_trip_rejects_inverted_dates() {
        assert!(Trip::hosted(UserId::new(), d("2026-07-14"), d("2026-07-10")).is_err());
    }

    #[test]
    fn test_canceled_trip_closes_scheduling() {
        let range = DateRange::new(d("2026-06-01"), d("2026-06-30")).unwrap();
        let mut trip = Trip::collaborative(UserId::new(), range, 3);
        trip.status = TripStatus::Canceled;
        assert!(!trip.scheduling_open());
        assert!(trip.windows_frozen());
    }

    #[test]
    fn test_locked_status_serializes_with_tag_and_dates() {
        let trip = Trip::hosted(UserId::new(), d("2026-07-10"), d("2026-07-14")).unwrap();
        let json = serde_json::to_value(&trip).unwrap();
        assert_eq!(json["status"]["status"], "locked");
        assert_eq!(json["status"]["startDate"], "2026-07-10");
        assert_eq!(json["status"]["endDate"], "2026-07-14");
        assert_eq!(json["kind"], "hosted");
    }
}
