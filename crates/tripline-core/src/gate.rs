//! Date proposal and reaction gate.
//!
//! Once a leader commits to concrete start/end dates, window proposals
//! freeze and participants react with a ternary signal. Locking is gated on
//! majority approval: only `WORKS` reactions count; `CAVEAT` and `CANT`
//! remain visible for the leader's judgment but never approve.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::date_range::DateRange;
use crate::error::{ConflictError, Result};
use crate::trip::{check_scheduling_open, Trip, TripStatus, UserId};

/// How far the adjustment suggestions shift the proposed range, in days.
pub const ADJUSTMENT_SHIFT_DAYS: i64 = 7;

/// The single active concrete date proposal for a trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateProposal {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub proposed_by: UserId,
    pub proposed_at: DateTime<Utc>,
    pub note: Option<String>,
}

impl DateProposal {
    /// The proposed date range.
    pub fn range(&self) -> DateRange {
        DateRange {
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

/// A participant's reaction to the current date proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReactionKind {
    Works,
    Caveat,
    Cant,
}

/// One participant's reaction. At most one per user; resubmission
/// overwrites.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateReaction {
    pub user_id: UserId,
    pub kind: ReactionKind,
    pub reacted_at: DateTime<Utc>,
}

/// Reaction counts against the lock threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionTally {
    pub works: usize,
    pub caveat: usize,
    pub cant: usize,
    /// `ceil(total_active_members / 2)`
    pub required: usize,
    /// `works >= required`
    pub lock_eligible: bool,
}

/// Trip-scoped collection of reactions to the active date proposal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReactionLedger {
    reactions: Vec<DateReaction>,
}

impl ReactionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded reactions.
    pub fn reactions(&self) -> &[DateReaction] {
        &self.reactions
    }

    /// Record or overwrite one participant's reaction to the active
    /// proposal. Rejected when no proposal exists or scheduling is closed.
    pub fn react(
        &mut self,
        trip: &Trip,
        user_id: UserId,
        kind: ReactionKind,
        now: DateTime<Utc>,
    ) -> Result<()> {
        check_scheduling_open(trip)?;
        if trip.date_proposal.is_none() {
            return Err(ConflictError::NoActiveProposal.into());
        }

        if let Some(existing) = self.reactions.iter_mut().find(|r| r.user_id == user_id) {
            existing.kind = kind;
            existing.reacted_at = now;
        } else {
            self.reactions.push(DateReaction {
                user_id,
                kind,
                reacted_at: now,
            });
        }
        Ok(())
    }

    /// Count reactions against the approval threshold for the given active
    /// member count.
    pub fn tally(&self, total_active_members: usize) -> ReactionTally {
        let mut works = 0;
        let mut caveat = 0;
        let mut cant = 0;
        for reaction in &self.reactions {
            match reaction.kind {
                ReactionKind::Works => works += 1,
                ReactionKind::Caveat => caveat += 1,
                ReactionKind::Cant => cant += 1,
            }
        }
        let required = required_approvals(total_active_members);
        ReactionTally {
            works,
            caveat,
            cant,
            required,
            lock_eligible: works >= required,
        }
    }

    fn clear(&mut self) {
        self.reactions.clear();
    }
}

/// Approvals required to lock: a majority of all active members.
pub fn required_approvals(total_active_members: usize) -> usize {
    total_active_members.div_ceil(2)
}

/// Put a concrete date proposal on the table (and move the trip to voting).
///
/// Valid while no proposal exists, or with `replace` while one does.
/// Replacing clears all reactions: stale reactions against a different
/// range must not count toward the new one.
pub fn propose_dates(
    trip: &mut Trip,
    reactions: &mut ReactionLedger,
    proposed_by: UserId,
    start_date: NaiveDate,
    end_date: NaiveDate,
    note: Option<String>,
    replace: bool,
    now: DateTime<Utc>,
) -> Result<()> {
    check_scheduling_open(trip)?;
    if trip.date_proposal.is_some() && !replace {
        return Err(ConflictError::ProposalExists.into());
    }
    DateRange::new(start_date, end_date)?;

    if trip.date_proposal.is_some() {
        reactions.clear();
    }
    trip.date_proposal = Some(DateProposal {
        start_date,
        end_date,
        proposed_by,
        proposed_at: now,
        note,
    });
    if matches!(trip.status, TripStatus::Proposed | TripStatus::Scheduling) {
        trip.status = TripStatus::Voting;
    }
    Ok(())
}

/// Lock the trip to its active date proposal.
///
/// Requires the approval threshold, unless the leader overrides. On success
/// the trip's status becomes `Locked` with the proposed dates, and the
/// locked range is returned.
pub fn lock_dates(
    trip: &mut Trip,
    roster: &[UserId],
    reactions: &ReactionLedger,
    leader_override: bool,
) -> Result<DateRange> {
    check_scheduling_open(trip)?;
    let proposal = trip
        .date_proposal
        .as_ref()
        .ok_or(ConflictError::NoActiveProposal)?;

    let tally = reactions.tally(roster.len());
    if !tally.lock_eligible && !leader_override {
        return Err(ConflictError::ThresholdNotMet {
            approvals: tally.works,
            required: tally.required,
        }
        .into());
    }

    let range = proposal.range();
    trip.status = TripStatus::Locked {
        start_date: range.start_date,
        end_date: range.end_date,
    };
    Ok(range)
}

/// Mechanical alternates when consensus stalls: the proposed range shifted
/// a week earlier and a week later, duration preserved. No scoring; a
/// conversation starter, not a recommendation.
pub fn adjustment_suggestions(proposal: &DateProposal) -> [DateRange; 2] {
    let range = proposal.range();
    [
        range.shifted(-ADJUSTMENT_SHIFT_DAYS),
        range.shifted(ADJUSTMENT_SHIFT_DAYS),
    ]
}
