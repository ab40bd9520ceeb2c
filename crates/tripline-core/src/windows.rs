//! Window proposal ledger.
//!
//! Window proposals are coarse, participant-authored date-range ideas,
//! distinct from the single concrete date proposal a leader puts forward.
//! The ledger tracks proposals and each participant's stance on each, and
//! ranks active proposals by weighted support using the same weights as the
//! day scorer so leader- and participant-facing signals feel consistent.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consensus::ScoreWeights;
use crate::date_range::DateRange;
use crate::error::{ConflictError, Result, ValidationError};
use crate::trip::{check_scheduling_open, Trip, UserId};

/// A participant's stance on one window proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WindowStance {
    Works,
    Maybe,
    No,
}

/// A free-text-backed date suggestion, owned by its author.
///
/// Archived proposals are soft-removed from ranking by the leader's
/// compress action; nothing is ever deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowProposal {
    pub id: Uuid,
    pub user_id: UserId,
    pub description: String,
    pub start_hint: Option<NaiveDate>,
    pub end_hint: Option<NaiveDate>,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
}

/// One participant's stance on one window proposal. At most one per
/// (user, window) pair; a resubmission overwrites.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowPreference {
    pub user_id: UserId,
    pub window_id: Uuid,
    pub stance: WindowStance,
    pub submitted_at: DateTime<Utc>,
}

/// Aggregated stance counts for one proposal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StanceCounts {
    pub works: usize,
    pub maybe: usize,
    pub no: usize,
}

/// One active proposal with its aggregated support.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedWindow {
    pub window_id: Uuid,
    pub description: String,
    pub counts: StanceCounts,
    /// `works*3 + maybe - no*2` with the default weights
    pub score: i64,
}

/// Trip-scoped collection of window proposals and preferences.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WindowLedger {
    proposals: Vec<WindowProposal>,
    preferences: Vec<WindowPreference>,
}

/// Whether the trip still accepts new window proposals.
pub fn can_submit_window(trip: &Trip) -> bool {
    !trip.windows_frozen()
}

impl WindowLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// All proposals, archived included.
    pub fn proposals(&self) -> &[WindowProposal] {
        &self.proposals
    }

    /// All recorded preferences.
    pub fn preferences(&self) -> &[WindowPreference] {
        &self.preferences
    }

    /// Active (non-archived) proposals in submission order.
    pub fn active(&self) -> impl Iterator<Item = &WindowProposal> {
        self.proposals.iter().filter(|p| !p.archived)
    }

    /// Add a window proposal.
    ///
    /// Rejected once windows are frozen (a concrete date proposal exists),
    /// on hosted trips, and once scheduling is closed. The freeze check runs
    /// before anything is written.
    pub fn add_proposal(
        &mut self,
        trip: &Trip,
        user_id: UserId,
        description: impl Into<String>,
        start_hint: Option<NaiveDate>,
        end_hint: Option<NaiveDate>,
        now: DateTime<Utc>,
    ) -> Result<&WindowProposal> {
        check_scheduling_open(trip)?;
        if trip.date_proposal.is_some() {
            return Err(ConflictError::WindowsFrozen.into());
        }
        let description = description.into();
        if description.trim().is_empty() {
            return Err(ValidationError::EmptyDescription.into());
        }
        if let (Some(start), Some(end)) = (start_hint, end_hint) {
            DateRange::new(start, end)?;
        }

        self.proposals.push(WindowProposal {
            id: Uuid::new_v4(),
            user_id,
            description,
            start_hint,
            end_hint,
            archived: false,
            created_at: now,
        });
        Ok(&self.proposals[self.proposals.len() - 1])
    }

    /// Record or overwrite a participant's stance on one active proposal.
    pub fn set_preference(
        &mut self,
        trip: &Trip,
        user_id: UserId,
        window_id: Uuid,
        stance: WindowStance,
        now: DateTime<Utc>,
    ) -> Result<()> {
        check_scheduling_open(trip)?;
        let known = self.active().any(|p| p.id == window_id);
        if !known {
            return Err(ConflictError::UnknownWindow { window_id }.into());
        }

        if let Some(existing) = self
            .preferences
            .iter_mut()
            .find(|p| p.user_id == user_id && p.window_id == window_id)
        {
            existing.stance = stance;
            existing.submitted_at = now;
        } else {
            self.preferences.push(WindowPreference {
                user_id,
                window_id,
                stance,
                submitted_at: now,
            });
        }
        Ok(())
    }

    /// Leader-only compress: soft-archive a set of proposals. Returns how
    /// many were newly archived. Never deletes data.
    pub fn archive(&mut self, trip: &Trip, actor: UserId, ids: &[Uuid]) -> Result<usize> {
        check_scheduling_open(trip)?;
        if actor != trip.leader_id {
            return Err(ConflictError::LeaderOnly.into());
        }
        let mut archived = 0;
        for proposal in &mut self.proposals {
            if !proposal.archived && ids.contains(&proposal.id) {
                proposal.archived = true;
                archived += 1;
            }
        }
        Ok(archived)
    }

    /// Rank active proposals by weighted support, descending. Ties keep
    /// submission order.
    pub fn ranked(&self) -> Vec<RankedWindow> {
        self.ranked_with(&ScoreWeights::default())
    }

    /// [`Self::ranked`] with explicit weights.
    pub fn ranked_with(&self, weights: &ScoreWeights) -> Vec<RankedWindow> {
        let mut ranked: Vec<RankedWindow> = self
            .active()
            .map(|proposal| {
                let mut counts = StanceCounts::default();
                for preference in self.preferences.iter().filter(|p| p.window_id == proposal.id) {
                    match preference.stance {
                        WindowStance::Works => counts.works += 1,
                        WindowStance::Maybe => counts.maybe += 1,
                        WindowStance::No => counts.no += 1,
                    }
                }
                let score = counts.works as i64 * weights.available
                    + counts.maybe as i64 * weights.maybe
                    + counts.no as i64 * weights.unavailable;
                RankedWindow {
                    window_id: proposal.id,
                    description: proposal.description.clone(),
                    counts,
                    score,
                }
            })
            .collect();
        // Stable sort, so equal scores preserve submission order.
        ranked.sort_by(|a, b| b.score.cmp(&a.score));
        ranked
    }

    /// Distinct participants with at least one preference on an active
    /// proposal.
    pub fn responders(&self) -> BTreeSet<UserId> {
        let active_ids: BTreeSet<Uuid> = self.active().map(|p| p.id).collect();
        self.preferences
            .iter()
            .filter(|p| active_ids.contains(&p.window_id))
            .map(|p| p.user_id)
            .collect()
    }
}
