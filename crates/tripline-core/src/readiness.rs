//! Proposal readiness evaluation.
//!
//! Decides whether the top-ranked window proposal has enough support for the
//! leader to formally propose concrete dates. Two threshold regimes by group
//! size:
//!
//! - small groups (≤ 10 travelers): majority of the whole group
//! - large groups: majority of responders, with an absolute floor so a
//!   small, vocal subgroup cannot force a proposal
//!
//! The evaluation is pure; degenerate states (no windows, no travelers) are
//! reported as "not ready" with a reason, never as errors.

use serde::{Deserialize, Serialize};

use crate::trip::{Trip, UserId};
use crate::windows::{RankedWindow, WindowLedger};

/// Threshold policy constants. The large-group floor is product policy, not
/// derived math; it lives here so callers can see and tune it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadinessPolicy {
    /// Largest group size still using whole-group majority
    pub small_group_max: usize,
    /// Minimum absolute supporters required in large groups
    pub large_group_floor: usize,
}

impl Default for ReadinessPolicy {
    fn default() -> Self {
        Self {
            small_group_max: 10,
            large_group_floor: 5,
        }
    }
}

/// Required supporter count for the leading window.
///
/// `total_travelers ≤ small_group_max`: majority of the whole group.
/// Otherwise: majority of distinct responders, floored at
/// `large_group_floor`.
pub fn required_support(
    total_travelers: usize,
    responders: usize,
    policy: &ReadinessPolicy,
) -> usize {
    if total_travelers <= policy.small_group_max {
        total_travelers.div_ceil(2)
    } else {
        responders.div_ceil(2).max(policy.large_group_floor)
    }
}

/// Why the evaluation landed where it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessReason {
    Ready,
    NoWindows,
    BelowThreshold,
    NoTravelers,
}

/// Group-size arithmetic behind the verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadinessStats {
    pub total_travelers: usize,
    pub responders: usize,
    pub required_support: usize,
    pub leading_support: usize,
}

/// Result of a readiness evaluation.
///
/// `proposal_ready` is the organic verdict; `leader_override` echoes the
/// caller's override flag so UIs can surface the distinction; `can_propose`
/// combines both (and stays false once scheduling is closed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalReadiness {
    pub proposal_ready: bool,
    pub reason: ReadinessReason,
    pub leading_window: Option<RankedWindow>,
    pub leader_count: usize,
    pub runner_up: Option<RankedWindow>,
    pub stats: ReadinessStats,
    pub leader_override: bool,
    pub can_propose: bool,
}

/// Evaluate whether the leading window has enough support for the leader to
/// formalize concrete dates.
pub fn evaluate_readiness(
    trip: &Trip,
    roster: &[UserId],
    ledger: &WindowLedger,
    leader_override: bool,
    policy: &ReadinessPolicy,
) -> ProposalReadiness {
    let total_travelers = roster.len();
    let responders = ledger.responders().len();

    let mut ranked = ledger.ranked().into_iter();
    let leading_window = ranked.next();
    let runner_up = ranked.next();

    let required = required_support(total_travelers, responders, policy);
    let leading_support = leading_window
        .as_ref()
        .map(|w| w.counts.works)
        .unwrap_or(0);

    let (proposal_ready, reason) = if total_travelers == 0 {
        (false, ReadinessReason::NoTravelers)
    } else if leading_window.is_none() {
        (false, ReadinessReason::NoWindows)
    } else if leading_support >= required {
        (true, ReadinessReason::Ready)
    } else {
        (false, ReadinessReason::BelowThreshold)
    };

    ProposalReadiness {
        proposal_ready,
        reason,
        leader_count: leading_support,
        leading_window,
        runner_up,
        stats: ReadinessStats {
            total_travelers,
            responders,
            required_support: required,
            leading_support,
        },
        leader_override,
        can_propose: (proposal_ready || leader_override) && trip.scheduling_open(),
    }
}
