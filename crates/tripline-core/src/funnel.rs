//! Scheduling funnel state machine.
//!
//! One authoritative phase derived from the trip record and the live
//! ledgers. Nothing stores a phase pointer: deriving on every read removes
//! the whole class of "stored phase disagrees with underlying data" bugs,
//! and the per-trip data volumes make recomputation cheap.
//!
//! Derivation order:
//!
//! 1. hosted trip                         -> `HostedLocked`
//! 2. dates locked                        -> `DatesLocked`
//! 3. active date proposal, threshold met -> `ReadyToLock`
//! 4. active date proposal otherwise      -> `DateProposed`
//! 5. any active window proposal          -> `WindowsOpen`
//! 6. otherwise                           -> `NoDates`

use serde::{Deserialize, Serialize};

use crate::gate::ReactionLedger;
use crate::trip::{Trip, TripKind, UserId};
use crate::windows::WindowLedger;

/// Where a trip's date selection currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SchedulingFunnelState {
    /// Hosted trip: dates fixed at creation, funnel bypassed
    HostedLocked,
    /// Nothing on the table yet
    NoDates,
    /// Window proposals are being collected
    WindowsOpen,
    /// A concrete date proposal awaits reactions
    DateProposed,
    /// The proposal has reached its approval threshold
    ReadyToLock,
    /// Dates are final
    DatesLocked,
}

/// A write-path mutation the surrounding system wants to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulingAction {
    SubmitAvailability,
    SubmitWindow,
    SetPreference,
    ProposeDates,
    React,
    LockDates,
}

impl SchedulingFunnelState {
    /// Whether scheduling can never move forward from here.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::HostedLocked | Self::DatesLocked)
    }

    /// Decision table consulted by every write path before acting.
    ///
    /// `LockDates` is listed for `DateProposed` as well as `ReadyToLock`
    /// because a leader override may lock below threshold; the gate itself
    /// enforces threshold-or-override.
    pub fn allows(&self, action: SchedulingAction) -> bool {
        use SchedulingAction::*;
        match self {
            Self::HostedLocked | Self::DatesLocked => false,
            Self::NoDates => matches!(action, SubmitAvailability | SubmitWindow | ProposeDates),
            Self::WindowsOpen => matches!(
                action,
                SubmitAvailability | SubmitWindow | SetPreference | ProposeDates
            ),
            Self::DateProposed | Self::ReadyToLock => {
                matches!(action, SubmitAvailability | React | ProposeDates | LockDates)
            }
        }
    }
}

/// Derive the funnel state from a snapshot of trip-scoped data. Pure and
/// idempotent; safe to call on every read.
pub fn derive_funnel_state(
    trip: &Trip,
    roster: &[UserId],
    windows: &WindowLedger,
    reactions: &ReactionLedger,
) -> SchedulingFunnelState {
    if trip.kind == TripKind::Hosted {
        return SchedulingFunnelState::HostedLocked;
    }
    if trip.is_locked() {
        return SchedulingFunnelState::DatesLocked;
    }
    if trip.date_proposal.is_some() {
        let tally = reactions.tally(roster.len());
        return if tally.lock_eligible {
            SchedulingFunnelState::ReadyToLock
        } else {
            SchedulingFunnelState::DateProposed
        };
    }
    if windows.active().next().is_some() {
        return SchedulingFunnelState::WindowsOpen;
    }
    SchedulingFunnelState::NoDates
}
