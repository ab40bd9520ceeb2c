//! # Tripline Core Library
//!
//! This library provides the group scheduling consensus engine for Tripline:
//! it converges many participants' noisy, partial availability into a small
//! ranked set of candidate date windows, gates when a leader may formalize
//! and lock a concrete date range, and derives the single authoritative
//! funnel state the rest of the application consults before any write.
//!
//! ## Architecture
//!
//! - **Availability**: normalizes three submission granularities (broad,
//!   weekly block, per-day) into one canonical per-day map per participant
//! - **Consensus**: scores every window of the trip's target duration and
//!   returns the top non-overlapping candidates
//! - **Windows**: the ledger of coarse window proposals and per-participant
//!   stances, ranked by weighted support
//! - **Readiness**: group-size-dependent thresholds gating the leader's
//!   formal date proposal
//! - **Gate**: ternary reactions to the concrete proposal and the
//!   majority-approval lock
//! - **Funnel**: the derived state machine tying it all together
//!
//! Everything is a pure function over a snapshot of trip-scoped data; the
//! surrounding system does all I/O before and after. Derived results
//! (consensus windows, funnel state) are recomputed on every read and never
//! persisted.
//!
//! ## Key Components
//!
//! - [`normalize`](availability::normalize): per-day availability maps
//! - [`score_windows`](consensus::score_windows): ranked candidate windows
//! - [`WindowLedger`]: window proposals and preferences
//! - [`evaluate_readiness`]: proposal-readiness thresholds
//! - [`lock_dates`](gate::lock_dates): the reaction-gated lock
//! - [`derive_funnel_state`]: the authoritative scheduling phase

pub mod availability;
pub mod consensus;
pub mod date_range;
pub mod error;
pub mod funnel;
pub mod gate;
pub mod readiness;
pub mod trip;
pub mod windows;


pub use availability::{
    latest_per_user, normalize, normalize_all, AvailabilitySubmission, DayEntry, DayStatus,
    NormalizedAvailability, WeeklyBlock,
};
pub use consensus::{
    score_windows, windows_for_trip, CandidateWindow, ScoreWeights, MAX_WINDOWS,
};
pub use date_range::DateRange;
pub use error::{ConflictError, CoreError, Result, ValidationError};
pub use funnel::{derive_funnel_state, SchedulingAction, SchedulingFunnelState};
pub use gate::{
    adjustment_suggestions, lock_dates, propose_dates, required_approvals, DateProposal,
    DateReaction, ReactionKind, ReactionLedger, ReactionTally, ADJUSTMENT_SHIFT_DAYS,
};
pub use readiness::{
    evaluate_readiness, required_support, ProposalReadiness, ReadinessPolicy, ReadinessReason,
    ReadinessStats,
};
pub use trip::{Trip, TripKind, TripStatus, UserId};
pub use windows::{
    can_submit_window, RankedWindow, StanceCounts, WindowLedger, WindowPreference, WindowProposal,
    WindowStance,
};
