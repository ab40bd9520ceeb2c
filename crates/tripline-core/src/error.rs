//! Core error types for tripline-core.
//!
//! Two concrete kinds, mirroring how callers must handle them:
//!
//! - [`ValidationError`]: malformed input, reported before anything is applied
//! - [`ConflictError`]: a business-rule denial naming the state that denied it
//!
//! Degenerate-but-expected situations (zero travelers, zero proposals, zero
//! submissions) are never errors; the functions that meet them return
//! well-defined empty or "not ready" values instead.

use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

/// Core error type for tripline-core.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CoreError {
    /// Input validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// State-conflict rejections
    #[error("State conflict: {0}")]
    Conflict(#[from] ConflictError),
}

/// Input validation errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// A date range with start after end
    #[error("Invalid date range: start ({start}) must not be after end ({end})")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    /// A referenced day outside the trip's candidate date range
    #[error("Day {day} is outside the candidate range {start}..{end}")]
    DayOutOfRange {
        day: NaiveDate,
        start: NaiveDate,
        end: NaiveDate,
    },

    /// An availability submission with none of the three channels populated
    #[error("Availability submission has no broad status, weekly blocks, or per-day entries")]
    EmptySubmission,

    /// A window proposal with a blank description
    #[error("Window proposal description must not be blank")]
    EmptyDescription,
}

/// Business-rule rejections. These are expected denials, not faults: the
/// caller surfaces them to the end user and does not retry.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConflictError {
    /// Window proposals are frozen once a concrete date proposal exists
    #[error("Window proposals are frozen: a concrete date proposal already exists")]
    WindowsFrozen,

    /// Scheduling mutations on a canceled, completed, or locked trip
    #[error("Scheduling is closed for this trip (status: {status})")]
    SchedulingClosed { status: &'static str },

    /// Scheduling mutations on a hosted trip
    #[error("Hosted trips have fixed dates and never enter scheduling")]
    HostedTrip,

    /// Creating a date proposal while one is live without replacing it
    #[error("A date proposal already exists; replace it explicitly to supersede")]
    ProposalExists,

    /// Reacting or locking with no date proposal on the table
    #[error("No active date proposal to act on")]
    NoActiveProposal,

    /// A preference against a window id that is unknown or archived
    #[error("Unknown or archived window proposal: {window_id}")]
    UnknownWindow { window_id: Uuid },

    /// Locking below the approval threshold without leader override
    #[error("Lock threshold not met: {approvals} of {required} required approvals")]
    ThresholdNotMet { approvals: usize, required: usize },

    /// A leader-only action attempted by someone else
    #[error("Only the trip leader may perform this action")]
    LeaderOnly,
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
