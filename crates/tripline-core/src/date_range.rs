//! Inclusive calendar-day ranges.
//!
//! Every range in the scheduling funnel (candidate range, weekly block,
//! consensus window, date proposal) is a pair of inclusive `NaiveDate`s.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// An inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl DateRange {
    /// Create a validated range. Rejects `start > end`.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Result<Self, ValidationError> {
        if start_date > end_date {
            return Err(ValidationError::InvalidDateRange {
                start: start_date,
                end: end_date,
            });
        }
        Ok(Self {
            start_date,
            end_date,
        })
    }

    /// Number of days in the range, inclusive of both ends.
    pub fn num_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// Iterate every day in the range in calendar order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end_date;
        self.start_date.iter_days().take_while(move |d| *d <= end)
    }

    /// Check whether a day falls inside the range.
    pub fn contains(&self, day: NaiveDate) -> bool {
        day >= self.start_date && day <= self.end_date
    }

    /// Check whether another range falls entirely inside this one.
    pub fn contains_range(&self, other: &DateRange) -> bool {
        self.contains(other.start_date) && self.contains(other.end_date)
    }

    /// Check whether two ranges share at least one day.
    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.start_date <= other.end_date && other.start_date <= self.end_date
    }

    /// The same range moved by a signed number of days, duration preserved.
    pub fn shifted(&self, days: i64) -> Self {
        Self {
            start_date: self.start_date + Duration::days(days),
            end_date: self.end_date + Duration::days(days),
        }
    }

    /// Stable identifier for this range: `"{start}_{end}"` with ISO dates.
    pub fn option_key(&self) -> String {
        format!("{}_{}", self.start_date, self.end_date)
    }
}
