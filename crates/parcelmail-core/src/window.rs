//! Calendar-month date windowing.
//!
//! A long scrape is chunked into month-bounded windows so one failed window
//! never costs more than a month of results.

use crate::error::CoreError;
use chrono::{Days, Months, NaiveDate};
use std::fmt;

/// One date range used to scope a single recorder search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    /// Inclusive range start
    pub start: NaiveDate,
    /// Inclusive range end
    pub end: NaiveDate,
}

impl DateWindow {
    /// Range start rendered for the portal query (`YYYYMMDD`).
    #[must_use]
    pub fn start_param(&self) -> String {
        self.start.format("%Y%m%d").to_string()
    }

    /// Range end rendered for the portal query (`YYYYMMDD`).
    #[must_use]
    pub fn end_param(&self) -> String {
        self.end.format("%Y%m%d").to_string()
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start_param(), self.end_param())
    }
}

/// Parse a user-entered `YYYYMMDD` date.
pub fn parse_input_date(input: &str) -> Result<NaiveDate, CoreError> {
    NaiveDate::parse_from_str(input.trim(), "%Y%m%d").map_err(|e| {
        CoreError::Validation(format!("invalid date '{}': expected YYYYMMDD ({e})", input.trim()))
    })
}

/// Split `[start, end]` into month-long windows, the last clipped to `end`.
///
/// Windows are contiguous and non-overlapping. An inverted range yields no
/// windows.
#[must_use]
pub fn month_windows(start: NaiveDate, end: NaiveDate) -> Vec<DateWindow> {
    let mut windows = Vec::new();
    let mut cursor = start;
    while cursor <= end {
        let next = cursor + Months::new(1);
        let month_end = next - Days::new(1);
        windows.push(DateWindow {
            start: cursor,
            end: month_end.min(end),
        });
        cursor = next;
    }
    windows
}
