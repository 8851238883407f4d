//! Export window calculation
//!
//! Computes the 24-hour interval to export for a given day offset and the
//! dated destination path (`<prefix>/YYYY/MM/DD`) derived from its start.
//! Everything here is pure: "now" is always passed in.

use crate::domain::{LogshipError, Result};
use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::MAIN_SEPARATOR_STR;

/// Half-open time interval `[start, end)` of exactly one day
///
/// Both bounds are truncated to millisecond precision, which is what the
/// CloudWatch Logs API accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeWindow {
    /// Start of the window (inclusive)
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// End of the window (exclusive)
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Start as milliseconds since the Unix epoch
    pub fn start_millis(&self) -> i64 {
        self.start.timestamp_millis()
    }

    /// End as milliseconds since the Unix epoch
    pub fn end_millis(&self) -> i64 {
        self.end.timestamp_millis()
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start.to_rfc3339(), self.end.to_rfc3339())
    }
}

/// Destination key prefix of an export, e.g. `orders/2024/04/13`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DestinationPath(String);

impl DestinationPath {
    /// Returns the path as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for DestinationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Computes the 24-hour window starting `days_back` days before `now`
///
/// `start = now - days_back days` and `end = start + 1 day`. No rounding to
/// midnight is applied: with `days_back = 1` and `now` at 2024-04-13T15:30Z,
/// the window is `[2024-04-12T15:30Z, 2024-04-13T15:30Z)`.
///
/// # Errors
///
/// Returns [`LogshipError::InvalidInput`] if `days_back` is negative or moves
/// the window outside the representable date range.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use logship::core::window::compute_window;
///
/// let now = Utc.with_ymd_and_hms(2024, 4, 13, 15, 30, 0).unwrap();
/// let window = compute_window(now, 1).unwrap();
/// assert_eq!(window.start(), Utc.with_ymd_and_hms(2024, 4, 12, 15, 30, 0).unwrap());
/// assert_eq!(window.end(), now);
/// ```
pub fn compute_window(now: DateTime<Utc>, days_back: i64) -> Result<TimeWindow> {
    if days_back < 0 {
        return Err(LogshipError::InvalidInput(format!(
            "days_back must be >= 0, got {days_back}"
        )));
    }

    let out_of_range =
        || LogshipError::InvalidInput(format!("days_back {days_back} is out of range"));

    let offset = Duration::try_days(days_back).ok_or_else(out_of_range)?;
    let now = now.trunc_subsecs(3);
    let start = now.checked_sub_signed(offset).ok_or_else(out_of_range)?;
    let end = start
        .checked_add_signed(Duration::days(1))
        .ok_or_else(out_of_range)?;

    Ok(TimeWindow { start, end })
}

/// Appends the `YYYY/MM/DD` segment of `window.start` to `prefix`
///
/// Components are joined with the platform path separator. An empty prefix
/// yields just the date segment and a trailing separator on the prefix is
/// not doubled.
pub fn derive_path_segment(prefix: &str, window: &TimeWindow) -> DestinationPath {
    let sep = MAIN_SEPARATOR_STR;
    let date = window
        .start
        .format(&format!("%Y{sep}%m{sep}%d"))
        .to_string();

    let path = if prefix.is_empty() {
        date
    } else if prefix.ends_with(sep) {
        format!("{prefix}{date}")
    } else {
        format!("{prefix}{sep}{date}")
    };

    DestinationPath(path)
}
