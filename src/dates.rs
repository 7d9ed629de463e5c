//! Date Formatting
//!
//! Conversions between date-times and the backend's compact
//! `YYYYMMDDHHmmss` timestamp, plus the human display format.
//!
//! Timestamps are rendered from whatever clock the caller passes in; the
//! shell uses local time on both ends of a range query.

use chrono::{DateTime, Datelike, Duration, Local, NaiveDateTime, Timelike};

/// `strftime` pattern of the backend range-query timestamps
pub const API_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Render a date-time as the 14-digit string the backend expects.
///
/// Every component except the year is zero padded. Sub-second precision is
/// dropped.
pub fn format_date_for_api<T: Datelike + Timelike>(date: &T) -> String {
    format!(
        "{}{:02}{:02}{:02}{:02}{:02}",
        date.year(),
        date.month(),
        date.day(),
        date.hour(),
        date.minute(),
        date.second()
    )
}

/// Render a date-time as `DD/MM/YYYY HH:mm`
pub fn format_date_for_display<T: Datelike + Timelike>(date: &T) -> String {
    format!(
        "{:02}/{:02}/{} {:02}:{:02}",
        date.day(),
        date.month(),
        date.year(),
        date.hour(),
        date.minute()
    )
}

/// Parse a 14-digit backend timestamp
pub fn parse_api_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.len() != 14 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDateTime::parse_from_str(value, API_TIMESTAMP_FORMAT).ok()
}

/// Longest trailing window accepted from configuration or the command line
pub const MAX_WINDOW_DAYS: i64 = 36_500;

/// The instant `days * 86400` seconds before `now`, or `None` when that
/// falls outside the representable date range
pub fn days_ago_from(now: DateTime<Local>, days: i64) -> Option<DateTime<Local>> {
    now.checked_sub_signed(Duration::try_days(days)?)
}

/// The instant `days * 86400` seconds before the current local time
pub fn days_ago(days: i64) -> Option<DateTime<Local>> {
    days_ago_from(Local::now(), days)
}

/// Whether `days` is an acceptable trailing window length
pub fn is_valid_window_days(days: i64) -> bool {
    (1..=MAX_WINDOW_DAYS).contains(&days)
}

/// A closed range of backend timestamps for a transaction listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeWindow {
    pub from: String,
    pub to: String,
}

impl TimeWindow {
    /// Trailing window `[now - days, now]`; `None` unless `days` is in
    /// `1..=MAX_WINDOW_DAYS`
    pub fn trailing_days(days: i64) -> Option<Self> {
        Self::trailing_days_from(Local::now(), days)
    }

    pub fn trailing_days_from(now: DateTime<Local>, days: i64) -> Option<Self> {
        if !is_valid_window_days(days) {
            return None;
        }
        Some(Self {
            from: format_date_for_api(&days_ago_from(now, days)?),
            to: format_date_for_api(&now),
        })
    }

    /// Window from explicit timestamps, both already in backend format
    pub fn between(from: &str, to: &str) -> Option<Self> {
        let start = parse_api_timestamp(from)?;
        let end = parse_api_timestamp(to)?;
        if start > end {
            return None;
        }
        Some(Self {
            from: format_date_for_api(&start),
            to: format_date_for_api(&end),
        })
    }
}
