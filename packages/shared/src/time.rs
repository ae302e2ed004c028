//! Time-related utilities with clock abstraction for testability.
//!
//! Everything here works on local wall-clock time (`NaiveDateTime`), which is
//! what the ledger records and what the daily reset is scheduled against.

use chrono::{Duration, Local, NaiveDateTime, NaiveTime, Timelike};

/// Format used for persisted donation dates and audit log lines.
pub const LOCAL_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Clock trait for dependency injection and testing
pub trait Clock: Send + Sync {
    /// Current local wall-clock time, truncated to whole seconds
    fn now_local(&self) -> NaiveDateTime;
}

/// System clock implementation (uses actual system time)
#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_local(&self) -> NaiveDateTime {
        get_local_now()
    }
}

/// Fixed clock implementation for testing (returns a fixed time)
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    fixed_time: NaiveDateTime,
}

impl FixedClock {
    /// Create a new fixed clock with the given local time
    pub fn new(fixed_time: NaiveDateTime) -> Self {
        Self { fixed_time }
    }
}

impl Clock for FixedClock {
    fn now_local(&self) -> NaiveDateTime {
        self.fixed_time
    }
}

/// Get the current local time, truncated to whole seconds
pub fn get_local_now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

/// Format a local datetime as `YYYY-MM-DD HH:MM:SS`
pub fn format_local_datetime(datetime: NaiveDateTime) -> String {
    datetime.format(LOCAL_DATETIME_FORMAT).to_string()
}

/// Parse a `YYYY-MM-DD HH:MM:SS` local datetime
pub fn parse_local_datetime(text: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(text, LOCAL_DATETIME_FORMAT)
}

/// Next occurrence of `time_of_day` strictly after `now`.
///
/// If the time of day has not been reached yet today, today's occurrence is
/// returned; otherwise tomorrow's.
pub fn next_daily_occurrence(now: NaiveDateTime, time_of_day: NaiveTime) -> NaiveDateTime {
    let today = now.date().and_time(time_of_day);
    if today > now {
        today
    } else {
        today + Duration::days(1)
    }
}

/// Format an elapsed duration as `m:ss` (minutes are not wrapped into hours)
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.num_seconds().max(0);
    format!("{}:{:02}", total / 60, total % 60)
}
