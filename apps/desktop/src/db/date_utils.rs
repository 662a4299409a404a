//! Local clock helpers.
//!
//! The study day is the local calendar date. Review timestamps are stored at
//! minute precision, so `now()` drops seconds to keep the date and timestamp
//! written for one grading event in step after a round trip.

use chrono::{Local, NaiveDate, NaiveDateTime, Timelike};

/// Today's local date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Current local time truncated to the minute.
pub fn now() -> NaiveDateTime {
    truncate_to_minute(Local::now().naive_local())
}

pub fn truncate_to_minute(ts: NaiveDateTime) -> NaiveDateTime {
    ts.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(ts)
}

/// `YYYY-MM-DD HH:MM:SS` form used in log files.
pub fn log_timestamp(ts: NaiveDateTime) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}
