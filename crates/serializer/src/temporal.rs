//! ISO-8601 rendering of temporal values
//!
//! Output matches the common `isoformat` shape: fractional seconds appear
//! only when non-zero and always with microsecond precision, offsets are
//! written as `+HH:MM`.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// `YYYY-MM-DDTHH:MM:SS[.ffffff]+HH:MM`
pub fn iso_datetime(dt: &DateTime<FixedOffset>) -> String {
    format!("{}{}", iso_local_datetime(&dt.naive_local()), dt.format("%:z"))
}

/// `YYYY-MM-DDTHH:MM:SS[.ffffff]`
pub fn iso_local_datetime(dt: &NaiveDateTime) -> String {
    format!("{}T{}", iso_date(&dt.date()), iso_time(&dt.time()))
}

/// `YYYY-MM-DD`
pub fn iso_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// `HH:MM:SS[.ffffff]`
pub fn iso_time(time: &NaiveTime) -> String {
    // Leap seconds are folded into the preceding second
    let micros = (time.nanosecond() / 1_000) % 1_000_000;
    if micros == 0 {
        time.format("%H:%M:%S").to_string()
    } else {
        format!("{}.{:06}", time.format("%H:%M:%S"), micros)
    }
}

/// Total length of a duration in seconds, at microsecond resolution.
pub fn total_seconds(duration: &Duration) -> f64 {
    match duration.num_microseconds() {
        Some(us) => us as f64 / 1_000_000.0,
        // Beyond ~292,000 years microseconds overflow i64
        None => duration.num_milliseconds() as f64 / 1_000.0,
    }
}
