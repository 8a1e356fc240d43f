//! Date helper functions

use chrono::{DateTime, TimeZone, Utc};

/// Format a date the way a browser's `Date.toDateString()` does
///
/// # Examples
/// ```ignore
/// date_string(&date, &chrono_tz::UTC) // -> "Sun Jan 15 2023"
/// ```
pub fn date_string<Tz: TimeZone>(date: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.with_timezone(tz).format("%a %b %d %Y").to_string()
}

/// Format a date in ISO 8601 form, for `<time datetime="...">`
pub fn date_xml(date: &DateTime<Utc>) -> String {
    date.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}
