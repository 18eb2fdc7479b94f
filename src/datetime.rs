//! Date/time utilities for godw.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// Display format used by the listing view.
pub const LISTING_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Format a DateTime<Utc> in the specified timezone.
///
/// Unknown timezone names fall back to UTC.
pub fn format_utc_datetime(dt: &DateTime<Utc>, timezone: &str, format: &str) -> String {
    let tz: Tz = match timezone.parse() {
        Ok(tz) => tz,
        Err(_) => return dt.format(format).to_string(),
    };
    dt.with_timezone(&tz).format(format).to_string()
}

/// Format a modification time for the listing view.
pub fn format_listing_time(dt: &DateTime<Utc>, timezone: &str) -> String {
    format_utc_datetime(dt, timezone, LISTING_FORMAT)
}
