//! HTTP cache validation module
//!
//! Provides `Last-Modified` formatting and `If-Modified-Since` handling.

use chrono::{DateTime, NaiveDateTime, SubsecRound, Utc};
use std::time::SystemTime;

/// IMF-fixdate, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`
const IMF_FIXDATE: &str = "%a, %d %b %Y %H:%M:%S GMT";
/// Obsolete RFC 850 form, e.g. `Sunday, 06-Nov-94 08:49:37 GMT`
const RFC850_DATE: &str = "%A, %d-%b-%y %H:%M:%S GMT";
/// Obsolete asctime form, e.g. `Sun Nov  6 08:49:37 1994`
const ASCTIME_DATE: &str = "%a %b %e %H:%M:%S %Y";

/// Format a timestamp as an HTTP date
pub fn format_http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).format(IMF_FIXDATE).to_string()
}

/// Parse any of the three HTTP date formats; `None` if unparseable
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(date) = DateTime::parse_from_rfc2822(value) {
        return Some(date.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, RFC850_DATE)
        .or_else(|_| NaiveDateTime::parse_from_str(value, ASCTIME_DATE))
        .ok()
        .map(|naive| naive.and_utc())
}

/// Check whether a conditional GET can be answered with 304
///
/// `If-Modified-Since` is only honoured when `If-None-Match` is absent.
/// The modification time is compared at whole-second precision, since that
/// is all an HTTP date can carry.
pub fn is_not_modified(
    modified: SystemTime,
    if_modified_since: Option<&str>,
    has_if_none_match: bool,
) -> bool {
    if has_if_none_match {
        return false;
    }
    let Some(since) = if_modified_since.and_then(parse_http_date) else {
        return false;
    };
    DateTime::<Utc>::from(modified).trunc_subsecs(0) <= since
}
