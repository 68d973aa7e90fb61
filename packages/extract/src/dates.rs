//! Best-effort date handling.
//!
//! Every date the extractor emits is a `dd/mm/yyyy` string. Parsing never
//! fails loudly: [`try_parse_date`] returns `None` and each caller decides
//! its own fallback.

use chrono::{Days, NaiveDate};

/// Output format of every date field.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Format used on the purchase order itself, e.g. `12 Dec 2025`.
const SOURCE_FORMAT: &str = "%d %b %Y";

/// Parses a `dd/mm/yyyy` string.
#[must_use]
pub fn try_parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

/// Formats a date as `dd/mm/yyyy`.
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Rewrites `12 Dec 2025` as `12/12/2025`.
///
/// Input that does not parse in that form is returned unchanged.
#[must_use]
pub fn normalize_date(raw: &str) -> String {
    NaiveDate::parse_from_str(raw.trim(), SOURCE_FORMAT)
        .map_or_else(|_| raw.to_owned(), format_date)
}

/// Adds `days` to a `dd/mm/yyyy` string.
///
/// Returns `None` if `value` does not parse or the result is out of range.
#[must_use]
pub fn add_days(value: &str, days: u64) -> Option<String> {
    try_parse_date(value)?
        .checked_add_days(Days::new(days))
        .map(format_date)
}
