use chrono::NaiveDate;
use std::cmp::Ordering;

/// Calendar year taken from the leading 4 digits of a date string
pub fn calendar_year(date: &str) -> Option<i32> {
    let head = date.trim().get(..4)?;
    if head.chars().all(|c| c.is_ascii_digit()) {
        head.parse().ok()
    } else {
        None
    }
}

/// Parse `YYYY-MM-DD`, ignoring any time-of-day suffix
pub fn parse_date(date: &str) -> Option<NaiveDate> {
    let head = date.trim().get(..10)?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

/// Chronological order for session dates.
///
/// Parseable dates compare as dates; anything else falls back to plain
/// string comparison so the order stays total.
pub fn cmp_dates(a: &str, b: &str) -> Ordering {
    match (parse_date(a), parse_date(b)) {
        (Some(da), Some(db)) => da.cmp(&db),
        _ => a.cmp(b),
    }
}
