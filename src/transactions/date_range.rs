//! Date-range parsing for the history endpoint.
//!
//! Dates are `YYYY-MM-DD` strings interpreted at UTC midnight and converted
//! to Unix seconds. Validation runs in a fixed order and stops at the first
//! failure: presence, pattern (both bounds), calendar (both bounds), ordering.

use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

use crate::storage::TimeBounds;
use crate::transactions::types::{DateBound, TransactionError};

/// Build storage bounds from the raw `dateFrom` / `dateTo` query values.
///
/// Empty strings count as absent.
pub fn parse_range(
    date_from: Option<&str>,
    date_to: Option<&str>,
) -> Result<TimeBounds, TransactionError> {
    let date_from = date_from.filter(|s| !s.is_empty());
    let date_to = date_to.filter(|s| !s.is_empty());

    if date_from.is_none() && date_to.is_none() {
        return Err(TransactionError::MissingDateRange);
    }

    let from = date_from
        .map(|s| match_pattern(s).ok_or(TransactionError::MalformedDate(DateBound::From)))
        .transpose()?;
    let to = date_to
        .map(|s| match_pattern(s).ok_or(TransactionError::MalformedDate(DateBound::To)))
        .transpose()?;

    let from = from
        .map(|ymd| to_timestamp(ymd).ok_or(TransactionError::InvalidDate(DateBound::From)))
        .transpose()?;
    let to = to
        .map(|ymd| to_timestamp(ymd).ok_or(TransactionError::InvalidDate(DateBound::To)))
        .transpose()?;

    if let (Some(from), Some(to)) = (from, to) {
        if to <= from {
            return Err(TransactionError::RangeInverted);
        }
    }

    Ok(TimeBounds { from, to })
}

/// Parse a single bound into a UTC-midnight timestamp.
pub fn parse_date(value: &str, bound: DateBound) -> Result<i64, TransactionError> {
    let ymd = match_pattern(value).ok_or(TransactionError::MalformedDate(bound))?;
    to_timestamp(ymd).ok_or(TransactionError::InvalidDate(bound))
}

/// `YYYY-MM-DD` with month 01-12 and day 01-31. ASCII digits only.
static DATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{4})-(0[1-9]|1[0-2])-(0[1-9]|[12][0-9]|3[01])$")
        .expect("Internal error: invalid date regex")
});

fn match_pattern(value: &str) -> Option<(i32, u32, u32)> {
    let captures = DATE_PATTERN.captures(value)?;
    let year = captures[1].parse().ok()?;
    let month = captures[2].parse().ok()?;
    let day = captures[3].parse().ok()?;
    Some((year, month, day))
}

/// Unix seconds at UTC midnight, or `None` when the date does not exist.
fn to_timestamp((year, month, day): (i32, u32, u32)) -> Option<i64> {
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc().timestamp())
}
