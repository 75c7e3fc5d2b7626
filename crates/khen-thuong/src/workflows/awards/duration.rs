use chrono::{Datelike, NaiveDate};

use super::domain::{PersonnelRecord, ServiceDuration};

/// Raised when duration arithmetic is asked to work with unusable dates.
/// Callers are expected to validate inputs; this is misuse, not business flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvalidDateRange {
    #[error("missing enlistment date")]
    MissingStart,
    #[error("end date {end} precedes start date {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
}

/// Whole-calendar-month elapsed duration between two dates.
///
/// A month is counted only once the end day-of-month reaches the start
/// day-of-month, so 2015-06-15 to 2025-06-14 is 9 years 11 months, not 10
/// years. No 30-day approximation is involved.
pub fn compute_duration(
    start: NaiveDate,
    end: NaiveDate,
) -> Result<ServiceDuration, InvalidDateRange> {
    if end < start {
        return Err(InvalidDateRange::EndBeforeStart { start, end });
    }

    let mut months =
        (end.year() - start.year()) * 12 + end.month() as i32 - start.month() as i32;
    if end.day() < start.day() {
        months -= 1;
    }

    // end >= start guarantees the borrow cannot push the count negative.
    Ok(ServiceDuration::from_total_months(months as u32))
}

/// Service duration for a personnel record as of an injected date.
///
/// A recorded separation date caps the service window; otherwise `as_of`
/// stands in for "today". The current time is always supplied by the caller
/// so rule evaluation stays deterministic.
pub fn duration_as_of(
    record: &PersonnelRecord,
    as_of: NaiveDate,
) -> Result<ServiceDuration, InvalidDateRange> {
    let start = record.enlistment_date.ok_or(InvalidDateRange::MissingStart)?;
    let end = record.separation_date.unwrap_or(as_of);
    compute_duration(start, end)
}
