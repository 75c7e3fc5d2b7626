use super::common::*;
use crate::workflows::awards::domain::ServiceDuration;
use crate::workflows::awards::duration::{compute_duration, duration_as_of, InvalidDateRange};

#[test]
fn same_day_is_zero() {
    let day = date(2024, 2, 29);
    let duration = compute_duration(day, day).expect("valid range");
    assert_eq!(duration, ServiceDuration::ZERO);
}

#[test]
fn borrows_a_month_when_end_day_precedes_start_day() {
    let duration =
        compute_duration(date(2015, 6, 15), date(2025, 6, 14)).expect("valid range");
    assert_eq!(duration.years, 9);
    assert_eq!(duration.months, 11);
    assert_eq!(duration.total_months, 119);
}

#[test]
fn counts_whole_months_not_thirty_day_blocks() {
    // February to March across a short month must still count one month
    // once the day-of-month is reached.
    let duration = compute_duration(date(2025, 1, 31), date(2025, 3, 31)).expect("valid range");
    assert_eq!(duration.total_months, 2);

    let short = compute_duration(date(2025, 1, 31), date(2025, 3, 30)).expect("valid range");
    assert_eq!(short.total_months, 1);
}

#[test]
fn month_remainder_stays_within_calendar_bounds() {
    for (start, end) in [
        (date(2010, 1, 1), date(2025, 6, 15)),
        (date(2015, 6, 15), date(2025, 6, 15)),
        (date(2024, 12, 31), date(2025, 1, 1)),
        (date(2020, 2, 29), date(2025, 2, 28)),
    ] {
        let duration = compute_duration(start, end).expect("valid range");
        assert!(duration.months <= 11);
        assert_eq!(
            duration.total_months,
            duration.years * 12 + duration.months
        );
    }
}

#[test]
fn rejects_inverted_ranges() {
    let result = compute_duration(date(2025, 6, 15), date(2025, 6, 14));
    assert!(matches!(
        result,
        Err(InvalidDateRange::EndBeforeStart { .. })
    ));
}

#[test]
fn separation_date_caps_the_service_window() {
    let mut record = veteran();
    record.separation_date = Some(date(2020, 6, 15));

    let duration = duration_as_of(&record, as_of()).expect("valid record");
    assert_eq!(duration.years, 5);
    assert_eq!(duration.months, 0);
}

#[test]
fn missing_enlistment_fails_with_missing_start() {
    let result = duration_as_of(&missing_dates(), as_of());
    assert_eq!(result, Err(InvalidDateRange::MissingStart));
}
