//! Behavior tests for to-date returns.
//!
//! Reference date for most scenarios is Friday 2024-05-17: the week starts
//! Monday 05-13, the month 05-01, the quarter 04-01 and the year 01-01.

use approx::assert_relative_eq;
use etfpulse_core::calendar::PeriodBoundaries;
use etfpulse_core::{calculate_performance, ExclusionReason, PerformanceOutcome, Period};
use etfpulse_tests::{column, date, frame, series, weekday_series};

fn full_history() -> etfpulse_core::PriceSeries {
    series(&[
        ("2023-12-29", 100.0),
        ("2024-03-28", 110.0),
        ("2024-04-30", 120.0),
        ("2024-05-10", 125.0),
        ("2024-05-16", 130.0),
        ("2024-05-17", 143.0),
    ])
}

#[test]
fn when_reference_date_is_mid_week_system_resolves_calendar_anchors() {
    let boundaries = PeriodBoundaries::resolve(date("2024-05-17"));

    assert_eq!(boundaries.week_start, date("2024-05-13"));
    assert_eq!(boundaries.month_start, date("2024-05-01"));
    assert_eq!(boundaries.quarter_start, date("2024-04-01"));
    assert_eq!(boundaries.year_start, date("2024-01-01"));
    assert_eq!(boundaries.start_of(Period::OneDay), None);
}

#[test]
fn when_history_covers_prior_year_system_reports_all_five_periods() {
    // Given: closes at every anchor, including a Good Friday gap before Q2
    let frame = frame(vec![column("Broad", "VOO", full_history())]);

    // When
    let outcome = calculate_performance(&frame, date("2024-05-17"));

    // Then: each period divides by the last close before its anchor
    let table = outcome.table().expect("calculated");
    let returns = table.get("Broad").expect("row");
    assert_relative_eq!(returns.one_day, 143.0 / 130.0 - 1.0, epsilon = 1e-12);
    assert_relative_eq!(returns.wtd, 143.0 / 125.0 - 1.0, epsilon = 1e-12);
    assert_relative_eq!(returns.mtd, 143.0 / 120.0 - 1.0, epsilon = 1e-12);
    assert_relative_eq!(returns.qtd, 143.0 / 110.0 - 1.0, epsilon = 1e-12);
    assert_relative_eq!(returns.ytd, 0.43, epsilon = 1e-12);
    assert!(outcome.exclusions().is_empty());
}

#[test]
fn when_fund_listed_this_year_system_measures_ytd_from_first_close() {
    let listed = series(&[
        ("2024-02-01", 50.0),
        ("2024-03-28", 60.0),
        ("2024-04-30", 70.0),
        ("2024-05-10", 80.0),
        ("2024-05-16", 90.0),
        ("2024-05-17", 100.0),
    ]);
    let frame = frame(vec![column("New Fund", "NEWF", listed)]);

    let outcome = calculate_performance(&frame, date("2024-05-17"));

    let returns = outcome.table().and_then(|table| table.get("New Fund")).copied().expect("row");
    assert_relative_eq!(returns.ytd, 1.0, epsilon = 1e-12);
}

#[test]
fn when_reference_date_is_monday_system_makes_wtd_equal_one_day() {
    let history = weekday_series(date("2023-12-01"), date("2024-05-20"), |n| 100.0 + n as f64);
    let frame = frame(vec![column("Broad", "VOO", history)]);

    let outcome = calculate_performance(&frame, date("2024-05-20"));

    let returns = outcome.table().and_then(|table| table.get("Broad")).copied().expect("row");
    assert_relative_eq!(returns.wtd, returns.one_day, epsilon = 1e-12);
}

#[test]
fn when_reference_date_is_a_weekend_system_uses_friday_as_latest() {
    let history = weekday_series(date("2023-12-01"), date("2024-05-17"), |n| 100.0 + n as f64);
    let frame = frame(vec![column("Broad", "VOO", history)]);

    let friday = calculate_performance(&frame, date("2024-05-17"));
    let sunday = calculate_performance(&frame, date("2024-05-19"));

    // Same latest close and same anchors: identical rows.
    assert_eq!(friday.table(), sunday.table());
}

#[test]
fn when_one_instrument_has_a_single_close_system_excludes_only_that_row() {
    let frame = frame(vec![
        column("Broad", "VOO", full_history()),
        column("Fresh", "FRSH", series(&[("2024-05-17", 10.0)])),
    ]);

    let outcome = calculate_performance(&frame, date("2024-05-17"));

    let PerformanceOutcome::Calculated { table, exclusions } = outcome else {
        panic!("expected a calculated table");
    };
    assert_eq!(table.len(), 1);
    assert!(!table.contains("Fresh"));
    assert_eq!(exclusions.len(), 1);
    assert_eq!(exclusions[0].label, "Fresh");
    assert_eq!(
        exclusions[0].reason,
        ExclusionReason::InsufficientHistory { observations: 1 }
    );
}

#[test]
fn when_history_starts_inside_the_week_system_reports_unresolved_week_anchor() {
    let short = series(&[("2024-05-14", 10.0), ("2024-05-15", 11.0), ("2024-05-17", 12.0)]);
    let frame = frame(vec![
        column("Broad", "VOO", full_history()),
        column("Short", "SHRT", short),
    ]);

    let outcome = calculate_performance(&frame, date("2024-05-17"));

    assert_eq!(
        outcome.exclusions()[0].reason,
        ExclusionReason::UnresolvedStart {
            period: Period::WeekToDate
        }
    );
}

#[test]
fn when_every_instrument_is_excluded_system_reports_could_not_calculate() {
    let frame = frame(vec![column("Fresh", "FRSH", series(&[("2024-05-17", 10.0)]))]);

    let outcome = calculate_performance(&frame, date("2024-05-17"));

    assert!(matches!(outcome, PerformanceOutcome::CouldNotCalculate { .. }));
    assert_eq!(outcome.exclusions().len(), 1);
}

#[test]
fn when_no_series_arrive_system_reports_no_data() {
    let outcome = calculate_performance(&frame(Vec::new()), date("2024-05-17"));

    assert_eq!(outcome, PerformanceOutcome::NoData);
}

#[test]
fn when_lookup_date_falls_in_a_gap_system_carries_the_prior_close_forward() {
    let gappy = series(&[("2024-01-02", 100.0), ("2024-01-03", 102.0), ("2024-01-05", 105.0)]);

    assert_eq!(gappy.as_of(date("2024-01-04")), Some(102.0));
    assert_eq!(gappy.as_of(date("2024-01-05")), Some(105.0));
    assert_eq!(gappy.as_of(date("2024-01-01")), None);
}

#[test]
fn when_a_close_is_repeated_system_returns_the_same_row() {
    let mut points: Vec<(&str, f64)> = vec![
        ("2023-12-29", 100.0),
        ("2024-03-28", 110.0),
        ("2024-04-30", 120.0),
        ("2024-05-10", 125.0),
        ("2024-05-16", 130.0),
        ("2024-05-17", 143.0),
    ];
    let baseline = frame(vec![column("Broad", "VOO", series(&points))]);
    points.insert(3, ("2024-04-30", 120.0));
    let repeated = frame(vec![column("Broad", "VOO", series(&points))]);

    let today = date("2024-05-17");
    assert_eq!(
        calculate_performance(&baseline, today),
        calculate_performance(&repeated, today)
    );
}
