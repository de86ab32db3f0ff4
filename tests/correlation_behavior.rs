//! Behavior tests for return correlation and rolling returns.

use approx::assert_relative_eq;
use etfpulse_core::{correlation_matrix, pearson, rolling_returns, TRADING_DAYS_PER_YEAR};
use etfpulse_tests::{column, date, frame, series, weekday_series};

#[test]
fn when_series_move_together_system_reports_perfect_correlation() {
    // Given: B is always 2x A, C mirrors A's daily moves
    let a = weekday_series(date("2024-01-01"), date("2024-02-29"), |n| 100.0 + (n % 7) as f64);
    let b = weekday_series(date("2024-01-01"), date("2024-02-29"), |n| 2.0 * (100.0 + (n % 7) as f64));
    let prices = frame(vec![column("A", "AAA", a), column("B", "BBB", b)]).align();

    // When
    let matrix = correlation_matrix(&prices);

    // Then
    assert_eq!(matrix.len(), 2);
    assert_relative_eq!(matrix.get("A", "B").expect("defined"), 1.0, epsilon = 1e-9);
    assert_eq!(matrix.get("A", "A"), Some(1.0));
    assert_eq!(matrix.get("A", "B"), matrix.get("B", "A"));
}

#[test]
fn when_returns_are_opposite_system_reports_negative_one() {
    let xs = [Some(0.01), Some(-0.02), Some(0.03), Some(0.0)];
    let ys = [Some(-0.01), Some(0.02), Some(-0.03), Some(0.0)];

    assert_relative_eq!(pearson(&xs, &ys).expect("defined"), -1.0, epsilon = 1e-12);
}

#[test]
fn when_a_series_is_flat_system_leaves_correlation_undefined() {
    let flat = weekday_series(date("2024-01-01"), date("2024-01-31"), |_| 50.0);
    let moving = weekday_series(date("2024-01-01"), date("2024-01-31"), |n| 50.0 + n as f64);
    let prices = frame(vec![column("Flat", "FLAT", flat), column("Moving", "MOVE", moving)]).align();

    let matrix = correlation_matrix(&prices);

    assert_eq!(matrix.get("Flat", "Moving"), None);
    assert_eq!(matrix.get("Flat", "Flat"), Some(1.0));
}

#[test]
fn when_calendars_differ_system_correlates_only_shared_days() {
    // Given: Z has a gap, so the union calendar carries `None` for it
    let full = series(&[
        ("2024-01-02", 100.0),
        ("2024-01-03", 101.0),
        ("2024-01-04", 99.0),
        ("2024-01-05", 102.0),
        ("2024-01-08", 104.0),
    ]);
    let gappy = series(&[
        ("2024-01-02", 200.0),
        ("2024-01-03", 202.0),
        ("2024-01-05", 204.0),
        ("2024-01-08", 208.0),
    ]);
    let prices = frame(vec![column("Full", "FULL", full), column("Gappy", "GAPY", gappy)]).align();

    // When
    assert_eq!(prices.dates.len(), 5);
    let matrix = correlation_matrix(&prices);

    // Then: only 01-03 and 01-08 have a return on both sides
    assert!(matrix.get("Full", "Gappy").is_some());
}

#[test]
fn when_history_is_longer_than_window_system_reports_percent_returns() {
    let window = 3;
    let steady = series(&[
        ("2024-01-02", 100.0),
        ("2024-01-03", 101.0),
        ("2024-01-04", 102.0),
        ("2024-01-05", 110.0),
        ("2024-01-08", 120.0),
    ]);
    let prices = frame(vec![column("Steady", "STDY", steady)]).align();

    let rolling = rolling_returns(&prices, window);

    let values = &rolling.columns[0].1;
    assert_eq!(&values[..window], &[None, None, None]);
    assert_relative_eq!(values[3].expect("defined"), 10.0, epsilon = 1e-9);
    assert_relative_eq!(values[4].expect("defined"), (120.0 / 101.0 - 1.0) * 100.0, epsilon = 1e-9);
    assert_eq!(rolling.complete_rows().len(), 2);
}

#[test]
fn when_history_is_shorter_than_one_year_system_has_no_complete_rolling_rows() {
    let short = weekday_series(date("2024-01-01"), date("2024-06-28"), |n| 100.0 + n as f64);
    let prices = frame(vec![column("Short", "SHRT", short)]).align();

    let rolling = rolling_returns(&prices, TRADING_DAYS_PER_YEAR);

    assert!(rolling.complete_rows().is_empty());
    assert_eq!(rolling.labels(), vec!["Short"]);
}
