//! Behavior tests for benchmark ranking and cell styling.

use approx::assert_relative_eq;
use etfpulse_core::styling::{style_display, CellStyle, Tone};
use etfpulse_core::{arrange, chart_series, rank_against_benchmark, DisplayTable, Period};
use etfpulse_tests::{row, ytd_table, PerformanceTable};

fn labels<'a>(rows: impl Iterator<Item = &'a etfpulse_core::LabeledRow>) -> Vec<&'a str> {
    rows.map(|row| row.label.as_str()).collect()
}

#[test]
fn when_benchmark_is_present_system_splits_rows_around_it() {
    // Given: set order deliberately differs from return order
    let table = ytd_table(&[
        ("Bench", 0.05),
        ("Low", -0.02),
        ("High", 0.20),
        ("Mid", 0.08),
        ("Flat", 0.05),
    ]);

    // When
    let ranked = rank_against_benchmark(&table, "Bench", Period::YearToDate).expect("ranked");

    // Then: strictly greater goes above, ties fall below the benchmark
    assert_eq!(labels(ranked.above().iter()), vec!["High", "Mid"]);
    assert_eq!(ranked.benchmark().label, "Bench");
    assert_eq!(labels(ranked.below().iter()), vec!["Flat", "Low"]);
    assert_eq!(ranked.benchmark_position(), 2);
    assert_eq!(ranked.len(), 5);
}

#[test]
fn when_rows_tie_system_keeps_instrument_set_order() {
    let table = ytd_table(&[("Bench", 0.0), ("First", 0.1), ("Second", 0.1), ("Third", 0.1)]);

    let ranked = rank_against_benchmark(&table, "Bench", Period::YearToDate).expect("ranked");

    assert_eq!(labels(ranked.above().iter()), vec!["First", "Second", "Third"]);
}

#[test]
fn when_sorting_by_one_period_system_ignores_the_other_columns() {
    let table = PerformanceTable::new(vec![
        row("Bench", [0.0, 0.0, 0.01, 0.0, 0.0]),
        row("MonthLeader", [-0.5, -0.5, 0.09, -0.5, -0.5]),
        row("YearLeader", [0.5, 0.5, -0.01, 0.5, 0.5]),
    ]);

    let ranked = rank_against_benchmark(&table, "Bench", Period::MonthToDate).expect("ranked");

    assert_eq!(labels(ranked.above().iter()), vec!["MonthLeader"]);
    assert_eq!(labels(ranked.below().iter()), vec!["YearLeader"]);
}

#[test]
fn when_benchmark_row_is_missing_system_falls_back_to_set_order() {
    let table = ytd_table(&[("B", 0.02), ("A", 0.09), ("C", -0.01)]);

    let display = arrange(&table, Some("Bench"), Period::YearToDate);

    assert!(display.as_ranked().is_none());
    assert_eq!(labels(display.rows()), vec!["B", "A", "C"]);
}

#[test]
fn when_chart_is_requested_system_orders_bars_best_first() {
    let table = ytd_table(&[("B", 0.02), ("A", 0.09), ("C", -0.01)]);

    let bars = chart_series(&table, Period::YearToDate);

    let order: Vec<&str> = bars.iter().map(|(label, _)| label.as_str()).collect();
    assert_eq!(order, vec!["A", "B", "C"]);
}

#[test]
fn when_ranked_table_is_styled_system_scales_by_widest_gap_per_side() {
    let table = ytd_table(&[("Bench", 0.10), ("Best", 0.30), ("Half", 0.20), ("Worst", 0.00), ("Even", 0.10)]);
    let display = arrange(&table, Some("Bench"), Period::YearToDate);

    let grid = style_display(&display);

    let ytd = |label: &str| grid.get(label, Period::YearToDate).expect("style");
    assert_eq!(ytd("Bench"), CellStyle::BENCHMARK);
    assert_eq!(ytd("Best").tone, Tone::Gain);
    assert_relative_eq!(ytd("Best").intensity, 1.0, epsilon = 1e-9);
    assert_relative_eq!(ytd("Half").intensity, 0.5, epsilon = 1e-9);
    assert_eq!(ytd("Worst").tone, Tone::Loss);
    assert_relative_eq!(ytd("Worst").intensity, 1.0, epsilon = 1e-9);
    assert_eq!(ytd("Even"), CellStyle::NEUTRAL);
}

#[test]
fn when_every_row_matches_benchmark_system_styles_cells_neutral() {
    let table = ytd_table(&[("Bench", 0.10), ("Twin", 0.10)]);
    let display = arrange(&table, Some("Bench"), Period::YearToDate);

    let grid = style_display(&display);

    for period in Period::ALL {
        assert_eq!(grid.get("Twin", period), Some(CellStyle::NEUTRAL));
    }
}

#[test]
fn when_table_is_unranked_system_styles_against_column_range() {
    let table = ytd_table(&[("Low", -0.10), ("Mid", 0.00), ("High", 0.10)]);
    let display = arrange(&table, None, Period::YearToDate);
    assert!(matches!(display, DisplayTable::Unranked { .. }));

    let grid = style_display(&display);

    let mid = grid.get("Mid", Period::YearToDate).expect("style");
    assert_eq!(mid.tone, Tone::Scale);
    assert_relative_eq!(mid.intensity, 0.5, epsilon = 1e-9);
    assert_relative_eq!(grid.get("High", Period::YearToDate).expect("style").intensity, 1.0);
    // Constant columns carry no information.
    assert_eq!(grid.get("Low", Period::OneDay), Some(CellStyle::NEUTRAL));
}

#[test]
fn when_other_rows_are_reordered_system_keeps_benchmark_position() {
    let forward = ytd_table(&[("Bench", 0.05), ("A", 0.10), ("B", -0.10), ("C", 0.07)]);
    let backward = ytd_table(&[("C", 0.07), ("B", -0.10), ("A", 0.10), ("Bench", 0.05)]);

    let first = rank_against_benchmark(&forward, "Bench", Period::YearToDate).expect("ranked");
    let second = rank_against_benchmark(&backward, "Bench", Period::YearToDate).expect("ranked");

    assert_eq!(first.benchmark_position(), second.benchmark_position());
    assert_eq!(labels(first.rows()), labels(second.rows()));
}

#[test]
fn when_sort_column_changes_system_reranks_using_only_that_column() {
    let table = PerformanceTable::new(vec![
        row("A", [0.05, 0.03, 0.01, 0.00, -0.02]),
        row("B", [0.04, 0.02, 0.01, 0.01, -0.01]),
    ]);

    let by_week = rank_against_benchmark(&table, "B", Period::WeekToDate).expect("ranked");
    let by_month = rank_against_benchmark(&table, "B", Period::MonthToDate).expect("ranked");
    let by_year = rank_against_benchmark(&table, "B", Period::YearToDate).expect("ranked");

    assert_eq!(labels(by_week.above().iter()), vec!["A"]);
    // A tie is not ahead of the benchmark.
    assert_eq!(labels(by_month.below().iter()), vec!["A"]);
    assert_eq!(labels(by_year.below().iter()), vec!["A"]);
}
