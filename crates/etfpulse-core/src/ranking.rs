//! Benchmark-anchored ordering of a performance table.

use serde::Serialize;

use crate::performance::{LabeledRow, PerformanceTable};
use crate::Period;

/// Rows split around the benchmark on a single sort period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedTable {
    pub sort: Period,
    above: Vec<LabeledRow>,
    benchmark: LabeledRow,
    below: Vec<LabeledRow>,
}

impl RankedTable {
    /// Rows strictly outperforming the benchmark, best first.
    pub fn above(&self) -> &[LabeledRow] {
        &self.above
    }

    pub fn benchmark(&self) -> &LabeledRow {
        &self.benchmark
    }

    /// Rows at or below the benchmark, best first.
    pub fn below(&self) -> &[LabeledRow] {
        &self.below
    }

    /// Zero-based display position of the benchmark row.
    pub fn benchmark_position(&self) -> usize {
        self.above.len()
    }

    /// Display order: above group, benchmark, below group.
    pub fn rows(&self) -> impl Iterator<Item = &LabeledRow> {
        self.above
            .iter()
            .chain(std::iter::once(&self.benchmark))
            .chain(self.below.iter())
    }

    pub fn len(&self) -> usize {
        self.above.len() + 1 + self.below.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

/// A table ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "layout", rename_all = "snake_case")]
pub enum DisplayTable {
    Ranked(RankedTable),
    /// Benchmark missing from the table: set order, absolute coloring.
    Unranked { rows: Vec<LabeledRow> },
}

impl DisplayTable {
    pub fn rows(&self) -> Box<dyn Iterator<Item = &LabeledRow> + '_> {
        match self {
            Self::Ranked(ranked) => Box::new(ranked.rows()),
            Self::Unranked { rows } => Box::new(rows.iter()),
        }
    }

    pub fn as_ranked(&self) -> Option<&RankedTable> {
        match self {
            Self::Ranked(ranked) => Some(ranked),
            Self::Unranked { .. } => None,
        }
    }
}

fn sort_descending(rows: &mut [LabeledRow], sort: Period) {
    // Stable sort: ties keep instrument-set order.
    rows.sort_by(|a, b| b.returns.get(sort).total_cmp(&a.returns.get(sort)));
}

/// Split and order rows around `benchmark` using only the `sort` column.
///
/// Returns `None` when the benchmark has no row.
pub fn rank_against_benchmark(
    table: &PerformanceTable,
    benchmark: &str,
    sort: Period,
) -> Option<RankedTable> {
    let benchmark_row = table
        .rows()
        .iter()
        .find(|row| row.label == benchmark)?
        .clone();
    let pivot = benchmark_row.returns.get(sort);

    let (mut above, mut below): (Vec<LabeledRow>, Vec<LabeledRow>) = table
        .rows()
        .iter()
        .filter(|row| row.label != benchmark)
        .cloned()
        .partition(|row| row.returns.get(sort) > pivot);

    sort_descending(&mut above, sort);
    sort_descending(&mut below, sort);

    Some(RankedTable {
        sort,
        above,
        benchmark: benchmark_row,
        below,
    })
}

/// Ranked layout when the benchmark is present, set order otherwise.
pub fn arrange(table: &PerformanceTable, benchmark: Option<&str>, sort: Period) -> DisplayTable {
    benchmark
        .and_then(|benchmark| rank_against_benchmark(table, benchmark, sort))
        .map(DisplayTable::Ranked)
        .unwrap_or_else(|| DisplayTable::Unranked {
            rows: table.rows().to_vec(),
        })
}

/// `(label, value)` pairs for one period, best to worst, for bar charts.
pub fn chart_series(table: &PerformanceTable, period: Period) -> Vec<(String, f64)> {
    let mut rows = table.rows().to_vec();
    sort_descending(&mut rows, period);
    rows.into_iter()
        .map(|row| (row.label, row.returns.get(period)))
        .collect()
}
