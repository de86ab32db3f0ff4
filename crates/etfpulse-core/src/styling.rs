//! Color intensity for performance cells, independent of any renderer.
//!
//! Relative styling compares each cell with the benchmark's value in the same
//! column and scales the gap by the widest gap on that side of the benchmark.
//! Absolute styling (benchmark missing) scales each column between its own
//! minimum and maximum.

use serde::Serialize;

use crate::performance::LabeledRow;
use crate::ranking::{DisplayTable, RankedTable};
use crate::Period;

/// Color family for a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    /// Ahead of the benchmark.
    Gain,
    /// Behind the benchmark.
    Loss,
    /// No usable deviation.
    Neutral,
    /// The benchmark row itself.
    Benchmark,
    /// Position on a red-to-green scale for unranked tables.
    Scale,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CellStyle {
    pub tone: Tone,
    /// Always within `[0, 1]`; zero for neutral and benchmark cells.
    pub intensity: f64,
}

impl CellStyle {
    pub const NEUTRAL: Self = Self {
        tone: Tone::Neutral,
        intensity: 0.0,
    };

    pub const BENCHMARK: Self = Self {
        tone: Tone::Benchmark,
        intensity: 0.0,
    };

    fn scaled(tone: Tone, ratio: f64) -> Self {
        if !ratio.is_finite() {
            return Self::NEUTRAL;
        }
        Self {
            tone,
            intensity: ratio.clamp(0.0, 1.0),
        }
    }
}

/// Widest gaps above and below the benchmark in one column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ColumnDeviation {
    pub max_gain: Option<f64>,
    /// Magnitude of the most negative gap.
    pub max_loss: Option<f64>,
}

impl ColumnDeviation {
    pub fn from_deltas(deltas: impl IntoIterator<Item = f64>) -> Self {
        deltas
            .into_iter()
            .fold(Self::default(), |mut acc, delta| {
                if delta > 0.0 {
                    acc.max_gain = Some(acc.max_gain.map_or(delta, |max| max.max(delta)));
                } else if delta < 0.0 {
                    let magnitude = -delta;
                    acc.max_loss = Some(acc.max_loss.map_or(magnitude, |max| max.max(magnitude)));
                }
                acc
            })
    }
}

/// Style one cell relative to the benchmark value of its column.
pub fn relative_style(value: f64, benchmark: f64, deviation: &ColumnDeviation) -> CellStyle {
    let delta = value - benchmark;
    if delta > 0.0 {
        match deviation.max_gain {
            Some(max) if max > 0.0 => CellStyle::scaled(Tone::Gain, delta / max),
            _ => CellStyle::NEUTRAL,
        }
    } else if delta < 0.0 {
        match deviation.max_loss {
            Some(max) if max > 0.0 => CellStyle::scaled(Tone::Loss, -delta / max),
            _ => CellStyle::NEUTRAL,
        }
    } else {
        CellStyle::NEUTRAL
    }
}

/// Position of `value` between `min` and `max`; neutral when the range is empty.
pub fn absolute_style(value: f64, min: f64, max: f64) -> CellStyle {
    let span = max - min;
    if !(span > 0.0) {
        return CellStyle::NEUTRAL;
    }
    CellStyle::scaled(Tone::Scale, (value - min) / span)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyledRow {
    pub label: String,
    /// One style per column in [`Period::ALL`] order.
    pub cells: [CellStyle; 5],
}

/// Styles for a display table, row order matching the table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StyleGrid {
    pub rows: Vec<StyledRow>,
}

impl StyleGrid {
    pub fn get(&self, label: &str, period: Period) -> Option<CellStyle> {
        self.rows
            .iter()
            .find(|row| row.label == label)
            .map(|row| row.cells[period.index()])
    }
}

pub fn style_ranked(ranked: &RankedTable) -> StyleGrid {
    let benchmark = ranked.benchmark();
    let bench_values = benchmark.returns.values();

    let deviations: [ColumnDeviation; 5] = std::array::from_fn(|column| {
        ColumnDeviation::from_deltas(
            ranked
                .rows()
                .map(|row| row.returns.values()[column] - bench_values[column]),
        )
    });

    let rows = ranked
        .rows()
        .map(|row| {
            let cells = if row.label == benchmark.label {
                [CellStyle::BENCHMARK; 5]
            } else {
                let values = row.returns.values();
                std::array::from_fn(|column| {
                    relative_style(values[column], bench_values[column], &deviations[column])
                })
            };
            StyledRow {
                label: row.label.clone(),
                cells,
            }
        })
        .collect();

    StyleGrid { rows }
}

pub fn style_absolute(rows: &[LabeledRow]) -> StyleGrid {
    let ranges: [(f64, f64); 5] = std::array::from_fn(|column| {
        rows.iter()
            .map(|row| row.returns.values()[column])
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), value| {
                (min.min(value), max.max(value))
            })
    });

    let rows = rows
        .iter()
        .map(|row| {
            let values = row.returns.values();
            StyledRow {
                label: row.label.clone(),
                cells: std::array::from_fn(|column| {
                    let (min, max) = ranges[column];
                    absolute_style(values[column], min, max)
                }),
            }
        })
        .collect();

    StyleGrid { rows }
}

pub fn style_display(table: &DisplayTable) -> StyleGrid {
    match table {
        DisplayTable::Ranked(ranked) => style_ranked(ranked),
        DisplayTable::Unranked { rows } => style_absolute(rows),
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::performance::PerformanceTable;
    use crate::ranking::rank_against_benchmark;
    use crate::PerformanceRow;

    fn row(label: &str, ytd: f64) -> LabeledRow {
        LabeledRow {
            label: label.to_owned(),
            returns: PerformanceRow {
                one_day: 0.0,
                wtd: 0.0,
                mtd: 0.0,
                qtd: 0.0,
                ytd,
            },
        }
    }

    #[test]
    fn gains_and_losses_scale_by_their_own_side() {
        let deviation = ColumnDeviation::from_deltas([0.04, 0.02, -0.01, 0.0]);
        assert_eq!(deviation.max_gain, Some(0.04));
        assert_eq!(deviation.max_loss, Some(0.01));

        let half = relative_style(0.07, 0.05, &deviation);
        assert_eq!(half.tone, Tone::Gain);
        assert_relative_eq!(half.intensity, 0.5, epsilon = 1e-12);

        let full_loss = relative_style(0.04, 0.05, &deviation);
        assert_eq!(full_loss.tone, Tone::Loss);
        assert_relative_eq!(full_loss.intensity, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn zero_delta_is_neutral() {
        let deviation = ColumnDeviation::from_deltas([0.01, -0.01]);
        assert_eq!(relative_style(0.05, 0.05, &deviation), CellStyle::NEUTRAL);
    }

    #[test]
    fn missing_side_maximum_is_neutral() {
        let deviation = ColumnDeviation::from_deltas([0.01]);
        assert_eq!(relative_style(0.0, 0.05, &deviation), CellStyle::NEUTRAL);
    }

    #[test]
    fn intensity_is_clamped() {
        // A stale deviation smaller than the gap must not exceed 1.
        let deviation = ColumnDeviation {
            max_gain: Some(0.01),
            max_loss: None,
        };
        assert_eq!(relative_style(0.5, 0.0, &deviation).intensity, 1.0);
    }

    #[test]
    fn benchmark_row_is_always_neutral_gray() {
        let table = PerformanceTable::new(vec![row("Bench", 0.05), row("A", 0.08), row("B", 0.01)]);
        let ranked = rank_against_benchmark(&table, "Bench", Period::YearToDate).expect("ranked");
        let grid = style_ranked(&ranked);

        assert_eq!(grid.get("Bench", Period::YearToDate), Some(CellStyle::BENCHMARK));
        assert_eq!(grid.get("A", Period::YearToDate).map(|s| s.tone), Some(Tone::Gain));
        assert_eq!(grid.get("B", Period::YearToDate).map(|s| s.tone), Some(Tone::Loss));
        assert_eq!(grid.get("A", Period::OneDay), Some(CellStyle::NEUTRAL));
    }

    #[test]
    fn absolute_scale_spans_column_range() {
        let grid = style_absolute(&[row("A", -0.02), row("B", 0.0), row("C", 0.02)]);
        assert_relative_eq!(grid.get("A", Period::YearToDate).expect("cell").intensity, 0.0);
        assert_relative_eq!(grid.get("B", Period::YearToDate).expect("cell").intensity, 0.5);
        assert_relative_eq!(grid.get("C", Period::YearToDate).expect("cell").intensity, 1.0);
        // Flat column.
        assert_eq!(grid.get("A", Period::OneDay), Some(CellStyle::NEUTRAL));
    }
}
