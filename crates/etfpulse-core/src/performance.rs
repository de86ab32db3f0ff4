//! To-date performance engine.
//!
//! For every instrument the engine derives five start prices (previous
//! trading day, and the close before the current week, month, quarter and
//! year) and reports `latest / start - 1`. A row is produced only when every
//! start price resolves; otherwise the instrument is excluded with a reason.

use serde::{Deserialize, Serialize};
use time::Date;
use tracing::debug;

use crate::calendar::{day_before, PeriodBoundaries};
use crate::{Period, PriceFrame, PriceSeries};

/// Fractional returns for the five reporting windows (`0.0532` = +5.32%).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRow {
    #[serde(rename = "1d")]
    pub one_day: f64,
    pub wtd: f64,
    pub mtd: f64,
    pub qtd: f64,
    pub ytd: f64,
}

impl PerformanceRow {
    pub fn get(&self, period: Period) -> f64 {
        match period {
            Period::OneDay => self.one_day,
            Period::WeekToDate => self.wtd,
            Period::MonthToDate => self.mtd,
            Period::QuarterToDate => self.qtd,
            Period::YearToDate => self.ytd,
        }
    }

    /// Values in [`Period::ALL`] order.
    pub fn values(&self) -> [f64; 5] {
        [self.one_day, self.wtd, self.mtd, self.qtd, self.ytd]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabeledRow {
    pub label: String,
    pub returns: PerformanceRow,
}

/// Why an instrument has no row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum ExclusionReason {
    /// Fewer than two observations.
    InsufficientHistory { observations: usize },
    /// No observation on or before the anchor for this period.
    UnresolvedStart { period: Period },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Exclusion {
    pub label: String,
    #[serde(flatten)]
    pub reason: ExclusionReason,
}

/// Rows in instrument-set order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PerformanceTable {
    rows: Vec<LabeledRow>,
}

impl PerformanceTable {
    pub fn new(rows: Vec<LabeledRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[LabeledRow] {
        &self.rows
    }

    pub fn get(&self, label: &str) -> Option<&PerformanceRow> {
        self.rows
            .iter()
            .find(|row| row.label == label)
            .map(|row| &row.returns)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.get(label).is_some()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Whole-set result of a performance calculation.
#[derive(Debug, Clone, PartialEq)]
pub enum PerformanceOutcome {
    /// The provider returned no usable series for the set.
    NoData,
    /// Data arrived but every instrument was excluded.
    CouldNotCalculate { exclusions: Vec<Exclusion> },
    Calculated {
        table: PerformanceTable,
        exclusions: Vec<Exclusion>,
    },
}

impl PerformanceOutcome {
    pub fn table(&self) -> Option<&PerformanceTable> {
        match self {
            Self::Calculated { table, .. } => Some(table),
            _ => None,
        }
    }

    pub fn exclusions(&self) -> &[Exclusion] {
        match self {
            Self::NoData => &[],
            Self::CouldNotCalculate { exclusions } | Self::Calculated { exclusions, .. } => {
                exclusions
            }
        }
    }
}

/// Start price for the year-to-date window.
///
/// Uses the last close of the prior calendar year. An instrument with no
/// prior-year history falls back to its first close of the current year, so
/// a newly listed fund reports a since-inception figure instead of nothing.
pub fn year_start_price(series: &PriceSeries, today: Date) -> Option<f64> {
    series
        .last_in_year(today.year() - 1)
        .or_else(|| series.first_in_year(today.year()))
}

/// Start price for one period, or `None` when the series cannot anchor it.
pub fn start_price(
    series: &PriceSeries,
    boundaries: &PeriodBoundaries,
    period: Period,
) -> Option<f64> {
    match period {
        Period::OneDay => series.previous().map(|point| point.close),
        Period::YearToDate => year_start_price(series, boundaries.today),
        Period::WeekToDate | Period::MonthToDate | Period::QuarterToDate => {
            let anchor = boundaries.start_of(period)?;
            series.as_of(day_before(anchor))
        }
    }
}

/// Compute one instrument's row.
pub fn compute_row(
    series: &PriceSeries,
    boundaries: &PeriodBoundaries,
) -> Result<PerformanceRow, ExclusionReason> {
    let (Some(latest), Some(_)) = (series.latest(), series.previous()) else {
        return Err(ExclusionReason::InsufficientHistory {
            observations: series.len(),
        });
    };

    let mut values = [0.0; 5];
    for period in Period::ALL {
        let start = start_price(series, boundaries, period)
            .ok_or(ExclusionReason::UnresolvedStart { period })?;
        values[period.index()] = latest.close / start - 1.0;
    }

    let [one_day, wtd, mtd, qtd, ytd] = values;
    Ok(PerformanceRow {
        one_day,
        wtd,
        mtd,
        qtd,
        ytd,
    })
}

/// Compute rows for every series in the frame relative to `today`.
pub fn calculate_performance(frame: &PriceFrame, today: Date) -> PerformanceOutcome {
    if frame.is_empty() {
        return PerformanceOutcome::NoData;
    }

    let boundaries = PeriodBoundaries::resolve(today);
    let mut rows = Vec::with_capacity(frame.len());
    let mut exclusions = Vec::new();

    for column in frame.columns() {
        match compute_row(&column.series, &boundaries) {
            Ok(returns) => rows.push(LabeledRow {
                label: column.label.clone(),
                returns,
            }),
            Err(reason) => {
                debug!(label = %column.label, ?reason, "excluding instrument from performance table");
                exclusions.push(Exclusion {
                    label: column.label.clone(),
                    reason,
                });
            }
        }
    }

    if rows.is_empty() {
        return PerformanceOutcome::CouldNotCalculate { exclusions };
    }

    PerformanceOutcome::Calculated {
        table: PerformanceTable::new(rows),
        exclusions,
    }
}
