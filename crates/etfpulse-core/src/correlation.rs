//! Cross-asset daily-return correlation and rolling one-year returns.
//!
//! Both computations run on the union trading calendar produced by
//! [`PriceFrame::align`](crate::PriceFrame::align). Gaps are never filled: a
//! return exists only where an instrument traded on both positions.

use serde::Serialize;
use time::Date;

use crate::AlignedPrices;

/// Trading days in a year, used as the rolling return window.
pub const TRADING_DAYS_PER_YEAR: usize = 252;

/// Daily simple returns on the aligned calendar.
///
/// Position 0 is always `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnTable {
    pub dates: Vec<Date>,
    pub columns: Vec<(String, Vec<Option<f64>>)>,
}

fn pct_change(values: &[Option<f64>], lag: usize) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|index| {
            let prior = index.checked_sub(lag)?;
            match (values[prior], values[index]) {
                (Some(start), Some(end)) if start != 0.0 => Some(end / start - 1.0),
                _ => None,
            }
        })
        .collect()
}

pub fn daily_returns(prices: &AlignedPrices) -> ReturnTable {
    ReturnTable {
        dates: prices.dates.clone(),
        columns: prices
            .columns
            .iter()
            .map(|(label, values)| (label.clone(), pct_change(values, 1)))
            .collect(),
    }
}

/// Pearson correlation over positions where both inputs are defined.
///
/// `None` with fewer than two overlapping pairs or when either side has no
/// variance.
pub fn pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();
    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x <= 0.0 || var_y <= 0.0 {
        return None;
    }
    let r = cov / (var_x.sqrt() * var_y.sqrt());
    r.is_finite().then(|| r.clamp(-1.0, 1.0))
}

/// Symmetric matrix of pairwise correlations, diagonal 1.0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub labels: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn from_returns(returns: &ReturnTable) -> Self {
        let size = returns.columns.len();
        let mut values = vec![vec![None; size]; size];
        for i in 0..size {
            values[i][i] = Some(1.0);
            for j in (i + 1)..size {
                let r = pearson(&returns.columns[i].1, &returns.columns[j].1);
                values[i][j] = r;
                values[j][i] = r;
            }
        }
        Self {
            labels: returns.columns.iter().map(|(label, _)| label.clone()).collect(),
            values,
        }
    }

    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.labels.iter().position(|label| label == a)?;
        let j = self.labels.iter().position(|label| label == b)?;
        self.values[i][j]
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

pub fn correlation_matrix(prices: &AlignedPrices) -> CorrelationMatrix {
    CorrelationMatrix::from_returns(&daily_returns(prices))
}

/// Trailing-window returns in percent (`5.0` = +5%).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RollingReturns {
    pub window: usize,
    #[serde(with = "crate::domain::iso_date::list")]
    pub dates: Vec<Date>,
    pub columns: Vec<(String, Vec<Option<f64>>)>,
}

/// One calendar position where every instrument has a rolling value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RollingRow {
    #[serde(with = "crate::domain::iso_date")]
    pub date: Date,
    pub values: Vec<f64>,
}

impl RollingReturns {
    pub fn labels(&self) -> Vec<&str> {
        self.columns.iter().map(|(label, _)| label.as_str()).collect()
    }

    /// Rows with no missing value in any column.
    pub fn complete_rows(&self) -> Vec<RollingRow> {
        self.dates
            .iter()
            .enumerate()
            .filter_map(|(index, date)| {
                let values = self
                    .columns
                    .iter()
                    .map(|(_, values)| values.get(index).copied().flatten())
                    .collect::<Option<Vec<f64>>>()?;
                Some(RollingRow {
                    date: *date,
                    values,
                })
            })
            .collect()
    }
}

pub fn rolling_returns(prices: &AlignedPrices, window: usize) -> RollingReturns {
    let columns = prices
        .columns
        .iter()
        .map(|(label, values)| {
            let percent = pct_change(values, window)
                .into_iter()
                .map(|value| value.map(|value| value * 100.0))
                .collect();
            (label.clone(), percent)
        })
        .collect();

    RollingReturns {
        window,
        dates: prices.dates.clone(),
        columns,
    }
}
