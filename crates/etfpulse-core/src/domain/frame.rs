use std::collections::{BTreeSet, HashMap};

use serde::Serialize;
use time::Date;

use crate::{InstrumentSet, PriceSeries, Ticker};

/// Price series for one instrument set, keyed by label in set order.
///
/// Instruments the provider returned nothing for are absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriceFrame {
    columns: Vec<LabeledSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabeledSeries {
    pub label: String,
    pub ticker: Ticker,
    pub series: PriceSeries,
}

impl PriceFrame {
    /// Attach set labels to provider output, dropping empty series.
    pub fn from_fetched(set: &InstrumentSet, fetched: &HashMap<Ticker, PriceSeries>) -> Self {
        let mut columns = Vec::with_capacity(set.len());
        for instrument in set.instruments() {
            let Some(series) = fetched.get(&instrument.ticker) else {
                continue;
            };
            if series.is_empty() {
                continue;
            }
            columns.push(LabeledSeries {
                label: instrument.label.clone(),
                ticker: instrument.ticker.clone(),
                series: series.clone(),
            });
        }
        Self { columns }
    }

    pub fn from_columns(columns: Vec<LabeledSeries>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[LabeledSeries] {
        &self.columns
    }

    pub fn get(&self, label: &str) -> Option<&PriceSeries> {
        self.columns
            .iter()
            .find(|column| column.label == label)
            .map(|column| &column.series)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.columns.iter().map(|column| column.label.as_str()).collect()
    }

    /// Cut every series at `end`, dropping columns left without prices.
    pub fn until(&self, end: Date) -> Self {
        let columns = self
            .columns
            .iter()
            .map(|column| LabeledSeries {
                series: column.series.until(end),
                ..column.clone()
            })
            .filter(|column| !column.series.is_empty())
            .collect();
        Self { columns }
    }

    /// Lay every series on the union of all observed dates.
    pub fn align(&self) -> AlignedPrices {
        let dates: Vec<Date> = self
            .columns
            .iter()
            .flat_map(|column| column.series.points().iter().map(|point| point.date))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let columns = self
            .columns
            .iter()
            .map(|column| {
                let values = dates
                    .iter()
                    .map(|date| column.series.price_on(*date))
                    .collect();
                (column.label.clone(), values)
            })
            .collect();

        AlignedPrices { dates, columns }
    }
}

/// Prices on a shared trading calendar; `None` where an instrument did not trade.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedPrices {
    pub dates: Vec<Date>,
    pub columns: Vec<(String, Vec<Option<f64>>)>,
}
