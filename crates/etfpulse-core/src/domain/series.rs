use serde::{Deserialize, Serialize};
use time::Date;

use crate::ValidationError;

/// One adjusted close observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    #[serde(with = "crate::domain::iso_date")]
    pub date: Date,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: Date, close: f64) -> Result<Self, ValidationError> {
        if !close.is_finite() || close <= 0.0 {
            return Err(ValidationError::InvalidPrice {
                date: super::iso_date::format(date),
                value: close.to_string(),
            });
        }
        Ok(Self { date, close })
    }
}

/// Daily closing prices for one instrument.
///
/// Dates are strictly increasing. Gaps (weekends, holidays, halts) are simply
/// absent; nothing is ever forward-filled.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series from observations in any order.
    ///
    /// Observations are sorted by date and a repeated date keeps its last
    /// observation, so the strictly-increasing invariant always holds.
    pub fn new(mut points: Vec<PricePoint>) -> Result<Self, ValidationError> {
        for point in &points {
            PricePoint::new(point.date, point.close)?;
        }

        points.sort_by_key(|point| point.date);

        let mut deduped: Vec<PricePoint> = Vec::with_capacity(points.len());
        for point in points {
            match deduped.last_mut() {
                Some(last) if last.date == point.date => *last = point,
                _ => deduped.push(point),
            }
        }

        Ok(Self { points: deduped })
    }

    /// Convenience constructor from `(date, close)` pairs.
    pub fn from_pairs<I>(pairs: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (Date, f64)>,
    {
        let points = pairs
            .into_iter()
            .map(|(date, close)| PricePoint::new(date, close))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(points)
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    /// Most recent observation.
    pub fn latest(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// Observation immediately before the latest one (previous trading day).
    pub fn previous(&self) -> Option<&PricePoint> {
        self.points.len().checked_sub(2).map(|index| &self.points[index])
    }

    /// Price at the latest observation dated on or before `date`.
    ///
    /// Returns `None` when `date` precedes the first observation.
    pub fn as_of(&self, date: Date) -> Option<f64> {
        let upper = self.points.partition_point(|point| point.date <= date);
        upper
            .checked_sub(1)
            .map(|index| self.points[index].close)
    }

    /// Exact-date lookup, no carry-forward.
    pub fn price_on(&self, date: Date) -> Option<f64> {
        self.points
            .binary_search_by_key(&date, |point| point.date)
            .ok()
            .map(|index| self.points[index].close)
    }

    /// Last close observed during calendar `year`.
    pub fn last_in_year(&self, year: i32) -> Option<f64> {
        self.points
            .iter()
            .rev()
            .find(|point| point.date.year() == year)
            .map(|point| point.close)
    }

    /// First close observed during calendar `year`.
    pub fn first_in_year(&self, year: i32) -> Option<f64> {
        self.points
            .iter()
            .find(|point| point.date.year() == year)
            .map(|point| point.close)
    }

    /// Observations dated on or after `start`.
    pub fn since(&self, start: Date) -> Self {
        let from = self.points.partition_point(|point| point.date < start);
        Self {
            points: self.points[from..].to_vec(),
        }
    }

    /// Observations dated on or before `end`.
    pub fn until(&self, end: Date) -> Self {
        let to = self.points.partition_point(|point| point.date <= end);
        Self {
            points: self.points[..to].to_vec(),
        }
    }
}

impl<'de> Deserialize<'de> for PriceSeries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            points: Vec<PricePoint>,
        }

        let raw = Raw::deserialize(deserializer)?;
        Self::new(raw.points).map_err(serde::de::Error::custom)
    }
}
