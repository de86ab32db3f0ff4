use std::future::Future;
use std::pin::Pin;

use time::{Date, Duration, Weekday};

use crate::data_source::{PriceBatch, PriceRequest, PriceSource, SourceError};
use crate::{PricePoint, PriceSeries, ProviderId, Ticker};

const DEFAULT_SEED: u64 = 0x5EED_E7F5;

/// Seeded random walk over weekdays ending at a fixed date.
///
/// The walk is generated backwards from `end`, so the closes for a given
/// ticker and end date do not depend on the requested start date.
#[derive(Debug, Clone)]
pub struct SyntheticSource {
    end: Date,
    seed: u64,
}

impl SyntheticSource {
    pub fn new(end: Date) -> Self {
        Self {
            end,
            seed: DEFAULT_SEED,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn end(&self) -> Date {
        self.end
    }

    /// Closes for `ticker` on every weekday in `[start, end]`.
    pub fn series(&self, ticker: &Ticker, start: Date) -> PriceSeries {
        let mut rng = fastrand::Rng::with_seed(self.seed ^ symbol_seed(ticker));
        let drift = 0.0002 + rng.f64() * 0.0004;
        let volatility = 0.006 + rng.f64() * 0.012;
        let mut close = 40.0 + rng.f64() * 360.0;

        let mut points = Vec::new();
        let mut day = self.end;
        while day >= start {
            if !matches!(day.weekday(), Weekday::Saturday | Weekday::Sunday) {
                if let Ok(point) = PricePoint::new(day, close) {
                    points.push(point);
                }
                let shock = (rng.f64() * 2.0 - 1.0) * volatility;
                close /= 1.0 + drift + shock;
            }
            match day.checked_sub(Duration::days(1)) {
                Some(previous) => day = previous,
                None => break,
            }
        }

        points.reverse();
        PriceSeries::new(points).unwrap_or_default()
    }
}

impl PriceSource for SyntheticSource {
    fn id(&self) -> ProviderId {
        ProviderId::Synthetic
    }

    fn fetch<'a>(
        &'a self,
        req: PriceRequest,
    ) -> Pin<Box<dyn Future<Output = Result<PriceBatch, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            let series = req
                .symbols
                .iter()
                .map(|ticker| (ticker.clone(), self.series(ticker, req.start)))
                .filter(|(_, series)| !series.is_empty())
                .collect();
            Ok(PriceBatch { series })
        })
    }
}

fn symbol_seed(ticker: &Ticker) -> u64 {
    ticker.as_str().bytes().fold(0_u64, |acc, byte| {
        acc.wrapping_mul(33).wrapping_add(u64::from(byte))
    })
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;

    fn spy() -> Ticker {
        Ticker::parse("SPY").expect("ticker")
    }

    #[test]
    fn skips_weekends() {
        let source = SyntheticSource::new(date!(2024 - 05 - 19));
        let series = source.series(&spy(), date!(2024 - 05 - 13));
        // Mon..Fri only.
        assert_eq!(series.len(), 5);
        assert_eq!(series.latest().map(|point| point.date), Some(date!(2024 - 05 - 17)));
    }

    #[test]
    fn closes_do_not_depend_on_start() {
        let source = SyntheticSource::new(date!(2024 - 05 - 17));
        let short = source.series(&spy(), date!(2024 - 05 - 01));
        let long = source.series(&spy(), date!(2023 - 05 - 01));
        for point in short.points() {
            assert_eq!(long.price_on(point.date), Some(point.close));
        }
    }

    #[test]
    fn tickers_get_different_walks() {
        let source = SyntheticSource::new(date!(2024 - 05 - 17));
        let start = date!(2024 - 05 - 01);
        let qqq = Ticker::parse("QQQ").expect("ticker");
        assert_ne!(source.series(&spy(), start), source.series(&qqq, start));
    }

    #[tokio::test]
    async fn fetch_covers_every_symbol() {
        let source = SyntheticSource::new(date!(2024 - 05 - 17));
        let request = PriceRequest::new(
            vec![spy(), Ticker::parse("QQQ").expect("ticker")],
            date!(2024 - 01 - 01),
        )
        .expect("request");
        let batch = source.fetch(request).await.expect("fetch");
        assert_eq!(batch.len(), 2);
    }
}
