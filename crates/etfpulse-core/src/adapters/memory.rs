use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::data_source::{PriceBatch, PriceRequest, PriceSource, SourceError};
use crate::{PriceSeries, ProviderId, Ticker};

/// Serves fixed series, trimmed to the requested start date.
///
/// Clones share the fetch counter.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    series: HashMap<Ticker, PriceSeries>,
    failure: Option<SourceError>,
    calls: Arc<AtomicUsize>,
}

impl InMemorySource {
    pub fn new(series: HashMap<Ticker, PriceSeries>) -> Self {
        Self {
            series,
            ..Self::default()
        }
    }

    /// A source whose every fetch fails with `error`.
    pub fn failing(error: SourceError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    pub fn with_series(mut self, ticker: Ticker, series: PriceSeries) -> Self {
        self.series.insert(ticker, series);
        self
    }

    /// Number of `fetch` calls served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PriceSource for InMemorySource {
    fn id(&self) -> ProviderId {
        ProviderId::Memory
    }

    fn fetch<'a>(
        &'a self,
        req: PriceRequest,
    ) -> Pin<Box<dyn Future<Output = Result<PriceBatch, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(error) = &self.failure {
                return Err(error.clone());
            }

            let series = req
                .symbols
                .iter()
                .filter_map(|ticker| {
                    let trimmed = self.series.get(ticker)?.since(req.start);
                    (!trimmed.is_empty()).then(|| (ticker.clone(), trimmed))
                })
                .collect();
            Ok(PriceBatch { series })
        })
    }
}
