use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use serde::Deserialize;
use time::{Date, Duration, OffsetDateTime};
use tracing::{debug, warn};

use crate::data_source::{PriceBatch, PriceRequest, PriceSource, SourceError};
use crate::http_client::{HttpAuth, HttpClient, HttpRequest, ReqwestHttpClient};
use crate::{PricePoint, PriceSeries, ProviderId, Ticker};

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Daily adjusted closes from the Yahoo v8 chart endpoint.
///
/// One request per symbol. Dividends and splits are folded in through the
/// `adjclose` indicator; when Yahoo omits it the raw close is used.
#[derive(Clone)]
pub struct YahooAdapter {
    http_client: Arc<dyn HttpClient>,
    auth: HttpAuth,
    base_url: String,
    timeout_ms: u64,
    retry_delay: StdDuration,
    end: Option<Date>,
}

impl Default for YahooAdapter {
    fn default() -> Self {
        Self::with_http_client(Arc::new(ReqwestHttpClient::new()), HttpAuth::None)
    }
}

impl YahooAdapter {
    pub fn with_http_client(http_client: Arc<dyn HttpClient>, auth: HttpAuth) -> Self {
        Self {
            http_client,
            auth,
            base_url: String::from(DEFAULT_BASE_URL),
            timeout_ms: 10_000,
            retry_delay: StdDuration::from_secs(1),
            end: None,
        }
    }

    /// Production adapter; `YAHOO_COOKIE` is sent when set.
    pub fn from_env() -> Self {
        Self::with_http_client(
            Arc::new(ReqwestHttpClient::new()),
            HttpAuth::cookie_from(std::env::var("YAHOO_COOKIE").ok()),
        )
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Pause before the single retry after HTTP 429.
    pub fn with_retry_delay(mut self, retry_delay: StdDuration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    /// Last session to request (inclusive); defaults to now.
    pub fn with_end(mut self, end: Date) -> Self {
        self.end = Some(end);
        self
    }

    fn chart_url(&self, ticker: &Ticker, start: Date) -> String {
        let period1 = start.midnight().assume_utc().unix_timestamp();
        let period2 = match self.end {
            Some(end) => (end + Duration::days(1)).midnight().assume_utc().unix_timestamp(),
            None => OffsetDateTime::now_utc().unix_timestamp(),
        };
        format!(
            "{}/v8/finance/chart/{}?period1={period1}&period2={period2}&interval=1d&events=div%2Csplits&includeAdjustedClose=true",
            self.base_url,
            urlencoding::encode(ticker.as_str()),
        )
    }

    fn request(&self, url: &str) -> HttpRequest {
        HttpRequest::get(url)
            .with_header("accept", "application/json")
            .with_timeout_ms(self.timeout_ms)
            .with_auth(&self.auth)
    }

    async fn fetch_symbol(&self, ticker: &Ticker, start: Date) -> SymbolOutcome {
        let url = self.chart_url(ticker, start);
        debug!(%ticker, %url, "requesting yahoo chart");

        let mut response = match self.http_client.execute(self.request(&url)).await {
            Ok(response) => response,
            Err(error) => {
                return SymbolOutcome::Failed(SourceError::unavailable(format!(
                    "yahoo transport error: {}",
                    error.message()
                )))
            }
        };

        if response.status == 429 {
            debug!(%ticker, "yahoo rate limited; retrying once");
            tokio::time::sleep(self.retry_delay).await;
            response = match self.http_client.execute(self.request(&url)).await {
                Ok(response) => response,
                Err(error) => {
                    return SymbolOutcome::Failed(SourceError::unavailable(format!(
                        "yahoo transport error on retry: {}",
                        error.message()
                    )))
                }
            };
            if response.status == 429 {
                return SymbolOutcome::Failed(SourceError::rate_limited(
                    "yahoo returned status 429 after retry",
                ));
            }
        }

        if response.status == 404 {
            return SymbolOutcome::Missing;
        }
        if !response.is_success() {
            return SymbolOutcome::Failed(SourceError::unavailable(format!(
                "yahoo returned status {}",
                response.status
            )));
        }

        match parse_chart(&response.body, start) {
            Ok(Some(series)) if !series.is_empty() => SymbolOutcome::Fetched(series),
            Ok(_) => SymbolOutcome::Missing,
            Err(error) => SymbolOutcome::Failed(error),
        }
    }
}

enum SymbolOutcome {
    Fetched(PriceSeries),
    Missing,
    Failed(SourceError),
}

impl PriceSource for YahooAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Yahoo
    }

    fn fetch<'a>(
        &'a self,
        req: PriceRequest,
    ) -> Pin<Box<dyn Future<Output = Result<PriceBatch, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            let mut batch = PriceBatch::default();
            let mut failures = Vec::new();

            for ticker in &req.symbols {
                match self.fetch_symbol(ticker, req.start).await {
                    SymbolOutcome::Fetched(series) => {
                        batch.series.insert(ticker.clone(), series);
                    }
                    SymbolOutcome::Missing => {
                        warn!(%ticker, "yahoo returned no data; omitting symbol");
                    }
                    SymbolOutcome::Failed(error) => {
                        warn!(%ticker, %error, "yahoo request failed; omitting symbol");
                        failures.push(error);
                    }
                }
            }

            if batch.series.is_empty() {
                if let Some(first) = failures.into_iter().next() {
                    return Err(first);
                }
            }
            Ok(batch)
        })
    }
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Debug, Default, Deserialize)]
struct ChartMeta {
    /// Exchange offset from UTC in seconds.
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<ChartQuote>,
    #[serde(default)]
    adjclose: Vec<ChartAdjClose>,
}

#[derive(Debug, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct ChartAdjClose {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}

/// Parse a chart payload into closes on exchange-local dates from `start`.
///
/// `Ok(None)` means Yahoo does not know the symbol.
fn parse_chart(body: &str, start: Date) -> Result<Option<PriceSeries>, SourceError> {
    let envelope: ChartEnvelope = serde_json::from_str(body)
        .map_err(|e| SourceError::internal(format!("failed to parse yahoo chart: {e}")))?;

    if let Some(error) = envelope.chart.error {
        if error.code.eq_ignore_ascii_case("not found") {
            return Ok(None);
        }
        return Err(SourceError::unavailable(format!(
            "yahoo chart API error: {} {}",
            error.code,
            error.description.unwrap_or_default()
        )));
    }

    let Some(result) = envelope
        .chart
        .result
        .and_then(|results| results.into_iter().next())
    else {
        return Ok(None);
    };

    let closes = result
        .indicators
        .adjclose
        .into_iter()
        .next()
        .map(|block| block.adjclose)
        .filter(|values| !values.is_empty())
        .or_else(|| {
            result
                .indicators
                .quote
                .into_iter()
                .next()
                .map(|block| block.close)
        })
        .unwrap_or_default();

    let mut points = Vec::with_capacity(result.timestamp.len());
    for (index, ts) in result.timestamp.iter().enumerate() {
        let Some(Some(close)) = closes.get(index).copied() else {
            continue;
        };
        let local = OffsetDateTime::from_unix_timestamp(ts + result.meta.gmtoffset)
            .map_err(|e| SourceError::internal(format!("invalid yahoo timestamp {ts}: {e}")))?;
        let date = local.date();
        if date < start {
            continue;
        }
        match PricePoint::new(date, close) {
            Ok(point) => points.push(point),
            Err(error) => debug!(%error, "skipping unusable yahoo close"),
        }
    }

    PriceSeries::new(points).map(Some).map_err(SourceError::from)
}
