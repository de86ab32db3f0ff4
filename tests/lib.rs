//! Shared fixtures for the behavior tests.

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;

pub use etfpulse_core::{
    domain::iso_date,
    http_client::{HttpClient, HttpError, HttpRequest, HttpResponse},
    InMemorySource, Instrument, InstrumentSet, LabeledRow, LabeledSeries, Period,
    PerformanceRow, PerformanceTable, PriceFrame, PriceSeries, Ticker,
};
use time::{Date, Duration, Weekday};

pub fn date(raw: &str) -> Date {
    iso_date::parse(raw).expect("valid date")
}

pub fn ticker(raw: &str) -> Ticker {
    Ticker::parse(raw).expect("valid ticker")
}

pub fn series(points: &[(&str, f64)]) -> PriceSeries {
    PriceSeries::from_pairs(points.iter().map(|(raw, close)| (date(raw), *close)))
        .expect("valid series")
}

/// Closes on every weekday in `[start, end]`, `close(n)` for the n-th session.
pub fn weekday_series(start: Date, end: Date, close: impl Fn(usize) -> f64) -> PriceSeries {
    let mut pairs = Vec::new();
    let mut day = start;
    while day <= end {
        if !matches!(day.weekday(), Weekday::Saturday | Weekday::Sunday) {
            pairs.push((day, close(pairs.len())));
        }
        day += Duration::days(1);
    }
    PriceSeries::from_pairs(pairs).expect("valid series")
}

pub fn column(label: &str, ticker_raw: &str, series: PriceSeries) -> LabeledSeries {
    LabeledSeries {
        label: label.to_owned(),
        ticker: ticker(ticker_raw),
        series,
    }
}

pub fn frame(columns: Vec<LabeledSeries>) -> PriceFrame {
    PriceFrame::from_columns(columns)
}

pub fn row(label: &str, values: [f64; 5]) -> LabeledRow {
    let [one_day, wtd, mtd, qtd, ytd] = values;
    LabeledRow {
        label: label.to_owned(),
        returns: PerformanceRow {
            one_day,
            wtd,
            mtd,
            qtd,
            ytd,
        },
    }
}

/// Table whose rows differ only in the YTD column.
pub fn ytd_table(rows: &[(&str, f64)]) -> PerformanceTable {
    PerformanceTable::new(
        rows.iter()
            .map(|(label, ytd)| row(label, [0.0, 0.0, 0.0, 0.0, *ytd]))
            .collect(),
    )
}

pub fn instrument_set(name: &str, entries: &[(&str, &str)], benchmark: Option<&str>) -> InstrumentSet {
    InstrumentSet::new(
        name,
        entries
            .iter()
            .map(|(label, raw)| Instrument::new(*label, raw).expect("valid instrument"))
            .collect(),
        benchmark.map(str::to_owned),
    )
    .expect("valid set")
}

pub fn memory_source(entries: &[(&str, PriceSeries)]) -> InMemorySource {
    InMemorySource::new(
        entries
            .iter()
            .map(|(raw, series)| (ticker(raw), series.clone()))
            .collect::<HashMap<_, _>>(),
    )
}

/// Yahoo chart payload with one close per session at 09:30 New York time.
pub fn yahoo_chart(closes: &[(&str, f64)]) -> String {
    let timestamps: Vec<String> = closes
        .iter()
        .map(|(raw, _)| {
            date(raw)
                .with_hms(14, 30, 0)
                .expect("valid time")
                .assume_utc()
                .unix_timestamp()
                .to_string()
        })
        .collect();
    let values: Vec<String> = closes.iter().map(|(_, close)| close.to_string()).collect();
    format!(
        r#"{{"chart":{{"result":[{{"meta":{{"gmtoffset":-14400}},"timestamp":[{ts}],"indicators":{{"quote":[{{"close":[{vals}]}}],"adjclose":[{{"adjclose":[{vals}]}}]}}}}],"error":null}}}}"#,
        ts = timestamps.join(","),
        vals = values.join(","),
    )
}

pub const YAHOO_NOT_FOUND: &str =
    r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;

/// Scripted transport: queued responses first, then `fallback` forever.
pub struct ScriptedHttpClient {
    queue: Mutex<VecDeque<Result<HttpResponse, HttpError>>>,
    fallback: HttpResponse,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedHttpClient {
    pub fn new(fallback: HttpResponse) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            fallback,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn then(self, response: Result<HttpResponse, HttpError>) -> Self {
        self.queue.lock().expect("queue lock").push_back(response);
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().expect("requests lock").clone()
    }
}

impl HttpClient for ScriptedHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        Box::pin(async move {
            self.requests.lock().expect("requests lock").push(request);
            let next = self.queue.lock().expect("queue lock").pop_front();
            next.unwrap_or_else(|| Ok(self.fallback.clone()))
        })
    }
}
