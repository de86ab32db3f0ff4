//! Price source contract and request/response types.
//!
//! A [`PriceSource`] turns a list of tickers and a start date into daily
//! adjusted closing prices. Unknown or delisted tickers are simply absent
//! from the returned [`PriceBatch`]; only a source that cannot serve any
//! ticker at all reports a [`SourceError`].
//!
//! ```rust,ignore
//! use etfpulse_core::{PriceRequest, PriceSource, Ticker};
//!
//! async fn load(source: &dyn PriceSource) -> Result<(), etfpulse_core::SourceError> {
//!     let request = PriceRequest::new(vec![Ticker::parse("SPY")?], start)?;
//!     let batch = source.fetch(request).await?;
//!     for (ticker, series) in &batch.series {
//!         println!("{ticker}: {} closes", series.len());
//!     }
//!     Ok(())
//! }
//! ```

use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use time::Date;

use crate::{PriceSeries, ProviderId, Ticker, ValidationError};

/// Source-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    Unavailable,
    RateLimited,
    InvalidRequest,
    Internal,
}

/// Structured error returned when a source cannot serve a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
    retryable: bool,
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::RateLimited,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
            retryable: false,
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::RateLimited => "source.rate_limited",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

impl From<ValidationError> for SourceError {
    fn from(value: ValidationError) -> Self {
        Self::invalid_request(value.to_string())
    }
}

/// Daily closes for `symbols` from `start` (inclusive) to the latest session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceRequest {
    pub symbols: Vec<Ticker>,
    pub start: Date,
}

impl PriceRequest {
    /// Builds a request, dropping repeated tickers while keeping first-seen order.
    pub fn new(symbols: Vec<Ticker>, start: Date) -> Result<Self, SourceError> {
        if symbols.is_empty() {
            return Err(SourceError::invalid_request(
                "price request must include at least one symbol",
            ));
        }
        let mut unique: Vec<Ticker> = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            if !unique.contains(&symbol) {
                unique.push(symbol);
            }
        }
        Ok(Self {
            symbols: unique,
            start,
        })
    }
}

/// Series per ticker; tickers without data are absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceBatch {
    pub series: HashMap<Ticker, PriceSeries>,
}

impl PriceBatch {
    pub fn get(&self, ticker: &Ticker) -> Option<&PriceSeries> {
        self.series.get(ticker)
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// Price provider contract.
///
/// Implementations must be `Send + Sync`; the dashboard shares one source
/// across concurrent requests.
pub trait PriceSource: Send + Sync {
    fn id(&self) -> ProviderId;

    /// Fetch adjusted daily closes.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] only when the provider is unreachable or
    /// refuses every symbol. Missing individual symbols are omitted.
    fn fetch<'a>(
        &'a self,
        req: PriceRequest,
    ) -> Pin<Box<dyn Future<Output = Result<PriceBatch, SourceError>> + Send + 'a>>;
}
