//! # etfpulse core
//!
//! Multi-period performance and cross-asset correlation for a fixed universe
//! of exchange-traded funds, each set measured against its own benchmark.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`domain`] | Tickers, price series, instrument sets, frames, periods |
//! | [`calendar`] | Week, month, quarter and year anchors |
//! | [`performance`] | 1D/WTD/MTD/QTD/YTD returns with row exclusion |
//! | [`ranking`] | Benchmark-anchored ordering and chart series |
//! | [`styling`] | Renderer-free color intensity per cell |
//! | [`correlation`] | Daily-return correlation and rolling one-year returns |
//! | [`cache`] | Expiring single-flight cache of price frames |
//! | [`data_source`] | Price source trait and request/response types |
//! | [`adapters`] | Yahoo, synthetic and in-memory sources |
//! | [`http_client`] | HTTP transport seam |
//! | [`config`] | Dashboard configuration |
//! | [`dashboard`] | Section orchestration |
//! | [`envelope`] | Response envelope with metadata |
//! | [`error`] | Core error types |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use etfpulse_core::{Dashboard, DashboardConfig, Period, SetKind, SyntheticSource};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let today = time::macros::date!(2024 - 05 - 17);
//!     let dashboard = Dashboard::new(Arc::new(SyntheticSource::new(today)), DashboardConfig::default())?;
//!
//!     let report = dashboard.performance_section(SetKind::Factor, today, Period::YearToDate).await;
//!     for row in &report.rows {
//!         println!("{:<32} {:>7.2}%", row.label, row.returns.ytd * 100.0);
//!     }
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cache;
pub mod calendar;
pub mod config;
pub mod correlation;
pub mod dashboard;
pub mod data_source;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod http_client;
pub mod performance;
pub mod ranking;
pub mod source;
pub mod styling;

pub use adapters::{InMemorySource, SyntheticSource, YahooAdapter};
pub use cache::{CacheKey, CacheLookup, PriceCache};
pub use calendar::PeriodBoundaries;
pub use config::{DashboardConfig, SetDefinition, SetOverrides};
pub use correlation::{
    correlation_matrix, daily_returns, pearson, rolling_returns, CorrelationMatrix, ReturnTable,
    RollingReturns, RollingRow, TRADING_DAYS_PER_YEAR,
};
pub use dashboard::{
    ChartBar, Dashboard, PerformanceReport, ReportRow, RiskReport, RowGroup, SectionStatus,
};
pub use data_source::{PriceBatch, PriceRequest, PriceSource, SourceError, SourceErrorKind};
pub use domain::{
    AlignedPrices, Instrument, InstrumentSet, LabeledSeries, Period, PriceFrame, PricePoint,
    PriceSeries, SetKind, Ticker, Universe,
};
pub use envelope::{Envelope, EnvelopeError, EnvelopeMeta, SCHEMA_VERSION};
pub use error::{CoreError, ValidationError};
pub use http_client::{HttpAuth, HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};
pub use performance::{
    calculate_performance, compute_row, Exclusion, ExclusionReason, LabeledRow, PerformanceOutcome,
    PerformanceRow, PerformanceTable,
};
pub use ranking::{arrange, chart_series, rank_against_benchmark, DisplayTable, RankedTable};
pub use source::ProviderId;
pub use styling::{style_display, CellStyle, ColumnDeviation, StyleGrid, StyledRow, Tone};
