//! Request-level orchestration: fetch through the cache, compute, package.
//!
//! A [`Dashboard`] is built once per process and shared. Each section call
//! recomputes from cached price frames; only provider output is memoized.

use std::sync::Arc;

use serde::Serialize;
use time::Date;
use tracing::{info, warn};

use crate::cache::{CacheKey, CacheLookup, PriceCache};
use crate::calendar::years_before;
use crate::correlation::{correlation_matrix, rolling_returns, CorrelationMatrix, RollingRow};
use crate::data_source::{PriceRequest, PriceSource, SourceError};
use crate::performance::{calculate_performance, Exclusion, ExclusionReason, PerformanceOutcome};
use crate::ranking::{arrange, chart_series, DisplayTable};
use crate::styling::{style_display, CellStyle};
use crate::{
    DashboardConfig, InstrumentSet, Period, PerformanceRow, PriceFrame, ProviderId, SetKind,
    Universe, ValidationError,
};

/// Overall state of one dashboard section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionStatus {
    Ok,
    /// The provider returned nothing usable.
    NoData,
    /// Data arrived but no instrument could be computed.
    CouldNotCalculate,
    /// The provider could not be reached.
    SourceUnavailable,
}

/// Where a row sits relative to the benchmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowGroup {
    Above,
    Benchmark,
    Below,
    /// Benchmark missing; rows keep set order.
    Unranked,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub label: String,
    pub group: RowGroup,
    pub returns: PerformanceRow,
    /// One style per column in [`Period::ALL`] order.
    pub styles: [CellStyle; 5],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartBar {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceReport {
    pub set: SetKind,
    pub title: String,
    pub benchmark: Option<String>,
    pub sort: Period,
    #[serde(with = "crate::domain::iso_date")]
    pub as_of: Date,
    #[serde(with = "crate::domain::iso_date")]
    pub start: Date,
    pub status: SectionStatus,
    pub rows: Vec<ReportRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub benchmark_position: Option<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exclusions: Vec<Exclusion>,
    /// Values for `sort`, best to worst.
    pub chart: Vec<ChartBar>,
    pub cache_hit: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl PerformanceReport {
    pub fn row(&self, label: &str) -> Option<&ReportRow> {
        self.rows.iter().find(|row| row.label == label)
    }

    pub fn labels(&self) -> Vec<&str> {
        self.rows.iter().map(|row| row.label.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskReport {
    #[serde(with = "crate::domain::iso_date")]
    pub as_of: Date,
    #[serde(with = "crate::domain::iso_date")]
    pub start: Date,
    pub status: SectionStatus,
    pub correlation: Option<CorrelationMatrix>,
    pub rolling_window: usize,
    pub rolling_labels: Vec<String>,
    /// Percent returns over the window, only dates where every column is defined.
    pub rolling: Vec<RollingRow>,
    pub cache_hit: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

pub struct Dashboard {
    source: Arc<dyn PriceSource>,
    cache: PriceCache,
    config: DashboardConfig,
    universe: Universe,
}

impl Dashboard {
    pub fn new(source: Arc<dyn PriceSource>, config: DashboardConfig) -> Result<Self, ValidationError> {
        config.validate()?;
        let universe = config.universe()?;
        Ok(Self {
            source,
            cache: PriceCache::new(config.cache_ttl()),
            config,
            universe,
        })
    }

    /// Share an existing cache instead of the one built from config.
    pub fn with_cache(mut self, cache: PriceCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn cache(&self) -> &PriceCache {
        &self.cache
    }

    pub fn source_id(&self) -> ProviderId {
        self.source.id()
    }

    /// Provider frame for `set` from `start`; not cut to any reference date.
    async fn load_frame(&self, set: &InstrumentSet, start: Date) -> Result<CacheLookup, SourceError> {
        let key = CacheKey::new(set.name(), start);
        self.cache
            .get_or_fetch(key, move || async move {
                let request = PriceRequest::new(set.tickers(), start)?;
                let batch = self.source.fetch(request).await?;
                Ok::<_, SourceError>(PriceFrame::from_fetched(set, &batch.series))
            })
            .await
    }

    /// Ranked, styled performance table for one set as of `today`.
    pub async fn performance_section(
        &self,
        kind: SetKind,
        today: Date,
        sort: Period,
    ) -> PerformanceReport {
        let set = self.universe.set(kind);
        let start = years_before(today, self.config.performance_lookback_years);
        let mut report = PerformanceReport {
            set: kind,
            title: format!("{} Performance", kind.title()),
            benchmark: set.benchmark().map(str::to_owned),
            sort,
            as_of: today,
            start,
            status: SectionStatus::Ok,
            rows: Vec::new(),
            benchmark_position: None,
            exclusions: Vec::new(),
            chart: Vec::new(),
            cache_hit: false,
            warnings: Vec::new(),
        };

        let lookup = match self.load_frame(set, start).await {
            Ok(lookup) => lookup,
            Err(error) => {
                warn!(set = %kind, %error, "price source unavailable");
                report.status = SectionStatus::SourceUnavailable;
                report.warnings.push(format!("could not load {kind} prices: {error}"));
                return report;
            }
        };
        report.cache_hit = lookup.hit;
        let frame = lookup.frame.until(today);

        let outcome = calculate_performance(&frame, today);
        report.exclusions = outcome.exclusions().to_vec();
        report
            .warnings
            .extend(report.exclusions.iter().map(describe_exclusion));

        let table = match outcome {
            PerformanceOutcome::NoData => {
                warn!(set = %kind, "no price data returned");
                report.status = SectionStatus::NoData;
                report
                    .warnings
                    .push(format!("no market data available for the {kind} set"));
                return report;
            }
            PerformanceOutcome::CouldNotCalculate { .. } => {
                warn!(set = %kind, "every instrument excluded");
                report.status = SectionStatus::CouldNotCalculate;
                report
                    .warnings
                    .push(format!("could not calculate performance for the {kind} set"));
                return report;
            }
            PerformanceOutcome::Calculated { table, .. } => table,
        };

        let display = arrange(&table, set.benchmark(), sort);
        if let (Some(benchmark), None) = (set.benchmark(), display.as_ranked()) {
            report
                .warnings
                .push(format!("benchmark '{benchmark}' has no data; showing unranked table"));
        }
        let styles = style_display(&display);

        report.benchmark_position = display.as_ranked().map(|ranked| ranked.benchmark_position());
        report.rows = display
            .rows()
            .zip(&styles.rows)
            .map(|(row, styled)| ReportRow {
                label: row.label.clone(),
                group: group_of(&display, &row.label, &row.returns, sort),
                returns: row.returns,
                styles: styled.cells,
            })
            .collect();
        report.chart = chart_series(&table, sort)
            .into_iter()
            .map(|(label, value)| ChartBar { label, value })
            .collect();

        info!(set = %kind, rows = report.rows.len(), cache_hit = report.cache_hit, "performance section ready");
        report
    }

    /// Correlation matrix and rolling returns across the combined universe.
    pub async fn risk_section(&self, today: Date) -> RiskReport {
        let start = years_before(today, self.config.correlation_lookback_years);
        let window = self.config.rolling_window;
        let mut report = RiskReport {
            as_of: today,
            start,
            status: SectionStatus::Ok,
            correlation: None,
            rolling_window: window,
            rolling_labels: Vec::new(),
            rolling: Vec::new(),
            cache_hit: false,
            warnings: Vec::new(),
        };

        let combined = match self.universe.combined() {
            Ok(combined) => combined,
            Err(error) => {
                report.status = SectionStatus::CouldNotCalculate;
                report.warnings.push(error.to_string());
                return report;
            }
        };

        let lookup = match self.load_frame(&combined, start).await {
            Ok(lookup) => lookup,
            Err(error) => {
                warn!(%error, "price source unavailable for risk section");
                report.status = SectionStatus::SourceUnavailable;
                report.warnings.push(format!("could not load prices: {error}"));
                return report;
            }
        };
        report.cache_hit = lookup.hit;
        let frame = lookup.frame.until(today);

        if frame.is_empty() {
            report.status = SectionStatus::NoData;
            report
                .warnings
                .push(String::from("no market data available for correlation analysis"));
            return report;
        }

        let aligned = frame.align();
        let rolling = rolling_returns(&aligned, window);
        report.rolling = rolling.complete_rows();
        if report.rolling.is_empty() {
            report.warnings.push(format!(
                "not enough shared history for {window}-day rolling returns"
            ));
        }
        report.rolling_labels = rolling.labels().into_iter().map(str::to_owned).collect();
        report.correlation = Some(correlation_matrix(&aligned));
        report
    }
}

fn group_of(display: &DisplayTable, label: &str, returns: &PerformanceRow, sort: Period) -> RowGroup {
    let Some(ranked) = display.as_ranked() else {
        return RowGroup::Unranked;
    };
    if ranked.benchmark().label == label {
        RowGroup::Benchmark
    } else if returns.get(sort) > ranked.benchmark().returns.get(sort) {
        RowGroup::Above
    } else {
        RowGroup::Below
    }
}

fn describe_exclusion(exclusion: &Exclusion) -> String {
    match exclusion.reason {
        ExclusionReason::InsufficientHistory { observations } => format!(
            "{} excluded: only {observations} observation(s)",
            exclusion.label
        ),
        ExclusionReason::UnresolvedStart { period } => format!(
            "{} excluded: no price before the {} window",
            exclusion.label,
            period.as_str().to_ascii_uppercase()
        ),
    }
}
