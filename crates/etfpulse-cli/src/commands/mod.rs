mod dashboard;
mod performance;
mod risk;
mod sets;

use std::sync::Arc;
use std::time::Instant;

use etfpulse_core::domain::iso_date;
use etfpulse_core::{
    Dashboard, DashboardConfig, Envelope, EnvelopeError, Period, PerformanceReport, PriceSource,
    RiskReport, SectionStatus, SyntheticSource, Universe, YahooAdapter,
};
use serde::Serialize;
use time::{Date, OffsetDateTime};
use tracing::debug;

use crate::cli::{Cli, Command};
use crate::error::CliError;
use crate::metadata::Metadata;

/// Typed payload of one command, serialized as the envelope `data`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CommandData {
    Performance {
        performance: Vec<PerformanceReport>,
    },
    Risk {
        risk: RiskReport,
    },
    Dashboard {
        performance: Vec<PerformanceReport>,
        risk: RiskReport,
    },
    Sets {
        sets: Universe,
    },
}

pub struct CommandResult {
    pub data: CommandData,
    pub warnings: Vec<String>,
    pub errors: Vec<EnvelopeError>,
    pub cache_hit: bool,
}

impl CommandResult {
    pub fn ok(data: CommandData) -> Self {
        Self {
            data,
            warnings: Vec::new(),
            errors: Vec::new(),
            cache_hit: false,
        }
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings.extend(warnings);
        self
    }

    pub fn with_errors(mut self, errors: Vec<EnvelopeError>) -> Self {
        self.errors.extend(errors);
        self
    }

    pub fn with_cache_hit(mut self, cache_hit: bool) -> Self {
        self.cache_hit = cache_hit;
        self
    }
}

pub async fn run(cli: &Cli) -> Result<Envelope<CommandData>, CliError> {
    let config = DashboardConfig::load(cli.config.as_deref())?;
    let as_of = resolve_as_of(cli.as_of.as_deref())?;
    let source = build_source(cli, &config, as_of);
    let source_id = source.id();
    let dashboard = Dashboard::new(source, config)?;
    debug!(source = %source_id, %as_of, "dashboard ready");

    let started = Instant::now();
    let command_result = match &cli.command {
        Command::Performance(args) => performance::run(args, &dashboard, as_of).await?,
        Command::Risk(_) => risk::run(&dashboard, as_of).await?,
        Command::Dashboard(args) => dashboard::run(args, &dashboard, as_of).await?,
        Command::Sets => sets::run(&dashboard),
    };
    let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    let CommandResult {
        data,
        warnings,
        errors,
        cache_hit,
    } = command_result;

    let mut metadata = Metadata::new(source_id, latency_ms, cache_hit);
    for warning in warnings {
        metadata.push_warning(warning);
    }
    let meta = metadata.into_envelope_meta()?;

    Envelope::with_errors(meta, data, errors).map_err(CliError::from)
}

fn build_source(cli: &Cli, config: &DashboardConfig, as_of: Date) -> Arc<dyn PriceSource> {
    if cli.mock {
        let mut source = SyntheticSource::new(as_of);
        if let Some(seed) = cli.seed {
            source = source.with_seed(seed);
        }
        Arc::new(source)
    } else {
        Arc::new(YahooAdapter::from_env().with_timeout_ms(config.http_timeout_ms))
    }
}

fn resolve_as_of(raw: Option<&str>) -> Result<Date, CliError> {
    match raw {
        Some(raw) => Ok(iso_date::parse(raw)?),
        None => Ok(OffsetDateTime::now_utc().date()),
    }
}

/// Sort period from `--sort`, falling back to the configured default.
fn resolve_sort(raw: Option<&str>, dashboard: &Dashboard) -> Result<Period, CliError> {
    match raw {
        Some(raw) => Ok(raw.parse::<Period>()?),
        None => Ok(dashboard.config().default_sort),
    }
}

/// Envelope error for a section that produced no table.
fn section_error(section: &str, status: SectionStatus) -> Result<Option<EnvelopeError>, CliError> {
    let error = match status {
        SectionStatus::Ok => return Ok(None),
        SectionStatus::SourceUnavailable => EnvelopeError::new(
            "source.unavailable",
            format!("{section}: price source could not be reached"),
        )?
        .with_retryable(true),
        SectionStatus::NoData => EnvelopeError::new(
            "data.no_data",
            format!("{section}: no market data available"),
        )?
        .with_retryable(true),
        SectionStatus::CouldNotCalculate => EnvelopeError::new(
            "data.could_not_calculate",
            format!("{section}: no instrument had enough history"),
        )?
        .with_retryable(false),
    };
    Ok(Some(error))
}

/// Fold performance sections into warnings, errors and a shared cache flag.
fn collect_performance(reports: &[PerformanceReport]) -> Result<(Vec<String>, Vec<EnvelopeError>, bool), CliError> {
    let mut warnings = Vec::new();
    let mut errors = Vec::new();
    for report in reports {
        warnings.extend(
            report
                .warnings
                .iter()
                .map(|warning| format!("{}: {warning}", report.set)),
        );
        if let Some(error) = section_error(&report.title, report.status)? {
            errors.push(error);
        }
    }
    let cache_hit = !reports.is_empty() && reports.iter().all(|report| report.cache_hit);
    Ok((warnings, errors, cache_hit))
}
