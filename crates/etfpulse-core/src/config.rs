//! Dashboard configuration: defaults, optional JSON file, environment overrides.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::correlation::TRADING_DAYS_PER_YEAR;
use crate::{CoreError, Instrument, InstrumentSet, Period, SetKind, Universe, ValidationError};

pub const ENV_CACHE_TTL_SECS: &str = "ETFPULSE_CACHE_TTL_SECS";
pub const ENV_HTTP_TIMEOUT_MS: &str = "ETFPULSE_HTTP_TIMEOUT_MS";

/// Replacement definition for one instrument set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SetDefinition {
    pub benchmark: String,
    pub instruments: Vec<Instrument>,
}

/// Per-kind set replacements read from the `sets` key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SetOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub factor: Option<SetDefinition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regional: Option<SetDefinition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector: Option<SetDefinition>,
}

impl SetOverrides {
    pub fn is_empty(&self) -> bool {
        self.factor.is_none() && self.regional.is_none() && self.sector.is_none()
    }

    fn get(&self, kind: SetKind) -> Option<&SetDefinition> {
        match kind {
            SetKind::Factor => self.factor.as_ref(),
            SetKind::Regional => self.regional.as_ref(),
            SetKind::Sector => self.sector.as_ref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Lifetime of a cached price frame.
    pub cache_ttl_secs: u64,
    /// History fetched for the performance tables.
    pub performance_lookback_years: u32,
    /// History fetched for correlation and rolling returns.
    pub correlation_lookback_years: u32,
    /// Trading days in the rolling return window.
    pub rolling_window: usize,
    pub default_sort: Period,
    pub http_timeout_ms: u64,
    #[serde(skip_serializing_if = "SetOverrides::is_empty")]
    pub sets: SetOverrides,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: 3_600,
            performance_lookback_years: 1,
            correlation_lookback_years: 3,
            rolling_window: TRADING_DAYS_PER_YEAR,
            default_sort: Period::YearToDate,
            http_timeout_ms: 10_000,
            sets: SetOverrides::default(),
        }
    }
}

impl DashboardConfig {
    /// Defaults, then `path` if given, then process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, CoreError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = config.with_env(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, CoreError> {
        let raw = std::fs::read_to_string(path).map_err(|source| CoreError::ConfigIo {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Apply numeric overrides from `lookup` (normally `std::env::var`).
    pub fn with_env<F>(mut self, lookup: F) -> Result<Self, ValidationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_CACHE_TTL_SECS) {
            self.cache_ttl_secs = parse_override(ENV_CACHE_TTL_SECS, &value)?;
        }
        if let Some(value) = lookup(ENV_HTTP_TIMEOUT_MS) {
            self.http_timeout_ms = parse_override(ENV_HTTP_TIMEOUT_MS, &value)?;
        }
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let checks: [(&'static str, bool); 5] = [
            ("cache_ttl_secs", self.cache_ttl_secs == 0),
            ("performance_lookback_years", self.performance_lookback_years == 0),
            ("correlation_lookback_years", self.correlation_lookback_years == 0),
            ("rolling_window", self.rolling_window == 0),
            ("http_timeout_ms", self.http_timeout_ms == 0),
        ];
        if let Some((field, _)) = checks.iter().find(|(_, zero)| *zero) {
            return Err(ValidationError::ZeroConfigValue { field: *field });
        }
        self.universe().map(|_| ())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Built-in universe with any configured sets swapped in.
    pub fn universe(&self) -> Result<Universe, ValidationError> {
        let mut universe = Universe::builtin()?;
        for kind in SetKind::ALL {
            let Some(definition) = self.sets.get(kind) else {
                continue;
            };
            let set = InstrumentSet::new(
                kind.as_str(),
                definition.instruments.clone(),
                Some(definition.benchmark.clone()),
            )?;
            match kind {
                SetKind::Factor => universe.factor = set,
                SetKind::Regional => universe.regional = set,
                SetKind::Sector => universe.sector = set,
            }
        }
        Ok(universe)
    }
}

fn parse_override<T: std::str::FromStr>(
    name: &'static str,
    value: &str,
) -> Result<T, ValidationError> {
    value
        .trim()
        .parse()
        .map_err(|_| ValidationError::InvalidEnvOverride {
            name,
            value: value.to_owned(),
        })
}
