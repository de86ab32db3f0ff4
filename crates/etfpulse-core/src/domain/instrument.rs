use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Ticker, ValidationError};

/// Thematic grouping of the tracked universe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetKind {
    Factor,
    Regional,
    Sector,
}

impl SetKind {
    pub const ALL: [Self; 3] = [Self::Factor, Self::Regional, Self::Sector];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Factor => "factor",
            Self::Regional => "regional",
            Self::Sector => "sector",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::Factor => "Factor",
            Self::Regional => "Regional",
            Self::Sector => "Sector",
        }
    }
}

impl Display for SetKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SetKind {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "factor" | "factors" => Ok(Self::Factor),
            "regional" | "region" | "regions" => Ok(Self::Regional),
            "sector" | "sectors" => Ok(Self::Sector),
            other => Err(ValidationError::InvalidSetKind {
                value: other.to_owned(),
            }),
        }
    }
}

/// Human-readable label bound to a provider ticker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    pub label: String,
    pub ticker: Ticker,
}

impl Instrument {
    pub fn new(label: impl Into<String>, ticker: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            label: label.into(),
            ticker: Ticker::parse(ticker)?,
        })
    }
}

/// Ordered label -> ticker mapping. Insertion order is display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstrumentSet {
    name: String,
    benchmark: Option<String>,
    instruments: Vec<Instrument>,
}

impl InstrumentSet {
    /// Build a set, validating label uniqueness and benchmark membership.
    pub fn new(
        name: impl Into<String>,
        instruments: Vec<Instrument>,
        benchmark: Option<String>,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if instruments.is_empty() {
            return Err(ValidationError::EmptyInstrumentSet { set: name });
        }

        let mut seen = HashSet::with_capacity(instruments.len());
        for instrument in &instruments {
            if instrument.label.trim().is_empty() {
                return Err(ValidationError::EmptyLabel { set: name });
            }
            if !seen.insert(instrument.label.as_str()) {
                return Err(ValidationError::DuplicateLabel {
                    set: name,
                    label: instrument.label.clone(),
                });
            }
        }

        if let Some(benchmark) = &benchmark {
            if !seen.contains(benchmark.as_str()) {
                return Err(ValidationError::UnknownBenchmark {
                    set: name,
                    benchmark: benchmark.clone(),
                });
            }
        }

        Ok(Self {
            name,
            benchmark,
            instruments,
        })
    }

    /// Merge several sets for cross-asset analysis.
    ///
    /// Entries sharing a ticker collapse to the first occurrence, which keeps
    /// its label and position. The combined set has no benchmark.
    pub fn combine<'a, I>(name: impl Into<String>, sets: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = &'a InstrumentSet>,
    {
        let mut tickers = HashSet::new();
        let mut labels = HashSet::new();
        let mut instruments = Vec::new();

        for set in sets {
            for instrument in &set.instruments {
                if tickers.contains(&instrument.ticker) || labels.contains(&instrument.label) {
                    continue;
                }
                tickers.insert(instrument.ticker.clone());
                labels.insert(instrument.label.clone());
                instruments.push(instrument.clone());
            }
        }

        Self::new(name, instruments, None)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn benchmark(&self) -> Option<&str> {
        self.benchmark.as_deref()
    }

    pub fn instruments(&self) -> &[Instrument] {
        &self.instruments
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    /// Distinct tickers in set order.
    pub fn tickers(&self) -> Vec<Ticker> {
        let mut seen = HashSet::new();
        self.instruments
            .iter()
            .filter(|instrument| seen.insert(&instrument.ticker))
            .map(|instrument| instrument.ticker.clone())
            .collect()
    }

    pub fn label_for(&self, ticker: &Ticker) -> Option<&str> {
        self.instruments
            .iter()
            .find(|instrument| &instrument.ticker == ticker)
            .map(|instrument| instrument.label.as_str())
    }
}

/// The three thematic sets tracked by the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Universe {
    pub factor: InstrumentSet,
    pub regional: InstrumentSet,
    pub sector: InstrumentSet,
}

const FACTOR_SET: &[(&str, &str)] = &[
    ("MSCI USA (US Benchmark)", "EUSA"),
    ("MSCI World (Global Benchmark)", "URTH"),
    ("USA Momentum", "MTUM"),
    ("USA Value", "VLUE"),
    ("USA Quality", "QUAL"),
    ("USA Growth", "IUSG"),
    ("USA Low Volatility", "USMV"),
    ("USA Size", "SIZE"),
];

const REGIONAL_SET: &[(&str, &str)] = &[
    ("MSCI World (Benchmark)", "URTH"),
    ("USA (S&P 500)", "VOO"),
    ("Japan", "EWJ"),
    ("UK", "EWU"),
    ("Europe ex-UK", "EZU"),
    ("Emerging Markets ex-China", "EMXC"),
    ("China", "MCHI"),
    ("Canada", "EWC"),
];

const SECTOR_SET: &[(&str, &str)] = &[
    ("S&P 500 (US Benchmark)", "VOO"),
    ("Info. Technology", "VGT"),
    ("Health Care", "VHT"),
    ("Financials", "VFH"),
    ("Cons. Discretionary", "VCR"),
    ("Industrials", "VIS"),
    ("Cons. Staples", "VDC"),
    ("Energy", "VDE"),
    ("Utilities", "VPU"),
    ("Materials", "VAW"),
    ("Real Estate", "VNQ"),
    ("Communication Svcs", "VOX"),
];

fn builtin_set(
    kind: SetKind,
    entries: &[(&str, &str)],
    benchmark: &str,
) -> Result<InstrumentSet, ValidationError> {
    let instruments = entries
        .iter()
        .map(|(label, ticker)| Instrument::new(*label, ticker))
        .collect::<Result<Vec<_>, _>>()?;
    InstrumentSet::new(kind.as_str(), instruments, Some(benchmark.to_owned()))
}

impl Universe {
    /// US-listed, USD-denominated ETF universe.
    pub fn builtin() -> Result<Self, ValidationError> {
        Ok(Self {
            factor: builtin_set(SetKind::Factor, FACTOR_SET, "MSCI USA (US Benchmark)")?,
            regional: builtin_set(SetKind::Regional, REGIONAL_SET, "MSCI World (Benchmark)")?,
            sector: builtin_set(SetKind::Sector, SECTOR_SET, "S&P 500 (US Benchmark)")?,
        })
    }

    pub fn set(&self, kind: SetKind) -> &InstrumentSet {
        match kind {
            SetKind::Factor => &self.factor,
            SetKind::Regional => &self.regional,
            SetKind::Sector => &self.sector,
        }
    }

    /// Every instrument once, for correlation and rolling analysis.
    pub fn combined(&self) -> Result<InstrumentSet, ValidationError> {
        InstrumentSet::combine("all", [&self.factor, &self.regional, &self.sector])
    }
}
