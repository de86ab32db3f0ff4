use thiserror::Error;

/// Validation and contract errors exposed by `etfpulse-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("ticker cannot be empty")]
    EmptyTicker,
    #[error("ticker length {len} exceeds max {max}")]
    TickerTooLong { len: usize, max: usize },
    #[error("ticker must start with an ASCII letter or '^': '{ch}'")]
    TickerInvalidStart { ch: char },
    #[error("ticker contains invalid character '{ch}' at index {index}")]
    TickerInvalidChar { ch: char, index: usize },

    #[error("price on {date} must be finite and positive, got {value}")]
    InvalidPrice { date: String, value: String },

    #[error("date must be formatted as YYYY-MM-DD: '{value}'")]
    InvalidDate { value: String },

    #[error("invalid period '{value}', expected one of 1d, wtd, mtd, qtd, ytd")]
    InvalidPeriod { value: String },
    #[error("invalid instrument set '{value}', expected one of factor, regional, sector")]
    InvalidSetKind { value: String },
    #[error("invalid price source '{value}', expected one of yahoo, synthetic, memory")]
    InvalidProvider { value: String },

    #[error("instrument set '{set}' has no instruments")]
    EmptyInstrumentSet { set: String },
    #[error("instrument label cannot be empty in set '{set}'")]
    EmptyLabel { set: String },
    #[error("label '{label}' appears more than once in set '{set}'")]
    DuplicateLabel { set: String, label: String },
    #[error("benchmark '{benchmark}' is not a member of set '{set}'")]
    UnknownBenchmark { set: String, benchmark: String },

    #[error("config field '{field}' must be greater than zero")]
    ZeroConfigValue { field: &'static str },
    #[error("environment variable {name} is not a valid number: '{value}'")]
    InvalidEnvOverride { name: &'static str, value: String },

    #[error("request_id must be at least 8 characters")]
    InvalidRequestId,
    #[error("schema_version must match vMAJOR.MINOR.PATCH: '{value}'")]
    InvalidSchemaVersion { value: String },
    #[error("error code cannot be empty")]
    EmptyErrorCode,
    #[error("error message cannot be empty")]
    EmptyErrorMessage,
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to read config '{path}': {source}")]
    ConfigIo {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
