use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// The five to-date return windows reported for every instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "wtd")]
    WeekToDate,
    #[serde(rename = "mtd")]
    MonthToDate,
    #[serde(rename = "qtd")]
    QuarterToDate,
    #[serde(rename = "ytd")]
    YearToDate,
}

impl Period {
    /// Column order used by tables and style grids.
    pub const ALL: [Self; 5] = [
        Self::OneDay,
        Self::WeekToDate,
        Self::MonthToDate,
        Self::QuarterToDate,
        Self::YearToDate,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneDay => "1d",
            Self::WeekToDate => "wtd",
            Self::MonthToDate => "mtd",
            Self::QuarterToDate => "qtd",
            Self::YearToDate => "ytd",
        }
    }

    /// Column heading for display.
    pub const fn label(self) -> &'static str {
        match self {
            Self::OneDay => "1 Day",
            Self::WeekToDate => "Week To Date (WTD)",
            Self::MonthToDate => "Month To Date (MTD)",
            Self::QuarterToDate => "Quarter To Date (QTD)",
            Self::YearToDate => "Year To Date (YTD)",
        }
    }

    /// Position of this period inside [`Period::ALL`].
    pub const fn index(self) -> usize {
        match self {
            Self::OneDay => 0,
            Self::WeekToDate => 1,
            Self::MonthToDate => 2,
            Self::QuarterToDate => 3,
            Self::YearToDate => 4,
        }
    }
}

impl Default for Period {
    fn default() -> Self {
        Self::YearToDate
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "1d" | "1day" | "day" => Ok(Self::OneDay),
            "wtd" | "week" => Ok(Self::WeekToDate),
            "mtd" | "month" => Ok(Self::MonthToDate),
            "qtd" | "quarter" => Ok(Self::QuarterToDate),
            "ytd" | "year" => Ok(Self::YearToDate),
            other => Err(ValidationError::InvalidPeriod {
                value: other.to_owned(),
            }),
        }
    }
}
