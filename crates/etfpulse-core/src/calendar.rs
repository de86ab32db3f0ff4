//! Calendar anchors for to-date periods.
//!
//! Everything here is a pure function of the reference date; no price data
//! is consulted.

use serde::Serialize;
use time::{Date, Duration, Month};

use crate::Period;

/// First calendar day of each to-date window containing `today`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeriodBoundaries {
    #[serde(with = "crate::domain::iso_date")]
    pub today: Date,
    #[serde(with = "crate::domain::iso_date")]
    pub week_start: Date,
    #[serde(with = "crate::domain::iso_date")]
    pub month_start: Date,
    #[serde(with = "crate::domain::iso_date")]
    pub quarter_start: Date,
    #[serde(with = "crate::domain::iso_date")]
    pub year_start: Date,
}

impl PeriodBoundaries {
    pub fn resolve(today: Date) -> Self {
        Self {
            today,
            week_start: week_start(today),
            month_start: month_start(today),
            quarter_start: quarter_start(today),
            year_start: year_start(today),
        }
    }

    /// Anchor for a calendar period; `None` for the trading-day 1-day window.
    pub fn start_of(&self, period: Period) -> Option<Date> {
        match period {
            Period::OneDay => None,
            Period::WeekToDate => Some(self.week_start),
            Period::MonthToDate => Some(self.month_start),
            Period::QuarterToDate => Some(self.quarter_start),
            Period::YearToDate => Some(self.year_start),
        }
    }
}

/// Most recent Monday on or before `today`.
pub fn week_start(today: Date) -> Date {
    let back = i64::from(today.weekday().number_days_from_monday());
    today.checked_sub(Duration::days(back)).unwrap_or(Date::MIN)
}

pub fn month_start(today: Date) -> Date {
    today.replace_day(1).unwrap_or(today)
}

/// Jan 1, Apr 1, Jul 1 or Oct 1.
pub fn quarter_start(today: Date) -> Date {
    let month = u8::from(today.month());
    let first_month = (month - 1) / 3 * 3 + 1;
    Month::try_from(first_month)
        .and_then(|month| Date::from_calendar_date(today.year(), month, 1))
        .unwrap_or(today)
}

pub fn year_start(today: Date) -> Date {
    Date::from_calendar_date(today.year(), Month::January, 1).unwrap_or(today)
}

/// Calendar day before `date`, used to read the close before a period opens.
pub fn day_before(date: Date) -> Date {
    date.previous_day().unwrap_or(Date::MIN)
}

/// Same calendar day `years` earlier; Feb 29 falls back to Feb 28.
pub fn years_before(date: Date, years: u32) -> Date {
    let years = i32::try_from(years).unwrap_or(i32::MAX);
    let year = date.year().saturating_sub(years);
    date.replace_year(year)
        .or_else(|_| Date::from_calendar_date(year, date.month(), 28))
        .unwrap_or(Date::MIN)
}
