//! # Domain Models
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Ticker`] | Validated provider identifier |
//! | [`PriceSeries`] | Strictly increasing daily closes with as-of lookup |
//! | [`Instrument`] / [`InstrumentSet`] | Ordered label -> ticker mapping with a benchmark |
//! | [`Universe`] | Factor, regional and sector sets |
//! | [`PriceFrame`] | Labeled series for one set, in set order |
//! | [`Period`] | 1-day, WTD, MTD, QTD, YTD |
//!
//! Constructors validate their invariants, so a `PriceSeries` can always be
//! binary-searched by date and an `InstrumentSet` always contains its
//! benchmark.

mod frame;
mod instrument;
pub mod iso_date;
mod period;
mod series;
mod ticker;

pub use frame::{AlignedPrices, LabeledSeries, PriceFrame};
pub use instrument::{Instrument, InstrumentSet, SetKind, Universe};
pub use period::Period;
pub use series::{PricePoint, PriceSeries};
pub use ticker::Ticker;
