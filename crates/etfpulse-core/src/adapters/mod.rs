//! Price source implementations.
//!
//! | Adapter | Use |
//! |---------|-----|
//! | [`YahooAdapter`] | Live adjusted closes over HTTP |
//! | [`SyntheticSource`] | Deterministic offline data for `--mock` and demos |
//! | [`InMemorySource`] | Fixed series for tests and embedding |

pub mod memory;
pub mod synthetic;
pub mod yahoo;

pub use memory::InMemorySource;
pub use synthetic::SyntheticSource;
pub use yahoo::YahooAdapter;
