//! # Scrobstats Charts
//!
//! Chart option model, the factory for the six dashboard charts, and the
//! aggregation that pivots per-year category counts into chart series.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod aggregation;
pub mod configs;
pub mod types;

pub use aggregation::*;
pub use configs::*;
pub use types::*;
