//! # Scrobstats Dashboard
//!
//! The stateful half of the dashboard: which years have tabs, which one is
//! selected, and the concurrent fetch that fills every chart and list.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod loading;
pub mod orchestrator;
pub mod state;
pub mod years;

pub use loading::*;
pub use orchestrator::*;
pub use state::*;
pub use years::*;
