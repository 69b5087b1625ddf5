//! # Scrobstats
//!
//! Command line front end of the listening-statistics dashboard.
//!
//! Loads the configuration, builds the backend, Last.fm and Discogs clients
//! and runs one dashboard command per invocation.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod cli;
pub mod error;

pub use app::*;
pub use cli::*;
pub use error::*;
