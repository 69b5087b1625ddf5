//! # Scrobstats API
//!
//! Clients for the services the dashboard reads from:
//!
//! - the statistics backend (distributions, superlatives, user profile)
//! - Last.fm (signed requests, top lists, session exchange)
//! - Discogs (collection paging, release details)
//!
//! plus the client-local key/value storage and the source traits the
//! dashboard is written against.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod backend;
pub mod discogs;
mod http;
pub mod lastfm;
pub mod sources;
pub mod storage;

pub use backend::*;
pub use discogs::*;
pub use lastfm::*;
pub use sources::*;
pub use storage::*;
