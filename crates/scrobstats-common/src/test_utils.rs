//! Test utilities and shared fixtures for the scrobstats workspace.
//!
//! Available to other crates through the `testing` feature.

use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

use crate::types::{CategoryCount, PeriodBucket};

static INIT: Once = Once::new();

/// Initialize logging for tests. Safe to call from every test; installs once.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        let _ = fmt().with_test_writer().with_env_filter(filter).try_init();
    });
}

/// Create a temporary directory for tests that automatically cleans up.
#[cfg(feature = "tempfile")]
pub fn create_temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Sample statistics payloads shaped like the backend's responses.
pub mod fixtures {
    use super::*;

    /// Builds a bucket from `(category, count)` pairs.
    pub fn bucket(period: &str, counts: &[(&str, i64)]) -> PeriodBucket {
        PeriodBucket::new(
            period,
            counts
                .iter()
                .map(|(category, count)| CategoryCount::new(*category, *count))
                .collect(),
        )
    }

    /// Two years of decade counts with a decade missing from each year.
    pub fn decade_buckets() -> Vec<PeriodBucket> {
        vec![
            bucket("2020", &[("2000s", 15), ("2010s", 25)]),
            bucket("2021", &[("2000s", 10), ("1990s", 5)]),
        ]
    }

    /// Two years of country-of-origin counts.
    pub fn country_buckets() -> Vec<PeriodBucket> {
        vec![
            bucket("2020", &[("USA", 50), ("UK", 30)]),
            bucket("2021", &[("USA", 45), ("Germany", 20)]),
        ]
    }

    /// Three years of tag counts.
    pub fn tag_buckets() -> Vec<PeriodBucket> {
        vec![
            bucket("2019", &[("rock", 120), ("jazz", 12)]),
            bucket("2020", &[("rock", 90)]),
            bucket("2021", &[("electronic", 40), ("rock", 60)]),
        ]
    }

    /// Period axis for a bucket list, in bucket order.
    pub fn axis(buckets: &[PeriodBucket]) -> Vec<String> {
        buckets.iter().map(|b| b.period_id.clone()).collect()
    }
}
