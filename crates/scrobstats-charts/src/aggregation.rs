//! Category pivot with zero-fill.
//!
//! Turns per-period category counts into one series per category, each as
//! long as the period axis. Periods where a category was not observed hold
//! `0`. Series come out in first-observation order, after any seeded
//! categories.

use scrobstats_common::{CategorySeries, PeriodBucket, StatisticKind};
use std::collections::HashMap;
use tracing::warn;

/// Decade labels every decade aggregation starts with, for stable legends.
pub const SEEDED_DECADES: [&str; 7] = [
    "1950s", "1960s", "1970s", "1980s", "1990s", "2000s", "2010s",
];

/// Reshapes period buckets into per-category series.
pub trait CategoryAggregator {
    /// Categories present in the output even when never observed.
    fn seed(&self) -> &[&'static str] {
        &[]
    }

    /// Pivot `buckets` against the period axis `periods`.
    ///
    /// Bucket `i` fills index `i` of every series. Buckets past the end of the
    /// axis are ignored.
    fn aggregate(&self, buckets: &[PeriodBucket], periods: &[String]) -> Vec<CategorySeries> {
        pivot(buckets, periods.len(), self.seed())
    }
}

/// Decade distribution, seeded with [`SEEDED_DECADES`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DecadeAggregator;

/// Country-of-origin distribution.
#[derive(Debug, Clone, Copy, Default)]
pub struct CountryAggregator;

/// Tag distribution.
#[derive(Debug, Clone, Copy, Default)]
pub struct TagAggregator;

impl CategoryAggregator for DecadeAggregator {
    fn seed(&self) -> &[&'static str] {
        &SEEDED_DECADES
    }
}

impl CategoryAggregator for CountryAggregator {}

impl CategoryAggregator for TagAggregator {}

/// The aggregator for a distribution kind.
pub fn aggregator_for(kind: StatisticKind) -> &'static dyn CategoryAggregator {
    match kind {
        StatisticKind::Decade => &DecadeAggregator,
        StatisticKind::Origin => &CountryAggregator,
        StatisticKind::Tag => &TagAggregator,
    }
}

/// Pivot with an explicit seed. See [`CategoryAggregator::aggregate`].
pub fn pivot(buckets: &[PeriodBucket], axis_len: usize, seed: &[&str]) -> Vec<CategorySeries> {
    let mut order: Vec<CategorySeries> = Vec::with_capacity(seed.len());
    let mut index: HashMap<String, usize> = HashMap::new();

    for category in seed {
        if !index.contains_key(*category) {
            index.insert((*category).to_string(), order.len());
            order.push(CategorySeries {
                name: (*category).to_string(),
                data: vec![0; axis_len],
            });
        }
    }

    if buckets.len() > axis_len {
        warn!(
            buckets = buckets.len(),
            axis = axis_len,
            "More buckets than periods, ignoring the extra buckets"
        );
    }

    for (position, bucket) in buckets.iter().take(axis_len).enumerate() {
        for entry in &bucket.categories {
            let slot = match index.get(&entry.category) {
                Some(slot) => *slot,
                None => {
                    index.insert(entry.category.clone(), order.len());
                    order.push(CategorySeries {
                        name: entry.category.clone(),
                        data: vec![0; axis_len],
                    });
                    order.len() - 1
                }
            };
            // Duplicate categories in one bucket: the later count wins.
            order[slot].data[position] = entry.count;
        }
    }

    order
}

/// Period axis of a bucket list, in the order the buckets arrived.
pub fn period_axis(buckets: &[PeriodBucket]) -> Vec<String> {
    buckets.iter().map(|b| b.period_id.clone()).collect()
}

/// Decade series for the all-years chart.
pub fn process_decade_data(buckets: &[PeriodBucket], periods: &[String]) -> Vec<CategorySeries> {
    DecadeAggregator.aggregate(buckets, periods)
}

/// Country series for the all-years chart.
pub fn process_country_data(buckets: &[PeriodBucket], periods: &[String]) -> Vec<CategorySeries> {
    CountryAggregator.aggregate(buckets, periods)
}

/// Tag series for the all-years chart.
pub fn process_tag_data(buckets: &[PeriodBucket], periods: &[String]) -> Vec<CategorySeries> {
    TagAggregator.aggregate(buckets, periods)
}
