//! Concurrent data fetching for the dashboard.
//!
//! [`Dashboard::fetch_all`] fans out one sub-fetch per result category and
//! waits for all of them. Sub-fetches never fail the whole operation: each
//! logs its own error and leaves its slice of [`DashboardState`] as it was.

use crate::loading::LoadingTracker;
use crate::state::DashboardState;
use crate::years::YearManager;
use parking_lot::RwLock;
use scrobstats_api::{StatisticsSource, TopChartsSource};
use scrobstats_charts::{aggregator_for, period_axis, DataPoint, SeriesData};
use scrobstats_common::{CategoryCount, PeriodBucket, StatisticKind, ALL_YEARS};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Owns the dashboard state and fills it from the statistics sources.
pub struct Dashboard {
    statistics: Arc<dyn StatisticsSource>,
    top_charts: Arc<dyn TopChartsSource>,
    state: Arc<RwLock<DashboardState>>,
    loading: LoadingTracker,
    generation: AtomicU64,
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("loading", &self.loading)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

impl Dashboard {
    /// Create a dashboard with empty charts in `palette`.
    pub fn new(
        statistics: Arc<dyn StatisticsSource>,
        top_charts: Arc<dyn TopChartsSource>,
        palette: &str,
    ) -> Self {
        Self {
            statistics,
            top_charts,
            state: Arc::new(RwLock::new(DashboardState::new(palette))),
            loading: LoadingTracker::new(),
            generation: AtomicU64::new(0),
        }
    }

    /// Copy of the current state, with the live loading flag.
    pub fn state(&self) -> DashboardState {
        let mut state = self.state.read().clone();
        state.loading = self.is_loading();
        state
    }

    /// Mirror the manager's year tabs and selection into the state.
    pub fn sync_years(&self, years: &YearManager) {
        let mut state = self.state.write();
        state.years = years.years().to_vec();
        state.selected_year = years.selected_year();
    }

    /// True while any sub-fetch of any `fetch_all` is incomplete.
    pub fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }

    /// The in-flight tracker, for observers that outlive a borrow of the dashboard.
    pub fn loading(&self) -> LoadingTracker {
        self.loading.clone()
    }

    /// Take over the manager's years, then fetch everything for its selected year.
    pub async fn refresh(&self, user: &str, years: &YearManager) {
        self.sync_years(years);
        self.fetch_all(user, years.selected_year()).await;
    }

    /// Fetch and populate every result category for `user` and `selected_year`.
    ///
    /// An empty user makes no calls. Top lists are fetched only for
    /// [`ALL_YEARS`], the yearly superlatives only for a positive year.
    /// Results of a call superseded by a later `fetch_all` are discarded.
    #[instrument(skip(self))]
    pub async fn fetch_all(&self, user: &str, selected_year: i32) {
        if user.is_empty() {
            debug!("No user, skipping fetch");
            return;
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        info!(generation, "Fetching dashboard data");

        futures::join!(
            self.fetch_distribution(generation, StatisticKind::Decade, user, selected_year),
            self.fetch_distribution(generation, StatisticKind::Origin, user, selected_year),
            self.fetch_distribution(generation, StatisticKind::Tag, user, selected_year),
            self.fetch_top_lists(generation, user, selected_year),
            self.fetch_general(generation, user, selected_year),
        );

        debug!(generation, "Dashboard fetch finished");
    }

    async fn fetch_distribution(
        &self,
        generation: u64,
        kind: StatisticKind,
        user: &str,
        selected_year: i32,
    ) {
        if selected_year == ALL_YEARS {
            let _guard = self.loading.start();
            match self.statistics.distribution_by_period(kind, user).await {
                Ok(buckets) => {
                    self.commit(generation, kind.as_str(), |state| {
                        apply_all_years(state, kind, &buckets);
                    });
                }
                Err(e) => error!(kind = kind.as_str(), error = %e, "Failed to load distribution"),
            }
        } else if selected_year > 0 {
            let _guard = self.loading.start();
            match self
                .statistics
                .distribution_for_year(kind, user, selected_year)
                .await
            {
                Ok(rows) => {
                    self.commit(generation, kind.as_str(), |state| {
                        apply_single_year(state, kind, rows);
                    });
                }
                Err(e) => error!(
                    kind = kind.as_str(),
                    year = selected_year,
                    error = %e,
                    "Failed to load distribution"
                ),
            }
        } else {
            warn!(
                kind = kind.as_str(),
                year = selected_year,
                "Selected year is neither all years nor a calendar year, skipping"
            );
        }
    }

    async fn fetch_top_lists(&self, generation: u64, user: &str, selected_year: i32) {
        if selected_year != ALL_YEARS {
            return;
        }

        let _guard = self.loading.start();
        let lists = futures::try_join!(
            self.top_charts.top_artists(user),
            self.top_charts.top_albums(user),
            self.top_charts.top_tracks(user),
        );

        match lists {
            Ok((artists, albums, tracks)) => {
                self.commit(generation, "top lists", |state| {
                    state.top_artists = Some(artists);
                    state.top_albums = Some(albums);
                    state.top_tracks = Some(tracks);
                });
            }
            Err(e) => error!(error = %e, "Failed to load top lists"),
        }
    }

    async fn fetch_general(&self, generation: u64, user: &str, selected_year: i32) {
        if selected_year <= 0 {
            return;
        }

        let _guard = self.loading.start();
        match self.statistics.general_statistics(user, selected_year).await {
            Ok(top5) => {
                self.commit(generation, "general statistics", |state| {
                    state.list_top5 = Some(top5);
                });
            }
            Err(e) => error!(year = selected_year, error = %e, "Failed to load general statistics"),
        }
    }

    /// Apply a result unless a newer fetch has started since `generation`.
    fn commit(&self, generation: u64, what: &str, apply: impl FnOnce(&mut DashboardState)) -> bool {
        let mut state = self.state.write();
        let current = self.generation.load(Ordering::SeqCst);
        if current != generation {
            debug!(generation, current, what, "Dropping superseded result");
            return false;
        }
        apply(&mut state);
        true
    }
}

fn apply_all_years(state: &mut DashboardState, kind: StatisticKind, buckets: &[PeriodBucket]) {
    let periods = period_axis(buckets);
    let series = aggregator_for(kind).aggregate(buckets, &periods);
    let chart = state.charts.full_chart_mut(kind);
    chart.set_categories(periods);
    chart.set_category_series(series);
}

fn apply_single_year(state: &mut DashboardState, kind: StatisticKind, rows: Vec<CategoryCount>) {
    let chart = state.charts.single_chart_mut(kind);
    match kind {
        StatisticKind::Tag => {
            let points = rows
                .into_iter()
                .map(|row| DataPoint {
                    x: row.category,
                    y: row.count,
                })
                .collect();
            chart.set_primary_data(SeriesData::Points(points));
        }
        StatisticKind::Decade | StatisticKind::Origin => {
            let (labels, counts): (Vec<String>, Vec<i64>) =
                rows.into_iter().map(|row| (row.category, row.count)).unzip();
            chart.set_categories(labels);
            chart.set_primary_data(SeriesData::Values(counts));
        }
    }
}
