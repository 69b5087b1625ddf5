//! Overlapping fetches against hand-gated sources.

use async_trait::async_trait;
use scrobstats_api::{
    ClientStorage, MockProfileStore, MockTopChartsSource, StatisticsSource, Top5Statistics,
};
use scrobstats_common::test_utils::fixtures::bucket;
use scrobstats_common::{CategoryCount, PeriodBucket, Result, StatisticKind, ALL_YEARS};
use scrobstats_dashboard::{Dashboard, YearManager};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Statistics source whose decade call for user `"old"` blocks until released.
#[derive(Default)]
struct GatedSource {
    entered: Notify,
    gate: Notify,
    calls: AtomicUsize,
}

#[async_trait]
impl StatisticsSource for GatedSource {
    async fn distribution_by_period(
        &self,
        kind: StatisticKind,
        user: &str,
    ) -> Result<Vec<PeriodBucket>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if user == "old" && kind == StatisticKind::Decade {
            self.entered.notify_one();
            self.gate.notified().await;
            return Ok(vec![bucket("1999", &[("old", 1)])]);
        }
        Ok(vec![bucket("2024", &[(user, 2)])])
    }

    async fn distribution_for_year(
        &self,
        _kind: StatisticKind,
        user: &str,
        _year: i32,
    ) -> Result<Vec<CategoryCount>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![CategoryCount::new(user, 3)])
    }

    async fn general_statistics(&self, _user: &str, _year: i32) -> Result<Top5Statistics> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Top5Statistics::default())
    }
}

fn top_charts() -> MockTopChartsSource {
    let mut top = MockTopChartsSource::new();
    top.expect_top_artists().returning(|_| Ok(Default::default()));
    top.expect_top_albums().returning(|_| Ok(Default::default()));
    top.expect_top_tracks().returning(|_| Ok(Default::default()));
    top
}

#[tokio::test]
async fn test_superseded_fetch_does_not_overwrite_newer_state() {
    let source = Arc::new(GatedSource::default());
    let dashboard = Arc::new(Dashboard::new(
        source.clone(),
        Arc::new(top_charts()),
        "palette10",
    ));

    let first = {
        let dashboard = Arc::clone(&dashboard);
        tokio::spawn(async move { dashboard.fetch_all("old", ALL_YEARS).await })
    };
    source.entered.notified().await;
    assert!(dashboard.is_loading());

    dashboard.fetch_all("new", ALL_YEARS).await;
    assert!(dashboard.is_loading(), "the gated fetch is still in flight");

    source.gate.notify_one();
    first.await.unwrap();
    assert!(!dashboard.is_loading());

    let state = dashboard.state();
    assert_eq!(state.charts.full_decades_chart.categories(), ["2024"]);
    let names: Vec<_> = state
        .charts
        .full_decades_chart
        .series
        .iter()
        .filter_map(|s| s.name.as_deref())
        .collect();
    assert!(names.contains(&"new"));
    assert!(!names.contains(&"old"));
    assert_eq!(source.calls.load(Ordering::SeqCst), 6);
}

#[tokio::test]
async fn test_loading_tracker_observes_every_sub_fetch() {
    let source = Arc::new(GatedSource::default());
    let dashboard = Arc::new(Dashboard::new(
        source.clone(),
        Arc::new(top_charts()),
        "palette10",
    ));
    let loading = dashboard.loading();

    let fetch = {
        let dashboard = Arc::clone(&dashboard);
        tokio::spawn(async move { dashboard.fetch_all("old", ALL_YEARS).await })
    };
    source.entered.notified().await;

    // The other sub-fetches have finished; only the gated decade call remains.
    assert_eq!(loading.in_flight(), 1);
    assert!(dashboard.state().loading);

    source.gate.notify_one();
    fetch.await.unwrap();
    assert_eq!(loading.in_flight(), 0);
    assert!(!dashboard.state().loading);
    assert_eq!(
        dashboard.state().charts.full_decades_chart.categories(),
        ["1999"]
    );
}

#[tokio::test]
async fn test_refresh_follows_the_selected_year() {
    let source = Arc::new(GatedSource::default());
    let dashboard = Dashboard::new(
        source.clone(),
        Arc::new(MockTopChartsSource::new()),
        "palette10",
    );

    let mut profile = MockProfileStore::new();
    profile.expect_update_years().returning(|_, _| Ok(()));
    let mut years = YearManager::new(
        vec![2024, 2023],
        2024,
        Arc::new(profile),
        ClientStorage::in_memory(),
    );
    years.select_year(2024);

    dashboard.refresh("rj", &years).await;

    let state = dashboard.state();
    assert_eq!(state.charts.origin_chart.categories(), ["rj"]);
    assert!(state.list_top5.is_some());
    assert_eq!(state.years, vec![2024, 2023]);
    assert_eq!(state.selected_year, 2024);
    assert!(!state.loading);
    assert_eq!(source.calls.load(Ordering::SeqCst), 4);
}
