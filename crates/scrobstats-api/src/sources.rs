//! Traits the dashboard depends on, implemented by the HTTP clients.

use crate::backend::{BackendClient, Top5Statistics};
use crate::lastfm::{LastFmClient, TopAlbumsResponse, TopArtistsResponse, TopTracksResponse};
use async_trait::async_trait;
use scrobstats_common::{CategoryCount, PeriodBucket, Result, StatisticKind};

/// Precomputed listening statistics.
#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait StatisticsSource: Send + Sync {
    /// Distribution across every year, one bucket per year.
    async fn distribution_by_period(
        &self,
        kind: StatisticKind,
        user: &str,
    ) -> Result<Vec<PeriodBucket>>;

    /// Distribution for a single year, one row per category.
    async fn distribution_for_year(
        &self,
        kind: StatisticKind,
        user: &str,
        year: i32,
    ) -> Result<Vec<CategoryCount>>;

    /// Superlatives of a single year.
    async fn general_statistics(&self, user: &str, year: i32) -> Result<Top5Statistics>;
}

/// All-time top lists.
#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait TopChartsSource: Send + Sync {
    /// Top artists.
    async fn top_artists(&self, user: &str) -> Result<TopArtistsResponse>;
    /// Top albums.
    async fn top_albums(&self, user: &str) -> Result<TopAlbumsResponse>;
    /// Top tracks.
    async fn top_tracks(&self, user: &str) -> Result<TopTracksResponse>;
}

/// Remote user profile holding the year tabs.
#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Replace the stored year list.
    async fn update_years(&self, user: &str, years: &[i32]) -> Result<()>;
}

#[async_trait]
impl StatisticsSource for BackendClient {
    async fn distribution_by_period(
        &self,
        kind: StatisticKind,
        user: &str,
    ) -> Result<Vec<PeriodBucket>> {
        self.load_period_statistics(kind, user).await
    }

    async fn distribution_for_year(
        &self,
        kind: StatisticKind,
        user: &str,
        year: i32,
    ) -> Result<Vec<CategoryCount>> {
        self.load_year_statistics(kind, user, year).await
    }

    async fn general_statistics(&self, user: &str, year: i32) -> Result<Top5Statistics> {
        Self::general_statistics(self, user, year).await
    }
}

#[async_trait]
impl ProfileStore for BackendClient {
    async fn update_years(&self, user: &str, years: &[i32]) -> Result<()> {
        self.set_years(user, years).await
    }
}

#[async_trait]
impl TopChartsSource for LastFmClient {
    async fn top_artists(&self, user: &str) -> Result<TopArtistsResponse> {
        Self::top_artists(self, user).await
    }

    async fn top_albums(&self, user: &str) -> Result<TopAlbumsResponse> {
        Self::top_albums(self, user).await
    }

    async fn top_tracks(&self, user: &str) -> Result<TopTracksResponse> {
        Self::top_tracks(self, user).await
    }
}
