//! What the view layer renders.

use scrobstats_api::{Top5Statistics, TopAlbumsResponse, TopArtistsResponse, TopTracksResponse};
use scrobstats_charts::{ChartSet, DEFAULT_BAR_PALETTE};
use scrobstats_common::ALL_YEARS;
use serde::Serialize;

/// Snapshot of every chart and list on the dashboard.
///
/// Lists are `None` until their fetch succeeds once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardState {
    /// The six charts.
    #[serde(flatten)]
    pub charts: ChartSet,
    /// All-time top artists.
    pub top_artists: Option<TopArtistsResponse>,
    /// All-time top albums.
    pub top_albums: Option<TopAlbumsResponse>,
    /// All-time top tracks.
    pub top_tracks: Option<TopTracksResponse>,
    /// Superlatives of the selected year.
    pub list_top5: Option<Top5Statistics>,
    /// Year tabs, in display order.
    pub years: Vec<i32>,
    /// Selected year; [`ALL_YEARS`] means every year.
    pub selected_year: i32,
    /// True while any sub-fetch is incomplete.
    pub loading: bool,
}

impl DashboardState {
    /// Empty state with charts in the given palette.
    pub fn new(palette: &str) -> Self {
        Self {
            charts: ChartSet::new(palette),
            top_artists: None,
            top_albums: None,
            top_tracks: None,
            list_top5: None,
            years: Vec::new(),
            selected_year: ALL_YEARS,
            loading: false,
        }
    }
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new(DEFAULT_BAR_PALETTE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_serializes_charts_at_top_level() {
        let value = serde_json::to_value(DashboardState::new("palette4")).unwrap();
        assert_eq!(
            value["decadesChart"]["chartOptions"]["theme"]["palette"],
            "palette4"
        );
        assert!(value["listTop5"].is_null());
        assert_eq!(value["selectedYear"], -1);
        assert_eq!(value["years"], serde_json::json!([]));
        assert_eq!(value["loading"], false);
        assert!(value.get("charts").is_none());
    }
}
