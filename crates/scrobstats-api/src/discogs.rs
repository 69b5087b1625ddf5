//! Discogs API client.

use crate::http::{self, Service};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use scrobstats_common::{Result, StatsError};
use scrobstats_config::DiscogsConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Format of a release (vinyl, CD, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Format {
    /// Format name.
    pub name: String,
    /// Quantity, as sent.
    pub qty: String,
    /// Free text.
    pub text: Option<String>,
    /// Descriptors such as `LP` or `Album`.
    pub descriptions: Vec<String>,
}

/// Label credit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Label {
    /// Label id.
    pub id: u64,
    /// Label name.
    pub name: String,
    /// Catalogue number.
    pub catno: String,
    /// API link.
    pub resource_url: String,
}

/// Artist credit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtistCredit {
    /// Artist id.
    pub id: u64,
    /// Artist name, possibly with a disambiguation suffix like `(2)`.
    pub name: String,
    /// Name variation used on the release.
    pub anv: String,
    /// Join string to the next credit.
    pub join: String,
    /// Role on the release.
    pub role: String,
    /// API link.
    pub resource_url: String,
}

/// Release summary embedded in a collection entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BasicInformation {
    /// Release id.
    pub id: u64,
    /// Master release id; 0 when none.
    pub master_id: u64,
    /// Title.
    pub title: String,
    /// Release year; 0 when unknown.
    pub year: i32,
    /// Thumbnail URL.
    pub thumb: String,
    /// Cover image URL.
    pub cover_image: String,
    /// Formats.
    pub formats: Vec<Format>,
    /// Labels.
    pub labels: Vec<Label>,
    /// Artists.
    pub artists: Vec<ArtistCredit>,
    /// Genres.
    pub genres: Vec<String>,
    /// Styles.
    pub styles: Vec<String>,
}

/// One release in a user's collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionRelease {
    /// Release id.
    pub id: u64,
    /// Collection instance id.
    #[serde(default)]
    pub instance_id: u64,
    /// When it was added to the collection.
    #[serde(default)]
    pub date_added: String,
    /// User rating, 0 to 5.
    #[serde(default)]
    pub rating: u8,
    /// Release summary.
    #[serde(default)]
    pub basic_information: BasicInformation,
}

/// Paging information of a collection page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pagination {
    /// Current page, 1-based.
    pub page: u32,
    /// Total pages.
    pub pages: u32,
    /// Page size.
    pub per_page: u32,
    /// Total items.
    pub items: u32,
}

/// One page of a collection folder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionPage {
    /// Paging information; absent on some error-free empty answers.
    #[serde(default)]
    pub pagination: Option<Pagination>,
    /// Releases on this page.
    #[serde(default)]
    pub releases: Vec<CollectionRelease>,
}

/// Track of a release.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Track {
    /// Position such as `A1`.
    pub position: String,
    /// `track`, `heading` or `index`.
    pub type_: String,
    /// Title.
    pub title: String,
    /// Duration as `m:ss`; often empty.
    pub duration: String,
    /// Extra credits on this track.
    pub extraartists: Vec<ArtistCredit>,
}

impl Track {
    /// Duration in seconds, when present and well formed.
    pub fn duration_seconds(&self) -> Option<u32> {
        let (minutes, seconds) = self.duration.trim().split_once(':')?;
        let minutes: u32 = minutes.parse().ok()?;
        let seconds: u32 = seconds.parse().ok()?;
        Some(minutes * 60 + seconds)
    }
}

/// Full release record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseDetails {
    /// Release id.
    pub id: u64,
    /// Title.
    pub title: String,
    /// Release year.
    pub year: i32,
    /// API link.
    pub resource_url: String,
    /// Tracks in order.
    pub tracklist: Vec<Track>,
    /// Formats.
    pub formats: Vec<Format>,
    /// Labels.
    pub labels: Vec<Label>,
    /// Artists.
    pub artists: Vec<ArtistCredit>,
    /// Genres.
    pub genres: Vec<String>,
    /// Styles.
    pub styles: Vec<String>,
}

/// Discogs API client authenticated with a consumer key and secret.
#[derive(Debug, Clone)]
pub struct DiscogsClient {
    client: Client,
    base_url: String,
    per_page: u32,
}

impl DiscogsClient {
    /// Create a client from the Discogs configuration.
    pub fn new(config: &DiscogsConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let auth = format!("Discogs key={}, secret={}", config.api_key, config.api_secret);
        let mut auth = HeaderValue::from_str(&auth)
            .map_err(|e| StatsError::config_with_source("Invalid Discogs credentials", e))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = http::build_client(config.timeout_seconds, None, headers)?;
        Ok(Self {
            client,
            base_url: config.url.clone(),
            per_page: config.per_page,
        })
    }

    /// Fetch one page of a user's "All" collection folder, sorted by artist.
    #[instrument(skip(self))]
    pub async fn collection_page(&self, user: &str, page: u32) -> Result<CollectionPage> {
        let url = http::join_url(
            &self.base_url,
            &format!("users/{user}/collection/folders/0/releases"),
        );
        let query = [
            ("page", page.to_string()),
            ("per_page", self.per_page.to_string()),
            ("sort", "artist".to_string()),
        ];
        http::send_json(Service::Discogs, self.client.get(url).query(&query)).await
    }

    /// Fetch every release in a user's collection, walking pages until the last.
    #[instrument(skip(self))]
    pub async fn load_user_library(&self, user: &str) -> Result<Vec<CollectionRelease>> {
        info!("Loading Discogs collection");
        let mut releases = Vec::new();
        let mut page = 1;

        loop {
            let data = self.collection_page(user, page).await?;
            debug!(page, count = data.releases.len(), "Fetched collection page");
            releases.extend(data.releases);

            match data.pagination {
                Some(pagination) if pagination.pages > page => page += 1,
                _ => break,
            }
        }

        info!(total = releases.len(), "Loaded Discogs collection");
        Ok(releases)
    }

    /// Fetch a full release record.
    #[instrument(skip(self))]
    pub async fn release_details(&self, release_id: u64) -> Result<ReleaseDetails> {
        info!("Fetching release details");
        let url = http::join_url(&self.base_url, &format!("releases/{release_id}"));
        http::send_json(Service::Discogs, self.client.get(url)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_duration() {
        let track = Track {
            duration: "4:05".to_string(),
            ..Track::default()
        };
        assert_eq!(track.duration_seconds(), Some(245));
        assert_eq!(Track::default().duration_seconds(), None);
    }

    #[test]
    fn test_collection_page_without_pagination() {
        let page: CollectionPage = serde_json::from_str(r#"{"releases": []}"#).unwrap();
        assert!(page.pagination.is_none());
    }

    #[test]
    fn test_invalid_credentials_rejected() {
        let config = DiscogsConfig {
            api_key: "bad\nkey".to_string(),
            ..DiscogsConfig::default()
        };
        assert!(matches!(
            DiscogsClient::new(&config),
            Err(StatsError::Config { .. })
        ));
    }
}
