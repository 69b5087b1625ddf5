//! Statistics backend client.
//!
//! The backend precomputes per-year category distributions and "top 5"
//! superlatives, and stores the user profile (linked Discogs user and the
//! year tabs). Distribution endpoints answer in two shapes: one record per
//! year when no `year` is given, or one row per category for a single year.

use crate::http::{self, Service};
use chrono::NaiveDate;
use reqwest::header::HeaderMap;
use reqwest::Client;
use scrobstats_common::{
    encode_year_list, parse_year_list, CategoryCount, PeriodBucket, Result, StatisticKind,
    StatsError,
};
use scrobstats_config::BackendConfig;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{info, instrument};

/// User profile stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDetails {
    /// Last.fm user name.
    pub name: String,
    /// Linked Discogs user, if any.
    #[serde(default)]
    pub discoguser: Option<String>,
    /// JSON-encoded list of year tabs.
    #[serde(default)]
    pub years: String,
}

impl UserDetails {
    /// Decodes the stored year list. An empty string yields an empty list.
    pub fn parsed_years(&self) -> Result<Vec<i32>> {
        parse_year_list(&self.years)
    }
}

/// Artist or album reference as the backend reports it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    /// MusicBrainz identifier; often empty.
    #[serde(default)]
    pub mbid: String,
    /// Display name.
    #[serde(rename = "#text")]
    pub name: String,
}

/// Day on which one artist was scrobbled the most.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrobbleDay {
    /// Grouping key.
    #[serde(rename = "_id")]
    pub key: ScrobbleDayKey,
    /// Scrobbles on that day.
    pub count: i64,
}

/// Grouping key of a [`ScrobbleDay`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrobbleDayKey {
    /// Calendar year.
    pub year: i32,
    /// Month, 1-based.
    pub month: u32,
    /// Day of month.
    pub day: u32,
    /// Artist played that day.
    pub artist: EntityRef,
}

impl ScrobbleDay {
    /// The calendar date, if the components form a valid date.
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.key.year, self.key.month, self.key.day)
    }
}

/// Run of consecutive listening days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Streak {
    /// First day of the streak as sent by the backend.
    pub start_date: String,
    /// Last day of the streak as sent by the backend.
    pub end_date: String,
    /// Length of the streak in days.
    pub count: i64,
}

impl Streak {
    /// Parsed start date.
    pub fn start(&self) -> Option<NaiveDate> {
        parse_day(&self.start_date)
    }

    /// Parsed end date.
    pub fn end(&self) -> Option<NaiveDate> {
        parse_day(&self.end_date)
    }
}

/// Accepts `YYYY-MM-DD` optionally followed by a time part.
fn parse_day(raw: &str) -> Option<NaiveDate> {
    raw.get(..10)
        .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
}

/// Most scrobbled artist entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistCount {
    /// Artist.
    pub artist: EntityRef,
    /// Scrobbles.
    pub count: i64,
}

/// Most scrobbled album entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumCount {
    /// Album.
    pub album: EntityRef,
    /// Scrobbles.
    pub count: i64,
}

/// Most scrobbled track entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackCount {
    /// Track name.
    pub name: String,
    /// Scrobbles.
    pub count: i64,
}

/// Superlatives the backend computes for a single year.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Top5Statistics {
    /// Days with the most scrobbles from one artist.
    pub top5_scrobble_days: Vec<ScrobbleDay>,
    /// Longest listening streaks.
    pub top5_streaks: Vec<Streak>,
    /// Most scrobbled artists.
    pub top5_most_scrobble_artists: Vec<ArtistCount>,
    /// Most scrobbled albums.
    pub top5_most_scrobble_albums: Vec<AlbumCount>,
    /// Most scrobbled tracks.
    pub top5_most_scrobble_tracks: Vec<TrackCount>,
}

impl Top5Statistics {
    /// True when every list is empty.
    pub fn is_empty(&self) -> bool {
        self.top5_scrobble_days.is_empty()
            && self.top5_streaks.is_empty()
            && self.top5_most_scrobble_artists.is_empty()
            && self.top5_most_scrobble_albums.is_empty()
            && self.top5_most_scrobble_tracks.is_empty()
    }
}

/// Label used for a group key the backend reports as `null` or leaves out.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

// Wire shapes of the distribution endpoints.

#[derive(Debug, Deserialize)]
struct PeriodRecord {
    #[serde(rename = "_id", deserialize_with = "id_to_string")]
    id: String,
    #[serde(alias = "decades", alias = "countries", alias = "tags", default)]
    entries: Vec<PeriodEntry>,
}

#[derive(Debug, Deserialize)]
struct PeriodEntry {
    #[serde(
        alias = "decade",
        alias = "artistCountry",
        alias = "tag",
        deserialize_with = "id_to_string",
        default = "unknown_category"
    )]
    category: String,
    count: i64,
}

#[derive(Debug, Deserialize)]
struct YearRow {
    #[serde(
        rename = "_id",
        deserialize_with = "id_to_string",
        default = "unknown_category"
    )]
    id: String,
    count: i64,
}

impl From<PeriodRecord> for PeriodBucket {
    fn from(record: PeriodRecord) -> Self {
        Self::new(
            record.id,
            record
                .entries
                .into_iter()
                .map(|entry| CategoryCount::new(entry.category, entry.count))
                .collect(),
        )
    }
}

impl From<YearRow> for CategoryCount {
    fn from(row: YearRow) -> Self {
        Self::new(row.id, row.count)
    }
}

fn unknown_category() -> String {
    UNKNOWN_CATEGORY.to_string()
}

/// Group keys arrive as strings, as bare year numbers, or as `null`.
fn id_to_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    Ok(match Option::<Id>::deserialize(deserializer)? {
        Some(Id::Text(text)) => text,
        Some(Id::Number(number)) => number.to_string(),
        None => unknown_category(),
    })
}

/// Endpoint path serving a distribution.
pub const fn statistics_endpoint(kind: StatisticKind) -> &'static str {
    match kind {
        StatisticKind::Decade => "load_decade_statistics",
        StatisticKind::Origin => "load_artist_origin_statistics",
        StatisticKind::Tag => "load_tags_statistics",
    }
}

/// Client for the statistics backend.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    /// Create a client from the backend configuration.
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let client = http::build_client(config.timeout_seconds, None, HeaderMap::new())?;
        Ok(Self {
            client,
            base_url: config.url.clone(),
        })
    }

    /// Base URL the endpoint paths are appended to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get<T>(&self, endpoint: &str, params: &[(&str, String)]) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let url = http::join_url(&self.base_url, endpoint);
        http::send_json(Service::Backend, self.client.get(url).query(params)).await
    }

    async fn post_form(&self, endpoint: &str, form: &[(&str, String)]) -> Result<()> {
        let url = http::join_url(&self.base_url, endpoint);
        http::send_text(Service::Backend, self.client.post(url).form(form)).await?;
        Ok(())
    }

    /// Load the stored profile of a user.
    #[instrument(skip(self))]
    pub async fn load_user_details(&self, user: &str) -> Result<UserDetails> {
        info!("Loading user details");
        self.get("load_user_details", &[("user", user.to_string())])
            .await
    }

    /// Link a Discogs user to the profile, or clear the link with `None`.
    #[instrument(skip(self))]
    pub async fn set_discogs_user(&self, user: &str, discogs_user: Option<&str>) -> Result<()> {
        info!("Updating linked Discogs user");
        let mut form = vec![("user", user.to_string())];
        match discogs_user.filter(|name| !name.is_empty()) {
            Some(name) => form.push(("discogUser", name.to_string())),
            None => form.push(("clearDiscogUser", "true".to_string())),
        }
        self.post_form("update_user", &form).await
    }

    /// Store the year tabs on the profile.
    #[instrument(skip(self))]
    pub async fn set_years(&self, user: &str, years: &[i32]) -> Result<()> {
        info!("Updating stored years");
        let form = [
            ("user", user.to_string()),
            ("years", encode_year_list(years)?),
        ];
        self.post_form("update_user", &form).await
    }

    /// Load a distribution across every year, one bucket per year in backend order.
    #[instrument(skip(self))]
    pub async fn load_period_statistics(
        &self,
        kind: StatisticKind,
        user: &str,
    ) -> Result<Vec<PeriodBucket>> {
        info!("Loading all-years statistics");
        let records: Vec<PeriodRecord> = self
            .get(statistics_endpoint(kind), &[("user", user.to_string())])
            .await?;
        Ok(records.into_iter().map(PeriodBucket::from).collect())
    }

    /// Load a distribution for one year, one row per category in backend order.
    #[instrument(skip(self))]
    pub async fn load_year_statistics(
        &self,
        kind: StatisticKind,
        user: &str,
        year: i32,
    ) -> Result<Vec<CategoryCount>> {
        require_year(year)?;
        info!("Loading single-year statistics");
        let rows: Vec<YearRow> = self
            .get(
                statistics_endpoint(kind),
                &[("user", user.to_string()), ("year", year.to_string())],
            )
            .await?;
        Ok(rows.into_iter().map(CategoryCount::from).collect())
    }

    /// Load the superlatives of one year.
    #[instrument(skip(self))]
    pub async fn general_statistics(&self, user: &str, year: i32) -> Result<Top5Statistics> {
        require_year(year)?;
        info!("Loading general statistics");
        self.get(
            "general_statistics",
            &[("user", user.to_string()), ("year", year.to_string())],
        )
        .await
    }
}

fn require_year(year: i32) -> Result<()> {
    if year > 0 {
        Ok(())
    } else {
        Err(StatsError::validation_field(
            format!("Year must be positive, got {year}"),
            "year",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_record_shapes() {
        let decades: Vec<PeriodRecord> = serde_json::from_str(
            r#"[{"_id": "2020", "decades": [{"decade": "1990s", "count": 4}]}]"#,
        )
        .unwrap();
        let bucket = PeriodBucket::from(decades.into_iter().next().unwrap());
        assert_eq!(bucket.period_id, "2020");
        assert_eq!(bucket.categories, vec![CategoryCount::new("1990s", 4)]);

        let countries: Vec<PeriodRecord> = serde_json::from_str(
            r#"[{"_id": 2021, "countries": [{"artistCountry": "Finland", "count": 9}]}]"#,
        )
        .unwrap();
        assert_eq!(countries[0].id, "2021");
        assert_eq!(countries[0].entries[0].category, "Finland");

        let tags: Vec<PeriodRecord> =
            serde_json::from_str(r#"[{"_id": "2019", "tags": [{"tag": "jazz", "count": 1}]}]"#)
                .unwrap();
        assert_eq!(tags[0].entries[0].category, "jazz");
    }

    #[test]
    fn test_null_group_keys_become_unknown() {
        let countries: Vec<PeriodRecord> = serde_json::from_str(
            r#"[{"_id": "2022", "countries": [
                {"artistCountry": null, "count": 5},
                {"count": 2},
                {"artistCountry": "Japan", "count": 7}
            ]}]"#,
        )
        .unwrap();
        let bucket = PeriodBucket::from(countries.into_iter().next().unwrap());
        assert_eq!(
            bucket.categories,
            vec![
                CategoryCount::new(UNKNOWN_CATEGORY, 5),
                CategoryCount::new(UNKNOWN_CATEGORY, 2),
                CategoryCount::new("Japan", 7),
            ]
        );

        let rows: Vec<YearRow> =
            serde_json::from_str(r#"[{"_id": null, "count": 3}, {"_id": "rock", "count": 9}]"#)
                .unwrap();
        let rows: Vec<CategoryCount> = rows.into_iter().map(CategoryCount::from).collect();
        assert_eq!(rows[0], CategoryCount::new(UNKNOWN_CATEGORY, 3));
        assert_eq!(rows[1], CategoryCount::new("rock", 9));
    }

    #[test]
    fn test_top5_defaults_missing_lists() {
        let stats: Top5Statistics =
            serde_json::from_str(r#"{"top5MostScrobbleTracks": [{"name": "Song", "count": 3}]}"#)
                .unwrap();
        assert!(stats.top5_scrobble_days.is_empty());
        assert_eq!(stats.top5_most_scrobble_tracks[0].name, "Song");
        assert!(!stats.is_empty());
        assert!(Top5Statistics::default().is_empty());
    }

    #[test]
    fn test_scrobble_day_date() {
        let day: ScrobbleDay = serde_json::from_str(
            r##"{"_id": {"year": 2023, "month": 6, "day": 15,
                "artist": {"mbid": "123", "#text": "Test Artist"}}, "count": 50}"##,
        )
        .unwrap();
        assert_eq!(day.date(), NaiveDate::from_ymd_opt(2023, 6, 15));
        assert_eq!(day.key.artist.name, "Test Artist");
    }

    #[test]
    fn test_streak_dates() {
        let streak = Streak {
            start_date: "2023-01-02T00:00:00.000Z".to_string(),
            end_date: "2023-01-09".to_string(),
            count: 8,
        };
        assert_eq!(streak.start(), NaiveDate::from_ymd_opt(2023, 1, 2));
        assert_eq!(streak.end(), NaiveDate::from_ymd_opt(2023, 1, 9));

        let broken = Streak {
            start_date: "soon".to_string(),
            ..streak
        };
        assert!(broken.start().is_none());
    }

    #[test]
    fn test_user_details_years() {
        let details: UserDetails =
            serde_json::from_str(r#"{"name": "rj", "discoguser": null, "years": "[2024,2023]"}"#)
                .unwrap();
        assert_eq!(details.parsed_years().unwrap(), vec![2024, 2023]);
        assert!(details.discoguser.is_none());
    }

    #[test]
    fn test_require_year() {
        assert!(require_year(2020).is_ok());
        assert!(require_year(0).is_err());
        assert!(require_year(-1).is_err());
    }
}
