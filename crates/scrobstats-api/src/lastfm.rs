//! Last.fm API client.
//!
//! Every call carries the application `api_key`. Authenticated methods are
//! signed: parameters sorted by name, each name followed by its value, the
//! shared secret appended, and the MD5 of that string sent as `api_sig`.
//! `format=json` is added after signing and never takes part in it.

use crate::http::{self, Service};
use crate::storage::ClientStorage;
use reqwest::header::HeaderMap;
use reqwest::Client;
use scrobstats_common::{Result, StatsError};
use scrobstats_config::LastFmConfig;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use tracing::{error, info, instrument};

/// Number of entries requested for each top list.
pub const TOP_LIST_LIMIT: u32 = 10;

/// Computes the `api_sig` of a parameter set.
pub fn sign(params: &BTreeMap<String, String>, secret: &str) -> String {
    let mut raw = String::new();
    for (key, value) in params {
        raw.push_str(key);
        raw.push_str(value);
    }
    raw.push_str(secret);
    format!("{:x}", md5::compute(raw.as_bytes()))
}

/// Error envelope Last.fm returns instead of a payload.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: u32,
    #[serde(default)]
    message: String,
}

/// Image link in several sizes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    /// Image URL; empty when Last.fm has none.
    #[serde(rename = "#text", default)]
    pub url: String,
    /// Size label (`small`, `medium`, ...).
    #[serde(default)]
    pub size: String,
}

/// Artist reference nested in album and track entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistRef {
    /// Artist name.
    pub name: String,
    /// MusicBrainz identifier.
    #[serde(default)]
    pub mbid: String,
    /// Last.fm page.
    #[serde(default)]
    pub url: String,
}

/// Entry of a user's top artists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopArtist {
    /// Artist name.
    pub name: String,
    /// Plays by the user.
    #[serde(deserialize_with = "count_from_string_or_number")]
    pub playcount: u64,
    /// MusicBrainz identifier.
    #[serde(default)]
    pub mbid: String,
    /// Last.fm page.
    #[serde(default)]
    pub url: String,
    /// Artwork.
    #[serde(default)]
    pub image: Vec<Image>,
}

/// Entry of a user's top albums.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopAlbum {
    /// Album title.
    pub name: String,
    /// Plays by the user.
    #[serde(deserialize_with = "count_from_string_or_number")]
    pub playcount: u64,
    /// MusicBrainz identifier.
    #[serde(default)]
    pub mbid: String,
    /// Last.fm page.
    #[serde(default)]
    pub url: String,
    /// Album artist.
    pub artist: ArtistRef,
    /// Artwork.
    #[serde(default)]
    pub image: Vec<Image>,
}

/// Entry of a user's top tracks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopTrack {
    /// Track title.
    pub name: String,
    /// Plays by the user.
    #[serde(deserialize_with = "count_from_string_or_number")]
    pub playcount: u64,
    /// MusicBrainz identifier.
    #[serde(default)]
    pub mbid: String,
    /// Last.fm page.
    #[serde(default)]
    pub url: String,
    /// Performing artist.
    pub artist: ArtistRef,
    /// Artwork.
    #[serde(default)]
    pub image: Vec<Image>,
}

/// `user.gettopartists` payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopArtistsResponse {
    /// Wrapper object.
    pub topartists: TopArtists,
}

/// Artist list of [`TopArtistsResponse`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopArtists {
    /// Entries, most played first.
    #[serde(default)]
    pub artist: Vec<TopArtist>,
}

/// `user.gettopalbums` payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopAlbumsResponse {
    /// Wrapper object.
    pub topalbums: TopAlbums,
}

/// Album list of [`TopAlbumsResponse`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopAlbums {
    /// Entries, most played first.
    #[serde(default)]
    pub album: Vec<TopAlbum>,
}

/// `user.gettoptracks` payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopTracksResponse {
    /// Wrapper object.
    pub toptracks: TopTracks,
}

/// Track list of [`TopTracksResponse`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopTracks {
    /// Entries, most played first.
    #[serde(default)]
    pub track: Vec<TopTrack>,
}

/// Authenticated web session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// User the session belongs to.
    pub name: String,
    /// Session key used to sign write calls.
    pub key: String,
    /// Subscriber flag.
    #[serde(default)]
    pub subscriber: u8,
}

#[derive(Debug, Deserialize)]
struct SessionResponse {
    session: Session,
}

/// Play counts arrive as strings from some methods and as numbers from others.
fn count_from_string_or_number<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Count {
        Number(u64),
        Text(String),
    }

    match Count::deserialize(deserializer)? {
        Count::Number(n) => Ok(n),
        Count::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Last.fm API client.
#[derive(Debug, Clone)]
pub struct LastFmClient {
    client: Client,
    base_url: String,
    api_key: String,
    api_secret: String,
    storage: ClientStorage,
}

impl LastFmClient {
    /// Create a client. Session keys obtained through it are saved to `storage`.
    pub fn new(config: &LastFmConfig, storage: ClientStorage) -> Result<Self> {
        let client = http::build_client(
            config.timeout_seconds,
            Some(config.user_agent.as_str()),
            HeaderMap::new(),
        )?;
        Ok(Self {
            client,
            base_url: config.url.clone(),
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
            storage,
        })
    }

    /// Final query for a method call, signed when requested.
    pub fn build_params(
        &self,
        method: &str,
        params: &[(&str, &str)],
        signed: bool,
    ) -> BTreeMap<String, String> {
        let mut query: BTreeMap<String, String> = params
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        query.insert("method".to_string(), method.to_string());
        query.insert("api_key".to_string(), self.api_key.clone());

        if signed {
            let signature = sign(&query, &self.api_secret);
            query.insert("api_sig".to_string(), signature);
        }
        query.insert("format".to_string(), "json".to_string());
        query
    }

    #[instrument(skip(self, params))]
    async fn call<T>(&self, method: &str, params: &[(&str, &str)], signed: bool) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let query = self.build_params(method, params, signed);
        let url = http::join_url(&self.base_url, "");
        let (status, body) =
            http::send_raw(Service::LastFm, self.client.get(url).query(&query)).await?;

        if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(&body) {
            error!(code = envelope.error, message = %envelope.message, "Last.fm returned an error");
            return Err(StatsError::lastfm_with_code(envelope.message, envelope.error));
        }
        if !status.is_success() {
            error!(%status, "Last.fm request failed");
            return Err(Service::LastFm.status_error(status, &body));
        }
        http::decode(Service::LastFm, &body)
    }

    /// Exchange an auth token for a session and store its key.
    #[instrument(skip(self, token))]
    pub async fn get_session(&self, token: &str) -> Result<Session> {
        info!("Requesting Last.fm session");
        let response: SessionResponse = self
            .call("auth.getSession", &[("token", token)], true)
            .await?;
        self.storage.set_session_key(&response.session.key)?;
        info!(user = %response.session.name, "Stored Last.fm session");
        Ok(response.session)
    }

    fn top_params(user: &str) -> [(&'static str, String); 3] {
        [
            ("period", "overall".to_string()),
            ("limit", TOP_LIST_LIMIT.to_string()),
            ("user", user.to_string()),
        ]
    }

    async fn top<T>(&self, method: &str, user: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let owned = Self::top_params(user);
        let params: Vec<(&str, &str)> = owned.iter().map(|(k, v)| (*k, v.as_str())).collect();
        self.call(method, &params, false).await
    }

    /// A user's all-time top artists.
    #[instrument(skip(self))]
    pub async fn top_artists(&self, user: &str) -> Result<TopArtistsResponse> {
        info!("Fetching top artists");
        self.top("user.gettopartists", user).await
    }

    /// A user's all-time top albums.
    #[instrument(skip(self))]
    pub async fn top_albums(&self, user: &str) -> Result<TopAlbumsResponse> {
        info!("Fetching top albums");
        self.top("user.gettopalbums", user).await
    }

    /// A user's all-time top tracks.
    #[instrument(skip(self))]
    pub async fn top_tracks(&self, user: &str) -> Result<TopTracksResponse> {
        info!("Fetching top tracks");
        self.top("user.gettoptracks", user).await
    }
}
