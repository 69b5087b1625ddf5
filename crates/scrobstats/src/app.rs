//! Wiring of configuration, clients and dashboard into runnable commands.

use crate::cli::Command;
use crate::error::{AppError, AppResult};
use scrobstats_api::{BackendClient, ClientStorage, CollectionRelease, DiscogsClient, LastFmClient};
use scrobstats_config::Config;
use scrobstats_dashboard::{Dashboard, YearManager};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Everything a command needs, built once from the configuration.
pub struct App {
    config: Arc<Config>,
    storage: ClientStorage,
    backend: Arc<BackendClient>,
    lastfm: Arc<LastFmClient>,
    discogs: DiscogsClient,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("config", &"<Config>")
            .field("backend", &self.backend.base_url())
            .finish_non_exhaustive()
    }
}

/// Summary of a Discogs collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionSummary {
    /// Discogs user.
    pub user: String,
    /// Number of releases.
    pub releases: usize,
    /// Releases per format name.
    pub formats: BTreeMap<String, usize>,
    /// Releases per decade of release; unknown years are left out.
    pub decades: BTreeMap<String, usize>,
}

impl CollectionSummary {
    /// Count a user's releases by format and decade.
    pub fn from_releases(user: &str, releases: &[CollectionRelease]) -> Self {
        let mut formats = BTreeMap::new();
        let mut decades = BTreeMap::new();

        for release in releases {
            let info = &release.basic_information;
            for format in &info.formats {
                *formats.entry(format.name.clone()).or_insert(0) += 1;
            }
            if info.year > 0 {
                let decade = format!("{}s", info.year - info.year % 10);
                *decades.entry(decade).or_insert(0) += 1;
            }
        }

        Self {
            user: user.to_string(),
            releases: releases.len(),
            formats,
            decades,
        }
    }
}

impl App {
    /// Build the clients and open client storage.
    pub fn new(config: Config) -> AppResult<Self> {
        let storage = ClientStorage::open_file(&config.storage.path)?;
        let backend = Arc::new(BackendClient::new(&config.backend)?);
        let lastfm = Arc::new(LastFmClient::new(&config.lastfm, storage.clone())?);
        let discogs = DiscogsClient::new(&config.discogs)?;

        Ok(Self {
            config: Arc::new(config),
            storage,
            backend,
            lastfm,
            discogs,
        })
    }

    /// The loaded configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Year tabs persisted locally, or the configured starting years.
    pub fn stored_years(&self) -> AppResult<Vec<i32>> {
        Ok(self
            .storage
            .years()?
            .unwrap_or_else(|| self.config.dashboard.starting_years()))
    }

    /// A year manager seeded from [`App::stored_years`].
    pub fn year_manager(&self) -> AppResult<YearManager> {
        Ok(YearManager::new(
            self.stored_years()?,
            self.config.dashboard.default_year,
            self.backend.clone(),
            self.storage.clone(),
        ))
    }

    /// Run a command and return what it prints.
    #[instrument(skip_all)]
    pub async fn run(&self, command: Command) -> AppResult<String> {
        match command {
            Command::Dashboard { user, year } => self.dashboard(&user, year).await,
            Command::AddYear { user } => self.add_year(&user).await,
            Command::Years => Ok(serde_json::to_string(&self.stored_years()?)?),
            Command::Collection { user } => self.collection(&user).await,
            Command::Session { token } => self.session(&token).await,
            Command::Profile { user } => self.profile(&user).await,
        }
    }

    async fn dashboard(&self, user: &str, year: Option<i32>) -> AppResult<String> {
        let mut years = self.year_manager()?;
        if let Some(year) = year {
            years.select_year(year);
        }

        let dashboard = Dashboard::new(
            self.backend.clone(),
            self.lastfm.clone(),
            &self.config.dashboard.palette,
        );
        dashboard.refresh(user, &years).await;

        Ok(serde_json::to_string_pretty(&dashboard.state())?)
    }

    async fn add_year(&self, user: &str) -> AppResult<String> {
        let mut years = self.year_manager()?;
        match years.add_year(user).await {
            Some(year) => info!(year, "Year added"),
            None => warn!("No year added"),
        }
        Ok(serde_json::to_string(years.years())?)
    }

    async fn collection(&self, user: &str) -> AppResult<String> {
        if self.config.discogs.api_key.is_empty() || self.config.discogs.api_secret.is_empty() {
            return Err(AppError::MissingCredentials("discogs.api_key and discogs.api_secret"));
        }

        let releases = self.discogs.load_user_library(user).await?;
        let summary = CollectionSummary::from_releases(user, &releases);
        Ok(serde_json::to_string_pretty(&summary)?)
    }

    async fn session(&self, token: &str) -> AppResult<String> {
        if self.config.lastfm.api_key.is_empty() || self.config.lastfm.api_secret.is_empty() {
            return Err(AppError::MissingCredentials("lastfm.api_key and lastfm.api_secret"));
        }

        let session = self.lastfm.get_session(token).await?;
        Ok(format!("Stored Last.fm session for {}", session.name))
    }

    async fn profile(&self, user: &str) -> AppResult<String> {
        let details = self.backend.load_user_details(user).await?;
        let profile_years = details.parsed_years()?;

        if !profile_years.is_empty() {
            let mut years = self.year_manager()?;
            years.set_years(profile_years);
            self.storage.set_years(years.years())?;
            info!(years = ?years.years(), "Adopted year tabs from the profile");
        }

        Ok(serde_json::to_string_pretty(&details)?)
    }
}
