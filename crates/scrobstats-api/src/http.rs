//! Shared HTTP plumbing for the API clients.

use reqwest::header::HeaderMap;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use scrobstats_common::{truncate_string, Result, StatsError};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error};

/// Longest response body excerpt carried into an error message.
const BODY_EXCERPT_LEN: usize = 200;

/// Remote service a request is addressed to; decides the error variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Service {
    Backend,
    LastFm,
    Discogs,
}

impl Service {
    pub(crate) const fn name(self) -> &'static str {
        match self {
            Self::Backend => "backend",
            Self::LastFm => "lastfm",
            Self::Discogs => "discogs",
        }
    }

    pub(crate) fn status_error(self, status: StatusCode, body: &str) -> StatsError {
        let message = format!(
            "{} returned {}: {}",
            self.name(),
            status,
            truncate_string(body, BODY_EXCERPT_LEN)
        );
        match self {
            Self::Backend => StatsError::backend_with_status(message, status.as_u16()),
            Self::LastFm => StatsError::lastfm(message),
            Self::Discogs => StatsError::discogs_with_status(message, status.as_u16()),
        }
    }
}

/// Builds a reqwest client with optional timeout, user agent and default headers.
pub(crate) fn build_client(
    timeout_seconds: Option<u64>,
    user_agent: Option<&str>,
    headers: HeaderMap,
) -> Result<Client> {
    let mut builder = Client::builder().default_headers(headers);
    if let Some(secs) = timeout_seconds {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    if let Some(agent) = user_agent {
        builder = builder.user_agent(agent);
    }
    builder
        .build()
        .map_err(|e| StatsError::network_with_source("Failed to create HTTP client", e))
}

/// Sends a request and returns the status and body without judging the status.
pub(crate) async fn send_raw(
    service: Service,
    request: RequestBuilder,
) -> Result<(StatusCode, String)> {
    let response = request.send().await.map_err(|e| {
        error!(service = service.name(), error = %e, "Request failed");
        StatsError::from(e)
    })?;
    read_body(service, response).await
}

/// Sends a request and returns the body of a successful response.
pub(crate) async fn send_text(service: Service, request: RequestBuilder) -> Result<String> {
    let (status, body) = send_raw(service, request).await?;
    if status.is_success() {
        debug!(service = service.name(), %status, bytes = body.len(), "Request successful");
        Ok(body)
    } else {
        error!(service = service.name(), %status, "Request returned an error status");
        Err(service.status_error(status, &body))
    }
}

/// Sends a request and decodes the JSON body of a successful response.
pub(crate) async fn send_json<T>(service: Service, request: RequestBuilder) -> Result<T>
where
    T: DeserializeOwned,
{
    let body = send_text(service, request).await?;
    decode(service, &body)
}

/// Decodes a JSON body, logging payloads that do not match the expected shape.
pub(crate) fn decode<T>(service: Service, body: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    serde_json::from_str(body).map_err(|e| {
        error!(service = service.name(), error = %e, "Unexpected response payload");
        StatsError::from(e)
    })
}

async fn read_body(service: Service, response: Response) -> Result<(StatusCode, String)> {
    let status = response.status();
    let body = response.text().await.map_err(|e| {
        error!(service = service.name(), error = %e, "Failed to read response body");
        StatsError::network_with_source("Failed to read response body", e)
    })?;
    Ok((status, body))
}

/// Joins a base URL and an endpoint path with exactly one slash between them.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
