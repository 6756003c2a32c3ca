//! Faceit Data API client.
//!
//! One request per search: `GET {base}/matches/{id}` with a bearer token and
//! a bounded timeout. There is no retry; a failed lookup is reported and the
//! search ends there.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde_json::Value;
use tracing::{debug, info};

use crate::config::ApiConfig;
use crate::error::{Error, Result};

/// Something that can look up a match record by id.
#[async_trait]
pub trait MatchSource: Send + Sync {
    /// Fetch the raw match record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be fetched or decoded.
    async fn fetch_match(&self, match_id: &str) -> Result<Value>;
}

/// Derive the match id from a matchroom link.
///
/// The id is the link's final non-empty path segment; query strings,
/// fragments and trailing slashes are ignored.
///
/// # Errors
///
/// Returns [`Error::EmptyMatchUrl`] for blank input and
/// [`Error::InvalidMatchUrl`] when no segment remains.
pub fn match_id_from_url(url: &str) -> Result<&str> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(Error::EmptyMatchUrl);
    }

    let path = trimmed.split(['?', '#']).next().unwrap_or_default();
    let invalid = || Error::InvalidMatchUrl {
        url: trimmed.to_string(),
    };

    // With a scheme, the first segment is the host and never the id.
    let (rest, has_scheme) = match path.split_once("://") {
        Some((_, rest)) => (rest.trim_end_matches('/'), true),
        None => (path.trim_end_matches('/'), false),
    };
    if has_scheme && !rest.contains('/') {
        return Err(invalid());
    }

    match rest.rsplit('/').next() {
        Some(segment) if !segment.is_empty() => Ok(segment),
        _ => Err(invalid()),
    }
}

/// HTTP client for the Faceit Data API.
pub struct FaceitClient {
    base_url: String,
    api_key: String,
    http_client: reqwest::Client,
}

impl std::fmt::Debug for FaceitClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FaceitClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl FaceitClient {
    /// Build a client from the API configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingApiKey`] if no key is configured, or an HTTP
    /// error if the client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let api_key = config.api_key().ok_or(Error::MissingApiKey)?.to_string();
        let http_client = reqwest::Client::builder()
            .timeout(config.match_timeout())
            .build()?;

        Ok(Self {
            base_url: config.base_url.trim().trim_end_matches('/').to_string(),
            api_key,
            http_client,
        })
    }

    /// The lookup URL for a match id.
    #[must_use]
    pub fn match_url(&self, match_id: &str) -> String {
        format!("{}/matches/{match_id}", self.base_url)
    }
}

#[async_trait]
impl MatchSource for FaceitClient {
    async fn fetch_match(&self, match_id: &str) -> Result<Value> {
        let url = self.match_url(match_id);
        debug!("GET {url}");

        let response = self
            .http_client
            .get(&url)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| classify(e, "match fetch"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                url,
            });
        }

        let record: Value = response
            .json()
            .await
            .map_err(|e| classify(e, "match fetch"))?;
        info!("Fetched match {match_id}");
        Ok(record)
    }
}

/// Map a reqwest failure onto the error taxonomy.
fn classify(err: reqwest::Error, operation: &str) -> Error {
    if err.is_timeout() {
        Error::Timeout {
            operation: operation.to_string(),
        }
    } else {
        Error::Http(err)
    }
}
