//! Best-effort avatar downloads.
//!
//! Avatars are decoration. Every failure (timeout, bad status, something
//! that isn't an image) collapses to `None` and the row is shown without one.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;

use crate::config::ApiConfig;
use crate::error::Result;

/// Downloaded avatar bytes and their image type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarImage {
    /// Raw image bytes.
    pub bytes: Vec<u8>,
    /// The `Content-Type` the server reported, e.g. `image/jpeg`.
    pub content_type: String,
}

impl AvatarImage {
    /// File extension matching the content type.
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self.content_type.as_str() {
            "image/jpeg" | "image/jpg" => "jpg",
            "image/png" => "png",
            "image/gif" => "gif",
            "image/webp" => "webp",
            _ => "img",
        }
    }
}

/// Something that can fetch avatar images.
#[async_trait]
pub trait AvatarSource: Send + Sync {
    /// Fetch an avatar, or `None` on any failure.
    async fn fetch_avatar(&self, url: &str) -> Option<AvatarImage>;
}

/// Avatar downloader with its own, shorter timeout.
#[derive(Debug, Clone)]
pub struct AvatarFetcher {
    http_client: reqwest::Client,
}

impl AvatarFetcher {
    /// Build a fetcher using the configured avatar timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.avatar_timeout())
            .build()?;
        Ok(Self { http_client })
    }
}

#[async_trait]
impl AvatarSource for AvatarFetcher {
    async fn fetch_avatar(&self, url: &str) -> Option<AvatarImage> {
        let response = match self.http_client.get(url).send().await {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                debug!("Avatar {url} returned {}", response.status());
                return None;
            }
            Err(e) => {
                debug!("Avatar {url} failed: {e}");
                return None;
            }
        };

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or_default().trim().to_ascii_lowercase())
            .unwrap_or_default();
        if !content_type.starts_with("image/") {
            debug!("Avatar {url} is not an image ({content_type})");
            return None;
        }

        let bytes = response.bytes().await.ok()?;
        if bytes.is_empty() {
            return None;
        }

        Some(AvatarImage {
            bytes: bytes.to_vec(),
            content_type,
        })
    }
}
