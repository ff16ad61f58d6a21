//! Snapshot downloading.
//!
//! Fetches an end-of-game page from the game server so it can be saved
//! into the data directory.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;
use thiserror::Error;
use tracing::info;
use url::Url;

use crate::config::FetchConfig;
use crate::storage::{validate_snapshot_name, DataDir, StorageError};

/// Errors that can occur during fetching.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("Content too large: {size} bytes (max {max_size})")]
    ContentTooLarge { size: usize, max_size: usize },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Configuration for the HTTP fetcher.
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Maximum content size to fetch
    pub max_content_size: usize,

    /// Request timeout
    pub timeout: Duration,

    /// User agent string
    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        (&FetchConfig::default()).into()
    }
}

impl From<&FetchConfig> for FetcherConfig {
    fn from(config: &FetchConfig) -> Self {
        Self {
            max_content_size: config.max_content_size,
            timeout: Duration::from_secs(config.timeout_seconds),
            user_agent: format!("terra-stats/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// HTTP fetcher for game snapshots.
pub struct Fetcher {
    client: Client,
    config: FetcherConfig,
}

impl Fetcher {
    /// Create a new fetcher with the given configuration.
    pub fn new(config: FetcherConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static("terra-stats")),
        );

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, config })
    }

    /// Create a fetcher with default configuration.
    pub fn with_defaults() -> Result<Self, FetchError> {
        Self::new(FetcherConfig::default())
    }

    /// Parse and check a snapshot URL; only http(s) is accepted.
    pub fn parse_url(raw: &str) -> Result<Url, FetchError> {
        let url = Url::parse(raw).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", raw, e)))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(FetchError::InvalidUrl(format!(
                "unsupported scheme '{}'",
                other
            ))),
        }
    }

    /// Download the page body.
    pub async fn download(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        info!("Fetching {}", url);

        let response = self.client.get(url.as_str()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        if let Some(len) = response.content_length() {
            if len as usize > self.config.max_content_size {
                return Err(FetchError::ContentTooLarge {
                    size: len as usize,
                    max_size: self.config.max_content_size,
                });
            }
        }

        let content = response.bytes().await?;

        if content.len() > self.config.max_content_size {
            return Err(FetchError::ContentTooLarge {
                size: content.len(),
                max_size: self.config.max_content_size,
            });
        }

        info!("Fetched {} bytes from {}", content.len(), url);
        Ok(content.to_vec())
    }

    /// Download a snapshot and write it into the data directory.
    ///
    /// Without a name the file gets the next free `MM-DD-YYYY-N.html`
    /// slot for today. Returns the name written.
    pub async fn save(
        &self,
        raw_url: &str,
        file_name: Option<&str>,
        data: &DataDir,
    ) -> Result<String, FetchError> {
        let url = Self::parse_url(raw_url)?;
        let file_name = match file_name.filter(|n| !n.is_empty()) {
            Some(name) => {
                validate_snapshot_name(name)?;
                name.to_string()
            }
            None => data.next_snapshot_name(chrono::Local::now().date_naive()),
        };

        let body = self.download(&url).await?;
        data.write_snapshot(&file_name, &body)?;
        info!("Saved snapshot {}", file_name);

        Ok(file_name)
    }
}
