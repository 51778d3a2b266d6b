//! Extraction settings
//!
//! Everything the executor and pipeline need is carried in [`Config`], built
//! from the environment and then adjusted by command-line flags.
//!
//! Environment variables:
//! - `API_URL`: API base URL (required)
//! - `API_KEY`: credential sent as the `apiKey` query parameter (optional)
//! - `PAGE_LIMIT`: records requested per page (optional, defaults to 100)
//! - `DATA_FOLDER`: output folder (optional, defaults to `data`)

use crate::client::RetryPolicy;
use eyre::{Context, Result};
use std::path::PathBuf;
use url::Url;

pub const DEFAULT_PAGE_LIMIT: u32 = 100;
pub const DEFAULT_DATA_FOLDER: &str = "data";

#[derive(Clone)]
pub struct Config {
    pub url: Url,
    pub api_key: Option<String>,
    pub limit: u32,
    pub data_folder: PathBuf,
    pub retry: RetryPolicy,
}

impl Config {
    /// Defaults for everything but the base URL
    pub fn new(url: Url) -> Self {
        Self {
            url,
            api_key: None,
            limit: DEFAULT_PAGE_LIMIT,
            data_folder: PathBuf::from(DEFAULT_DATA_FOLDER),
            retry: RetryPolicy::unbounded(),
        }
    }

    /// Load settings from the process environment
    ///
    /// A missing `API_KEY` is only warned about; requests go out without a
    /// credential and the API decides what to do with them. Call
    /// [`Config::validate`] once any command-line overrides are applied.
    pub fn from_env() -> Result<Self> {
        let url_str = std::env::var("API_URL").context("API_URL environment variable not set")?;
        let url = Url::parse(&url_str).with_context(|| format!("Invalid API_URL: {}", url_str))?;

        let mut config = Self::new(url);

        match std::env::var("API_KEY") {
            Ok(api_key) if !api_key.is_empty() => config.api_key = Some(api_key),
            _ => log::warn!("API_KEY is not set, requests will be sent without a credential"),
        }

        if let Ok(limit) = std::env::var("PAGE_LIMIT") {
            config.limit = limit
                .trim()
                .parse()
                .with_context(|| format!("Invalid PAGE_LIMIT: {}", limit))?;
        }

        if let Ok(folder) = std::env::var("DATA_FOLDER") {
            config.data_folder = PathBuf::from(folder);
        }

        Ok(config)
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_data_folder(mut self, folder: impl Into<PathBuf>) -> Self {
        self.data_folder = folder.into();
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Check settings that would otherwise fail on the first request
    pub fn validate(&self) -> Result<()> {
        if self.limit == 0 {
            eyre::bail!("Page limit must be greater than zero");
        }
        if self.url.cannot_be_a_base() {
            eyre::bail!("API_URL cannot be used as a base URL: {}", self.url);
        }
        Ok(())
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("url", &self.url.as_str())
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("limit", &self.limit)
            .field("data_folder", &self.data_folder)
            .field("retry", &self.retry)
            .finish()
    }
}
