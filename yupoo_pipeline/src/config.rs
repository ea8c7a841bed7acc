use serde::Deserialize;

use std::path::Path;
use std::time::Duration;

use yupoo_download::{DownloadOptions, NamingScheme};

use crate::error::Result;
use crate::retry::RetryPolicy;

pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_MAX_WORKERS: usize = 10;
pub const DEFAULT_LISTING_RETRIES: usize = 3;
pub const DEFAULT_LISTING_RETRY_DELAY_SECS: u64 = 5;

/// Settings of a pipeline run. Unknown keys are ignored and missing ones take their default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Seconds before a single HTTP request fails
    pub timeout: u64,
    /// Images of one album downloaded in parallel
    pub max_workers: usize,
    /// Total attempts for fetching the listing page
    pub listing_retries: usize,
    /// Seconds between listing attempts
    pub listing_retry_delay: u64,
    pub naming: NamingScheme,
    /// Rewrite `?pag=` into `&pag=` before the run
    pub normalize_page_delimiter: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            timeout: DEFAULT_TIMEOUT_SECS,
            max_workers: DEFAULT_MAX_WORKERS,
            listing_retries: DEFAULT_LISTING_RETRIES,
            listing_retry_delay: DEFAULT_LISTING_RETRY_DELAY_SECS,
            naming: NamingScheme::default(),
            normalize_page_delimiter: false,
        }
    }
}

impl Config {
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Read the config file, or use the defaults if there is none.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!("No config file at {}, using defaults", path.display());
            return Ok(Config::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.listing_retries, Duration::from_secs(self.listing_retry_delay))
    }

    pub fn download_options(&self) -> DownloadOptions {
        DownloadOptions {
            max_workers: self.max_workers.max(1),
            naming: self.naming,
        }
    }
}
