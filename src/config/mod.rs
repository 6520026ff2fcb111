#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::adapters::http::listing_url;
use crate::core::retry::{DEFAULT_RETRY_ATTEMPTS, DEFAULT_RETRY_DELAY};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_STARTUP_DELAY: Duration = Duration::from_secs(1);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Kinesis mainnet explorers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Kinesis Silver
    #[default]
    Kag,
    /// Kinesis Gold
    Kau,
}

impl Network {
    pub fn base_url(self) -> &'static str {
        match self {
            Network::Kag => "https://kag-mainnet.kinesisgroup.io",
            Network::Kau => "https://kau-mainnet.kinesisgroup.io",
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            Network::Kag => "kag",
            Network::Kau => "kau",
        }
    }
}

/// Fully resolved export settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
    pub output_path: PathBuf,
    pub log_path: PathBuf,
    pub network: Network,
    pub base_url: String,
    /// Resume point; defaults to the first listing page.
    pub start_url: Option<String>,
    pub token: String,
    pub retry_attempts: u32,
    pub retry_delay: Duration,
    pub request_timeout: Duration,
    pub max_pages: u64,
    pub startup_delay: Duration,
    pub stop_on_empty_page: bool,
}

impl ExportConfig {
    pub fn new(output_path: impl Into<PathBuf>, log_path: impl Into<PathBuf>) -> Self {
        Self::for_network(output_path, log_path, Network::default())
    }

    pub fn for_network(
        output_path: impl Into<PathBuf>,
        log_path: impl Into<PathBuf>,
        network: Network,
    ) -> Self {
        Self {
            output_path: output_path.into(),
            log_path: log_path.into(),
            network,
            base_url: network.base_url().to_string(),
            start_url: None,
            token: network.token().to_string(),
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            retry_delay: DEFAULT_RETRY_DELAY,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            max_pages: u64::MAX,
            startup_delay: DEFAULT_STARTUP_DELAY,
            stop_on_empty_page: false,
        }
    }
}

impl ConfigProvider for ExportConfig {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn start_url(&self) -> String {
        self.start_url
            .clone()
            .unwrap_or_else(|| listing_url(&self.base_url))
    }

    fn output_path(&self) -> &Path {
        &self.output_path
    }

    fn log_path(&self) -> &Path {
        &self.log_path
    }

    fn token(&self) -> &str {
        &self.token
    }

    fn retry_attempts(&self) -> u32 {
        self.retry_attempts
    }

    fn retry_delay(&self) -> Duration {
        self.retry_delay
    }

    fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    fn max_pages(&self) -> u64 {
        self.max_pages
    }

    fn startup_delay(&self) -> Duration {
        self.startup_delay
    }

    fn stop_on_empty_page(&self) -> bool {
        self.stop_on_empty_page
    }
}

impl Validate for ExportConfig {
    fn validate(&self) -> Result<()> {
        validation::file_path("output", &self.output_path.to_string_lossy())?;
        validation::file_path("log_file", &self.log_path.to_string_lossy())?;
        validation::http_url("base_url", &self.base_url)?;
        if let Some(start_url) = &self.start_url {
            validation::listing_url("start_url", start_url)?;
        }
        validation::non_blank("token", &self.token)?;
        validation::at_least("retry_attempts", self.retry_attempts.into(), 1)?;
        validation::at_least("max_pages", self.max_pages, 1)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_follow_network() {
        let config = ExportConfig::for_network("out.csv", "logs.txt", Network::Kau);

        assert_eq!(config.base_url, "https://kau-mainnet.kinesisgroup.io");
        assert_eq!(config.token, "kau");
        assert_eq!(config.retry_attempts, 10);
        assert_eq!(config.retry_delay, Duration::from_secs(300));
        assert_eq!(config.startup_delay, Duration::from_secs(1));
        assert_eq!(
            config.start_url(),
            "https://kau-mainnet.kinesisgroup.io/transactions?limit=100&order=desc"
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_start_url_overrides_listing() {
        let mut config = ExportConfig::new("out.csv", "logs.txt");
        config.start_url =
            Some("https://kag-mainnet.kinesisgroup.io/transactions?cursor=5&limit=100&order=desc".to_string());

        assert!(config.start_url().contains("cursor=5"));
        assert!(config.validate().is_ok());

        config.start_url = Some("https://kag-mainnet.kinesisgroup.io/effects?cursor=5".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = ExportConfig::new("out.csv", "logs.txt");
        config.retry_attempts = 0;
        assert!(config.validate().is_err());

        let mut config = ExportConfig::new("out.csv", "logs.txt");
        config.base_url = "kag-mainnet".to_string();
        assert!(config.validate().is_err());

        let mut config = ExportConfig::new("", "logs.txt");
        config.token = "kag".to_string();
        assert!(config.validate().is_err());
    }
}
