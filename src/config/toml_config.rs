use crate::config::{ExportConfig, Network};
use crate::utils::error::{EtlError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Optional settings file. Every key may be omitted; command-line flags win
/// over anything set here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub pagination: PaginationConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    pub network: Option<Network>,
    pub base_url: Option<String>,
    pub start_url: Option<String>,
    pub token: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetryConfig {
    pub attempts: Option<u32>,
    pub delay_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PaginationConfig {
    pub max_pages: Option<u64>,
    pub startup_delay_ms: Option<u64>,
    pub stop_on_empty_page: Option<bool>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigError {
            message: format!("env substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Network picked by the file, if any.
    pub fn network(&self) -> Option<Network> {
        self.source.network
    }

    /// Overwrites `config` with every value this file sets.
    pub fn apply_to(&self, config: &mut ExportConfig) {
        if let Some(base_url) = &self.source.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(start_url) = &self.source.start_url {
            config.start_url = Some(start_url.clone());
        }
        if let Some(token) = &self.source.token {
            config.token = token.clone();
        }
        if let Some(secs) = self.source.timeout_seconds {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(attempts) = self.retry.attempts {
            config.retry_attempts = attempts;
        }
        if let Some(secs) = self.retry.delay_seconds {
            config.retry_delay = Duration::from_secs(secs);
        }
        if let Some(max_pages) = self.pagination.max_pages {
            config.max_pages = max_pages;
        }
        if let Some(ms) = self.pagination.startup_delay_ms {
            config.startup_delay = Duration::from_millis(ms);
        }
        if let Some(stop) = self.pagination.stop_on_empty_page {
            config.stop_on_empty_page = stop;
        }
    }
}
