use crate::config::toml_config::TomlConfig;
use crate::config::{ExportConfig, Network};
use crate::utils::error::Result;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "horizon-csv")]
#[command(about = "Export Kinesis explorer transaction history to CSV")]
pub struct CliConfig {
    /// CSV file rows are appended to
    pub output: PathBuf,

    /// Plain-text log file, appended to
    pub log_file: PathBuf,

    #[arg(long, value_enum, help = "Explorer network [default: kag]")]
    pub network: Option<Network>,

    #[arg(long, help = "Explorer base URL, overrides the network default")]
    pub base_url: Option<String>,

    #[arg(long, help = "Listing page to resume from (see 'Restart with' in the log)")]
    pub start_url: Option<String>,

    #[arg(long, help = "Token symbol written to every row")]
    pub token: Option<String>,

    #[arg(long, help = "Attempts per request [default: 10]")]
    pub retry_attempts: Option<u32>,

    #[arg(long, help = "Seconds to wait between attempts [default: 300]")]
    pub retry_delay_secs: Option<u64>,

    #[arg(long, help = "HTTP request timeout in seconds [default: 60]")]
    pub timeout_secs: Option<u64>,

    #[arg(long, help = "Stop after this many listing pages")]
    pub max_pages: Option<u64>,

    #[arg(long, help = "Delay before the first request in milliseconds [default: 1000]")]
    pub startup_delay_ms: Option<u64>,

    #[arg(long, help = "Stop at the first page without records")]
    pub stop_on_empty_page: bool,

    #[arg(long, help = "TOML settings file")]
    pub config: Option<PathBuf>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// Built-in defaults, then the TOML file, then command-line flags.
    pub fn resolve(&self) -> Result<ExportConfig> {
        let file = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };

        let network = self.network.or(file.network()).unwrap_or_default();
        let mut config = ExportConfig::for_network(&self.output, &self.log_file, network);
        file.apply_to(&mut config);

        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(start_url) = &self.start_url {
            config.start_url = Some(start_url.clone());
        }
        if let Some(token) = &self.token {
            config.token = token.clone();
        }
        if let Some(attempts) = self.retry_attempts {
            config.retry_attempts = attempts;
        }
        if let Some(secs) = self.retry_delay_secs {
            config.retry_delay = Duration::from_secs(secs);
        }
        if let Some(secs) = self.timeout_secs {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(max_pages) = self.max_pages {
            config.max_pages = max_pages;
        }
        if let Some(ms) = self.startup_delay_ms {
            config.startup_delay = Duration::from_millis(ms);
        }
        if self.stop_on_empty_page {
            config.stop_on_empty_page = true;
        }

        Ok(config)
    }
}
