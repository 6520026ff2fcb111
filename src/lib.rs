pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::CliConfig;

pub use crate::adapters::{http::HorizonClient, storage::LocalStorage};
pub use crate::config::{ExportConfig, Network};
pub use crate::core::{
    etl::{EtlEngine, ExportSummary, RunOptions},
    interrupt::Interrupt,
    pipeline::TransactionPipeline,
    retry::{with_retry, RetryPolicy},
};
pub use crate::utils::error::{EtlError, Result};
