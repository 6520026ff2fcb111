use crate::domain::model::{EffectRecord, Page, TransactionRow, TransactionSummary, TransactionDetail};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;

/// Read-only view of a Horizon-style explorer.
#[async_trait]
pub trait ExplorerApi: Send + Sync {
    fn base_url(&self) -> &str;

    /// Fetches one listing page. `url` is either the initial listing URL or a
    /// `_links.next.href` returned by a previous page.
    async fn transactions_page(&self, url: &str) -> Result<Page<TransactionSummary>>;

    async fn transaction(&self, id: &str) -> Result<TransactionDetail>;

    /// Operations of a transaction, newest first. Records are kept raw so that
    /// unrecognised payloads can be logged verbatim.
    async fn operations(&self, id: &str) -> Result<Page<serde_json::Value>>;

    /// Effects of a transaction, newest first.
    async fn effects(&self, id: &str) -> Result<Page<EffectRecord>>;
}

pub trait Storage: Send + Sync {
    fn append(&self, data: &[u8]) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn start_url(&self) -> String;
    fn output_path(&self) -> &Path;
    fn log_path(&self) -> &Path;
    fn token(&self) -> &str;
    fn retry_attempts(&self) -> u32;
    fn retry_delay(&self) -> Duration;
    fn request_timeout(&self) -> Duration;
    fn max_pages(&self) -> u64;
    fn startup_delay(&self) -> Duration;
    fn stop_on_empty_page(&self) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    /// Runs once before the first page.
    async fn start(&self) -> Result<()>;
    async fn extract(&self, page_url: &str) -> Result<Page<TransactionSummary>>;
    async fn transform(
        &self,
        page_url: &str,
        records: &[TransactionSummary],
    ) -> Result<Vec<TransactionRow>>;
    async fn load(&self, rows: Vec<TransactionRow>) -> Result<usize>;
}
