use crate::domain::model::{EffectRecord, Page, TransactionDetail, TransactionSummary};
use crate::domain::ports::ExplorerApi;
use crate::utils::error::{EtlError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

pub const PAGE_SIZE: u32 = 100;

/// First page of the listing, newest transactions first.
pub fn listing_url(base_url: &str) -> String {
    format!(
        "{}/transactions?limit={}&order=desc",
        base_url.trim_end_matches('/'),
        PAGE_SIZE
    )
}

#[derive(Debug, Clone)]
pub struct HorizonClient {
    client: Client,
    base_url: String,
}

impl HorizonClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        tracing::debug!("Making API request to: {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            return Err(EtlError::HttpStatusError {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl ExplorerApi for HorizonClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn transactions_page(&self, url: &str) -> Result<Page<TransactionSummary>> {
        self.get_json(url).await
    }

    async fn transaction(&self, id: &str) -> Result<TransactionDetail> {
        self.get_json(&format!("{}/transactions/{}", self.base_url, id))
            .await
    }

    async fn operations(&self, id: &str) -> Result<Page<serde_json::Value>> {
        self.get_json(&format!(
            "{}/transactions/{}/operations?order=desc",
            self.base_url, id
        ))
        .await
    }

    async fn effects(&self, id: &str) -> Result<Page<EffectRecord>> {
        self.get_json(&format!(
            "{}/transactions/{}/effects?order=desc",
            self.base_url, id
        ))
        .await
    }
}
