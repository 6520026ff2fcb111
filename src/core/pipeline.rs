use crate::core::extract::RowExtractor;
use crate::core::interrupt::Interrupt;
use crate::core::retry::{with_retry, RetryPolicy};
use crate::domain::model::{Page, TransactionRow, TransactionSummary, CSV_HEADER};
use crate::domain::ports::{ConfigProvider, ExplorerApi, Pipeline, Storage};
use crate::utils::error::{EtlError, Result};

/// Listing page -> rows -> appended CSV lines, with every network step retried.
pub struct TransactionPipeline<A: ExplorerApi, S: Storage> {
    pub(crate) extractor: RowExtractor<A>,
    pub(crate) storage: S,
    pub(crate) retry: RetryPolicy,
    pub(crate) interrupt: Interrupt,
}

impl<A: ExplorerApi, S: Storage> TransactionPipeline<A, S> {
    pub fn new(api: A, storage: S, config: &impl ConfigProvider, interrupt: Interrupt) -> Self {
        Self {
            extractor: RowExtractor::new(api, config.token()),
            storage,
            retry: RetryPolicy::new(config.retry_attempts(), config.retry_delay()),
            interrupt,
        }
    }
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>> {
    writer
        .into_inner()
        .map_err(|e| EtlError::IoError(e.into_error()))
}

#[async_trait::async_trait]
impl<A: ExplorerApi, S: Storage> Pipeline for TransactionPipeline<A, S> {
    async fn start(&self) -> Result<()> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(CSV_HEADER)?;
        self.storage.append(&finish(writer)?).await
    }

    async fn extract(&self, page_url: &str) -> Result<Page<TransactionSummary>> {
        let api = self.extractor.api();
        with_retry(&format!("Get {}", page_url), &self.retry, &self.interrupt, || {
            api.transactions_page(page_url)
        })
        .await
    }

    async fn transform(
        &self,
        page_url: &str,
        records: &[TransactionSummary],
    ) -> Result<Vec<TransactionRow>> {
        let mut rows = Vec::with_capacity(records.len());

        for record in records {
            let label = format!("get line {}", record.id);
            let outcome = with_retry(&label, &self.retry, &self.interrupt, || {
                self.extractor.extract_row(&record.id)
            })
            .await;

            match outcome {
                Ok(row) => rows.push(row),
                Err(e) if e.is_interrupt() => return Err(e),
                Err(e) => {
                    tracing::error!("Failed record gathering. Restart with {}", page_url);
                    return Err(EtlError::RecordFailed {
                        restart_url: page_url.to_string(),
                        source: Box::new(e),
                    });
                }
            }
        }

        Ok(rows)
    }

    async fn load(&self, rows: Vec<TransactionRow>) -> Result<usize> {
        if rows.is_empty() {
            return Ok(0);
        }

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        for row in &rows {
            writer.serialize(row)?;
        }

        let data = finish(writer)?;
        tracing::debug!("Appending {} rows ({} bytes)", rows.len(), data.len());
        self.storage.append(&data).await?;
        Ok(rows.len())
    }
}
