use crate::core::Pipeline;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{EtlError, Result};
use std::time::Duration;

/// How far and how fast the engine walks the listing.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub start_url: String,
    pub max_pages: u64,
    pub startup_delay: Duration,
    pub stop_on_empty_page: bool,
}

impl RunOptions {
    pub fn from_config(config: &impl ConfigProvider) -> Self {
        Self {
            start_url: config.start_url(),
            max_pages: config.max_pages(),
            startup_delay: config.startup_delay(),
            stop_on_empty_page: config.stop_on_empty_page(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub pages: u64,
    pub rows: usize,
    /// Last page whose rows were fully written.
    pub last_page_url: Option<String>,
    /// Where the next run should start.
    pub next_page_url: String,
}

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    options: RunOptions,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P, options: RunOptions) -> Self {
        Self { pipeline, options }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub async fn run(&self) -> Result<ExportSummary> {
        // The public explorers cap clients at 3600 requests per hour.
        if !self.options.startup_delay.is_zero() {
            tokio::time::sleep(self.options.startup_delay).await;
        }

        self.pipeline.start().await?;

        let mut summary = ExportSummary {
            next_page_url: self.options.start_url.clone(),
            ..ExportSummary::default()
        };

        while summary.pages < self.options.max_pages {
            let url = summary.next_page_url.clone();
            tracing::info!("Scraping transaction list {}", url);

            let page = self.pipeline.extract(&url).await?;
            let next = page
                .next_href()
                .ok_or_else(|| EtlError::missing("_links.next.href", format!("page {}", url)))?
                .to_string();
            let records = page.into_records();

            let rows = self.pipeline.transform(&url, &records).await?;
            let written = self.pipeline.load(rows).await?;
            tracing::debug!("Wrote {} rows from {}", written, url);

            summary.pages += 1;
            summary.rows += written;
            summary.last_page_url = Some(url);
            summary.next_page_url = next;

            if records.is_empty() && self.options.stop_on_empty_page {
                tracing::info!("Reached an empty page, stopping");
                break;
            }
        }

        tracing::info!(
            "Scraped {} pages, {} rows. Next page: {}",
            summary.pages,
            summary.rows,
            summary.next_page_url
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Embedded, Link, Page, PageLinks, TransactionRow, TransactionSummary};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Serves pages `cursor=0..` with `sizes[i]` records each and records every call.
    struct ScriptedPipeline {
        sizes: Vec<usize>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedPipeline {
        fn new(sizes: Vec<usize>) -> Self {
            Self {
                sizes,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    fn cursor_of(url: &str) -> usize {
        url.rsplit('=').next().unwrap().parse().unwrap()
    }

    #[async_trait]
    impl Pipeline for ScriptedPipeline {
        async fn start(&self) -> Result<()> {
            self.calls.lock().unwrap().push("start".to_string());
            Ok(())
        }

        async fn extract(&self, page_url: &str) -> Result<Page<TransactionSummary>> {
            self.calls.lock().unwrap().push(format!("extract {}", page_url));
            let cursor = cursor_of(page_url);
            let size = self.sizes.get(cursor).copied().unwrap_or(0);
            Ok(Page {
                links: Some(PageLinks {
                    next: Link {
                        href: format!("mock://transactions?cursor={}", cursor + 1),
                    },
                }),
                embedded: Embedded {
                    records: (0..size)
                        .map(|i| TransactionSummary {
                            id: format!("{}-{}", cursor, i),
                        })
                        .collect(),
                },
            })
        }

        async fn transform(
            &self,
            _page_url: &str,
            records: &[TransactionSummary],
        ) -> Result<Vec<TransactionRow>> {
            Ok(records
                .iter()
                .map(|r| TransactionRow {
                    created_at: String::new(),
                    id: r.id.clone(),
                    operation_type: "set_options".to_string(),
                    memo: String::new(),
                    from: String::new(),
                    to: String::new(),
                    amount: String::new(),
                    fee: "0.0000100".to_string(),
                    token: "kag".to_string(),
                    successful: true,
                })
                .collect())
        }

        async fn load(&self, rows: Vec<TransactionRow>) -> Result<usize> {
            self.calls.lock().unwrap().push(format!("load {}", rows.len()));
            Ok(rows.len())
        }
    }

    fn options(max_pages: u64, stop_on_empty_page: bool) -> RunOptions {
        RunOptions {
            start_url: "mock://transactions?cursor=0".to_string(),
            max_pages,
            startup_delay: Duration::ZERO,
            stop_on_empty_page,
        }
    }

    #[tokio::test]
    async fn test_run_follows_next_links_up_to_page_limit() {
        let engine = EtlEngine::new(ScriptedPipeline::new(vec![2, 1, 5]), options(2, false));

        let summary = engine.run().await.unwrap();

        assert_eq!(summary.pages, 2);
        assert_eq!(summary.rows, 3);
        assert_eq!(
            summary.last_page_url.as_deref(),
            Some("mock://transactions?cursor=1")
        );
        assert_eq!(summary.next_page_url, "mock://transactions?cursor=2");
        assert_eq!(
            engine.pipeline().calls(),
            vec![
                "start",
                "extract mock://transactions?cursor=0",
                "load 2",
                "extract mock://transactions?cursor=1",
                "load 1",
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_page_keeps_going_by_default() {
        let engine = EtlEngine::new(ScriptedPipeline::new(vec![1, 0, 0]), options(3, false));

        let summary = engine.run().await.unwrap();
        assert_eq!(summary.pages, 3);
        assert_eq!(summary.rows, 1);
    }

    #[tokio::test]
    async fn test_stop_on_empty_page() {
        let engine = EtlEngine::new(ScriptedPipeline::new(vec![1, 0, 4]), options(10, true));

        let summary = engine.run().await.unwrap();
        assert_eq!(summary.pages, 2);
        assert_eq!(summary.rows, 1);
        assert_eq!(summary.next_page_url, "mock://transactions?cursor=2");
    }
}
