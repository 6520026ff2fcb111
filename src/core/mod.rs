pub mod etl;
pub mod extract;
pub mod interrupt;
pub mod pipeline;
pub mod retry;

pub use crate::domain::model::{Page, TransactionRow, TransactionSummary};
pub use crate::domain::ports::{ConfigProvider, ExplorerApi, Pipeline, Storage};
pub use crate::utils::error::Result;
