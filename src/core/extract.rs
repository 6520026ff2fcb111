use crate::domain::model::{OperationRecord, OperationType, TransactionRow};
use crate::domain::ports::ExplorerApi;
use crate::utils::error::{EtlError, Result};

/// Fees are reported in stroops; one token is 10^7 stroops.
pub const FEE_DECIMALS: u32 = 7;

/// Renders a stroop amount as token units with exactly seven decimals,
/// e.g. `"12345678"` -> `"1.2345678"`.
pub fn format_fee(raw: &str) -> Result<String> {
    let stroops: u128 = raw.trim().parse().map_err(|e: std::num::ParseIntError| {
        EtlError::InvalidField {
            field: "fee_charged".to_string(),
            value: raw.to_string(),
            reason: e.to_string(),
        }
    })?;
    let scale = 10u128.pow(FEE_DECIMALS);
    Ok(format!(
        "{}.{:0width$}",
        stroops / scale,
        stroops % scale,
        width = FEE_DECIMALS as usize
    ))
}

/// Turns one transaction into one CSV row by looking at its latest operation.
pub struct RowExtractor<A: ExplorerApi> {
    api: A,
    token: String,
}

impl<A: ExplorerApi> RowExtractor<A> {
    pub fn new(api: A, token: impl Into<String>) -> Self {
        Self {
            api,
            token: token.into(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub async fn extract_row(&self, transaction_id: &str) -> Result<TransactionRow> {
        let transaction = self.api.transaction(transaction_id).await?;
        let fee = format_fee(&transaction.fee_charged)?;
        let memo = transaction.memo.unwrap_or_default();

        let raw = self
            .api
            .operations(transaction_id)
            .await?
            .into_records()
            .into_iter()
            .next()
            .ok_or_else(|| {
                EtlError::missing("_embedded.records[0]", format!("operations of {}", transaction_id))
            })?;

        let type_name = raw.get("type").and_then(|t| t.as_str()).unwrap_or_default();
        if OperationType::from_name(type_name) == OperationType::Unknown {
            tracing::error!("Failed to find type in {}", raw);
            return Err(EtlError::UnknownOperation {
                payload: raw.to_string(),
            });
        }

        let mut op: OperationRecord = serde_json::from_value(raw)?;
        let context = format!("{} operation of {}", op.type_name, transaction_id);

        let (to, amount) = match op.operation_type() {
            OperationType::CreateAccount => (
                required(op.account.take(), "account", &context)?,
                required(op.starting_balance.take(), "starting_balance", &context)?,
            ),
            OperationType::AccountMerge => (
                required(op.into.take(), "into", &context)?,
                self.effect_amount(transaction_id, 1).await?,
            ),
            OperationType::Payment => (
                required(op.to.take(), "to", &context)?,
                required(op.amount.take(), "amount", &context)?,
            ),
            OperationType::Inflation => (String::new(), self.inflation_amount(transaction_id).await),
            OperationType::SetOptions => (String::new(), String::new()),
            OperationType::Unknown => {
                return Err(EtlError::UnknownOperation {
                    payload: op.type_name,
                })
            }
        };

        Ok(TransactionRow {
            created_at: op.created_at,
            id: transaction_id.to_string(),
            operation_type: op.type_name,
            memo,
            from: op.source_account,
            to,
            amount,
            fee,
            token: self.token.clone(),
            successful: op.transaction_successful,
        })
    }

    /// Amount of the `index`-th effect, newest first.
    async fn effect_amount(&self, transaction_id: &str, index: usize) -> Result<String> {
        self.api
            .effects(transaction_id)
            .await?
            .into_records()
            .into_iter()
            .nth(index)
            .and_then(|effect| effect.amount)
            .ok_or_else(|| {
                EtlError::missing(
                    format!("_embedded.records[{}].amount", index),
                    format!("effects of {}", transaction_id),
                )
            })
    }

    // Inflation payouts can have no amount effect at all, which means nothing was paid.
    async fn inflation_amount(&self, transaction_id: &str) -> String {
        match self.effect_amount(transaction_id, 0).await {
            Ok(amount) => amount,
            Err(e) => {
                tracing::debug!("No inflation amount for {}, using 0: {}", transaction_id, e);
                "0".to_string()
            }
        }
    }
}

fn required(value: Option<String>, field: &str, context: &str) -> Result<String> {
    value.ok_or_else(|| EtlError::missing(field, context))
}
