use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Column order of the exported CSV.
pub const CSV_HEADER: [&str; 10] = [
    "created_at",
    "id",
    "type",
    "memo",
    "from",
    "to",
    "amount",
    "fee",
    "token",
    "successful",
];

/// HAL-style listing returned by every Horizon collection endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    #[serde(rename = "_links", default)]
    pub links: Option<PageLinks>,
    #[serde(rename = "_embedded")]
    pub embedded: Embedded<T>,
}

impl<T> Page<T> {
    pub fn next_href(&self) -> Option<&str> {
        self.links.as_ref().map(|links| links.next.href.as_str())
    }

    pub fn records(&self) -> &[T] {
        &self.embedded.records
    }

    pub fn into_records(self) -> Vec<T> {
        self.embedded.records
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageLinks {
    pub next: Link,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Link {
    pub href: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Embedded<T> {
    pub records: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransactionSummary {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransactionDetail {
    pub id: String,
    #[serde(deserialize_with = "string_or_number")]
    pub fee_charged: String,
    #[serde(default)]
    pub memo: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationType {
    CreateAccount,
    AccountMerge,
    Payment,
    Inflation,
    SetOptions,
    Unknown,
}

impl OperationType {
    pub fn from_name(name: &str) -> Self {
        match name {
            "create_account" => OperationType::CreateAccount,
            "account_merge" => OperationType::AccountMerge,
            "payment" => OperationType::Payment,
            "inflation" => OperationType::Inflation,
            "set_options" => OperationType::SetOptions,
            _ => OperationType::Unknown,
        }
    }
}

/// The subset of a Horizon operation needed to fill a row. Which of the optional
/// fields are present depends on `type_name`. `created_at` is kept exactly as the
/// explorer sent it.
#[derive(Debug, Clone, Deserialize)]
pub struct OperationRecord {
    #[serde(rename = "type")]
    pub type_name: String,
    pub created_at: String,
    pub source_account: String,
    pub transaction_successful: bool,
    pub account: Option<String>,
    pub starting_balance: Option<String>,
    pub into: Option<String>,
    pub to: Option<String>,
    pub amount: Option<String>,
}

impl OperationRecord {
    pub fn operation_type(&self) -> OperationType {
        OperationType::from_name(&self.type_name)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EffectRecord {
    #[serde(default)]
    pub amount: Option<String>,
}

/// One exported CSV line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionRow {
    pub created_at: String,
    pub id: String,
    #[serde(rename = "type")]
    pub operation_type: String,
    pub memo: String,
    pub from: String,
    pub to: String,
    pub amount: String,
    pub fee: String,
    pub token: String,
    #[serde(serialize_with = "capitalized_bool")]
    pub successful: bool,
}

/// Existing exports hold `True`/`False`; keep appending in the same spelling.
fn capitalized_bool<S>(value: &bool, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(if *value { "True" } else { "False" })
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(u64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Int(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_page_deserializes_links_and_records() {
        let page: Page<TransactionSummary> = serde_json::from_value(json!({
            "_links": {
                "self": {"href": "https://h/transactions?limit=100&order=desc"},
                "next": {"href": "https://h/transactions?cursor=42&limit=100&order=desc"}
            },
            "_embedded": {"records": [{"id": "a", "hash": "a"}, {"id": "b"}]}
        }))
        .unwrap();

        assert_eq!(
            page.next_href(),
            Some("https://h/transactions?cursor=42&limit=100&order=desc")
        );
        let ids: Vec<&str> = page.records().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_fee_charged_accepts_string_or_integer() {
        let text: TransactionDetail =
            serde_json::from_value(json!({"id": "t", "fee_charged": "45000"})).unwrap();
        let int: TransactionDetail =
            serde_json::from_value(json!({"id": "t", "fee_charged": 45000, "memo": "hi"})).unwrap();

        assert_eq!(text.fee_charged, "45000");
        assert_eq!(text.memo, None);
        assert_eq!(int.fee_charged, "45000");
        assert_eq!(int.memo.as_deref(), Some("hi"));
    }

    #[test]
    fn test_operation_type_falls_back_to_unknown() {
        let op: OperationRecord = serde_json::from_value(json!({
            "type": "manage_offer",
            "created_at": "2019-05-20T10:31:28Z",
            "source_account": "GA",
            "transaction_successful": true
        }))
        .unwrap();
        assert_eq!(op.operation_type(), OperationType::Unknown);

        let op: OperationRecord = serde_json::from_value(json!({
            "type": "account_merge",
            "created_at": "2019-05-20T10:31:28Z",
            "source_account": "GA",
            "into": "GB",
            "transaction_successful": false
        }))
        .unwrap();
        assert_eq!(op.operation_type(), OperationType::AccountMerge);
    }

    #[test]
    fn test_created_at_is_kept_verbatim() {
        let op: OperationRecord = serde_json::from_value(json!({
            "type": "payment",
            "created_at": "2019-05-20T10:31:28.120+00:00",
            "source_account": "GA",
            "transaction_successful": true
        }))
        .unwrap();
        assert_eq!(op.created_at, "2019-05-20T10:31:28.120+00:00");
    }

    #[test]
    fn test_row_serializes_in_header_order() {
        let row = TransactionRow {
            created_at: "2019-05-20T10:31:28Z".to_string(),
            id: "abc".to_string(),
            operation_type: "payment".to_string(),
            memo: String::new(),
            from: "GA".to_string(),
            to: "GB".to_string(),
            amount: "1.5".to_string(),
            fee: "0.0000100".to_string(),
            token: "kag".to_string(),
            successful: true,
        };

        let mut writer = csv::Writer::from_writer(vec![]);
        writer.serialize(&row).unwrap();
        let out = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        let mut lines = out.lines();

        assert_eq!(lines.next().unwrap(), CSV_HEADER.join(","));
        assert_eq!(
            lines.next().unwrap(),
            "2019-05-20T10:31:28Z,abc,payment,,GA,GB,1.5,0.0000100,kag,True"
        );

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(vec![]);
        writer
            .serialize(&TransactionRow {
                successful: false,
                ..row
            })
            .unwrap();
        let out = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert!(out.trim_end().ends_with(",kag,False"));
    }
}
