use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::TransactionTotals;

/// A credit or refund against a billed transaction
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Adjustment {
    pub id: Option<String>,
    pub action: Option<String>,
    pub transaction_id: Option<String>,
    pub subscription_id: Option<String>,
    pub customer_id: Option<String>,
    pub reason: Option<String>,
    pub credit_applied_to_balance: Option<bool>,
    pub currency_code: Option<String>,
    pub status: Option<String>,
    pub items: Option<Vec<AdjustmentItem>>,
    pub totals: Option<TransactionTotals>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AdjustmentItem {
    pub id: Option<String>,
    pub item_id: Option<String>,
    /// `full`, `partial`, `tax` or `proration`
    #[serde(rename = "type")]
    pub item_type: Option<String>,
    pub amount: Option<String>,
    pub totals: Option<TransactionTotals>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Payout {
    pub id: Option<String>,
    pub status: Option<String>,
    pub amount: Option<String>,
    pub currency_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Report {
    pub id: Option<String>,
    pub status: Option<String>,
    pub rows: Option<u64>,
    #[serde(rename = "type")]
    pub report_type: Option<String>,
    pub filters: Option<Vec<ReportFilter>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReportFilter {
    pub name: Option<String>,
    pub operator: Option<String>,
    pub value: Option<serde_json::Value>,
}
