//! Typed payloads carried by webhook events
//!
//! Field names follow the wire format. Optional wire fields are `Option`s so an omitted
//! field (`None`) stays distinguishable from a present but empty one (`Some("")`).
//! Unknown fields are ignored.

pub mod catalog;
pub mod customer;
pub mod finance;
pub mod subscription;
pub mod transaction;

use chrono::{DateTime, Utc};
use serde::Deserialize;

pub use catalog::{Discount, Price, Product};
pub use customer::{Address, Business, BusinessContact, Customer};
pub use finance::{Adjustment, AdjustmentItem, Payout, Report, ReportFilter};
pub use subscription::{ScheduledChange, Subscription, SubscriptionItem};
pub use transaction::{
    Transaction, TransactionDetails, TransactionItem, TransactionLineItem, TransactionPayment,
    TransactionTotals,
};

/// Opaque key-value data attached by the integrator
pub type CustomData = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TimePeriod {
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BillingCycle {
    pub interval: Option<String>,
    pub frequency: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Money {
    pub amount: Option<String>,
    pub currency_code: Option<String>,
}

/// Present on entities that were imported from another platform
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ImportMeta {
    pub external_id: Option<String>,
    pub imported_from: Option<String>,
}
