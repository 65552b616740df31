use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{BillingCycle, CustomData, ImportMeta, TimePeriod};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Subscription {
    pub id: Option<String>,
    pub status: Option<String>,
    pub customer_id: Option<String>,
    pub address_id: Option<String>,
    pub business_id: Option<String>,
    pub currency_code: Option<String>,
    pub collection_mode: Option<String>,
    pub billing_cycle: Option<BillingCycle>,
    pub current_billing_period: Option<TimePeriod>,
    pub scheduled_change: Option<ScheduledChange>,
    pub items: Option<Vec<SubscriptionItem>>,
    pub custom_data: Option<CustomData>,
    pub import_meta: Option<ImportMeta>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
    pub first_billed_at: Option<DateTime<Utc>>,
    pub next_billed_at: Option<DateTime<Utc>>,
    pub paused_at: Option<DateTime<Utc>>,
    pub canceled_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SubscriptionItem {
    pub price_id: Option<String>,
    pub status: Option<String>,
    pub quantity: Option<u32>,
    pub recurring: Option<bool>,
    pub next_billed_at: Option<DateTime<Utc>>,
    pub trial_dates: Option<TimePeriod>,
}

/// A pending pause, resume or cancellation
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScheduledChange {
    pub action: Option<String>,
    pub effective_at: Option<DateTime<Utc>>,
    pub resume_at: Option<DateTime<Utc>>,
}
