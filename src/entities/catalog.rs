//! Catalog entities: products, prices and discounts

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{BillingCycle, CustomData, ImportMeta, Money};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Product {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub tax_category: Option<String>,
    pub image_url: Option<String>,
    pub status: Option<String>,
    pub custom_data: Option<CustomData>,
    pub import_meta: Option<ImportMeta>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Price {
    pub id: Option<String>,
    pub product_id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub tax_mode: Option<String>,
    pub unit_price: Option<Money>,
    pub billing_cycle: Option<BillingCycle>,
    pub trial_period: Option<BillingCycle>,
    pub status: Option<String>,
    pub custom_data: Option<CustomData>,
    pub import_meta: Option<ImportMeta>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Discount {
    pub id: Option<String>,
    pub status: Option<String>,
    pub description: Option<String>,
    pub enabled_for_checkout: Option<bool>,
    pub code: Option<String>,
    /// `flat`, `flat_per_seat` or `percentage`
    #[serde(rename = "type")]
    pub discount_type: Option<String>,
    pub amount: Option<String>,
    pub currency_code: Option<String>,
    pub recur: Option<bool>,
    pub maximum_recurring_intervals: Option<u32>,
    pub usage_limit: Option<u32>,
    pub times_used: Option<u32>,
    pub restrict_to: Option<Vec<String>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub custom_data: Option<CustomData>,
    pub import_meta: Option<ImportMeta>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}
