use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{BillingCycle, CustomData, Money, TimePeriod};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Transaction {
    pub id: Option<String>,
    pub status: Option<String>,
    pub customer_id: Option<String>,
    pub address_id: Option<String>,
    pub business_id: Option<String>,
    pub subscription_id: Option<String>,
    pub invoice_id: Option<String>,
    pub invoice_number: Option<String>,
    pub discount_id: Option<String>,
    pub origin: Option<String>,
    pub collection_mode: Option<String>,
    /// Grand total as a decimal string, e.g. `"10.00"`
    pub amount: Option<String>,
    pub currency_code: Option<String>,
    pub billing_period: Option<TimePeriod>,
    pub items: Option<Vec<TransactionItem>>,
    pub details: Option<TransactionDetails>,
    pub payments: Option<Vec<TransactionPayment>>,
    pub custom_data: Option<CustomData>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub billed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TransactionItem {
    pub price_id: Option<String>,
    pub quantity: Option<u32>,
    pub proration: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TransactionDetails {
    pub totals: Option<TransactionTotals>,
    pub line_items: Option<Vec<TransactionLineItem>>,
}

/// All amounts are decimal strings in the lowest denomination of `currency_code`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TransactionTotals {
    pub subtotal: Option<String>,
    pub discount: Option<String>,
    pub tax: Option<String>,
    pub total: Option<String>,
    pub credit: Option<String>,
    pub balance: Option<String>,
    pub grand_total: Option<String>,
    pub fee: Option<String>,
    pub earnings: Option<String>,
    pub currency_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TransactionLineItem {
    pub id: Option<String>,
    pub price_id: Option<String>,
    pub quantity: Option<u32>,
    pub tax_rate: Option<String>,
    pub unit_totals: Option<TransactionTotals>,
    pub totals: Option<TransactionTotals>,
    pub billing_cycle: Option<BillingCycle>,
    pub unit_price: Option<Money>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TransactionPayment {
    pub payment_attempt_id: Option<String>,
    pub stored_payment_method_id: Option<String>,
    pub amount: Option<String>,
    pub status: Option<String>,
    pub error_code: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub captured_at: Option<DateTime<Utc>>,
}
