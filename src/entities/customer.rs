use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{CustomData, ImportMeta};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Customer {
    pub id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub locale: Option<String>,
    pub status: Option<String>,
    pub marketing_consent: Option<bool>,
    pub custom_data: Option<CustomData>,
    pub import_meta: Option<ImportMeta>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Address {
    pub id: Option<String>,
    pub customer_id: Option<String>,
    pub description: Option<String>,
    pub first_line: Option<String>,
    pub second_line: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub region: Option<String>,
    pub country_code: Option<String>,
    pub status: Option<String>,
    pub custom_data: Option<CustomData>,
    pub import_meta: Option<ImportMeta>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Business {
    pub id: Option<String>,
    pub customer_id: Option<String>,
    pub name: Option<String>,
    pub company_number: Option<String>,
    pub tax_identifier: Option<String>,
    pub status: Option<String>,
    pub contacts: Option<Vec<BusinessContact>>,
    pub custom_data: Option<CustomData>,
    pub import_meta: Option<ImportMeta>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BusinessContact {
    pub name: Option<String>,
    pub email: Option<String>,
}
