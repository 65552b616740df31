use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::webhook::Event;

/// A verified webhook event accepted by one of the configured endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Delivery {
    pub id: String,
    pub endpoint: String,
    pub event_type: String,
    /// Sender-assigned id, used for deduplication when present
    pub event_id: Option<String>,
    pub notification_id: Option<String>,
    pub occurred_at: Option<DateTime<Utc>>,
    pub received_at: DateTime<Utc>,
    /// Raw request body exactly as it was verified
    pub payload: String,
}

impl Delivery {
    pub fn from_event(endpoint: &str, event: &Event, body: &[u8]) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            endpoint: endpoint.to_string(),
            event_type: event.event_type.as_str().to_string(),
            event_id: event.event_id.clone(),
            notification_id: event.notification_id.clone(),
            occurred_at: event.occurred_at,
            received_at: Utc::now(),
            payload: String::from_utf8_lossy(body).into_owned(),
        }
    }
}
