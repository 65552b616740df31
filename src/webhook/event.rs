//! Event types and the decode table that maps a `type` discriminator to its payload

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fmt;

use crate::entities::{
    Address, Adjustment, Business, Customer, Discount, Payout, Price, Product, Report,
    Subscription, Transaction,
};
use crate::error::WebhookError;

/// Keys that belong to the event envelope rather than to the payload
const ENVELOPE_KEYS: [&str; 5] = [
    "type",
    "event_type",
    "event_id",
    "occurred_at",
    "notification_id",
];

/// Kind of domain object an event carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Address,
    Adjustment,
    Business,
    Customer,
    Discount,
    Payout,
    Price,
    Product,
    Report,
    Subscription,
    Transaction,
}

macro_rules! event_types {
    ($($variant:ident => $wire:literal, $entity:ident;)+) => {
        /// Every event type this crate understands
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum EventType {
            $($variant,)+
        }

        /// Decode table: wire name to event type
        const EVENT_TABLE: &[(&str, EventType)] = &[
            $(($wire, EventType::$variant),)+
        ];

        impl EventType {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }

            /// Kind of payload carried by this event type
            pub fn entity(&self) -> EntityKind {
                match self {
                    $(Self::$variant => EntityKind::$entity,)+
                }
            }
        }
    };
}

event_types! {
    AddressCreated => "address.created", Address;
    AddressUpdated => "address.updated", Address;
    AddressImported => "address.imported", Address;
    AdjustmentCreated => "adjustment.created", Adjustment;
    AdjustmentUpdated => "adjustment.updated", Adjustment;
    BusinessCreated => "business.created", Business;
    BusinessUpdated => "business.updated", Business;
    BusinessImported => "business.imported", Business;
    CustomerCreated => "customer.created", Customer;
    CustomerUpdated => "customer.updated", Customer;
    CustomerImported => "customer.imported", Customer;
    DiscountCreated => "discount.created", Discount;
    DiscountUpdated => "discount.updated", Discount;
    DiscountImported => "discount.imported", Discount;
    PayoutCreated => "payout.created", Payout;
    PayoutPaid => "payout.paid", Payout;
    PriceCreated => "price.created", Price;
    PriceUpdated => "price.updated", Price;
    PriceImported => "price.imported", Price;
    ProductCreated => "product.created", Product;
    ProductUpdated => "product.updated", Product;
    ProductImported => "product.imported", Product;
    ReportCreated => "report.created", Report;
    ReportUpdated => "report.updated", Report;
    SubscriptionActivated => "subscription.activated", Subscription;
    SubscriptionCanceled => "subscription.canceled", Subscription;
    SubscriptionCreated => "subscription.created", Subscription;
    SubscriptionImported => "subscription.imported", Subscription;
    SubscriptionPastDue => "subscription.past_due", Subscription;
    SubscriptionPaused => "subscription.paused", Subscription;
    SubscriptionResumed => "subscription.resumed", Subscription;
    SubscriptionTrialing => "subscription.trialing", Subscription;
    SubscriptionUpdated => "subscription.updated", Subscription;
    TransactionBilled => "transaction.billed", Transaction;
    TransactionCanceled => "transaction.canceled", Transaction;
    TransactionCompleted => "transaction.completed", Transaction;
    TransactionCreated => "transaction.created", Transaction;
    TransactionPaid => "transaction.paid", Transaction;
    TransactionPastDue => "transaction.past_due", Transaction;
    TransactionPaymentFailed => "transaction.payment_failed", Transaction;
    TransactionReady => "transaction.ready", Transaction;
    TransactionUpdated => "transaction.updated", Transaction;
}

impl EventType {
    /// Look up a wire name. Unknown names yield `None`.
    pub fn from_wire(name: &str) -> Option<Self> {
        EVENT_TABLE
            .iter()
            .find(|(wire, _)| *wire == name)
            .map(|(_, event_type)| *event_type)
    }

    pub fn all() -> impl Iterator<Item = EventType> {
        EVENT_TABLE.iter().map(|(_, event_type)| *event_type)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed payload of an event
#[derive(Debug, Clone, PartialEq)]
pub enum EventData {
    Address(Address),
    Adjustment(Adjustment),
    Business(Business),
    Customer(Customer),
    Discount(Discount),
    Payout(Payout),
    Price(Price),
    Product(Product),
    Report(Report),
    Subscription(Subscription),
    Transaction(Transaction),
}

impl EventData {
    fn decode(kind: EntityKind, payload: Value) -> Result<Self, WebhookError> {
        Ok(match kind {
            EntityKind::Address => Self::Address(from_payload(payload)?),
            EntityKind::Adjustment => Self::Adjustment(from_payload(payload)?),
            EntityKind::Business => Self::Business(from_payload(payload)?),
            EntityKind::Customer => Self::Customer(from_payload(payload)?),
            EntityKind::Discount => Self::Discount(from_payload(payload)?),
            EntityKind::Payout => Self::Payout(from_payload(payload)?),
            EntityKind::Price => Self::Price(from_payload(payload)?),
            EntityKind::Product => Self::Product(from_payload(payload)?),
            EntityKind::Report => Self::Report(from_payload(payload)?),
            EntityKind::Subscription => Self::Subscription(from_payload(payload)?),
            EntityKind::Transaction => Self::Transaction(from_payload(payload)?),
        })
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Address(_) => EntityKind::Address,
            Self::Adjustment(_) => EntityKind::Adjustment,
            Self::Business(_) => EntityKind::Business,
            Self::Customer(_) => EntityKind::Customer,
            Self::Discount(_) => EntityKind::Discount,
            Self::Payout(_) => EntityKind::Payout,
            Self::Price(_) => EntityKind::Price,
            Self::Product(_) => EntityKind::Product,
            Self::Report(_) => EntityKind::Report,
            Self::Subscription(_) => EntityKind::Subscription,
            Self::Transaction(_) => EntityKind::Transaction,
        }
    }
}

fn from_payload<T: DeserializeOwned>(payload: Value) -> Result<T, WebhookError> {
    serde_json::from_value(payload)
        .map_err(|e| WebhookError::MalformedPayload(format!("invalid event data: {e}")))
}

/// A verified, decoded webhook event
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub event_type: EventType,
    pub event_id: Option<String>,
    pub notification_id: Option<String>,
    pub occurred_at: Option<DateTime<Utc>>,
    pub data: EventData,
}

impl Event {
    /// Decode a JSON body that has already passed signature verification.
    ///
    /// The payload is read from a `data` object when one is present, otherwise from the
    /// top-level body minus the envelope keys. Unknown event types yield `Ok(None)`.
    pub fn from_json(body: &[u8]) -> Result<Option<Self>, WebhookError> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| WebhookError::MalformedPayload(format!("body is not valid JSON: {e}")))?;
        let Value::Object(mut envelope) = value else {
            return Err(WebhookError::MalformedPayload(
                "body is not a JSON object".to_string(),
            ));
        };

        let type_name = discriminator(&envelope)?;
        let Some(event_type) = EventType::from_wire(&type_name) else {
            return Ok(None);
        };

        let event_id = string_field(&envelope, "event_id");
        let notification_id = string_field(&envelope, "notification_id");
        let occurred_at = match string_field(&envelope, "occurred_at") {
            Some(raw) => Some(
                DateTime::parse_from_rfc3339(&raw)
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(|e| {
                        WebhookError::MalformedPayload(format!("invalid occurred_at: {e}"))
                    })?,
            ),
            None => None,
        };

        let payload = match envelope.remove("data") {
            Some(data @ Value::Object(_)) => data,
            Some(other) => {
                // Not an envelope; `data` is an ordinary payload field
                envelope.insert("data".to_string(), other);
                Value::Object(strip_envelope(envelope))
            }
            None => Value::Object(strip_envelope(envelope)),
        };

        Ok(Some(Event {
            event_type,
            event_id,
            notification_id,
            occurred_at,
            data: EventData::decode(event_type.entity(), payload)?,
        }))
    }
}

/// `type` takes precedence over `event_type`
fn discriminator(envelope: &Map<String, Value>) -> Result<String, WebhookError> {
    let raw = envelope
        .get("type")
        .or_else(|| envelope.get("event_type"))
        .ok_or_else(|| WebhookError::MalformedPayload("missing type field".to_string()))?;
    raw.as_str()
        .map(str::to_string)
        .ok_or_else(|| WebhookError::MalformedPayload("type field is not a string".to_string()))
}

fn string_field(envelope: &Map<String, Value>, key: &str) -> Option<String> {
    envelope.get(key).and_then(Value::as_str).map(str::to_string)
}

fn strip_envelope(mut object: Map<String, Value>) -> Map<String, Value> {
    for key in ENVELOPE_KEYS {
        object.remove(key);
    }
    object
}
