use crate::delivery::Delivery;
use crate::error::HookguardError;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};

const MAX_LIST_LIMIT: i64 = 500;

// Helper struct to map DB row to Delivery struct
#[derive(FromRow)]
struct DeliveryRow {
    id: String,
    endpoint: String,
    event_type: String,
    event_id: Option<String>,
    notification_id: Option<String>,
    occurred_at: Option<String>,
    received_at: String,
    payload: String,
}

impl From<DeliveryRow> for Delivery {
    fn from(row: DeliveryRow) -> Self {
        let received_at = parse_timestamp(&row.received_at).unwrap_or_else(Utc::now);
        let occurred_at = row.occurred_at.as_deref().and_then(parse_timestamp);

        Delivery {
            id: row.id,
            endpoint: row.endpoint,
            event_type: row.event_type,
            event_id: row.event_id,
            notification_id: row.notification_id,
            occurred_at,
            received_at,
            payload: row.payload,
        }
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

// Fixed-width so that text ordering matches time ordering
fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Optional filters for listing deliveries
#[derive(Debug, Default, Clone)]
pub struct DeliveryFilter {
    pub endpoint: Option<String>,
    pub event_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow, PartialEq)]
pub struct EventTypeCount {
    pub event_type: String,
    pub count: i64,
}

/// Persistent storage for accepted deliveries using SQLite
#[derive(Clone)]
pub struct DeliveryStore {
    pool: SqlitePool,
}

impl DeliveryStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Record a delivery. Returns `false` when the endpoint already holds
    /// a delivery with the same `event_id`.
    pub async fn record(&self, delivery: &Delivery) -> Result<bool, HookguardError> {
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO deliveries (
                id, endpoint, event_type, event_id, notification_id,
                occurred_at, received_at, payload
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&delivery.id)
        .bind(&delivery.endpoint)
        .bind(&delivery.event_type)
        .bind(&delivery.event_id)
        .bind(&delivery.notification_id)
        .bind(delivery.occurred_at.as_ref().map(format_timestamp))
        .bind(format_timestamp(&delivery.received_at))
        .bind(&delivery.payload)
        .execute(&self.pool)
        .await
        .map_err(|e| HookguardError::DatabaseError(format!("Failed to record delivery: {}", e)))?;

        Ok(result.rows_affected() == 1)
    }

    /// Get a delivery by ID
    pub async fn get(&self, id: &str) -> Result<Option<Delivery>, HookguardError> {
        let row = sqlx::query_as::<_, DeliveryRow>("SELECT * FROM deliveries WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| HookguardError::DatabaseError(format!("Failed to get delivery: {}", e)))?;

        Ok(row.map(Delivery::from))
    }

    /// Most recent deliveries first
    pub async fn list(
        &self,
        filter: &DeliveryFilter,
        limit: i64,
    ) -> Result<Vec<Delivery>, HookguardError> {
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT * FROM deliveries WHERE 1 = 1");
        if let Some(endpoint) = &filter.endpoint {
            query.push(" AND endpoint = ").push_bind(endpoint);
        }
        if let Some(event_type) = &filter.event_type {
            query.push(" AND event_type = ").push_bind(event_type);
        }
        query
            .push(" ORDER BY received_at DESC, id DESC LIMIT ")
            .push_bind(limit.clamp(1, MAX_LIST_LIMIT));

        let rows = query
            .build_query_as::<DeliveryRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| HookguardError::DatabaseError(format!("Failed to list deliveries: {}", e)))?;

        Ok(rows.into_iter().map(Delivery::from).collect())
    }

    pub async fn count(&self) -> Result<i64, HookguardError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM deliveries")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| HookguardError::DatabaseError(format!("Failed to count deliveries: {}", e)))?;

        Ok(count)
    }

    pub async fn count_by_event_type(&self) -> Result<Vec<EventTypeCount>, HookguardError> {
        sqlx::query_as::<_, EventTypeCount>(
            r#"
            SELECT event_type, COUNT(*) AS count
            FROM deliveries
            GROUP BY event_type
            ORDER BY count DESC, event_type ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| HookguardError::DatabaseError(format!("Failed to count event types: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_memory_db;
    use uuid::Uuid;

    fn delivery(endpoint: &str, event_type: &str, event_id: Option<&str>) -> Delivery {
        Delivery {
            id: Uuid::now_v7().to_string(),
            endpoint: endpoint.to_string(),
            event_type: event_type.to_string(),
            event_id: event_id.map(String::from),
            notification_id: None,
            occurred_at: None,
            received_at: Utc::now(),
            payload: "{}".to_string(),
        }
    }

    async fn store() -> DeliveryStore {
        DeliveryStore::new(init_memory_db().await.unwrap())
    }

    #[tokio::test]
    async fn test_record_and_get() {
        let store = store().await;
        let mut d = delivery("billing", "transaction.paid", Some("evt_1"));
        d.occurred_at = Some(Utc::now());

        assert!(store.record(&d).await.unwrap());
        let fetched = store.get(&d.id).await.unwrap().unwrap();
        assert_eq!(fetched.event_type, "transaction.paid");
        assert_eq!(fetched.event_id.as_deref(), Some("evt_1"));
        assert!(fetched.occurred_at.is_some());
        assert!(store.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_event_id_is_ignored() {
        let store = store().await;
        assert!(store.record(&delivery("billing", "transaction.paid", Some("evt_1"))).await.unwrap());
        assert!(!store.record(&delivery("billing", "transaction.paid", Some("evt_1"))).await.unwrap());
        // Same id on a different endpoint is a separate delivery
        assert!(store.record(&delivery("sandbox", "transaction.paid", Some("evt_1"))).await.unwrap());
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_missing_event_ids_never_collide() {
        let store = store().await;
        assert!(store.record(&delivery("billing", "payout.paid", None)).await.unwrap());
        assert!(store.record(&delivery("billing", "payout.paid", None)).await.unwrap());
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_list_filters_and_order() {
        let store = store().await;
        let first = delivery("billing", "transaction.paid", Some("evt_1"));
        let second = delivery("billing", "subscription.created", Some("evt_2"));
        let third = delivery("sandbox", "transaction.paid", Some("evt_3"));
        for d in [&first, &second, &third] {
            store.record(d).await.unwrap();
        }

        let all = store.list(&DeliveryFilter::default(), 50).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].id, third.id);

        let billing = DeliveryFilter {
            endpoint: Some("billing".to_string()),
            ..Default::default()
        };
        assert_eq!(store.list(&billing, 50).await.unwrap().len(), 2);

        let paid = DeliveryFilter {
            event_type: Some("transaction.paid".to_string()),
            ..Default::default()
        };
        let paid = store.list(&paid, 1).await.unwrap();
        assert_eq!(paid.len(), 1);
        assert_eq!(paid[0].id, third.id);
    }

    #[tokio::test]
    async fn test_count_by_event_type() {
        let store = store().await;
        store.record(&delivery("billing", "transaction.paid", None)).await.unwrap();
        store.record(&delivery("billing", "transaction.paid", None)).await.unwrap();
        store.record(&delivery("billing", "customer.created", None)).await.unwrap();

        let counts = store.count_by_event_type().await.unwrap();
        assert_eq!(
            counts,
            vec![
                EventTypeCount { event_type: "transaction.paid".to_string(), count: 2 },
                EventTypeCount { event_type: "customer.created".to_string(), count: 1 },
            ]
        );
    }
}
