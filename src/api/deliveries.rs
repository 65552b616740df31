//! Deliveries API endpoints

use axum::{
    Json,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use crate::SharedState;
use crate::db::DeliveryFilter;

const DEFAULT_LIMIT: i64 = 50;

#[derive(Debug, Deserialize)]
pub struct DeliveriesQuery {
    pub endpoint: Option<String>,
    pub event_type: Option<String>,
    pub limit: Option<i64>,
}

/// GET /api/deliveries - Most recent deliveries, optionally filtered
pub async fn get_deliveries(
    AxumState(state): AxumState<SharedState>,
    Query(params): Query<DeliveriesQuery>,
) -> impl IntoResponse {
    let filter = DeliveryFilter {
        endpoint: params.endpoint,
        event_type: params.event_type,
    };
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT);

    match state.store.list(&filter, limit).await {
        Ok(deliveries) => Json(json!({
            "deliveries": deliveries,
            "count": deliveries.len(),
        }))
        .into_response(),
        Err(e) => {
            error!("Failed to list deliveries: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Failed to list deliveries"})),
            )
                .into_response()
        }
    }
}

/// GET /api/deliveries/{id} - A single delivery
pub async fn get_delivery(
    AxumState(state): AxumState<SharedState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.store.get(&id).await {
        Ok(Some(delivery)) => Json(delivery).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Delivery not found"})),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to get delivery {}: {}", id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Failed to get delivery"})),
            )
                .into_response()
        }
    }
}
