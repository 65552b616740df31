//! Health and stats endpoints

use axum::{
    Json,
    extract::{Query, State as AxumState},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Serialize;
use serde_json::json;
use std::collections::HashMap;
use tracing::error;

use crate::SharedState;
use crate::db::store::EventTypeCount;

/// Root health check endpoint
/// Supports ?format=json for detailed JSON response
pub async fn root(
    AxumState(state): AxumState<SharedState>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    if params.get("format").map(String::as_str) != Some("json") {
        return "hookguard - healthy".into_response();
    }

    let deliveries = state.store.count().await.unwrap_or(0);
    Json(json!({
        "name": "hookguard",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_seconds": state.start_time.elapsed().as_secs(),
        "started_at": state.started_at.to_rfc3339(),
        "total_endpoints": state.config.endpoint.len(),
        "deliveries_accepted": deliveries,
        "status": "healthy"
    }))
    .into_response()
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total: i64,
    pub by_event_type: Vec<EventTypeCount>,
}

/// GET /api/stats - Accepted deliveries per event type
pub async fn get_stats(AxumState(state): AxumState<SharedState>) -> impl IntoResponse {
    match state.store.count_by_event_type().await {
        Ok(by_event_type) => Json(StatsResponse {
            total: by_event_type.iter().map(|c| c.count).sum(),
            by_event_type,
        })
        .into_response(),
        Err(e) => {
            error!("Failed to compute stats: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Failed to compute stats"})),
            )
                .into_response()
        }
    }
}
