//! API module for all HTTP handlers
//!
//! Webhook intake plus read-only endpoints over the recorded deliveries

pub mod deliveries;
pub mod stats;
pub mod stream;
pub mod webhook;

use axum::{Router, routing};

use crate::SharedState;

// Re-export handlers
pub use deliveries::{get_deliveries, get_delivery};
pub use stats::{get_stats, root};
pub use stream::stream_deliveries;
pub use webhook::handle_webhook;

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", routing::get(root))
        .route("/webhook/{endpoint}", routing::post(handle_webhook))
        .route("/api/deliveries", routing::get(get_deliveries))
        .route("/api/deliveries/{id}", routing::get(get_delivery))
        .route("/api/stats", routing::get(get_stats))
        .route("/api/stream/events", routing::get(stream_deliveries))
        .with_state(state)
}
