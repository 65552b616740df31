//! Webhook intake: rate limit, verify, decode, record, broadcast

use axum::{
    body::Bytes,
    extract::{Path, State as AxumState},
    http::{HeaderMap, StatusCode},
};
use tracing::{debug, error, info, warn};

use crate::SharedState;
use crate::delivery::Delivery;
use crate::error::WebhookError;

/// Handles a signed webhook POST for the named endpoint.
pub async fn handle_webhook(
    AxumState(state): AxumState<SharedState>,
    Path(endpoint_name): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    let (Some(endpoint), Some(webhooks)) = (
        state.config.find_endpoint(&endpoint_name),
        state.verifiers.get(&endpoint_name),
    ) else {
        warn!("Webhook received for unknown endpoint '{}'", endpoint_name);
        return StatusCode::NOT_FOUND;
    };

    // check rate limits first
    {
        let mut rate_limiter = state.rate_limiter.lock().await;
        if rate_limiter.check_rate_limit(
            &endpoint.name,
            endpoint.get_rate_limit(),
            endpoint.get_rate_limit_window(),
        ) {
            warn!(
                "Too many requests for endpoint {:?} - {:?} requests per {:?} seconds",
                endpoint.name,
                endpoint.get_rate_limit(),
                endpoint.get_rate_limit_window()
            );
            return StatusCode::TOO_MANY_REQUESTS;
        }
    }

    let Some(signature) = headers
        .get(endpoint.get_signature_header())
        .and_then(|v| v.to_str().ok())
    else {
        warn!(
            "Endpoint '{}' received a webhook without a {} header",
            endpoint.name,
            endpoint.get_signature_header()
        );
        return StatusCode::UNAUTHORIZED;
    };

    let event = match webhooks.unmarshal(&body, signature) {
        Ok(Some(event)) => event,
        Ok(None) => {
            info!(
                "Endpoint '{}' acknowledged an unrecognised event type",
                endpoint.name
            );
            return StatusCode::OK;
        }
        Err(WebhookError::Authentication(reason)) => {
            warn!("Rejected webhook for endpoint '{}': {}", endpoint.name, reason);
            return StatusCode::UNAUTHORIZED;
        }
        Err(WebhookError::MalformedPayload(reason)) => {
            warn!(
                "Malformed webhook payload for endpoint '{}': {}",
                endpoint.name, reason
            );
            return StatusCode::BAD_REQUEST;
        }
    };

    let delivery = Delivery::from_event(&endpoint.name, &event, &body);
    match state.store.record(&delivery).await {
        Ok(true) => {
            info!(
                "Accepted {} for endpoint '{}' (delivery {}, event {:?})",
                delivery.event_type, endpoint.name, delivery.id, delivery.event_id
            );
            // No subscribers is fine
            let _ = state.delivery_events.send(delivery);
            StatusCode::OK
        }
        Ok(false) => {
            debug!(
                "Duplicate event {:?} for endpoint '{}', already recorded",
                delivery.event_id, endpoint.name
            );
            StatusCode::OK
        }
        Err(e) => {
            error!("Failed to record delivery for endpoint '{}': {}", endpoint.name, e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
