//! Webhook verification and event decoding
//!
//! Inbound webhooks carry a `ts=<unix-seconds>;h1=<hex-hmac>` header where
//! `h1 = HMAC-SHA256(secret, ts + ":" + raw_body)`. The body must be verified exactly
//! as received; a re-serialized body will not match.
//!
//! ```rust,ignore
//! use hookguard::webhook::{self, EventData};
//!
//! match webhook::unmarshal(&body, &secret, signature_header)? {
//!     Some(event) => handle(event),
//!     None => {} // newer event type, acknowledge and ignore
//! }
//! ```

pub mod event;
pub mod signature;

use chrono::Utc;
use std::time::Duration;
use tracing::debug;

use crate::error::WebhookError;
pub use event::{EntityKind, Event, EventData, EventType};
pub use signature::{SignatureHeader, is_signature_valid, sign};

/// Verify `request_body` and decode it into a typed event.
///
/// Fails with [`WebhookError::Authentication`] before the body is parsed when the
/// signature does not verify. Returns `Ok(None)` for event types this crate does not know.
pub fn unmarshal(
    request_body: &[u8],
    secret_key: &str,
    signature_header: &str,
) -> Result<Option<Event>, WebhookError> {
    if !is_signature_valid(request_body, secret_key, signature_header) {
        return Err(WebhookError::Authentication(
            "signature mismatch or malformed header".to_string(),
        ));
    }
    Event::from_json(request_body)
}

/// Verifier bound to one shared secret, with optional replay protection
#[derive(Clone)]
pub struct Webhooks {
    secret: String,
    max_clock_skew: Option<Duration>,
}

impl Webhooks {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            max_clock_skew: None,
        }
    }

    /// Reject signatures whose timestamp is further than `skew` from now
    pub fn with_max_clock_skew(mut self, skew: Duration) -> Self {
        self.max_clock_skew = Some(skew);
        self
    }

    pub fn max_clock_skew(&self) -> Option<Duration> {
        self.max_clock_skew
    }

    pub fn is_signature_valid(&self, request_body: &[u8], signature_header: &str) -> bool {
        self.verify(request_body, signature_header, Utc::now().timestamp())
            .is_ok()
    }

    pub fn unmarshal(
        &self,
        request_body: &[u8],
        signature_header: &str,
    ) -> Result<Option<Event>, WebhookError> {
        self.unmarshal_at(request_body, signature_header, Utc::now().timestamp())
    }

    /// Same as [`Webhooks::unmarshal`] with an explicit current time in unix seconds
    pub fn unmarshal_at(
        &self,
        request_body: &[u8],
        signature_header: &str,
        now: i64,
    ) -> Result<Option<Event>, WebhookError> {
        self.verify(request_body, signature_header, now)?;
        Event::from_json(request_body)
    }

    fn verify(&self, request_body: &[u8], signature_header: &str, now: i64) -> Result<(), WebhookError> {
        let header = SignatureHeader::parse(signature_header).ok_or_else(|| {
            WebhookError::Authentication("malformed signature header".to_string())
        })?;

        if let Some(skew) = self.max_clock_skew {
            let sent_at = header.unix_seconds().ok_or_else(|| {
                WebhookError::Authentication("signature timestamp is not an integer".to_string())
            })?;
            let drift = now.abs_diff(sent_at);
            if drift > skew.as_secs() {
                debug!(drift, "Webhook timestamp outside tolerance");
                return Err(WebhookError::Authentication(format!(
                    "signature timestamp is {drift}s away from now"
                )));
            }
        }

        if !signature::header_matches(request_body, &self.secret, &header) {
            return Err(WebhookError::Authentication("signature mismatch".to_string()));
        }
        Ok(())
    }
}

impl std::fmt::Debug for Webhooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Webhooks")
            .field("secret", &"<redacted>")
            .field("max_clock_skew", &self.max_clock_skew)
            .finish()
    }
}
