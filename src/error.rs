use std::io;

/// Outcome of a failed webhook verification or decode.
///
/// An unrecognised event type is not an error; `unmarshal` returns `Ok(None)` for it.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WebhookError {
    #[error("Webhook authentication failed: {0}")]
    Authentication(String),

    #[error("Malformed webhook payload: {0}")]
    MalformedPayload(String),
}

/// Custom error type for hookguard service operations
#[derive(Debug, thiserror::Error)]
pub enum HookguardError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error(transparent)]
    Webhook(#[from] WebhookError),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParseError(#[from] toml::de::Error),
}

/// Helper type for Results that use HookguardError
pub type Result<T> = std::result::Result<T, HookguardError>;
