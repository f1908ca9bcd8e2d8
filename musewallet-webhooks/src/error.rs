//! Error types for inbound webhook handling

use thiserror::Error;

/// Errors that can occur while accepting a webhook
#[derive(Error, Debug)]
pub enum WebhookError {
    /// Signature did not match the payload
    #[error("Invalid webhook signature: {0}")]
    SignatureInvalid(String),

    /// Body was not a JSON object
    #[error("Payload error: {0}")]
    Payload(String),

    /// A notification listener failed
    #[error("Notification listener failed: {0}")]
    Handler(String),
}

impl WebhookError {
    /// HTTP status a receiving endpoint should answer with
    pub fn http_status(&self) -> u16 {
        match self {
            Self::SignatureInvalid(_) => 401,
            Self::Payload(_) => 400,
            Self::Handler(_) => 500,
        }
    }
}

impl From<serde_json::Error> for WebhookError {
    fn from(err: serde_json::Error) -> Self {
        WebhookError::Payload(err.to_string())
    }
}

/// Result type for webhook operations
pub type Result<T> = std::result::Result<T, WebhookError>;
