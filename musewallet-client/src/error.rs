//! Client error types.

use crate::validation::ValidationErrors;
use std::time::Duration;
use thiserror::Error;

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, MuseWalletError>;

/// Failures that happen before an HTTP status line is received.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// The attempt exceeded the configured timeout.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// The connection could not be established or was dropped.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Any other failure while sending the request or reading the body.
    #[error("Request error: {0}")]
    Request(String),
}

impl TransportError {
    /// Classify a reqwest failure.
    pub fn from_reqwest(err: &reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout)
        } else if err.is_connect() {
            Self::Connection(err.to_string())
        } else {
            Self::Request(err.to_string())
        }
    }
}

/// MuseWallet client errors.
#[derive(Debug, Error)]
pub enum MuseWalletError {
    /// Missing or unusable configuration, such as bad key material.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A single transport failure.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The gateway answered with a non-2xx status.
    #[error("MusePay API error ({status}): {message}")]
    Domain {
        /// HTTP status code.
        status: u16,
        /// Business code from the body, when present.
        code: Option<String>,
        /// Server-provided message.
        message: String,
    },

    /// Every attempt failed at the transport level.
    #[error("Request failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        /// Number of attempts made.
        attempts: u32,
        /// Last transport failure.
        source: TransportError,
    },

    /// Request input failed validation.
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// A 2xx body that is not a valid API envelope.
    #[error("Invalid API response: {0}")]
    Decode(String),
}

impl MuseWalletError {
    /// Whether retrying the same call could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// HTTP status a caller should surface for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Domain { status, .. } if (400..500).contains(status) => *status,
            Self::Domain { .. } => 400,
            Self::Validation(_) => 422,
            Self::Transport(_) | Self::RetriesExhausted { .. } => 502,
            Self::Configuration(_) | Self::Decode(_) => 500,
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}

impl From<ValidationErrors> for MuseWalletError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<musewallet_config::ConfigError> for MuseWalletError {
    fn from(err: musewallet_config::ConfigError) -> Self {
        Self::Configuration(err.to_string())
    }
}
