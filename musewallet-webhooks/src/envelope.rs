//! Inbound webhook envelope

use crate::{Result, WebhookError};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

/// Event type used when the payload declares none
pub const UNKNOWN_EVENT: &str = "unknown";

/// A received webhook: the raw payload, the signature delivered alongside
/// it and the time it was captured.
#[derive(Debug, Clone)]
pub struct WebhookEnvelope {
    payload: Value,
    event_type: String,
    signature: String,
    received_at: DateTime<Utc>,
}

impl WebhookEnvelope {
    /// Wrap an already parsed payload. The payload must be a JSON object.
    pub fn new(payload: Value, signature: impl Into<String>) -> Result<Self> {
        if !payload.is_object() {
            return Err(WebhookError::Payload(
                "webhook body must be a JSON object".to_string(),
            ));
        }
        let event_type = resolve_event_type(&payload);
        Ok(Self {
            payload,
            event_type,
            signature: signature.into(),
            received_at: Utc::now(),
        })
    }

    /// Parse a raw request body.
    pub fn from_slice(body: &[u8], signature: impl Into<String>) -> Result<Self> {
        let payload: Value = serde_json::from_slice(body)?;
        Self::new(payload, signature)
    }

    /// Override the capture time
    pub fn with_received_at(mut self, received_at: DateTime<Utc>) -> Self {
        self.received_at = received_at;
        self
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn received_at(&self) -> DateTime<Utc> {
        self.received_at
    }

    /// The `data` object, empty when absent or not an object.
    pub fn data(&self) -> Map<String, Value> {
        match self.payload.get("data") {
            Some(Value::Object(map)) => map.clone(),
            _ => Map::new(),
        }
    }
}

/// First of `type` and `event_type` that is present and not null.
fn resolve_event_type(payload: &Value) -> String {
    ["type", "event_type"]
        .iter()
        .find_map(|key| match payload.get(*key)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        })
        .unwrap_or_else(|| UNKNOWN_EVENT.to_string())
}
