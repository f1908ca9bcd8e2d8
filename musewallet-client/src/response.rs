//! API response envelope.

use crate::codes;
use crate::error::{MuseWalletError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

const MISSING_CODE: &str = "500";
const MISSING_MESSAGE: &str = "Unknown error";

/// Body returned by every endpoint: `{code, message, data}`.
///
/// `code` is kept as an opaque string, whether the gateway sent a JSON string
/// or number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    #[serde(default = "missing_code", deserialize_with = "code_as_string")]
    pub code: String,
    #[serde(default = "missing_message", deserialize_with = "message_or_default")]
    pub message: String,
    #[serde(default)]
    pub data: Value,
}

impl ApiResponse {
    /// Decode a 2xx body.
    pub fn from_body(body: &str) -> Result<Self> {
        serde_json::from_str(body).map_err(|e| MuseWalletError::Decode(e.to_string()))
    }

    /// Whether the business code denotes success.
    pub fn is_success(&self) -> bool {
        codes::is_success(&self.code)
    }

    /// Deserialize `data` into a typed value. Null data decodes as `{}`.
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<T> {
        let data = match self.data {
            Value::Null => Value::Object(Map::new()),
            ref data => data.clone(),
        };
        serde_json::from_value(data).map_err(|e| {
            MuseWalletError::Decode(format!("unexpected data for code {}: {}", self.code, e))
        })
    }

    /// Typed `data` when the business code is success, otherwise a domain error.
    pub fn into_data<T: DeserializeOwned>(self) -> Result<T> {
        if !self.is_success() {
            return Err(MuseWalletError::Domain {
                status: 200,
                code: Some(self.code),
                message: self.message,
            });
        }
        self.data_as()
    }
}

fn missing_code() -> String {
    MISSING_CODE.to_string()
}

fn missing_message() -> String {
    MISSING_MESSAGE.to_string()
}

fn code_as_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) if !s.is_empty() => s,
        Value::Number(n) => n.to_string(),
        _ => missing_code(),
    })
}

fn message_or_default<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(missing_message))
}

/// Message carried by a non-2xx body: `message`, then `error`, then a fallback.
pub(crate) fn error_message(body: &str) -> (Option<String>, String) {
    let parsed: Value = serde_json::from_str(body).unwrap_or(Value::Null);

    let code = match parsed.get("code") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };
    let message = ["message", "error"]
        .iter()
        .find_map(|key| parsed.get(*key).and_then(Value::as_str))
        .unwrap_or(MISSING_MESSAGE)
        .to_string();

    (code, message)
}
