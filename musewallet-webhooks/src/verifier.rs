//! Webhook signature verification

use crate::{Result, WebhookError};
use hmac::{Hmac, Mac};
use musewallet_config::MuseWalletConfig;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::ser::{Formatter, Serializer};
use serde_json::{Map, Value};
use sha2::Sha256;
use std::io;
use tracing::{debug, warn};

type HmacSha256 = Hmac<Sha256>;

/// Checks the HMAC-SHA256 signature MusePay attaches to each webhook.
///
/// The MAC is computed over the whole payload re-encoded the way the gateway
/// encodes it (see [`canonical_json`]) and compared in constant time against
/// the lowercase hex signature delivered in the request header.
///
/// Verification is skipped entirely in testing mode or when no secret is
/// configured. Both cases are reported with a `warn` event when the verifier
/// is built.
#[derive(Clone)]
pub struct WebhookVerifier {
    secret: Option<SecretString>,
    testing: bool,
}

impl WebhookVerifier {
    /// Create a verifier. An empty secret counts as no secret.
    pub fn new(secret: Option<SecretString>, testing: bool) -> Self {
        let secret = secret.filter(|s| !s.expose_secret().is_empty());

        if testing {
            warn!("Webhook signature verification bypassed: testing mode is enabled");
        } else if secret.is_none() {
            warn!("Webhook signature verification bypassed: no webhook secret configured");
        }

        Self { secret, testing }
    }

    pub fn from_config(config: &MuseWalletConfig) -> Self {
        Self::new(config.webhooks.secret.clone(), config.testing.enabled)
    }

    /// Whether every signature is currently accepted
    pub fn is_bypassed(&self) -> bool {
        self.testing || self.secret.is_none()
    }

    /// Verify `signature` for `payload`.
    pub fn verify(&self, payload: &Value, signature: &str) -> Result<()> {
        if self.testing {
            debug!("Testing mode, webhook signature not checked");
            return Ok(());
        }
        let Some(secret) = &self.secret else {
            debug!("No webhook secret, signature not checked");
            return Ok(());
        };

        if signature.bytes().any(|b| b.is_ascii_uppercase()) {
            return Err(WebhookError::SignatureInvalid(
                "signature must be lowercase hex".to_string(),
            ));
        }
        let provided = hex::decode(signature).map_err(|_| {
            WebhookError::SignatureInvalid("signature is not hex encoded".to_string())
        })?;

        let mut mac = mac_for(secret.expose_secret())?;
        mac.update(canonical_json(payload)?.as_bytes());
        mac.verify_slice(&provided)
            .map_err(|_| WebhookError::SignatureInvalid("signature mismatch".to_string()))
    }

    /// Boolean form of [`verify`](Self::verify).
    pub fn is_valid(&self, payload: &Value, signature: &str) -> bool {
        self.verify(payload, signature).is_ok()
    }

    /// Signature a sender would attach to `payload` with this verifier's
    /// secret. `None` when no secret is configured.
    pub fn sign(&self, payload: &Value) -> Result<Option<String>> {
        match &self.secret {
            Some(secret) => sign_payload(secret.expose_secret(), payload).map(Some),
            None => Ok(None),
        }
    }
}

impl std::fmt::Debug for WebhookVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookVerifier")
            .field("has_secret", &self.secret.is_some())
            .field("testing", &self.testing)
            .finish()
    }
}

/// Lowercase hex HMAC-SHA256 of the canonical JSON of `payload`.
pub fn sign_payload(secret: &str, payload: &Value) -> Result<String> {
    let mut mac = mac_for(secret)?;
    mac.update(canonical_json(payload)?.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

fn mac_for(secret: &str) -> Result<HmacSha256> {
    HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| WebhookError::SignatureInvalid(e.to_string()))
}

/// JSON text the gateway signs: compact, keys in payload order, `/` escaped
/// as `\/` and every non-ASCII character as a lowercase `\uXXXX` UTF-16 escape.
/// An empty object encodes as `[]`, the way a decoded associative array does.
pub fn canonical_json(payload: &Value) -> Result<String> {
    let mut out = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut out, GatewayFormatter);
    gateway_value(payload).serialize(&mut serializer)?;
    String::from_utf8(out).map_err(|e| WebhookError::Payload(e.to_string()))
}

fn gateway_value(value: &Value) -> Value {
    match value {
        Value::Object(map) if map.is_empty() => Value::Array(Vec::new()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, value)| (key.clone(), gateway_value(value)))
                .collect::<Map<String, Value>>(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(gateway_value).collect()),
        other => other.clone(),
    }
}

struct GatewayFormatter;

impl Formatter for GatewayFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut units = [0u16; 2];
        for ch in fragment.chars() {
            match ch {
                '/' => writer.write_all(b"\\/")?,
                c if c.is_ascii() => writer.write_all(&[c as u8])?,
                c => {
                    for unit in c.encode_utf16(&mut units).iter() {
                        write!(writer, "\\u{:04x}", unit)?;
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn verifier(secret: Option<&str>, testing: bool) -> WebhookVerifier {
        WebhookVerifier::new(secret.map(|s| SecretString::from(s.to_string())), testing)
    }

    #[test]
    fn test_canonical_json_keeps_payload_order() {
        let payload: Value =
            serde_json::from_str(r#"{"type": "X", "data": {"z": 1, "a": [{"b": 2, "a": 1.5}]}}"#).unwrap();
        assert_eq!(
            canonical_json(&payload).unwrap(),
            r#"{"type":"X","data":{"z":1,"a":[{"b":2,"a":1.5}]}}"#
        );
    }

    #[test]
    fn test_canonical_json_escapes_like_the_gateway() {
        let payload = json!({"url": "https://x.io/r", "name": "Café 🚀", "quote": "a\"b", "meta": {}});
        assert_eq!(
            canonical_json(&payload).unwrap(),
            r#"{"url":"https:\/\/x.io\/r","name":"Caf\u00e9 \ud83d\ude80","quote":"a\"b","meta":[]}"#
        );
    }

    #[test]
    fn test_sign_then_verify() {
        let verifier = verifier(Some("whsec"), false);
        let payload = json!({"type": "CARD_TOP_UP", "data": {"card_id": "c1"}});
        let signature = verifier.sign(&payload).unwrap().unwrap();

        assert!(verifier.is_valid(&payload, &signature));
        assert!(!verifier.is_valid(&payload, &signature.to_uppercase()));
        assert!(!verifier.is_valid(&payload, &format!(" {}", signature)));
        assert!(!verifier.is_valid(&json!({"type": "CARD_TOP_UP"}), &signature));
    }

    #[test]
    fn test_wrong_secret_fails() {
        let payload = json!({"type": "kyc.approved"});
        let signature = sign_payload("other", &payload).unwrap();
        let err = verifier(Some("whsec"), false)
            .verify(&payload, &signature)
            .unwrap_err();
        assert!(matches!(err, WebhookError::SignatureInvalid(_)));
    }

    #[test]
    fn test_malformed_and_truncated_signatures_fail() {
        let verifier = verifier(Some("whsec"), false);
        let payload = json!({"type": "kyc.approved"});
        let signature = verifier.sign(&payload).unwrap().unwrap();

        assert!(!verifier.is_valid(&payload, "not-hex"));
        assert!(!verifier.is_valid(&payload, ""));
        assert!(!verifier.is_valid(&payload, &signature[..32]));
    }

    #[test]
    fn test_bypass_without_secret() {
        let verifier = verifier(None, false);
        assert!(verifier.is_bypassed());
        assert!(verifier.is_valid(&json!({}), "anything"));
        assert_eq!(verifier.sign(&json!({})).unwrap(), None);
    }

    #[test]
    fn test_empty_secret_is_no_secret() {
        assert!(verifier(Some(""), false).is_bypassed());
    }

    #[test]
    fn test_bypass_in_testing_mode() {
        let verifier = verifier(Some("whsec"), true);
        assert!(verifier.is_bypassed());
        assert!(verifier.is_valid(&json!({"type": "card.created"}), "deadbeef"));
    }

    #[test]
    fn test_debug_hides_secret() {
        let rendered = format!("{:?}", verifier(Some("whsec"), false));
        assert!(!rendered.contains("whsec"));
    }
}
