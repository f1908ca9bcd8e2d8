//! Notifications emitted for routed webhooks

use crate::envelope::WebhookEnvelope;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Semantic kind of a routed webhook
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotificationKind {
    #[serde(rename = "card.created")]
    CardCreated,
    #[serde(rename = "card.activated")]
    CardActivated,
    #[serde(rename = "card.blocked")]
    CardBlocked,
    #[serde(rename = "transaction.completed")]
    TransactionCompleted,
    #[serde(rename = "transaction.failed")]
    TransactionFailed,
    #[serde(rename = "topup.completed")]
    TopUpCompleted,
    #[serde(rename = "kyc.approved")]
    KycApproved,
    #[serde(rename = "kyc.rejected")]
    KycRejected,
    #[serde(rename = "application.approved")]
    ApplicationApproved,
    #[serde(rename = "application.rejected")]
    ApplicationRejected,
}

impl NotificationKind {
    pub const ALL: [NotificationKind; 10] = [
        Self::CardCreated,
        Self::CardActivated,
        Self::CardBlocked,
        Self::TransactionCompleted,
        Self::TransactionFailed,
        Self::TopUpCompleted,
        Self::KycApproved,
        Self::KycRejected,
        Self::ApplicationApproved,
        Self::ApplicationRejected,
    ];

    /// Dotted name, e.g. `topup.completed`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CardCreated => "card.created",
            Self::CardActivated => "card.activated",
            Self::CardBlocked => "card.blocked",
            Self::TransactionCompleted => "transaction.completed",
            Self::TransactionFailed => "transaction.failed",
            Self::TopUpCompleted => "topup.completed",
            Self::KycApproved => "kyc.approved",
            Self::KycRejected => "kyc.rejected",
            Self::ApplicationApproved => "application.approved",
            Self::ApplicationRejected => "application.rejected",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A verified, routed webhook handed to listeners.
///
/// Accessors read from the payload's `data` object and return `None` when a
/// field is missing. Numeric identifiers are returned as strings.
#[derive(Debug, Clone)]
pub struct Notification {
    kind: NotificationKind,
    event_type: String,
    payload: Value,
    signature: String,
    received_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(kind: NotificationKind, envelope: &WebhookEnvelope) -> Self {
        Self {
            kind,
            event_type: envelope.event_type().to_string(),
            payload: envelope.payload().clone(),
            signature: envelope.signature().to_string(),
            received_at: envelope.received_at(),
        }
    }

    pub fn kind(&self) -> NotificationKind {
        self.kind
    }

    /// Event type exactly as the provider declared it
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn received_at(&self) -> DateTime<Utc> {
        self.received_at
    }

    pub fn data(&self) -> Map<String, Value> {
        match self.payload.get("data") {
            Some(Value::Object(map)) => map.clone(),
            _ => Map::new(),
        }
    }

    pub fn card_id(&self) -> Option<String> {
        self.field("card_id")
    }

    pub fn user_id(&self) -> Option<String> {
        self.field("user_id")
    }

    pub fn user_xid(&self) -> Option<String> {
        self.field("user_xid")
    }

    pub fn request_id(&self) -> Option<String> {
        self.field("request_id")
    }

    pub fn transaction_id(&self) -> Option<String> {
        self.field("transaction_id")
    }

    pub fn currency(&self) -> Option<String> {
        self.field("currency")
    }

    pub fn merchant_name(&self) -> Option<String> {
        self.field("merchant_name")
    }

    pub fn status(&self) -> Option<String> {
        self.field("status")
    }

    pub fn kyc_level(&self) -> Option<String> {
        self.field("kyc_level")
    }

    /// Top-up id, falling back to the request id
    pub fn top_up_id(&self) -> Option<String> {
        self.first_of(&["topup_id", "request_id"])
    }

    /// Application id, falling back to `application_id`
    pub fn application_id(&self) -> Option<String> {
        self.first_of(&["apply_id", "application_id"])
    }

    pub fn block_reason(&self) -> Option<String> {
        self.field("reason")
    }

    pub fn rejection_reason(&self) -> Option<String> {
        self.first_of(&["reason", "rejection_reason"])
    }

    pub fn failure_reason(&self) -> Option<String> {
        self.first_of(&["reason", "failure_reason"])
    }

    pub fn activated_at(&self) -> Option<String> {
        self.field("activated_at")
    }

    pub fn approved_at(&self) -> Option<String> {
        self.field("approved_at")
    }

    pub fn blocked_at(&self) -> Option<String> {
        self.field("blocked_at")
    }

    pub fn rejected_at(&self) -> Option<String> {
        self.field("rejected_at")
    }

    /// Amount as a decimal; accepts JSON strings and numbers.
    pub fn amount(&self) -> Option<Decimal> {
        let raw = self.field("amount")?;
        raw.parse::<Decimal>()
            .ok()
            .or_else(|| Decimal::from_scientific(&raw).ok())
    }

    fn field(&self, key: &str) -> Option<String> {
        match self.payload.get("data")?.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    fn first_of(&self, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|key| self.field(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn notification(kind: NotificationKind, payload: Value) -> Notification {
        Notification::new(kind, &WebhookEnvelope::new(payload, "sig").unwrap())
    }

    #[test]
    fn test_kind_names_round_trip_through_serde() {
        for kind in NotificationKind::ALL {
            let encoded = serde_json::to_value(kind).unwrap();
            assert_eq!(encoded, kind.as_str());
            assert_eq!(serde_json::from_value::<NotificationKind>(encoded).unwrap(), kind);
        }
    }

    #[test]
    fn test_top_up_accessors() {
        let n = notification(
            NotificationKind::TopUpCompleted,
            json!({"type": "CARD_TOP_UP", "data": {
                "request_id": "r1",
                "card_id": "c1",
                "amount": "25.50",
                "currency": "USDT_TRC20"
            }}),
        );
        assert_eq!(n.top_up_id().as_deref(), Some("r1"));
        assert_eq!(n.amount(), Some(Decimal::new(2550, 2)));
        assert_eq!(n.currency().as_deref(), Some("USDT_TRC20"));
        assert_eq!(n.event_type(), "CARD_TOP_UP");
        assert_eq!(n.signature(), "sig");
    }

    #[test]
    fn test_numeric_fields_become_strings() {
        let n = notification(
            NotificationKind::ApplicationApproved,
            json!({"data": {"apply_id": 991, "amount": 12.5}}),
        );
        assert_eq!(n.application_id().as_deref(), Some("991"));
        assert_eq!(n.amount(), Some(Decimal::new(125, 1)));
    }

    #[test]
    fn test_reason_fallbacks() {
        let n = notification(
            NotificationKind::KycRejected,
            json!({"data": {"rejection_reason": "blurry document"}}),
        );
        assert_eq!(n.rejection_reason().as_deref(), Some("blurry document"));
        assert_eq!(n.failure_reason(), None);

        let n = notification(
            NotificationKind::TransactionFailed,
            json!({"data": {"reason": "declined", "failure_reason": "ignored"}}),
        );
        assert_eq!(n.failure_reason().as_deref(), Some("declined"));
    }

    #[test]
    fn test_missing_data() {
        let n = notification(NotificationKind::CardCreated, json!({"type": "card.created"}));
        assert!(n.data().is_empty());
        assert_eq!(n.card_id(), None);
        assert_eq!(n.amount(), None);
    }
}
