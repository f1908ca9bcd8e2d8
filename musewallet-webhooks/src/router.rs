//! Event type to notification routing

use crate::notification::NotificationKind;
use std::fmt;

/// Event type declared by an inbound webhook.
///
/// The provider sends upper-case names (`APPLY_AUDIT`, `CARD_TOP_UP`,
/// `CARD_BILL_TRANSACTION`); older integrations send dotted names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventType {
    // Provider events
    ApplyAudit,
    CardTopUp,
    CardBillTransaction,

    // Dotted events
    CardCreated,
    CardActivated,
    CardBlocked,
    TransactionCompleted,
    TransactionFailed,
    TopUpCompleted,
    KycApproved,
    KycRejected,
    ApplicationApproved,
    ApplicationRejected,

    Unrecognized(String),
}

impl EventType {
    /// Parse a declared event type. Never fails.
    pub fn parse(s: &str) -> Self {
        match s {
            "APPLY_AUDIT" => Self::ApplyAudit,
            "CARD_TOP_UP" => Self::CardTopUp,
            "CARD_BILL_TRANSACTION" => Self::CardBillTransaction,

            "card.created" => Self::CardCreated,
            "card.activated" => Self::CardActivated,
            "card.blocked" => Self::CardBlocked,
            "transaction.completed" => Self::TransactionCompleted,
            "transaction.failed" => Self::TransactionFailed,
            "topup.completed" => Self::TopUpCompleted,
            "kyc.approved" => Self::KycApproved,
            "kyc.rejected" => Self::KycRejected,
            "application.approved" => Self::ApplicationApproved,
            "application.rejected" => Self::ApplicationRejected,

            other => Self::Unrecognized(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::ApplyAudit => "APPLY_AUDIT",
            Self::CardTopUp => "CARD_TOP_UP",
            Self::CardBillTransaction => "CARD_BILL_TRANSACTION",
            Self::Unrecognized(other) => other,
            known => known
                .notification_kind()
                .map(|kind| kind.as_str())
                .unwrap_or_default(),
        }
    }

    /// Is a provider-native event
    pub fn is_provider_event(&self) -> bool {
        matches!(
            self,
            Self::ApplyAudit | Self::CardTopUp | Self::CardBillTransaction
        )
    }

    /// Notification this event maps to, if any
    pub fn notification_kind(&self) -> Option<NotificationKind> {
        let kind = match self {
            Self::ApplyAudit => NotificationKind::ApplicationApproved,
            Self::CardTopUp => NotificationKind::TopUpCompleted,
            Self::CardBillTransaction => NotificationKind::TransactionCompleted,
            Self::CardCreated => NotificationKind::CardCreated,
            Self::CardActivated => NotificationKind::CardActivated,
            Self::CardBlocked => NotificationKind::CardBlocked,
            Self::TransactionCompleted => NotificationKind::TransactionCompleted,
            Self::TransactionFailed => NotificationKind::TransactionFailed,
            Self::TopUpCompleted => NotificationKind::TopUpCompleted,
            Self::KycApproved => NotificationKind::KycApproved,
            Self::KycRejected => NotificationKind::KycRejected,
            Self::ApplicationApproved => NotificationKind::ApplicationApproved,
            Self::ApplicationRejected => NotificationKind::ApplicationRejected,
            Self::Unrecognized(_) => return None,
        };
        Some(kind)
    }
}

impl From<&str> for EventType {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps declared event types to notification kinds.
///
/// Lookup is a pure table read. Unrecognized types yield `None`, which is
/// not an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebhookRouter;

impl WebhookRouter {
    pub fn new() -> Self {
        Self
    }

    /// Route a declared event type
    pub fn route(&self, event_type: &str) -> Option<NotificationKind> {
        EventType::parse(event_type).notification_kind()
    }

    /// Every event type string the router recognizes
    pub fn known_event_types(&self) -> Vec<&'static str> {
        vec![
            "APPLY_AUDIT",
            "CARD_TOP_UP",
            "CARD_BILL_TRANSACTION",
            "card.created",
            "card.activated",
            "card.blocked",
            "transaction.completed",
            "transaction.failed",
            "topup.completed",
            "kyc.approved",
            "kyc.rejected",
            "application.approved",
            "application.rejected",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_and_dotted_names_alias() {
        let router = WebhookRouter::new();
        assert_eq!(router.route("CARD_TOP_UP"), router.route("topup.completed"));
        assert_eq!(
            router.route("CARD_BILL_TRANSACTION"),
            Some(NotificationKind::TransactionCompleted)
        );
        assert_eq!(
            router.route("APPLY_AUDIT"),
            Some(NotificationKind::ApplicationApproved)
        );
    }

    #[test]
    fn test_unrecognized_has_no_route() {
        let router = WebhookRouter::new();
        assert_eq!(router.route("card.exploded"), None);
        assert_eq!(router.route(""), None);
        assert_eq!(router.route("card_top_up"), None);
    }

    #[test]
    fn test_every_known_type_routes() {
        let router = WebhookRouter::new();
        for event_type in router.known_event_types() {
            assert!(router.route(event_type).is_some(), "{event_type}");
            assert_eq!(EventType::parse(event_type).as_str(), event_type);
        }
    }

    #[test]
    fn test_dotted_names_match_notification_names() {
        for kind in NotificationKind::ALL {
            assert_eq!(WebhookRouter::new().route(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn test_event_type_categories() {
        assert!(EventType::parse("CARD_TOP_UP").is_provider_event());
        assert!(!EventType::parse("topup.completed").is_provider_event());
        assert_eq!(
            EventType::from("mystery"),
            EventType::Unrecognized("mystery".into())
        );
        assert_eq!(EventType::parse("mystery").to_string(), "mystery");
    }
}
