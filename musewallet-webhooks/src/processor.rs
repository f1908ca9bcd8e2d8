//! Verify, log and dispatch pipeline for inbound webhooks

use crate::envelope::WebhookEnvelope;
use crate::notification::{Notification, NotificationKind};
use crate::router::WebhookRouter;
use crate::verifier::WebhookVerifier;
use crate::Result;
use async_trait::async_trait;
use musewallet_config::{EventSettings, MuseWalletConfig};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Receives notifications for routed webhooks
#[async_trait]
pub trait NotificationListener: Send + Sync {
    async fn on_notification(&self, notification: &Notification) -> Result<()>;
}

/// Outcome of a processed webhook, suitable as the HTTP response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessedWebhook {
    pub status: &'static str,
    pub event_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<NotificationKind>,
}

/// Accepts one webhook per call.
///
/// The signature is checked first; a failure is returned before anything is
/// logged as processed or dispatched. When event dispatch is enabled the
/// event type is routed and the resulting [`Notification`] is delivered to
/// the listeners registered for its kind, then to catch-all listeners, in
/// registration order. Unrouted event types are processed without emission.
pub struct WebhookProcessor {
    verifier: WebhookVerifier,
    router: WebhookRouter,
    events: EventSettings,
    listeners: HashMap<NotificationKind, Vec<Arc<dyn NotificationListener>>>,
    catch_all: Vec<Arc<dyn NotificationListener>>,
}

impl WebhookProcessor {
    pub fn new(verifier: WebhookVerifier, events: EventSettings) -> Self {
        Self {
            verifier,
            router: WebhookRouter::new(),
            events,
            listeners: HashMap::new(),
            catch_all: Vec::new(),
        }
    }

    pub fn from_config(config: &MuseWalletConfig) -> Self {
        Self::new(WebhookVerifier::from_config(config), config.events.clone())
    }

    /// Register a listener for one notification kind
    pub fn on<L: NotificationListener + 'static>(mut self, kind: NotificationKind, listener: L) -> Self {
        self.listeners
            .entry(kind)
            .or_default()
            .push(Arc::new(listener));
        self
    }

    /// Register a listener for every notification kind
    pub fn on_any<L: NotificationListener + 'static>(mut self, listener: L) -> Self {
        self.catch_all.push(Arc::new(listener));
        self
    }

    pub fn verifier(&self) -> &WebhookVerifier {
        &self.verifier
    }

    pub fn router(&self) -> &WebhookRouter {
        &self.router
    }

    /// Parse and process a raw request body
    pub async fn handle(&self, body: &[u8], signature: &str) -> Result<ProcessedWebhook> {
        let envelope = WebhookEnvelope::from_slice(body, signature)?;
        self.process(&envelope).await
    }

    /// Process a parsed webhook
    pub async fn process(&self, envelope: &WebhookEnvelope) -> Result<ProcessedWebhook> {
        if let Err(err) = self.verifier.verify(envelope.payload(), envelope.signature()) {
            warn!(event_type = envelope.event_type(), error = %err, "MuseWallet webhook rejected");
            return Err(err);
        }

        info!(
            event_type = envelope.event_type(),
            received_at = %envelope.received_at(),
            "MuseWallet webhook processed"
        );

        let notification = if self.events.should_dispatch() {
            self.dispatch(envelope).await?
        } else {
            debug!(event_type = envelope.event_type(), "Event dispatch disabled");
            None
        };

        Ok(ProcessedWebhook {
            status: "processed",
            event_type: envelope.event_type().to_string(),
            notification,
        })
    }

    async fn dispatch(&self, envelope: &WebhookEnvelope) -> Result<Option<NotificationKind>> {
        let Some(kind) = self.router.route(envelope.event_type()) else {
            debug!(event_type = envelope.event_type(), "No notification for event type");
            return Ok(None);
        };

        let notification = Notification::new(kind, envelope);
        let targeted = self.listeners.get(&kind).map(Vec::as_slice).unwrap_or_default();
        for listener in targeted.iter().chain(self.catch_all.iter()) {
            listener.on_notification(&notification).await?;
        }

        info!(
            event_type = envelope.event_type(),
            notification = %kind,
            "MuseWallet event dispatched"
        );
        Ok(Some(kind))
    }
}

impl std::fmt::Debug for WebhookProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookProcessor")
            .field("verifier", &self.verifier)
            .field("events", &self.events)
            .field("listeners", &self.listeners.values().map(Vec::len).sum::<usize>())
            .field("catch_all", &self.catch_all.len())
            .finish()
    }
}
