//! Inbound MusePay webhook handling.
//!
//! A webhook arrives as a JSON body plus a signature header. The pipeline is:
//!
//! 1. [`WebhookEnvelope`] parses the body and resolves the event type
//!    (`type`, then `event_type`, else `unknown`).
//! 2. [`WebhookVerifier`] checks the HMAC-SHA256 signature over the canonical
//!    JSON of the payload. A mismatch rejects the webhook outright.
//! 3. [`WebhookRouter`] maps the event type to a [`NotificationKind`];
//!    provider names such as `CARD_TOP_UP` alias dotted names such as
//!    `topup.completed`.
//! 4. [`WebhookProcessor`] delivers the [`Notification`] to registered
//!    [`NotificationListener`]s when event dispatch is enabled.
//!
//! ## Example
//!
//! ```rust,no_run
//! use async_trait::async_trait;
//! use musewallet_config::MuseWalletConfig;
//! use musewallet_webhooks::{Notification, NotificationKind, NotificationListener, WebhookProcessor};
//!
//! struct CreditLedger;
//!
//! #[async_trait]
//! impl NotificationListener for CreditLedger {
//!     async fn on_notification(&self, n: &Notification) -> musewallet_webhooks::Result<()> {
//!         println!("top-up {:?} of {:?}", n.top_up_id(), n.amount());
//!         Ok(())
//!     }
//! }
//!
//! # async fn run(body: &[u8], signature: &str) -> Result<(), Box<dyn std::error::Error>> {
//! let config = MuseWalletConfig::from_env()?;
//! let processor = WebhookProcessor::from_config(&config)
//!     .on(NotificationKind::TopUpCompleted, CreditLedger);
//!
//! let processed = processor.handle(body, signature).await?;
//! println!("{}", serde_json::to_string(&processed)?);
//! # Ok(())
//! # }
//! ```

pub mod envelope;
pub mod error;
pub mod notification;
pub mod processor;
pub mod router;
pub mod verifier;

pub use envelope::WebhookEnvelope;
pub use error::{Result, WebhookError};
pub use notification::{Notification, NotificationKind};
pub use processor::{NotificationListener, ProcessedWebhook, WebhookProcessor};
pub use router::{EventType, WebhookRouter};
pub use verifier::{WebhookVerifier, canonical_json, sign_payload};
