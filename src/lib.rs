//! MusePay card-issuing integration.
//!
//! This crate re-exports the workspace members behind cargo features:
//!
//! - `client`: [`musewallet_client`], the RSA-signed, retrying API client and
//!   typed card operations.
//! - `webhooks`: [`musewallet_webhooks`], inbound signature verification,
//!   event routing and notification listeners.
//!
//! Configuration ([`musewallet_config`]) is always available.

pub use musewallet_config;
pub use musewallet_config::{ConfigError, MuseWalletConfig};

#[cfg(feature = "client")]
pub use musewallet_client;

#[cfg(feature = "webhooks")]
pub use musewallet_webhooks;

/// Prelude for common imports
pub mod prelude {
    pub use musewallet_config::{MuseWalletConfig, Validate as _};

    #[cfg(feature = "client")]
    pub use musewallet_client::prelude::*;

    #[cfg(feature = "webhooks")]
    pub use musewallet_webhooks::{
        Notification, NotificationKind, NotificationListener, ProcessedWebhook, WebhookEnvelope,
        WebhookError, WebhookProcessor, WebhookVerifier,
    };
}
