//! Configuration for the MuseWallet card-issuing client.
//!
//! A [`MuseWalletConfig`] is built once per client instance and handed to the
//! client and webhook processor explicitly. It can be assembled in code with
//! [`MuseWalletConfig::builder`] or read from `MUSEWALLET_*` environment
//! variables (and an optional `.env` file) with [`MuseWalletConfig::from_env`].
//!
//! ```rust,no_run
//! use musewallet_config::{MuseWalletConfig, Validate};
//!
//! let config = MuseWalletConfig::from_env()?;
//! config.validate()?;
//! # Ok::<(), musewallet_config::ConfigError>(())
//! ```

pub mod env;
pub mod error;
pub mod validation;

pub use env::EnvLoader;
pub use error::{ConfigError, Result};
pub use validation::{ConfigValidator, Validate};

use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;

/// Environment variable prefix for every setting.
pub const ENV_PREFIX: &str = "MUSEWALLET";

/// Sandbox gateway used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://api.test.musepay.io";

/// Event names a webhook endpoint subscribes to by default.
pub const DEFAULT_WEBHOOK_EVENTS: &[&str] = &[
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
];

/// Complete client configuration
#[derive(Debug, Clone, Default)]
pub struct MuseWalletConfig {
    pub api: ApiConfig,
    pub agent: AgentConfig,
    pub card_products: CardProductsConfig,
    pub webhooks: WebhookSettings,
    pub cache: CacheSettings,
    pub logging: LoggingSettings,
    pub testing: TestingSettings,
    pub events: EventSettings,
}

/// Outbound API settings
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Gateway base URL, endpoint paths are appended verbatim
    pub base_url: String,
    /// Partner identifier issued by the gateway
    pub partner_id: String,
    /// RSA private key (PEM or bare base64 DER)
    pub private_key: SecretString,
    /// Per-attempt request timeout
    pub timeout: Duration,
    /// Total attempts for transport failures, at least 1
    pub retry_attempts: u32,
    /// Unit multiplied by `2^attempt` between attempts
    pub backoff_unit: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            partner_id: String::new(),
            private_key: SecretString::from(String::new()),
            timeout: Duration::from_secs(30),
            retry_attempts: 3,
            backoff_unit: Duration::from_secs(1),
        }
    }
}

/// Agent account settings
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub account_id: Option<String>,
    pub default_currency: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            account_id: None,
            default_currency: "USD".to_string(),
        }
    }
}

/// Card product ids agreed with the gateway out of band.
///
/// The API has no endpoint listing products, so they live in configuration.
#[derive(Debug, Clone, Default)]
pub struct CardProductsConfig {
    pub basic: Option<String>,
    pub premium: Option<String>,
    pub business: Option<String>,
}

impl CardProductsConfig {
    /// Configured products as `(type, product_id)` pairs, in a stable order
    pub fn configured(&self) -> Vec<(&'static str, &str)> {
        [
            ("basic", self.basic.as_deref()),
            ("premium", self.premium.as_deref()),
            ("business", self.business.as_deref()),
        ]
        .into_iter()
        .filter_map(|(kind, id)| id.filter(|id| !id.is_empty()).map(|id| (kind, id)))
        .collect()
    }
}

/// Inbound webhook settings
#[derive(Debug, Clone)]
pub struct WebhookSettings {
    /// Shared HMAC secret; verification is skipped when unset
    pub secret: Option<SecretString>,
    /// Path the gateway posts notifications to
    pub url: String,
    /// Subscribed event names
    pub events: Vec<String>,
}

impl Default for WebhookSettings {
    fn default() -> Self {
        Self {
            secret: None,
            url: "/api/v1/musewallet/webhook".to_string(),
            events: DEFAULT_WEBHOOK_EVENTS.iter().map(|e| e.to_string()).collect(),
        }
    }
}

impl WebhookSettings {
    /// Whether a non-empty secret is configured
    pub fn has_secret(&self) -> bool {
        self.secret
            .as_ref()
            .is_some_and(|s| !s.expose_secret().is_empty())
    }
}

/// Response cache settings
#[derive(Debug, Clone)]
pub struct CacheSettings {
    pub enabled: bool,
    pub ttl: Duration,
    pub prefix: String,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl: Duration::from_secs(300),
            prefix: "musewallet:".to_string(),
        }
    }
}

/// Action logging settings
#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub enabled: bool,
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
        }
    }
}

/// Non-production switches
#[derive(Debug, Clone, Default)]
pub struct TestingSettings {
    /// Bypasses webhook signature verification
    pub enabled: bool,
}

/// Notification emission switches
#[derive(Debug, Clone)]
pub struct EventSettings {
    pub enabled: bool,
    pub dispatch_on_webhook: bool,
}

impl Default for EventSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            dispatch_on_webhook: true,
        }
    }
}

impl EventSettings {
    /// Whether a verified webhook should emit a notification
    pub fn should_dispatch(&self) -> bool {
        self.enabled && self.dispatch_on_webhook
    }
}

impl MuseWalletConfig {
    /// Create a configuration builder
    pub fn builder() -> MuseWalletConfigBuilder {
        MuseWalletConfigBuilder::default()
    }

    /// Load from `MUSEWALLET_*` variables, reading `.env` first if present
    pub fn from_env() -> Result<Self> {
        Self::from_loader(&EnvLoader::with_dotenv(Some(ENV_PREFIX.to_string())))
    }

    /// Load from an arbitrary loader
    pub fn from_loader(env: &EnvLoader) -> Result<Self> {
        let defaults = Self::default();

        let api = ApiConfig {
            base_url: env.load_var_or("API_URL", DEFAULT_BASE_URL),
            partner_id: env.load_var_or("PARTNER_ID", ""),
            private_key: SecretString::from(env.load_var_or("PRIVATE_KEY", "")),
            timeout: Duration::from_secs(env.parse_or("API_TIMEOUT", 30u64)?),
            retry_attempts: env.parse_or("RETRY_ATTEMPTS", 3u32)?,
            backoff_unit: defaults.api.backoff_unit,
        };

        let agent = AgentConfig {
            account_id: env.get("AGENT_ACCOUNT_ID"),
            default_currency: env.load_var_or("DEFAULT_CURRENCY", "USD"),
        };

        let card_products = CardProductsConfig {
            basic: env.get("BASIC_CARD_PRODUCT_ID"),
            premium: env.get("PREMIUM_CARD_PRODUCT_ID"),
            business: env.get("BUSINESS_CARD_PRODUCT_ID"),
        };

        let webhooks = WebhookSettings {
            secret: env.get("WEBHOOK_SECRET").map(SecretString::from),
            url: env.load_var_or("WEBHOOK_URL", &defaults.webhooks.url),
            events: defaults.webhooks.events,
        };

        let cache = CacheSettings {
            enabled: env.flag_or("CACHE_ENABLED", true)?,
            ttl: Duration::from_secs(env.parse_or("CACHE_TTL", 300u64)?),
            prefix: defaults.cache.prefix,
        };

        let logging = LoggingSettings {
            enabled: env.flag_or("LOGGING_ENABLED", true)?,
            level: env.load_var_or("LOG_LEVEL", "info"),
        };

        let testing = TestingSettings {
            enabled: env.flag_or("TESTING_MODE", false)?,
        };

        let events = EventSettings {
            enabled: env.flag_or("EVENTS_ENABLED", true)?,
            dispatch_on_webhook: env.flag_or("DISPATCH_ON_WEBHOOK", true)?,
        };

        Ok(Self {
            api,
            agent,
            card_products,
            webhooks,
            cache,
            logging,
            testing,
            events,
        })
    }
}

impl Validate for MuseWalletConfig {
    fn validate(&self) -> Result<()> {
        ConfigValidator::is_url(&self.api.base_url, "api.base_url")?;
        ConfigValidator::not_empty(&self.api.partner_id, "api.partner_id")?;
        ConfigValidator::not_empty(self.api.private_key.expose_secret(), "api.private_key")?;
        ConfigValidator::at_least(self.api.retry_attempts, 1, "api.retry_attempts")?;
        if self.api.timeout.is_zero() {
            return Err(ConfigError::invalid("api.timeout", "must be non-zero"));
        }
        Ok(())
    }
}

/// Builder for [`MuseWalletConfig`]
#[derive(Debug, Default)]
pub struct MuseWalletConfigBuilder {
    config: MuseWalletConfig,
}

impl MuseWalletConfigBuilder {
    /// Set the gateway base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.api.base_url = url.into();
        self
    }

    /// Set the partner id
    pub fn partner_id(mut self, partner_id: impl Into<String>) -> Self {
        self.config.api.partner_id = partner_id.into();
        self
    }

    /// Set the RSA private key
    pub fn private_key(mut self, key: impl Into<String>) -> Self {
        self.config.api.private_key = SecretString::from(key.into());
        self
    }

    /// Set the per-attempt timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.api.timeout = timeout;
        self
    }

    /// Set the total attempt budget for transport failures
    pub fn retry_attempts(mut self, attempts: u32) -> Self {
        self.config.api.retry_attempts = attempts;
        self
    }

    /// Set the backoff unit
    pub fn backoff_unit(mut self, unit: Duration) -> Self {
        self.config.api.backoff_unit = unit;
        self
    }

    /// Set a card product id by type (`basic`, `premium` or `business`)
    pub fn card_product(mut self, kind: &str, product_id: impl Into<String>) -> Self {
        let id = Some(product_id.into());
        match kind {
            "basic" => self.config.card_products.basic = id,
            "premium" => self.config.card_products.premium = id,
            "business" => self.config.card_products.business = id,
            _ => {}
        }
        self
    }

    /// Set the webhook shared secret
    pub fn webhook_secret(mut self, secret: impl Into<String>) -> Self {
        self.config.webhooks.secret = Some(SecretString::from(secret.into()));
        self
    }

    /// Enable or disable testing mode
    pub fn testing_mode(mut self, enabled: bool) -> Self {
        self.config.testing.enabled = enabled;
        self
    }

    /// Enable or disable notification emission
    pub fn events_enabled(mut self, enabled: bool) -> Self {
        self.config.events.enabled = enabled;
        self
    }

    /// Enable or disable emission on inbound webhooks
    pub fn dispatch_on_webhook(mut self, enabled: bool) -> Self {
        self.config.events.dispatch_on_webhook = enabled;
        self
    }

    /// Configure the response cache
    pub fn cache(mut self, enabled: bool, ttl: Duration) -> Self {
        self.config.cache.enabled = enabled;
        self.config.cache.ttl = ttl;
        self
    }

    /// Enable or disable action logging
    pub fn logging_enabled(mut self, enabled: bool) -> Self {
        self.config.logging.enabled = enabled;
        self
    }

    /// Build the configuration
    pub fn build(self) -> MuseWalletConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MuseWalletConfig::default();
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.api.timeout, Duration::from_secs(30));
        assert_eq!(config.api.retry_attempts, 3);
        assert!(config.cache.enabled);
        assert_eq!(config.cache.ttl, Duration::from_secs(300));
        assert!(!config.testing.enabled);
        assert!(config.events.should_dispatch());
        assert!(!config.webhooks.has_secret());
        assert_eq!(config.webhooks.events.len(), 10);
    }

    #[test]
    fn test_builder() {
        let config = MuseWalletConfig::builder()
            .partner_id("P")
            .private_key("key")
            .retry_attempts(5)
            .webhook_secret("whsec")
            .card_product("premium", "prod_premium")
            .dispatch_on_webhook(false)
            .build();

        assert_eq!(config.api.partner_id, "P");
        assert_eq!(config.api.retry_attempts, 5);
        assert!(config.webhooks.has_secret());
        assert_eq!(config.card_products.configured(), vec![("premium", "prod_premium")]);
        assert!(!config.events.should_dispatch());
    }

    #[test]
    fn test_validate_requires_credentials() {
        let config = MuseWalletConfig::default();
        assert!(config.validate().is_err());

        let config = MuseWalletConfig::builder()
            .partner_id("P")
            .private_key("key")
            .build();
        assert!(config.validate().is_ok());

        let config = MuseWalletConfig::builder()
            .partner_id("P")
            .private_key("key")
            .retry_attempts(0)
            .build();
        assert!(config.validate().is_err());
    }
}
