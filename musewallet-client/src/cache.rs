//! Partner balance cache.

use crate::types::PartnerBalance;
use moka::future::Cache;
use musewallet_config::CacheSettings;

const MAX_ENTRIES: u64 = 64;

/// TTL cache of partner balances keyed by currency.
///
/// Lookups and refills are not coordinated: two callers that miss at the same
/// time both fetch and both insert. The only cost is a redundant request.
#[derive(Clone)]
pub struct BalanceCache {
    inner: Option<Cache<String, PartnerBalance>>,
    prefix: String,
}

impl BalanceCache {
    pub fn new(settings: &CacheSettings) -> Self {
        let inner = (settings.enabled && !settings.ttl.is_zero()).then(|| {
            Cache::builder()
                .max_capacity(MAX_ENTRIES)
                .time_to_live(settings.ttl)
                .build()
        });
        Self {
            inner,
            prefix: settings.prefix.clone(),
        }
    }

    /// A cache that never stores anything.
    pub fn disabled() -> Self {
        Self {
            inner: None,
            prefix: String::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.is_some()
    }

    /// Storage key for a currency.
    pub fn key(&self, currency: &str) -> String {
        format!("{}balance:{}", self.prefix, currency)
    }

    pub async fn get(&self, currency: &str) -> Option<PartnerBalance> {
        match &self.inner {
            Some(cache) => cache.get(&self.key(currency)).await,
            None => None,
        }
    }

    pub async fn insert(&self, currency: &str, balance: PartnerBalance) {
        if let Some(cache) = &self.inner {
            cache.insert(self.key(currency), balance).await;
        }
    }

    pub async fn invalidate(&self, currency: &str) {
        if let Some(cache) = &self.inner {
            cache.invalidate(&self.key(currency)).await;
        }
    }
}

impl std::fmt::Debug for BalanceCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BalanceCache")
            .field("enabled", &self.is_enabled())
            .field("prefix", &self.prefix)
            .finish()
    }
}
