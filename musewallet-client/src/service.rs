//! Typed card operations.

use crate::cache::BalanceCache;
use crate::endpoints;
use crate::error::Result;
use crate::executor::RequestExecutor;
use crate::requests::{
    self, ActivateCardRequest, ApplyCardRequest, CreateCardHolderRequest, GenerateKycLinkRequest,
    GetCardRequest, QueryApplyResultRequest, TopUpCardRequest, UploadKycRequest,
};
use crate::response::ApiResponse;
use crate::transport::Transport;
use crate::types::{CardApplication, CardHolder, CardInfo, CardProduct, KycLink, PartnerBalance, TopUp};
use crate::validation::{Rules, Validate};
use musewallet_config::{MuseWalletConfig, Validate as _};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::info;

/// Client for the MusePay card-issuing API.
///
/// Every operation validates its input, signs it, sends it through the
/// [`RequestExecutor`] and decodes `data` into a typed value. A non-`"200"`
/// business code is returned as [`MuseWalletError::Domain`](crate::MuseWalletError::Domain)
/// with the HTTP status of the response.
pub struct MuseWalletClient {
    config: MuseWalletConfig,
    executor: RequestExecutor,
    balances: BalanceCache,
}

impl MuseWalletClient {
    /// Create a client over HTTPS. The configuration is validated first.
    pub fn new(config: MuseWalletConfig) -> Result<Self> {
        config.validate()?;
        let executor = RequestExecutor::new(&config.api)?;
        Ok(Self::assemble(config, executor))
    }

    /// Create a client over a custom transport.
    pub fn with_transport(config: MuseWalletConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        config.validate()?;
        let executor = RequestExecutor::with_transport(&config.api, transport)?;
        Ok(Self::assemble(config, executor))
    }

    fn assemble(config: MuseWalletConfig, executor: RequestExecutor) -> Self {
        let balances = BalanceCache::new(&config.cache);
        Self {
            config,
            executor,
            balances,
        }
    }

    pub fn config(&self) -> &MuseWalletConfig {
        &self.config
    }

    pub fn executor(&self) -> &RequestExecutor {
        &self.executor
    }

    /// Send an arbitrary payload to `endpoint` and return the raw envelope.
    pub async fn call(&self, endpoint: &str, payload: Map<String, Value>) -> Result<ApiResponse> {
        self.executor.post(endpoint, payload).await
    }

    /// Partner balance for `currency`, served from cache while fresh.
    pub async fn partner_balance(&self, currency: &str) -> Result<PartnerBalance> {
        Rules::new().required("currency", currency, 50).finish()?;

        if let Some(cached) = self.balances.get(currency).await {
            return Ok(cached);
        }

        let mut payload = Map::new();
        payload.insert("currency".into(), Value::String(currency.to_string()));
        let response = self.executor.post(endpoints::BALANCE_PARTNER, payload).await?;
        self.log_action("get_partner_balance", endpoints::BALANCE_PARTNER, &response);

        let balance: PartnerBalance = response.into_data()?;
        self.balances.insert(currency, balance.clone()).await;
        Ok(balance)
    }

    /// Card products configured for this partner. No request is made.
    pub fn card_products(&self) -> Vec<CardProduct> {
        self.config
            .card_products
            .configured()
            .into_iter()
            .map(|(kind, id)| CardProduct {
                product_id: id.to_string(),
                card_type: kind.to_string(),
                name: format!("{} Card", capitalize(kind)),
            })
            .collect()
    }

    pub async fn create_card_holder(&self, request: &CreateCardHolderRequest) -> Result<CardHolder> {
        self.send("create_card_holder", endpoints::CARD_USER_CREATE, request)
            .await
    }

    pub async fn apply_card(&self, request: &ApplyCardRequest) -> Result<CardApplication> {
        self.send("create_card_application", endpoints::CARD_APPLY, request)
            .await
    }

    pub async fn query_apply_result(
        &self,
        request_id: &str,
        user_id: &str,
        apply_id: Option<&str>,
    ) -> Result<CardApplication> {
        let request = QueryApplyResultRequest {
            request_id: request_id.to_string(),
            user_id: user_id.to_string(),
            apply_id: apply_id.map(str::to_string),
        };
        self.send("query_apply_result", endpoints::CARD_APPLY_RESULT, &request)
            .await
    }

    pub async fn get_card(&self, card_id: &str, user_id: &str) -> Result<CardInfo> {
        let request = GetCardRequest {
            card_id: card_id.to_string(),
            user_id: user_id.to_string(),
        };
        self.send("get_card", endpoints::CARD_QUERY, &request).await
    }

    pub async fn activate_card(&self, request: &ActivateCardRequest) -> Result<CardInfo> {
        self.send("activate_card", endpoints::CARD_ACTIVATE, request)
            .await
    }

    pub async fn top_up_card(&self, request: &TopUpCardRequest) -> Result<TopUp> {
        self.send("topup_card", endpoints::CARD_ACCOUNT_TOPUP, request)
            .await
    }

    pub async fn upload_kyc(&self, request: &UploadKycRequest) -> Result<CardHolder> {
        self.send("upload_kyc", endpoints::CARD_USER_UPLOAD_KYC, request)
            .await
    }

    pub async fn generate_kyc_link(&self, user_xid: &str) -> Result<KycLink> {
        let request = GenerateKycLinkRequest {
            user_xid: user_xid.to_string(),
        };
        self.send("generate_kyc_link", endpoints::CARD_USER_KYC_LINK, &request)
            .await
    }

    async fn send<R, T>(&self, action: &str, endpoint: &str, request: &R) -> Result<T>
    where
        R: Serialize + Validate,
        T: DeserializeOwned,
    {
        request.validate()?;
        let payload = requests::to_payload(request)?;
        let response = self.executor.post(endpoint, payload).await?;
        self.log_action(action, endpoint, &response);
        response.into_data()
    }

    fn log_action(&self, action: &str, endpoint: &str, response: &ApiResponse) {
        if !self.config.logging.enabled {
            return;
        }
        info!(
            action = action,
            endpoint = endpoint,
            code = %response.code,
            message = %response.message,
            "MuseWallet action: {}",
            action
        );
    }
}

impl std::fmt::Debug for MuseWalletClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MuseWalletClient")
            .field("base_url", &self.config.api.base_url)
            .field("partner_id", &self.config.api.partner_id)
            .field("balances", &self.balances)
            .finish_non_exhaustive()
    }
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("premium"), "Premium");
        assert_eq!(capitalize(""), "");
    }
}
