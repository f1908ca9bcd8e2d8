//! Signed request execution with retry.

use crate::error::{MuseWalletError, Result};
use crate::response::{self, ApiResponse};
use crate::retry::RetryPolicy;
use crate::signing::SignatureBuilder;
use crate::transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
use musewallet_config::ApiConfig;
use reqwest::Method;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Signs payloads and sends them, retrying transport failures.
///
/// A 2xx status returns the decoded envelope whatever its business code. Any
/// other status becomes [`MuseWalletError::Domain`] straight away; only
/// failures before a status line is received are retried.
pub struct RequestExecutor {
    base_url: String,
    timeout: Duration,
    retry: RetryPolicy,
    signer: SignatureBuilder,
    transport: Arc<dyn Transport>,
}

impl RequestExecutor {
    /// Executor over a reqwest transport.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        Self::with_transport(config, Arc::new(ReqwestTransport::new()?))
    }

    /// Executor over a custom transport.
    pub fn with_transport(config: &ApiConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        url::Url::parse(&base_url)
            .map_err(|e| MuseWalletError::config(format!("invalid base URL '{}': {}", base_url, e)))?;

        Ok(Self {
            base_url,
            timeout: config.timeout,
            retry: RetryPolicy::from_config(config),
            signer: SignatureBuilder::from_config(config)?,
            transport,
        })
    }

    /// Replace the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn signer(&self) -> &SignatureBuilder {
        &self.signer
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Full URL for an endpoint path.
    pub fn url_for(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// POST a signed payload.
    pub async fn post(&self, endpoint: &str, payload: Map<String, Value>) -> Result<ApiResponse> {
        self.execute(Method::POST, endpoint, payload).await
    }

    /// Sign `payload` for `endpoint` and send it.
    ///
    /// The signature is computed once; retries resend the same body.
    pub async fn execute(
        &self,
        method: Method,
        endpoint: &str,
        mut payload: Map<String, Value>,
    ) -> Result<ApiResponse> {
        let signed = self.signer.build(endpoint, &payload)?;
        signed.merge_into(&mut payload);

        let request = HttpRequest {
            method,
            url: self.url_for(endpoint),
            body: Value::Object(payload),
            timeout: self.timeout,
        };

        let mut attempt = 1;
        loop {
            match self.transport.send(&request).await {
                Ok(response) => return self.handle_response(endpoint, response),
                Err(e) if self.retry.has_attempts_left(attempt) => {
                    let delay = self.retry.delay_for_attempt(attempt);
                    warn!(
                        endpoint = endpoint,
                        attempt = attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "MusePay request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    error!(
                        endpoint = endpoint,
                        attempts = attempt,
                        error = %e,
                        "MusePay request failed after all retries"
                    );
                    return Err(MuseWalletError::RetriesExhausted {
                        attempts: attempt,
                        source: e,
                    });
                }
            }
        }
    }

    fn handle_response(&self, endpoint: &str, response: HttpResponse) -> Result<ApiResponse> {
        debug!(
            endpoint = endpoint,
            status = response.status,
            body_len = response.body.len(),
            "MusePay API response"
        );

        if !response.is_success() {
            let (code, message) = response::error_message(&response.body);
            error!(
                endpoint = endpoint,
                status = response.status,
                code = ?code,
                message = %message,
                "MusePay API error"
            );
            return Err(MuseWalletError::Domain {
                status: response.status,
                code,
                message,
            });
        }

        ApiResponse::from_body(&response.body)
    }
}
