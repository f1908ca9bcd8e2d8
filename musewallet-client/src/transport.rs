//! HTTP transport seam.
//!
//! [`RequestExecutor`](crate::RequestExecutor) talks to the network through the
//! [`Transport`] trait so retry behavior can be exercised without sockets.

use crate::error::{MuseWalletError, Result, TransportError};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderValue};
use serde_json::Value;
use std::time::Duration;
use tracing::warn;

/// One outbound HTTP exchange.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: reqwest::Method,
    pub url: String,
    pub body: Value,
    pub timeout: Duration,
}

/// Raw response: a status line was received.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends a request and returns whatever status the server answered with.
///
/// Implementations return `Err` only when no status line was received.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &HttpRequest) -> std::result::Result<HttpResponse, TransportError>;
}

/// [`Transport`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with a fresh connection pool.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| MuseWalletError::config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// Wrap an existing client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &HttpRequest) -> std::result::Result<HttpResponse, TransportError> {
        let response = self
            .client
            .request(request.method.clone(), &request.url)
            .timeout(request.timeout)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .json(&request.body)
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(&e, request.timeout))?;

        // The status line has arrived; a failed body read is no longer a transport failure.
        let status = response.status().as_u16();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!(url = %request.url, status = status, error = %e, "Failed to read MusePay response body");
                String::new()
            }
        };

        Ok(HttpResponse { status, body })
    }
}
