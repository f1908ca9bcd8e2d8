//! Signed, retrying client for the MusePay card-issuing API.
//!
//! Every outbound call is a JSON `POST` authenticated by an RSA-SHA1
//! signature over a canonical, per-endpoint message (see [`SignatureBuilder`]).
//! [`RequestExecutor`] signs and sends payloads, retrying only transport
//! failures; [`ResponseCodec`] interprets the business `code` of a response;
//! [`MuseWalletClient`] layers validated, typed operations on top.
//!
//! ## Example
//!
//! ```rust,no_run
//! use musewallet_client::{MuseWalletClient, requests::ApplyCardRequest};
//! use musewallet_config::MuseWalletConfig;
//!
//! # async fn run() -> Result<(), musewallet_client::MuseWalletError> {
//! let client = MuseWalletClient::new(MuseWalletConfig::from_env()?)?;
//!
//! let balance = client.partner_balance("USDT_TRC20").await?;
//! println!("available: {:?}", balance.available_balance_decimal());
//!
//! let application = client
//!     .apply_card(&ApplyCardRequest {
//!         user_id: "u1".into(),
//!         request_id: "2f1c0f8e-5b5e-4d8e-9a59-4b8f0e6f1a2b".into(),
//!         card_product_id: "prod_basic".into(),
//!         card_level: "1".into(),
//!         phone_number: "5551234".into(),
//!         phone_area_code: "1".into(),
//!         embossed_name: None,
//!     })
//!     .await?;
//! println!("apply id: {:?}", application.apply_id);
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod codes;
pub mod endpoints;
pub mod enums;
pub mod error;
pub mod executor;
pub mod requests;
pub mod response;
pub mod retry;
pub mod service;
pub mod signing;
pub mod transport;
pub mod types;
pub mod validation;

pub use cache::BalanceCache;
pub use codes::{ErrorInfo, FormattedError, FormattedResponse, ResponseCode, ResponseCodec};
pub use endpoints::EndpointSignatureSpec;
pub use error::{MuseWalletError, Result, TransportError};
pub use executor::RequestExecutor;
pub use response::ApiResponse;
pub use retry::RetryPolicy;
pub use service::MuseWalletClient;
pub use signing::{SignatureBuilder, SignedParams};
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
pub use validation::{Validate, ValidationError, ValidationErrors};

/// Prelude for common imports.
pub mod prelude {
    pub use crate::codes::{FormattedResponse, ResponseCodec};
    pub use crate::enums::{ApplyStatus, CardLevel, CardStatus, Currency, DocumentType, KycStatus};
    pub use crate::error::{MuseWalletError, Result};
    pub use crate::requests::*;
    pub use crate::response::ApiResponse;
    pub use crate::service::MuseWalletClient;
    pub use crate::types::*;
}
