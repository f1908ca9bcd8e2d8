//! Business response codes.
//!
//! The gateway reports the outcome of a call in the `code` field of a 2xx
//! body. Only `"200"` is success; everything else maps to a human-readable
//! message, description and suggestion.

use crate::response::ApiResponse;
use serde::Serialize;
use serde_json::Value;
use std::borrow::Cow;

/// Known gateway response codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseCode {
    Success,
    BadRequest,
    SignError,
    WrongTimestampOrNonce,
    SystemError,
    UserStatusInvalid,
    OrderNotExist,
    CurrencyNotSupported,
    InsufficientBalance,
    QuotaMinCheckFail,
    UnsupportedCurrency,
    OrderAmountBelowFee,
    DoublePayment,
    NoFeeRule,
    KycLevelLow,
    PhoneNumberError,
    CardNotAllowActivate,
    RepeatedRequest,
    /// Any code not listed above.
    Unknown,
}

impl ResponseCode {
    /// Every known code.
    pub const ALL: [ResponseCode; 18] = [
        Self::Success,
        Self::BadRequest,
        Self::SignError,
        Self::WrongTimestampOrNonce,
        Self::SystemError,
        Self::UserStatusInvalid,
        Self::OrderNotExist,
        Self::CurrencyNotSupported,
        Self::InsufficientBalance,
        Self::QuotaMinCheckFail,
        Self::UnsupportedCurrency,
        Self::OrderAmountBelowFee,
        Self::DoublePayment,
        Self::NoFeeRule,
        Self::KycLevelLow,
        Self::PhoneNumberError,
        Self::CardNotAllowActivate,
        Self::RepeatedRequest,
    ];

    /// Parse a wire code.
    pub fn from_code(code: &str) -> Self {
        match code {
            "200" => Self::Success,
            "400" => Self::BadRequest,
            "406" => Self::SignError,
            "412" => Self::WrongTimestampOrNonce,
            "500" => Self::SystemError,
            "5004" => Self::UserStatusInvalid,
            "7000" => Self::OrderNotExist,
            "7002" => Self::CurrencyNotSupported,
            "202203" => Self::InsufficientBalance,
            "202206" => Self::QuotaMinCheckFail,
            "202211" => Self::UnsupportedCurrency,
            "202212" => Self::OrderAmountBelowFee,
            "202224" => Self::DoublePayment,
            "2204002" => Self::NoFeeRule,
            "10211001" => Self::KycLevelLow,
            "10211027" => Self::PhoneNumberError,
            "10213005" => Self::CardNotAllowActivate,
            "10240000" => Self::RepeatedRequest,
            _ => Self::Unknown,
        }
    }

    /// Wire code, `None` for [`ResponseCode::Unknown`].
    pub fn as_code(&self) -> Option<&'static str> {
        Some(match self {
            Self::Success => "200",
            Self::BadRequest => "400",
            Self::SignError => "406",
            Self::WrongTimestampOrNonce => "412",
            Self::SystemError => "500",
            Self::UserStatusInvalid => "5004",
            Self::OrderNotExist => "7000",
            Self::CurrencyNotSupported => "7002",
            Self::InsufficientBalance => "202203",
            Self::QuotaMinCheckFail => "202206",
            Self::UnsupportedCurrency => "202211",
            Self::OrderAmountBelowFee => "202212",
            Self::DoublePayment => "202224",
            Self::NoFeeRule => "2204002",
            Self::KycLevelLow => "10211001",
            Self::PhoneNumberError => "10211027",
            Self::CardNotAllowActivate => "10213005",
            Self::RepeatedRequest => "10240000",
            Self::Unknown => return None,
        })
    }

    /// Short title.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::BadRequest => "Bad Request",
            Self::SignError => "Signature Error",
            Self::WrongTimestampOrNonce => "Wrong Timestamp or Nonce",
            Self::SystemError => "System Error",
            Self::UserStatusInvalid => "User Status Invalid",
            Self::OrderNotExist => "Order Not Exist",
            Self::CurrencyNotSupported => "Currency Not Supported",
            Self::InsufficientBalance => "Insufficient Balance",
            Self::QuotaMinCheckFail => "Quota Minimum Check Failed",
            Self::UnsupportedCurrency => "Unsupported Currency",
            Self::OrderAmountBelowFee => "Order Amount Too Small",
            Self::DoublePayment => "Double Payment",
            Self::NoFeeRule => "No Fee Rule Specified",
            Self::KycLevelLow => "KYC Level Too Low",
            Self::PhoneNumberError => "Phone Number Error",
            Self::CardNotAllowActivate => "Card Cannot Be Activated",
            Self::RepeatedRequest => "Repeated Request",
            Self::Unknown => "Unknown Error",
        }
    }

    fn description(&self) -> &'static str {
        match self {
            Self::Success => "Request completed successfully",
            Self::BadRequest => "Invalid parameters provided",
            Self::SignError => "The request signature is incorrect",
            Self::WrongTimestampOrNonce => "The timestamp or nonce value is invalid",
            Self::SystemError => "Internal server error on MusePay side",
            Self::UserStatusInvalid => "The user account status is not valid for this operation",
            Self::OrderNotExist => "The specified order does not exist",
            Self::CurrencyNotSupported => "The specified currency is not supported",
            Self::InsufficientBalance => {
                "The account does not have sufficient balance for this operation"
            }
            Self::QuotaMinCheckFail => "The amount does not meet the minimum quota requirement",
            Self::UnsupportedCurrency => "The currency is not supported for this operation",
            Self::OrderAmountBelowFee => "The order amount must be greater than the service fee",
            Self::DoublePayment => "This payment has already been processed",
            Self::NoFeeRule => "No fee rule is configured for this operation",
            Self::KycLevelLow => {
                "The user KYC verification level is insufficient for card issuance"
            }
            Self::PhoneNumberError => "The phone number is invalid or not verified",
            Self::CardNotAllowActivate => {
                "The card is not in a status that allows activation. Card may already be ACTIVE or in PENDING_ACTIVE status."
            }
            Self::RepeatedRequest => {
                "This request has already been processed (duplicate request_id)"
            }
            Self::Unknown => "",
        }
    }

    fn suggestion(&self) -> &'static str {
        match self {
            Self::Success => "",
            Self::BadRequest => {
                "Check the request parameters and ensure all required fields are present and valid"
            }
            Self::SignError => {
                "Verify that the private key is correct and the signature generation algorithm matches MusePay requirements"
            }
            Self::WrongTimestampOrNonce => {
                "Ensure timestamp is current Unix timestamp and nonce is unique for each request"
            }
            Self::SystemError => "Contact MusePay support if the error persists",
            Self::UserStatusInvalid => "Check the user account status and ensure it is active",
            Self::OrderNotExist => "Verify the order ID and ensure it was created successfully",
            Self::CurrencyNotSupported => {
                "Use one of the supported currencies: USDT_TRC20, USDT_ERC20, USDC_ERC20, etc."
            }
            Self::InsufficientBalance => "Top up the account balance before proceeding",
            Self::QuotaMinCheckFail => "Increase the amount to meet the minimum quota requirement",
            Self::UnsupportedCurrency => "Use a supported currency for this card product",
            Self::OrderAmountBelowFee => "Increase the order amount to cover the service fee",
            Self::DoublePayment => "Use a unique request_id for each payment",
            Self::NoFeeRule => "Contact MusePay support to configure fee rules",
            Self::KycLevelLow => {
                "Complete KYC verification by uploading documents or using the KYC link. KYC status must be \"APPROVED\" (status 3) before applying for a card."
            }
            Self::PhoneNumberError => {
                "Ensure the phone number is pre-verified by the partner and in correct format (area code without + sign, e.g., \"1\" for US, \"86\" for China)"
            }
            Self::CardNotAllowActivate => {
                "Check the card status first using get_card(). Virtual cards are often automatically activated after approval."
            }
            Self::RepeatedRequest => "Use a unique request_id (UUID) for each new request",
            Self::Unknown => "Check MusePay API documentation or contact support",
        }
    }
}

/// Human-readable detail for a code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorInfo {
    pub message: &'static str,
    pub description: Cow<'static, str>,
    pub suggestion: &'static str,
}

/// Lookups over the response code table. Never fails for unknown codes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseCodec;

impl ResponseCodec {
    /// Message, description and suggestion for `code`.
    pub fn classify(code: &str) -> ErrorInfo {
        let known = ResponseCode::from_code(code);
        let description = match known {
            ResponseCode::Unknown => Cow::Owned(format!("Unknown error code: {}", code)),
            other => Cow::Borrowed(other.description()),
        };
        ErrorInfo {
            message: known.message(),
            description,
            suggestion: known.suggestion(),
        }
    }

    /// True only for `"200"`.
    pub fn is_success(code: &str) -> bool {
        code == "200"
    }

    /// Codes worth retrying with a fresh signature.
    pub fn is_retryable(code: &str) -> bool {
        matches!(
            ResponseCode::from_code(code),
            ResponseCode::SystemError | ResponseCode::WrongTimestampOrNonce
        )
    }

    /// Codes the end user has to resolve.
    pub fn requires_user_action(code: &str) -> bool {
        matches!(
            ResponseCode::from_code(code),
            ResponseCode::KycLevelLow
                | ResponseCode::PhoneNumberError
                | ResponseCode::InsufficientBalance
        )
    }

    /// Error body for `code` with optional caller context.
    pub fn format_error(code: &str, additional_info: Option<&str>) -> FormattedError {
        let info = Self::classify(code);
        FormattedError {
            code: code.to_string(),
            message: info.message.to_string(),
            description: info.description.into_owned(),
            suggestion: info.suggestion.to_string(),
            additional_info: additional_info.map(str::to_string),
        }
    }
}

/// Shorthand for [`ResponseCodec::is_success`].
pub fn is_success(code: &str) -> bool {
    ResponseCodec::is_success(code)
}

/// Output of [`ResponseCodec::format_error`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedError {
    pub code: String,
    pub message: String,
    pub description: String,
    pub suggestion: String,
    pub additional_info: Option<String>,
}

/// An API response enriched with code detail, ready to hand to a caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormattedResponse {
    pub success: bool,
    pub code: String,
    pub message: String,
    pub description: String,
    pub suggestion: String,
    pub data: Value,
    pub original_message: Option<String>,
}

impl FormattedResponse {
    pub fn from_api_response(response: &ApiResponse) -> Self {
        let info = ResponseCodec::classify(&response.code);
        Self {
            success: ResponseCodec::is_success(&response.code),
            code: response.code.clone(),
            message: info.message.to_string(),
            description: info.description.into_owned(),
            suggestion: info.suggestion.to_string(),
            data: response.data.clone(),
            original_message: Some(response.message.clone()),
        }
    }

    /// 200 for success, 400 otherwise.
    pub fn http_status(&self) -> u16 {
        if self.success { 200 } else { 400 }
    }
}
