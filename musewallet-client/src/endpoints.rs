//! Endpoint paths and the fields each one signs.

/// Fields every request signs.
pub const COMMON_FIELDS: [&str; 4] = ["partner_id", "sign_type", "timestamp", "nonce"];

pub const CARD_USER_CREATE: &str = "/v1/carduser/create";
pub const CARD_USER_QUERY: &str = "/v1/carduser/query";
pub const CARD_USER_UPLOAD_KYC: &str = "/v1/carduser/upload-kyc";
pub const CARD_USER_KYC_LINK: &str = "/v1/carduser/kyc-link";
pub const CARD_APPLY: &str = "/v1/card/apply";
pub const CARD_APPLY_RESULT: &str = "/v1/card/apply-result";
pub const CARD_QUERY: &str = "/v1/card/query";
pub const CARD_ACTIVATE: &str = "/v1/card/activate";
pub const CARD_ACCOUNT_TOPUP: &str = "/v1/cardaccount/topup";
pub const BALANCE_PARTNER: &str = "/v1/balance/partner";
pub const BALANCE_PARTNER_ADDRESS: &str = "/v1/balance/partner-address";
pub const CARD_REPLACE: &str = "/v1/card/replace";
pub const CARD_LIMIT_CHANGE: &str = "/v1/card/limitChange";
pub const TXN_VERIFICATION_CONFIRM: &str = "/v1/card/txn-verification-confirm";
pub const TXN_VERIFICATION_DECLINE: &str = "/v1/card/txn-verification-decline";

const TABLE: &[(&str, &[&str])] = &[
    (
        CARD_USER_CREATE,
        &["user_xid", "email", "individual", "document", "address", "user_name"],
    ),
    (CARD_USER_QUERY, &["user_id", "user_xid", "email", "phone_number"]),
    (
        CARD_USER_UPLOAD_KYC,
        &["user_xid", "individual", "document", "address"],
    ),
    (CARD_USER_KYC_LINK, &["user_xid"]),
    (
        CARD_APPLY,
        &[
            "user_id",
            "request_id",
            "card_product_id",
            "card_level",
            "phone_number",
            "phone_area_code",
            "embossed_name",
        ],
    ),
    (CARD_APPLY_RESULT, &["request_id", "user_id"]),
    (CARD_QUERY, &["card_id", "user_id"]),
    (CARD_ACTIVATE, &["user_id", "card_id"]),
    (
        CARD_ACCOUNT_TOPUP,
        &["request_id", "card_id", "user_id", "amount", "currency"],
    ),
    (BALANCE_PARTNER, &["currency"]),
    (BALANCE_PARTNER_ADDRESS, &["currency", "description"]),
    (
        CARD_REPLACE,
        &["user_id", "original_card_id", "replace_reason", "request_id"],
    ),
    (CARD_LIMIT_CHANGE, &["user_id", "card_id", "daily_purchase_limit"]),
    (
        TXN_VERIFICATION_CONFIRM,
        &["user_id", "card_id", "token", "request_id"],
    ),
    (
        TXN_VERIFICATION_DECLINE,
        &["user_id", "card_id", "token", "request_id"],
    ),
];

/// Static lookup from endpoint path to signed field names.
#[derive(Debug, Clone, Copy, Default)]
pub struct EndpointSignatureSpec;

impl EndpointSignatureSpec {
    /// Business fields declared for `endpoint`, empty for unknown paths.
    pub fn business_fields(endpoint: &str) -> &'static [&'static str] {
        TABLE
            .iter()
            .find(|(path, _)| *path == endpoint)
            .map(|(_, fields)| *fields)
            .unwrap_or(&[])
    }

    /// All signed fields for `endpoint`: the common fields, then business fields.
    pub fn fields_for(endpoint: &str) -> Vec<&'static str> {
        COMMON_FIELDS
            .iter()
            .chain(Self::business_fields(endpoint))
            .copied()
            .collect()
    }

    /// Whether `field` enters the signature for `endpoint`.
    pub fn includes(endpoint: &str, field: &str) -> bool {
        COMMON_FIELDS.contains(&field) || Self::business_fields(endpoint).contains(&field)
    }

    /// Whether `endpoint` is a known path.
    pub fn is_known(endpoint: &str) -> bool {
        TABLE.iter().any(|(path, _)| *path == endpoint)
    }
}
