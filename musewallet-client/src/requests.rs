//! Request bodies for the typed operations.

use crate::enums::{CardLevel, Currency, DocumentType};
use crate::error::{MuseWalletError, Result};
use crate::validation::{Rules, Validate, ValidationErrors};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const ID_MAX: usize = 50;
const REQUEST_ID_MAX: usize = 100;
const USER_XID_MAX: usize = 100;
const EMAIL_MAX: usize = 100;
const NAME_MAX: usize = 50;
const PHONE_MAX: usize = 20;
const AREA_CODE_MAX: usize = 5;
const EMBOSSED_NAME_MAX: usize = 26;
const CITY_MAX: usize = 50;
const POST_CODE_MAX: usize = 20;
const ADDRESS_DETAILS_MAX: usize = 200;

/// Serialize a request into a signable payload.
pub(crate) fn to_payload<T: Serialize>(request: &T) -> Result<Map<String, Value>> {
    match serde_json::to_value(request) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(MuseWalletError::Decode(format!(
            "request did not serialize to an object: {}",
            other
        ))),
        Err(e) => Err(MuseWalletError::Decode(e.to_string())),
    }
}

/// Personal details of a card holder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Individual {
    pub first_name: String,
    pub last_name: String,
    /// `YYYY-MM-DD`
    pub date_of_birth: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annual_income: Option<String>,
}

impl Individual {
    fn check(&self, rules: &mut Rules) {
        rules
            .required("individual.first_name", &self.first_name, NAME_MAX)
            .required("individual.last_name", &self.last_name, NAME_MAX)
            .date_before_today("individual.date_of_birth", &self.date_of_birth)
            .optional("individual.occupation", self.occupation.as_deref(), 100)
            .optional("individual.annual_income", self.annual_income.as_deref(), 50);
    }
}

/// Identity document, images as base64.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// `"1"` passport, `"2"` ID card
    #[serde(rename = "type")]
    pub doc_type: String,
    pub number: String,
    /// ISO 3166-1 alpha-2
    pub country: String,
    /// `YYYY-MM-DD`
    pub expiry_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub front: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub back: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub face: Option<String>,
}

impl Document {
    fn check(&self, rules: &mut Rules) {
        rules
            .one_of("document.type", &self.doc_type, |v| DocumentType::parse(v).is_some())
            .required("document.number", &self.number, ID_MAX)
            .exact("document.country", &self.country, 2)
            .date_after_today("document.expiry_date", &self.expiry_date);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    /// ISO 3166-1 alpha-2
    pub country: String,
    pub city: String,
    pub post_code: String,
    pub details: String,
}

impl Address {
    fn check(&self, rules: &mut Rules) {
        rules
            .exact("address.country", &self.country, 2)
            .required("address.city", &self.city, CITY_MAX)
            .required("address.post_code", &self.post_code, POST_CODE_MAX)
            .required("address.details", &self.details, ADDRESS_DETAILS_MAX);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateCardHolderRequest {
    pub user_xid: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    pub individual: Individual,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<Document>,
    pub address: Address,
}

impl Validate for CreateCardHolderRequest {
    fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        let mut rules = Rules::new();
        rules
            .required("user_xid", &self.user_xid, USER_XID_MAX)
            .email("email", &self.email, EMAIL_MAX)
            .optional("user_name", self.user_name.as_deref(), 100);
        self.individual.check(&mut rules);
        if let Some(document) = &self.document {
            document.check(&mut rules);
        }
        self.address.check(&mut rules);
        rules.finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplyCardRequest {
    pub user_id: String,
    /// Idempotency key, a UUID is recommended
    pub request_id: String,
    pub card_product_id: String,
    pub card_level: String,
    pub phone_number: String,
    /// Without the leading `+`
    pub phone_area_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embossed_name: Option<String>,
}

impl Validate for ApplyCardRequest {
    fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        Rules::new()
            .required("user_id", &self.user_id, ID_MAX)
            .required("request_id", &self.request_id, REQUEST_ID_MAX)
            .required("card_product_id", &self.card_product_id, ID_MAX)
            .one_of("card_level", &self.card_level, |v| CardLevel::parse(v).is_some())
            .required("phone_number", &self.phone_number, PHONE_MAX)
            .required("phone_area_code", &self.phone_area_code, AREA_CODE_MAX)
            .optional("embossed_name", self.embossed_name.as_deref(), EMBOSSED_NAME_MAX)
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryApplyResultRequest {
    pub request_id: String,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apply_id: Option<String>,
}

impl Validate for QueryApplyResultRequest {
    fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        Rules::new()
            .required("request_id", &self.request_id, REQUEST_ID_MAX)
            .required("user_id", &self.user_id, ID_MAX)
            .optional("apply_id", self.apply_id.as_deref(), ID_MAX)
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GetCardRequest {
    pub card_id: String,
    pub user_id: String,
}

impl Validate for GetCardRequest {
    fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        Rules::new()
            .required("card_id", &self.card_id, ID_MAX)
            .required("user_id", &self.user_id, ID_MAX)
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivateCardRequest {
    pub user_id: String,
    pub card_id: String,
}

impl Validate for ActivateCardRequest {
    fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        Rules::new()
            .required("user_id", &self.user_id, ID_MAX)
            .required("card_id", &self.card_id, ID_MAX)
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopUpCardRequest {
    pub request_id: String,
    pub card_id: String,
    pub user_id: String,
    /// Sent as a decimal string
    pub amount: Decimal,
    pub currency: String,
}

impl Validate for TopUpCardRequest {
    fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        Rules::new()
            .required("request_id", &self.request_id, REQUEST_ID_MAX)
            .required("card_id", &self.card_id, ID_MAX)
            .required("user_id", &self.user_id, ID_MAX)
            .min_decimal("amount", self.amount, Decimal::new(1, 2))
            .one_of("currency", &self.currency, Currency::is_supported)
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadKycRequest {
    pub user_xid: String,
    pub individual: Individual,
    pub document: Document,
    pub address: Address,
}

impl Validate for UploadKycRequest {
    fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        let mut rules = Rules::new();
        rules.required("user_xid", &self.user_xid, USER_XID_MAX);
        self.individual.check(&mut rules);
        self.document.check(&mut rules);
        if self.document.front.as_deref().is_none_or(|f| f.trim().is_empty()) {
            rules.custom("document.front", "required", "document.front is required");
        }
        self.address.check(&mut rules);
        rules.finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerateKycLinkRequest {
    pub user_xid: String,
}

impl Validate for GenerateKycLinkRequest {
    fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        Rules::new()
            .required("user_xid", &self.user_xid, USER_XID_MAX)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn days_from_today(days: i64) -> String {
        (Utc::now().date_naive() + Duration::days(days))
            .format("%Y-%m-%d")
            .to_string()
    }

    fn individual() -> Individual {
        Individual {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            date_of_birth: "1990-12-10".into(),
            ..Default::default()
        }
    }

    fn address() -> Address {
        Address {
            country: "GB".into(),
            city: "London".into(),
            post_code: "N1 9GU".into(),
            details: "12 Example Street".into(),
        }
    }

    fn document() -> Document {
        Document {
            doc_type: "1".into(),
            number: "P1234567".into(),
            country: "GB".into(),
            expiry_date: days_from_today(365),
            front: Some("aGVsbG8=".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_apply_card_valid() {
        let request = ApplyCardRequest {
            user_id: "u1".into(),
            request_id: "r1".into(),
            card_product_id: "prod_basic".into(),
            card_level: "1".into(),
            phone_number: "5551234".into(),
            phone_area_code: "1".into(),
            embossed_name: Some("ADA LOVELACE".into()),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_apply_card_reports_every_field() {
        let request = ApplyCardRequest {
            card_level: "7".into(),
            embossed_name: Some("X".repeat(27)),
            ..Default::default()
        };
        let errors = request.validate().unwrap_err();
        for field in [
            "user_id",
            "request_id",
            "card_product_id",
            "card_level",
            "phone_number",
            "phone_area_code",
            "embossed_name",
        ] {
            assert!(errors.has(field), "missing error for {field}");
        }
    }

    #[test]
    fn test_top_up_amount_and_currency() {
        let mut request = TopUpCardRequest {
            request_id: "r1".into(),
            card_id: "c1".into(),
            user_id: "u1".into(),
            amount: Decimal::new(1, 2),
            currency: "USDT_TRC20".into(),
        };
        assert!(request.validate().is_ok());

        request.amount = Decimal::ZERO;
        request.currency = "BTC".into();
        let errors = request.validate().unwrap_err();
        assert!(errors.has("amount"));
        assert!(errors.has("currency"));
    }

    #[test]
    fn test_top_up_amount_serializes_as_string() {
        let request = TopUpCardRequest {
            amount: Decimal::new(1050, 2),
            ..Default::default()
        };
        let payload = to_payload(&request).unwrap();
        assert_eq!(payload["amount"], "10.50");
    }

    #[test]
    fn test_create_card_holder_nested_rules() {
        let mut request = CreateCardHolderRequest {
            user_xid: "x1".into(),
            email: "ada@example.com".into(),
            individual: individual(),
            address: address(),
            ..Default::default()
        };
        assert!(request.validate().is_ok());

        request.individual.date_of_birth = days_from_today(1);
        request.address.country = "GBR".into();
        request.document = Some(Document {
            doc_type: "3".into(),
            expiry_date: days_from_today(-1),
            ..document()
        });
        let errors = request.validate().unwrap_err();
        assert!(errors.has("individual.date_of_birth"));
        assert!(errors.has("address.country"));
        assert!(errors.has("document.type"));
        assert!(errors.has("document.expiry_date"));
    }

    #[test]
    fn test_create_card_holder_omits_absent_document() {
        let request = CreateCardHolderRequest {
            user_xid: "x1".into(),
            email: "ada@example.com".into(),
            individual: individual(),
            address: address(),
            ..Default::default()
        };
        let payload = to_payload(&request).unwrap();
        assert!(!payload.contains_key("document"));
        assert!(!payload.contains_key("user_name"));
        assert_eq!(payload["individual"]["first_name"], "Ada");
    }

    #[test]
    fn test_upload_kyc_requires_front_image() {
        let mut request = UploadKycRequest {
            user_xid: "x1".into(),
            individual: individual(),
            document: document(),
            address: address(),
        };
        assert!(request.validate().is_ok());

        request.document.front = None;
        let errors = request.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.has("document.front"));
    }

    #[test]
    fn test_document_type_serializes_as_type() {
        let payload = to_payload(&document()).unwrap();
        assert_eq!(payload["type"], "1");
        assert!(!payload.contains_key("doc_type"));
    }
}
