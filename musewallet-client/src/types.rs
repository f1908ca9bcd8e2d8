//! Typed views over response `data`.
//!
//! The gateway is loose about scalar types (ids and amounts arrive as strings
//! or numbers), so every field is kept as an optional string and numeric
//! accessors parse on demand.

use crate::enums::{ApplyStatus, CardStatus, KycStatus};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::str::FromStr;

fn wire_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

fn decimal(value: &Option<String>) -> Option<Decimal> {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .and_then(|v| Decimal::from_str(v.trim()).ok())
}

/// Partner settlement balance for one currency. Keys are camelCase on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PartnerBalance {
    #[serde(deserialize_with = "wire_string")]
    pub currency: Option<String>,
    #[serde(deserialize_with = "wire_string")]
    pub balance: Option<String>,
    #[serde(deserialize_with = "wire_string")]
    pub available_balance: Option<String>,
    #[serde(deserialize_with = "wire_string")]
    pub freeze_balance: Option<String>,
    #[serde(deserialize_with = "wire_string")]
    pub pending_settle_balance: Option<String>,
}

impl PartnerBalance {
    pub fn balance_decimal(&self) -> Option<Decimal> {
        decimal(&self.balance)
    }

    pub fn available_balance_decimal(&self) -> Option<Decimal> {
        decimal(&self.available_balance)
    }

    pub fn freeze_balance_decimal(&self) -> Option<Decimal> {
        decimal(&self.freeze_balance)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardHolder {
    #[serde(deserialize_with = "wire_string")]
    pub user_xid: Option<String>,
    #[serde(deserialize_with = "wire_string")]
    pub user_id: Option<String>,
    #[serde(deserialize_with = "wire_string")]
    pub kyc_status: Option<String>,
    #[serde(deserialize_with = "wire_string")]
    pub email: Option<String>,
    #[serde(deserialize_with = "wire_string")]
    pub phone_number: Option<String>,
    #[serde(deserialize_with = "wire_string")]
    pub first_name: Option<String>,
    #[serde(deserialize_with = "wire_string")]
    pub last_name: Option<String>,
    #[serde(deserialize_with = "wire_string")]
    pub document_type: Option<String>,
    #[serde(deserialize_with = "wire_string")]
    pub document_number: Option<String>,
}

impl CardHolder {
    pub fn kyc(&self) -> Option<KycStatus> {
        self.kyc_status.as_deref().and_then(KycStatus::parse)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardApplication {
    #[serde(deserialize_with = "wire_string")]
    pub apply_id: Option<String>,
    #[serde(deserialize_with = "wire_string")]
    pub request_id: Option<String>,
    #[serde(deserialize_with = "wire_string")]
    pub user_id: Option<String>,
    #[serde(deserialize_with = "wire_string")]
    pub status: Option<String>,
    #[serde(deserialize_with = "wire_string")]
    pub card_id: Option<String>,
}

impl CardApplication {
    pub fn apply_status(&self) -> Option<ApplyStatus> {
        self.status.as_deref().and_then(ApplyStatus::parse)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardInfo {
    #[serde(deserialize_with = "wire_string")]
    pub card_id: Option<String>,
    #[serde(deserialize_with = "wire_string")]
    pub user_id: Option<String>,
    #[serde(deserialize_with = "wire_string")]
    pub card_number: Option<String>,
    #[serde(deserialize_with = "wire_string")]
    pub status: Option<String>,
    #[serde(deserialize_with = "wire_string")]
    pub card_level: Option<String>,
    #[serde(deserialize_with = "wire_string")]
    pub card_type: Option<String>,
    #[serde(deserialize_with = "wire_string")]
    pub currency: Option<String>,
    #[serde(deserialize_with = "wire_string")]
    pub balance: Option<String>,
    #[serde(deserialize_with = "wire_string")]
    pub available_balance: Option<String>,
    #[serde(deserialize_with = "wire_string")]
    pub embossed_name: Option<String>,
    #[serde(deserialize_with = "wire_string")]
    pub expiry_month: Option<String>,
    #[serde(deserialize_with = "wire_string")]
    pub expiry_year: Option<String>,
    #[serde(deserialize_with = "wire_string")]
    pub phone_number: Option<String>,
    #[serde(deserialize_with = "wire_string")]
    pub phone_area_code: Option<String>,
}

impl CardInfo {
    /// Last four digits behind a mask, `None` for short or missing numbers.
    pub fn masked_card_number(&self) -> Option<String> {
        let number = self.card_number.as_deref()?;
        if number.len() < 4 {
            return None;
        }
        number
            .get(number.len() - 4..)
            .map(|last4| format!("****{}", last4))
    }

    pub fn card_status(&self) -> Option<CardStatus> {
        self.status.as_deref().and_then(CardStatus::parse)
    }

    pub fn is_active(&self) -> bool {
        self.card_status() == Some(CardStatus::Active)
    }

    pub fn balance_decimal(&self) -> Option<Decimal> {
        decimal(&self.balance)
    }

    pub fn available_balance_decimal(&self) -> Option<Decimal> {
        decimal(&self.available_balance)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopUp {
    #[serde(deserialize_with = "wire_string")]
    pub request_id: Option<String>,
    #[serde(deserialize_with = "wire_string")]
    pub card_id: Option<String>,
    #[serde(deserialize_with = "wire_string")]
    pub user_id: Option<String>,
    #[serde(deserialize_with = "wire_string")]
    pub amount: Option<String>,
    #[serde(deserialize_with = "wire_string")]
    pub currency: Option<String>,
    #[serde(deserialize_with = "wire_string")]
    pub order_no: Option<String>,
    #[serde(deserialize_with = "wire_string")]
    pub status: Option<String>,
}

impl TopUp {
    pub fn amount_decimal(&self) -> Option<Decimal> {
        decimal(&self.amount)
    }

    /// Whether the gateway reports the top-up as settled.
    pub fn is_completed(&self) -> bool {
        matches!(self.status.as_deref(), Some("completed" | "success"))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KycLink {
    #[serde(deserialize_with = "wire_string")]
    pub user_xid: Option<String>,
    #[serde(deserialize_with = "wire_string")]
    pub link: Option<String>,
}

impl KycLink {
    pub fn has_link(&self) -> bool {
        self.link.as_deref().is_some_and(|l| !l.is_empty())
    }
}

/// A card product configured for this partner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardProduct {
    pub product_id: String,
    pub card_type: String,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    #[test]
    fn test_partner_balance_camel_case() {
        let balance: PartnerBalance = serde_json::from_value(serde_json::json!({
            "currency": "USDT_TRC20",
            "balance": "1000.50",
            "availableBalance": 900,
            "freezeBalance": "100.5",
        }))
        .unwrap();

        assert_eq!(balance.available_balance.as_deref(), Some("900"));
        assert_eq!(balance.balance_decimal(), Some(dec("1000.50")));
        assert_eq!(balance.freeze_balance_decimal(), Some(dec("100.5")));
        assert!(balance.pending_settle_balance.is_none());
    }

    #[test]
    fn test_card_info_helpers() {
        let card: CardInfo = serde_json::from_value(serde_json::json!({
            "card_id": 12345,
            "card_number": "4111111111111234",
            "status": "ACTIVE",
            "balance": null,
        }))
        .unwrap();

        assert_eq!(card.card_id.as_deref(), Some("12345"));
        assert_eq!(card.masked_card_number().as_deref(), Some("****1234"));
        assert!(card.is_active());
        assert!(card.balance_decimal().is_none());

        let short = CardInfo {
            card_number: Some("123".into()),
            ..Default::default()
        };
        assert!(short.masked_card_number().is_none());
        assert!(!short.is_active());
    }

    #[test]
    fn test_missing_data_decodes_to_defaults() {
        let link: KycLink = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(!link.has_link());
    }

    #[test]
    fn test_top_up_completion() {
        let top_up = TopUp {
            status: Some("success".into()),
            amount: Some("10.25".into()),
            ..Default::default()
        };
        assert!(top_up.is_completed());
        assert_eq!(top_up.amount_decimal(), Some(dec("10.25")));
        assert!(!TopUp::default().is_completed());
    }
}
