//! Wire enums used by the card API.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A wire string that matches no known variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($variant:ident => ($wire:literal, $label:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            /// Every variant in declaration order.
            pub const ALL: &'static [$name] = &[$(Self::$variant),+];

            /// Wire representation.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }

            /// Display label.
            pub fn label(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }

            /// Parse a wire string.
            pub fn parse(value: &str) -> Option<Self> {
                match value {
                    $($wire => Some(Self::$variant),)+
                    _ => None,
                }
            }

            /// Label for a wire string, `"Unknown"` when unrecognized.
            pub fn label_for(value: &str) -> &'static str {
                Self::parse(value).map_or("Unknown", |v| v.label())
            }
        }

        impl std::str::FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                Self::parse(value).ok_or_else(|| UnknownVariant {
                    kind: stringify!($name),
                    value: value.to_string(),
                })
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

wire_enum! {
    /// Card lifecycle status.
    CardStatus {
        Inactive => ("INACTIVE", "Inactive"),
        Active => ("ACTIVE", "Active"),
        Locked => ("LOCKED", "Locked"),
        Closed => ("CLOSED", "Closed"),
        Suspended => ("SUSPENDED", "Suspended"),
    }
}

impl CardStatus {
    pub fn is_usable(&self) -> bool {
        *self == Self::Active
    }

    pub fn can_be_activated(&self) -> bool {
        *self == Self::Inactive
    }
}

wire_enum! {
    /// Card holder KYC review status.
    KycStatus {
        NotSet => ("0", "Not Set"),
        WaitAudit => ("1", "Waiting for Audit"),
        InAudit => ("2", "In Audit"),
        Approved => ("3", "Approved"),
        Refused => ("4", "Refused"),
    }
}

impl KycStatus {
    pub fn is_approved(&self) -> bool {
        *self == Self::Approved
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::WaitAudit | Self::InAudit)
    }

    pub fn is_rejected(&self) -> bool {
        *self == Self::Refused
    }
}

wire_enum! {
    /// Card application status.
    ApplyStatus {
        CardInit => ("CARD_INIT", "Initiated"),
        CardReviewing => ("CARD_REVIEWING", "Reviewing"),
        Applying => ("APPLYING", "Applying"),
        Approved => ("APPROVED", "Approved"),
        CardApproved => ("CARD_APPROVED", "Card Approved"),
        Rejected => ("REJECTED", "Rejected"),
        CardReject => ("CARD_REJECT", "Card Rejected"),
        Issued => ("ISSUED", "Issued"),
        CardShipped => ("CARD_SHIPPED", "Shipped"),
    }
}

impl ApplyStatus {
    pub fn is_successful(&self) -> bool {
        matches!(
            self,
            Self::Approved | Self::CardApproved | Self::Issued | Self::CardShipped
        )
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::CardInit | Self::CardReviewing | Self::Applying)
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected | Self::CardReject)
    }
}

wire_enum! {
    /// Card tier.
    CardLevel {
        Level1 => ("1", "Level 1"),
        Level2 => ("2", "Level 2"),
        Level3 => ("3", "Level 3"),
        Level4 => ("4", "Level 4"),
        Level5 => ("5", "Level 5"),
    }
}

wire_enum! {
    /// Identity document type.
    DocumentType {
        Passport => ("1", "Passport"),
        IdCard => ("2", "ID Card / Driver's License"),
    }
}

wire_enum! {
    /// Settlement currencies accepted by the gateway.
    Currency {
        Usdt => ("USDT", "USDT"),
        UsdtTrc20 => ("USDT_TRC20", "USDT (TRC20)"),
        Trx => ("TRX", "TRX"),
        UsdtErc20 => ("USDT_ERC20", "USDT (ERC20)"),
        Ethereum => ("Ethereum", "Ethereum"),
        UsdcErc20 => ("USDC_ERC20", "USDC (ERC20)"),
        UsdtBsc => ("USDT_BSC", "USDT (BEP20)"),
        UsdtArb => ("USDT_ARB", "USDT (Arbitrum)"),
        UsdcArb => ("USDC_ARB", "USDC (Arbitrum)"),
    }
}

impl Currency {
    /// Chain the asset settles on.
    pub fn network(&self) -> &'static str {
        match self {
            Self::Usdt => "USDT",
            Self::UsdtTrc20 | Self::Trx => "Tron",
            Self::UsdtErc20 | Self::Ethereum | Self::UsdcErc20 => "Ethereum",
            Self::UsdtBsc => "BNB Smart Chain",
            Self::UsdtArb | Self::UsdcArb => "Arbitrum",
        }
    }

    /// On-chain decimal places.
    pub fn decimals(&self) -> u32 {
        match self {
            Self::Ethereum | Self::UsdtBsc => 18,
            _ => 6,
        }
    }

    pub fn is_supported(value: &str) -> bool {
        Self::parse(value).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_status() {
        assert!(CardStatus::Active.is_usable());
        assert!(!CardStatus::Locked.is_usable());
        assert!(CardStatus::Inactive.can_be_activated());
        assert!(!CardStatus::Active.can_be_activated());
        assert_eq!(CardStatus::label_for("SUSPENDED"), "Suspended");
        assert_eq!(CardStatus::label_for("PENDING_ACTIVE"), "Unknown");
    }

    #[test]
    fn test_kyc_status_groups() {
        assert!("3".parse::<KycStatus>().unwrap().is_approved());
        assert!(KycStatus::WaitAudit.is_pending());
        assert!(KycStatus::InAudit.is_pending());
        assert!(KycStatus::Refused.is_rejected());
        assert!(!KycStatus::NotSet.is_pending());
    }

    #[test]
    fn test_apply_status_groups() {
        let successful: Vec<_> = ApplyStatus::ALL.iter().filter(|s| s.is_successful()).collect();
        let pending: Vec<_> = ApplyStatus::ALL.iter().filter(|s| s.is_pending()).collect();
        let rejected: Vec<_> = ApplyStatus::ALL.iter().filter(|s| s.is_rejected()).collect();
        assert_eq!(successful.len() + pending.len() + rejected.len(), ApplyStatus::ALL.len());
        assert_eq!(ApplyStatus::label_for("CARD_SHIPPED"), "Shipped");
    }

    #[test]
    fn test_currency_metadata() {
        assert_eq!(Currency::Ethereum.as_str(), "Ethereum");
        assert_eq!(Currency::Ethereum.decimals(), 18);
        assert_eq!(Currency::UsdtTrc20.network(), "Tron");
        assert_eq!(Currency::label_for("USDT_BSC"), "USDT (BEP20)");
        assert!(Currency::is_supported("USDC_ARB"));
        assert!(!Currency::is_supported("BTC"));
    }

    #[test]
    fn test_unknown_variant_error() {
        let err = "9".parse::<CardLevel>().unwrap_err();
        assert_eq!(err.kind, "CardLevel");
        assert_eq!(err.to_string(), "unknown CardLevel: 9");
        assert_eq!(DocumentType::label_for("2"), "ID Card / Driver's License");
    }

    #[test]
    fn test_serde_uses_wire_strings() {
        let json = serde_json::to_string(&CardLevel::Level3).unwrap();
        assert_eq!(json, "\"3\"");
        let status: CardStatus = serde_json::from_str("\"ACTIVE\"").unwrap();
        assert_eq!(status, CardStatus::Active);
    }
}
