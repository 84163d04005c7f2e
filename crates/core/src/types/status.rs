//! Domain enums shared across Meridian services.
//!
//! Wire names are SCREAMING_SNAKE_CASE to match the JSON the microservices
//! exchange (`"metalTier": "GOLD"`, `"relationship": "SPOUSE"`, ...).

use serde::{Deserialize, Serialize};

/// Coverage-cost classification of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MetalTier {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl std::fmt::Display for MetalTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bronze => write!(f, "Bronze"),
            Self::Silver => write!(f, "Silver"),
            Self::Gold => write!(f, "Gold"),
            Self::Platinum => write!(f, "Platinum"),
        }
    }
}

/// Relationship of a covered person to the account holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Relationship {
    /// The account holder themselves.
    #[serde(rename = "SELF")]
    AccountHolder,
    Spouse,
    Child,
    Parent,
    Sibling,
    Other,
}

impl std::fmt::Display for Relationship {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AccountHolder => write!(f, "Self"),
            Self::Spouse => write!(f, "Spouse"),
            Self::Child => write!(f, "Child"),
            Self::Parent => write!(f, "Parent"),
            Self::Sibling => write!(f, "Sibling"),
            Self::Other => write!(f, "Other"),
        }
    }
}

/// Gender as recorded on a coverage profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// Order lifecycle status as reported by the orders service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Draft,
    PendingPayment,
    Confirmed,
    Processing,
    Completed,
    Cancelled,
}

/// Kind of enrollment an order represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    #[default]
    NewEnrollment,
    Renewal,
    PlanChange,
}

/// Billing cadence for an enrollment order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BillingFrequency {
    #[default]
    Monthly,
    Quarterly,
    Annual,
}

/// Payment instrument kind accepted by the payments service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentKind {
    CreditCard,
    DebitCard,
    Ach,
    BankTransfer,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names_are_screaming_snake_case() {
        assert_eq!(serde_json::to_string(&MetalTier::Gold).unwrap(), "\"GOLD\"");
        assert_eq!(
            serde_json::to_string(&OrderStatus::PendingPayment).unwrap(),
            "\"PENDING_PAYMENT\""
        );
        assert_eq!(
            serde_json::to_string(&OrderType::NewEnrollment).unwrap(),
            "\"NEW_ENROLLMENT\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentKind::CreditCard).unwrap(),
            "\"CREDIT_CARD\""
        );
        assert_eq!(serde_json::to_string(&PaymentKind::Ach).unwrap(), "\"ACH\"");
    }

    #[test]
    fn test_account_holder_serializes_as_self() {
        assert_eq!(
            serde_json::to_string(&Relationship::AccountHolder).unwrap(),
            "\"SELF\""
        );
        let parsed: Relationship = serde_json::from_str("\"SELF\"").unwrap();
        assert_eq!(parsed, Relationship::AccountHolder);
    }
}
