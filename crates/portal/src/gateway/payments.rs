//! Payments service collaborator.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use meridian_core::{CurrencyCode, OrderId, PaymentId, PaymentKind, Premium};

use super::{GatewayClient, GatewayError};

/// Method-specific payment fields, flattened into the request body.
///
/// Card and bank details are mutually exclusive; the wire `paymentMethod`
/// discriminator is derived from the variant rather than carried inside it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged, rename_all_fields = "camelCase")]
pub enum PaymentDetails {
    Card {
        card_number: String,
        expiry_date: String,
        cvv: String,
        cardholder_name: String,
    },
    Bank {
        account_number: String,
        routing_number: String,
        account_name: String,
    },
}

impl PaymentDetails {
    /// The wire discriminator for this payment method.
    #[must_use]
    pub const fn kind(&self) -> PaymentKind {
        match self {
            Self::Card { .. } => PaymentKind::CreditCard,
            Self::Bank { .. } => PaymentKind::Ach,
        }
    }
}

/// Payload for charging an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub order_id: OrderId,
    pub amount: Premium,
    pub currency: CurrencyCode,
    pub payment_method: PaymentKind,
    #[serde(flatten)]
    pub details: PaymentDetails,
}

impl PaymentRequest {
    /// Build a request charging `amount` against `order_id` with `details`.
    #[must_use]
    pub fn new(order_id: OrderId, amount: Premium, details: PaymentDetails) -> Self {
        Self {
            order_id,
            amount,
            currency: CurrencyCode::USD,
            payment_method: details.kind(),
            details,
        }
    }
}

/// Result of a processed payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReceipt {
    pub id: PaymentId,
    pub order_id: OrderId,
    pub status: String,
    pub amount: Premium,
    pub currency: CurrencyCode,
    pub processed_at: DateTime<Utc>,
}

/// Payments service operations used by the checkout machine.
#[async_trait]
pub trait PaymentsApi: Send + Sync {
    /// Charge an order.
    async fn process_payment(
        &self,
        token: &str,
        request: &PaymentRequest,
    ) -> Result<PaymentReceipt, GatewayError>;
}

#[async_trait]
impl PaymentsApi for GatewayClient {
    #[instrument(skip(self, token, request))]
    async fn process_payment(
        &self,
        token: &str,
        request: &PaymentRequest,
    ) -> Result<PaymentReceipt, GatewayError> {
        self.post_json("/api/payments", request, Some(token)).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_card_request_wire_shape() {
        let request = PaymentRequest::new(
            OrderId::new("ord_1"),
            Premium::new(Decimal::from(350)),
            PaymentDetails::Card {
                card_number: "4242424242424242".to_string(),
                expiry_date: "12/28".to_string(),
                cvv: "123".to_string(),
                cardholder_name: "Jane Doe".to_string(),
            },
        );

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["paymentMethod"], "CREDIT_CARD");
        assert_eq!(value["currency"], "USD");
        assert_eq!(value["cardNumber"], "4242424242424242");
        assert_eq!(value["amount"], 350.0);
        // Method-specific fields are flattened, not nested
        assert!(value.get("details").is_none());
    }

    #[test]
    fn test_bank_request_uses_ach() {
        let request = PaymentRequest::new(
            OrderId::new("ord_1"),
            Premium::new(Decimal::from(100)),
            PaymentDetails::Bank {
                account_number: "000123456789".to_string(),
                routing_number: "110000000".to_string(),
                account_name: "Jane Doe".to_string(),
            },
        );

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["paymentMethod"], "ACH");
        assert_eq!(value["routingNumber"], "110000000");
    }
}
