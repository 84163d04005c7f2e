//! Orders service collaborator.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use meridian_core::{BillingFrequency, OrderId, OrderType, PlanId, Premium, ProfileId};

use crate::models::Order;

use super::{GatewayClient, GatewayError};

/// Header carrying the per-checkout-attempt idempotency key.
///
/// The orders service deduplicates creations that share a key, which makes
/// the checkout's back-then-retry path safe.
const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

/// Payload for creating an enrollment order from cart contents.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub order_type: OrderType,
    pub effective_date: NaiveDate,
    pub billing_frequency: BillingFrequency,
    pub items: Vec<OrderRequestItem>,
    pub total_monthly_premium: Premium,
    pub total_annual_premium: Premium,
}

/// One plan-for-profile line in an order request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequestItem {
    pub plan_id: PlanId,
    pub profile_id: ProfileId,
    pub monthly_premium: Premium,
}

/// Orders service operations used by the checkout machine.
#[async_trait]
pub trait OrdersApi: Send + Sync {
    /// Create an order; `idempotency_key` dedupes retried submissions.
    async fn create_order(
        &self,
        token: &str,
        request: &OrderRequest,
        idempotency_key: &str,
    ) -> Result<Order, GatewayError>;
}

#[async_trait]
impl OrdersApi for GatewayClient {
    #[instrument(skip(self, token, request))]
    async fn create_order(
        &self,
        token: &str,
        request: &OrderRequest,
        idempotency_key: &str,
    ) -> Result<Order, GatewayError> {
        let builder = self
            .inner
            .client
            .post(self.endpoint("/api/orders"))
            .bearer_auth(token)
            .header(IDEMPOTENCY_KEY_HEADER, idempotency_key)
            .json(request);
        Self::send_json(builder, "/api/orders").await
    }
}

impl GatewayClient {
    /// Fetch the account's order history.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the orders service is unreachable or rejects
    /// the token.
    #[instrument(skip(self, token))]
    pub async fn my_orders(&self, token: &str) -> Result<Vec<Order>, GatewayError> {
        self.get_json("/api/orders/my", token).await
    }

    /// Fetch one order by id.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::NotFound` if the order does not exist.
    #[instrument(skip(self, token))]
    pub async fn get_order(&self, token: &str, id: &OrderId) -> Result<Order, GatewayError> {
        self.get_json(&format!("/api/orders/{id}"), token).await
    }
}
