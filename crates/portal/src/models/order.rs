//! Enrollment order records from the orders service.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use meridian_core::{MetalTier, OrderId, OrderStatus, PlanId, Premium, ProfileId};

/// An enrollment order created from cart contents.
///
/// The orders service owns the full lifecycle; the portal only reads orders
/// back for history views and holds the id during checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub order_number: String,
    pub status: OrderStatus,
    pub items: Vec<OrderItem>,
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub tax_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    pub effective_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// One plan-for-profile line on an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: String,
    pub plan_id: PlanId,
    pub plan_code: String,
    pub plan_name: String,
    pub metal_tier: MetalTier,
    pub profile_id: ProfileId,
    pub profile_name: String,
    pub unit_price: Premium,
    pub total_price: Premium,
}
