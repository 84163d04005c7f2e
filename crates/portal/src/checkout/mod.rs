//! Checkout flow: review, payment, confirmation.
//!
//! The machine owns only its own transient state (current step, the order id
//! captured after creation, and the idempotency key for the attempt). It
//! reads the cart and profile stores but mutates nothing outside itself
//! except clearing the cart after a successful payment.
//!
//! # Steps
//!
//! ```text
//! review --create_order--> payment --process_payment--> confirmation
//!   ^                         |
//!   +--------- back ----------+
//! ```
//!
//! A failed order creation leaves the step and the cart untouched; a failed
//! payment leaves the created order referenced but unpaid so it can be
//! retried. The idempotency key survives `back`, so backing out and
//! re-advancing re-submits the same key and cannot create a duplicate order.

pub mod forms;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use meridian_core::{BillingFrequency, OrderId, OrderType, ProfileId};

use crate::gateway::{
    GatewayError, OrderRequest, OrderRequestItem, OrdersApi, PaymentDetails, PaymentReceipt,
    PaymentRequest, PaymentsApi,
};
use crate::models::CartItem;
use crate::stores::CartStore;

/// Errors raised by checkout transitions.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The cart is empty; there is nothing to order.
    #[error("your cart is empty")]
    EmptyCart,

    /// Payment was requested before an order was created. Unreachable
    /// through the normal flow; guards against a hand-edited session.
    #[error("no active order for this checkout")]
    NoActiveOrder,

    /// The requested transition is not valid from the current step.
    #[error("checkout is in the {current} step")]
    InvalidStep { current: CheckoutStep },

    /// A collaborator call failed; the step did not advance.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// The three steps of the checkout flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStep {
    Review,
    Payment,
    Confirmation,
}

impl std::fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Review => write!(f, "review"),
            Self::Payment => write!(f, "payment"),
            Self::Confirmation => write!(f, "confirmation"),
        }
    }
}

/// Transient checkout session state.
///
/// Serialized into the session between requests and discarded on logout or
/// after confirmation; never persisted beyond that.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutState {
    step: CheckoutStep,
    order_id: Option<OrderId>,
    attempt_key: Uuid,
}

impl CheckoutState {
    /// Start a new checkout at the review step with a fresh attempt key.
    #[must_use]
    pub fn new() -> Self {
        Self {
            step: CheckoutStep::Review,
            order_id: None,
            attempt_key: Uuid::new_v4(),
        }
    }

    /// The current step.
    #[must_use]
    pub const fn step(&self) -> CheckoutStep {
        self.step
    }

    /// The order captured by a successful `create_order`, if any.
    #[must_use]
    pub const fn order_id(&self) -> Option<&OrderId> {
        self.order_id.as_ref()
    }

    /// Whether this checkout has reached the terminal step.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        matches!(self.step, CheckoutStep::Confirmation)
    }

    /// Submit the cart as an enrollment order and advance to payment.
    ///
    /// On success the returned order id is captured and the step advances.
    /// On failure the step does not advance and the cart is not touched.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::InvalidStep`] unless the checkout is at review
    /// - [`CheckoutError::EmptyCart`] when the cart holds no items
    /// - [`CheckoutError::Gateway`] when the orders service rejects the
    ///   request or is unreachable
    pub async fn create_order<O>(
        &mut self,
        orders: &O,
        token: &str,
        cart: &CartStore,
        effective_date: NaiveDate,
    ) -> Result<OrderId, CheckoutError>
    where
        O: OrdersApi + ?Sized,
    {
        if self.step != CheckoutStep::Review {
            return Err(CheckoutError::InvalidStep { current: self.step });
        }
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let request = OrderRequest {
            order_type: OrderType::NewEnrollment,
            effective_date,
            billing_frequency: BillingFrequency::Monthly,
            items: cart
                .items()
                .iter()
                .map(|item| OrderRequestItem {
                    plan_id: item.plan_id.clone(),
                    profile_id: item.profile_id.clone(),
                    monthly_premium: item.monthly_premium,
                })
                .collect(),
            total_monthly_premium: cart.monthly_total(),
            total_annual_premium: cart.annual_total(),
        };

        let order = orders
            .create_order(token, &request, &self.attempt_key.to_string())
            .await?;

        tracing::info!(order_id = %order.id, "order created, advancing to payment");
        self.order_id = Some(order.id.clone());
        self.step = CheckoutStep::Payment;
        Ok(order.id)
    }

    /// Charge the captured order and advance to confirmation.
    ///
    /// The amount is the cart's monthly total (the first month's payment).
    /// On success the cart is cleared and the step advances. On failure the
    /// cart and step are untouched and the order stays pending payment for
    /// retry.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::InvalidStep`] unless the checkout is at payment
    /// - [`CheckoutError::NoActiveOrder`] when no order id was captured
    /// - [`CheckoutError::Gateway`] when the payments service rejects the
    ///   request or is unreachable
    pub async fn process_payment<P>(
        &mut self,
        payments: &P,
        token: &str,
        cart: &mut CartStore,
        details: PaymentDetails,
    ) -> Result<PaymentReceipt, CheckoutError>
    where
        P: PaymentsApi + ?Sized,
    {
        if self.step != CheckoutStep::Payment {
            return Err(CheckoutError::InvalidStep { current: self.step });
        }
        let order_id = self.order_id.clone().ok_or(CheckoutError::NoActiveOrder)?;

        let request = PaymentRequest::new(order_id, cart.monthly_total(), details);
        let receipt = payments.process_payment(token, &request).await?;

        tracing::info!(order_id = %receipt.order_id, payment_id = %receipt.id, "payment accepted");
        cart.clear();
        self.step = CheckoutStep::Confirmation;
        // A finished attempt must never share its key with the next one
        self.attempt_key = Uuid::new_v4();
        Ok(receipt)
    }

    /// Return from payment to review.
    ///
    /// No side effects beyond the step change: the captured order id and the
    /// attempt key are preserved, so re-advancing re-submits the same
    /// idempotency key instead of minting a duplicate order.
    pub fn back(&mut self) {
        if self.step == CheckoutStep::Payment {
            self.step = CheckoutStep::Review;
        }
    }
}

impl Default for CheckoutState {
    fn default() -> Self {
        Self::new()
    }
}

/// Partition cart items by profile, preserving order.
///
/// Groups appear in first-seen order of each profile in the cart; items
/// within a group keep cart insertion order.
#[must_use]
pub fn group_by_profile(items: &[CartItem]) -> Vec<(ProfileId, Vec<&CartItem>)> {
    let mut groups: Vec<(ProfileId, Vec<&CartItem>)> = Vec::new();
    for item in items {
        match groups.iter_mut().find(|(id, _)| id == &item.profile_id) {
            Some((_, group)) => group.push(item),
            None => groups.push((item.profile_id.clone(), vec![item])),
        }
    }
    groups
}

/// First day of the month after `today` - the default enrollment effective
/// date.
#[must_use]
pub fn first_of_next_month(today: NaiveDate) -> NaiveDate {
    today
        .with_day(1)
        .and_then(|first| first.checked_add_months(Months::new(1)))
        .unwrap_or(today)
}
