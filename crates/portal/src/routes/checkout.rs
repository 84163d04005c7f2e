//! Checkout route handlers: review -> payment -> confirmation.
//!
//! The machine state lives in the session next to (but independent of) the
//! cart blob. Each handler rehydrates both, runs one transition, and saves
//! back only what changed. Failed transitions save nothing, so the session
//! always reflects the last successful state.

use axum::{Json, extract::State};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use meridian_core::{OrderId, Premium, ProfileId};

use crate::checkout::{
    CheckoutState, CheckoutStep, first_of_next_month, forms, group_by_profile,
};
use crate::error::Result;
use crate::gateway::{PaymentDetails, PaymentReceipt};
use crate::middleware::RequireAuth;
use crate::models::{CartItem, session_keys};
use crate::state::AppState;

use super::cart::{load_cart, save_cart};

// =============================================================================
// Session Helpers
// =============================================================================

/// Rehydrate the checkout state (fresh review-step state when absent).
async fn load_checkout(session: &Session) -> CheckoutState {
    session
        .get::<CheckoutState>(session_keys::CHECKOUT_STATE)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Write the checkout state back to the session.
async fn save_checkout(
    session: &Session,
    checkout: &CheckoutState,
) -> std::result::Result<(), tower_sessions::session::Error> {
    session
        .insert(session_keys::CHECKOUT_STATE, checkout)
        .await
}

// =============================================================================
// View types
// =============================================================================

/// Items for one profile, in first-seen group order.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutGroupView {
    pub profile_id: ProfileId,
    pub profile_name: String,
    pub items: Vec<CartItem>,
}

/// The whole checkout screen state.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutView {
    pub step: CheckoutStep,
    pub order_id: Option<OrderId>,
    pub groups: Vec<CheckoutGroupView>,
    pub item_count: usize,
    pub monthly_total: Premium,
    pub annual_total: Premium,
}

fn groups_view(items: &[CartItem]) -> Vec<CheckoutGroupView> {
    group_by_profile(items)
        .into_iter()
        .map(|(profile_id, group)| CheckoutGroupView {
            profile_id,
            profile_name: group
                .first()
                .map(|item| item.profile_name.clone())
                .unwrap_or_default(),
            items: group.into_iter().cloned().collect(),
        })
        .collect()
}

/// Step-change response for order creation and back transitions.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepView {
    pub step: CheckoutStep,
    pub order_id: Option<OrderId>,
}

// =============================================================================
// Payment form
// =============================================================================

/// Payment form data, card or bank, selected by the `method` tag.
#[derive(Debug, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum PaymentForm {
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

impl PaymentForm {
    /// Normalize the raw form input into canonical wire details.
    fn into_details(self) -> PaymentDetails {
        match self {
            Self::Card {
                card_number,
                expiry_date,
                cvv,
                cardholder_name,
            } => PaymentDetails::Card {
                card_number: forms::card_number_digits(&card_number),
                expiry_date: forms::format_expiry(&expiry_date),
                cvv: forms::normalize_cvv(&cvv),
                cardholder_name,
            },
            Self::Bank {
                account_number,
                routing_number,
                account_name,
            } => PaymentDetails::Bank {
                account_number: forms::normalize_account_number(&account_number),
                routing_number: forms::normalize_routing_number(&routing_number),
                account_name,
            },
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Current checkout state: step, grouped items, totals.
#[instrument(skip(session, _auth))]
pub async fn show(session: Session, RequireAuth(_auth): RequireAuth) -> Json<CheckoutView> {
    let cart = load_cart(&session).await;
    let checkout = load_checkout(&session).await;

    Json(CheckoutView {
        step: checkout.step(),
        order_id: checkout.order_id().cloned(),
        groups: groups_view(cart.items()),
        item_count: cart.item_count(),
        monthly_total: cart.monthly_total(),
        annual_total: cart.annual_total(),
    })
}

/// Submit the cart as an enrollment order (review -> payment).
///
/// Coverage becomes effective on the first day of the next month. A failed
/// collaborator call leaves the step at review with the cart intact.
#[instrument(skip(state, session, auth))]
pub async fn create_order(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(auth): RequireAuth,
) -> Result<Json<StepView>> {
    let cart = load_cart(&session).await;
    let mut checkout = load_checkout(&session).await;
    if checkout.is_complete() {
        // The previous checkout confirmed; this is a new attempt
        checkout = CheckoutState::new();
    }

    let effective_date = first_of_next_month(Utc::now().date_naive());
    let order_id = checkout
        .create_order(state.gateway(), &auth.token, &cart, effective_date)
        .await?;

    save_checkout(&session, &checkout).await?;

    tracing::info!(order_id = %order_id, "checkout advanced to payment");
    Ok(Json(StepView {
        step: checkout.step(),
        order_id: Some(order_id),
    }))
}

/// Charge the captured order (payment -> confirmation).
///
/// On success the cart is cleared with the step change in one session
/// write; on failure nothing is saved and the order stays pending payment
/// for retry.
#[instrument(skip(state, session, auth, form))]
pub async fn process_payment(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(auth): RequireAuth,
    Json(form): Json<PaymentForm>,
) -> Result<Json<PaymentReceipt>> {
    let mut cart = load_cart(&session).await;
    let mut checkout = load_checkout(&session).await;

    let receipt = checkout
        .process_payment(state.gateway(), &auth.token, &mut cart, form.into_details())
        .await?;

    save_cart(&session, cart).await?;
    save_checkout(&session, &checkout).await?;

    tracing::info!(order_id = %receipt.order_id, "checkout confirmed");
    Ok(Json(receipt))
}

/// Return from payment to review.
#[instrument(skip(session, _auth))]
pub async fn back(session: Session, RequireAuth(_auth): RequireAuth) -> Result<Json<StepView>> {
    let mut checkout = load_checkout(&session).await;
    checkout.back();
    save_checkout(&session, &checkout).await?;

    Ok(Json(StepView {
        step: checkout.step(),
        order_id: checkout.order_id().cloned(),
    }))
}
