//! Cart route handlers.
//!
//! The cart lives in the session as its own namespaced blob, independent of
//! the auth snapshot. Handlers rehydrate the [`CartStore`], mutate through
//! its operations (all idempotent), and save back at the end.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use meridian_core::{CartItemId, PlanId, Premium, ProfileId};

use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::{CartItem, CartSnapshot, session_keys};
use crate::state::AppState;
use crate::stores::CartStore;

/// Cart display data returned to the client.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartItem>,
    pub item_count: usize,
    pub monthly_total: Premium,
    pub annual_total: Premium,
}

impl CartView {
    /// Project a store into the client-facing view.
    #[must_use]
    pub fn from_store(cart: &CartStore) -> Self {
        Self {
            items: cart.items().to_vec(),
            item_count: cart.item_count(),
            monthly_total: cart.monthly_total(),
            annual_total: cart.annual_total(),
        }
    }
}

/// Cart count badge data.
#[derive(Debug, Serialize)]
pub struct CartCountView {
    pub count: usize,
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Rehydrate the cart from the session (empty when absent).
pub async fn load_cart(session: &Session) -> CartStore {
    let snapshot = session
        .get::<CartSnapshot>(session_keys::CART_STATE)
        .await
        .ok()
        .flatten()
        .unwrap_or_default();
    CartStore::from_items(snapshot.items)
}

/// Write the cart back to the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn save_cart(
    session: &Session,
    cart: CartStore,
) -> std::result::Result<(), tower_sessions::session::Error> {
    let snapshot = CartSnapshot {
        items: cart.into_items(),
    };
    session.insert(session_keys::CART_STATE, &snapshot).await
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartForm {
    pub plan_id: PlanId,
    pub profile_id: ProfileId,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the cart with totals.
#[instrument(skip_all)]
pub async fn show(session: Session, RequireAuth(_auth): RequireAuth) -> Json<CartView> {
    let cart = load_cart(&session).await;
    Json(CartView::from_store(&cart))
}

/// Cart count badge.
#[instrument(skip_all)]
pub async fn count(session: Session, RequireAuth(_auth): RequireAuth) -> Json<CartCountView> {
    let cart = load_cart(&session).await;
    Json(CartCountView {
        count: cart.item_count(),
    })
}

/// Add a plan selection for one of the account's profiles.
///
/// The profile must exist in the session; the plan is fetched from the
/// catalog (cached). Re-adding an existing `(plan, profile)` pair is a
/// no-op and still returns the cart.
#[instrument(skip(state, session, auth, form))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(auth): RequireAuth,
    Json(form): Json<AddToCartForm>,
) -> Result<Json<CartView>> {
    let Some(profile) = auth.profiles.iter().find(|p| p.id == form.profile_id) else {
        return Err(AppError::NotFound(format!("Profile {}", form.profile_id)));
    };

    let plan = state.gateway().get_plan(&auth.token, &form.plan_id).await?;

    let mut cart = load_cart(&session).await;
    cart.add_item(&plan, profile);
    let view = CartView::from_store(&cart);
    save_cart(&session, cart).await?;

    Ok(Json(view))
}

/// Remove an item by id; absent ids are a no-op.
#[instrument(skip(session, _auth))]
pub async fn remove(
    session: Session,
    RequireAuth(_auth): RequireAuth,
    Path(id): Path<CartItemId>,
) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await;
    cart.remove_item(&id);
    let view = CartView::from_store(&cart);
    save_cart(&session, cart).await?;

    Ok(Json(view))
}

/// Empty the cart.
#[instrument(skip(session, _auth))]
pub async fn clear(
    session: Session,
    RequireAuth(_auth): RequireAuth,
) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await;
    cart.clear();
    let view = CartView::from_store(&cart);
    save_cart(&session, cart).await?;

    Ok(Json(view))
}
