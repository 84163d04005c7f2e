//! Order history route handlers: passthroughs to the orders service.

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use meridian_core::OrderId;

use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::Order;
use crate::state::AppState;

/// The account's order history.
#[instrument(skip(state, auth))]
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
) -> Result<Json<Vec<Order>>> {
    let orders = state.gateway().my_orders(&auth.token).await?;
    Ok(Json(orders))
}

/// A single order, e.g. the confirmation page's detail view.
#[instrument(skip(state, auth))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Path(id): Path<OrderId>,
) -> Result<Json<Order>> {
    let order = state.gateway().get_order(&auth.token, &id).await?;
    Ok(Json(order))
}
