//! Plan catalog route handlers: thin passthroughs to the plans service,
//! cached by the gateway client.

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use meridian_core::PlanId;

use crate::error::Result;
use crate::gateway::PlanSearchRequest;
use crate::middleware::RequireAuth;
use crate::models::{PagedResponse, Plan};
use crate::state::AppState;

/// Paged catalog search.
#[instrument(skip(state, auth, request))]
pub async fn search(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Json(request): Json<PlanSearchRequest>,
) -> Result<Json<PagedResponse<Plan>>> {
    let page = state.gateway().search_plans(&auth.token, &request).await?;
    Ok(Json(page))
}

/// Side-by-side plan comparison.
#[instrument(skip(state, auth))]
pub async fn compare(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Json(ids): Json<Vec<PlanId>>,
) -> Result<Json<Vec<Plan>>> {
    let plans = state.gateway().compare_plans(&auth.token, &ids).await?;
    Ok(Json(plans))
}

/// Single plan lookup.
#[instrument(skip(state, auth))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Path(id): Path<PlanId>,
) -> Result<Json<Plan>> {
    let plan = state.gateway().get_plan(&auth.token, &id).await?;
    Ok(Json(plan))
}
