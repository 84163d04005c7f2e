//! Profile route handlers.
//!
//! Handlers rebuild the [`ProfileStore`] from the session snapshot, run the
//! store operation (which enforces the capacity and primary-profile
//! invariants), call the profiles service where a remote mutation is
//! involved, and save the snapshot back only when everything succeeded - a
//! failed collaborator call leaves the session exactly as it was.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tower_sessions::Session;
use tracing::instrument;

use meridian_core::ProfileId;

use crate::error::{AppError, Result};
use crate::middleware::{RequireAuth, save_auth};
use crate::models::{AuthSnapshot, NewProfile, Profile, ProfileChanges};
use crate::state::AppState;
use crate::stores::{ProfileStore, StoreError};

/// Build the store for this request from the session snapshot.
fn store_for(state: &AppState, snapshot: &AuthSnapshot) -> ProfileStore {
    ProfileStore::from_parts(
        snapshot.profiles.clone(),
        snapshot.active_profile_id.clone(),
        state.config().max_profiles,
    )
}

/// Write the store back into the snapshot and persist it.
async fn save_store(
    session: &Session,
    mut snapshot: AuthSnapshot,
    store: ProfileStore,
) -> Result<AuthSnapshot> {
    let (profiles, active_id) = store.into_parts();
    snapshot.profiles = profiles;
    snapshot.active_profile_id = active_id;
    save_auth(session, &snapshot).await?;
    Ok(snapshot)
}

/// List all coverage profiles.
#[instrument(skip_all)]
pub async fn list(RequireAuth(auth): RequireAuth) -> Json<Vec<Profile>> {
    Json(auth.profiles)
}

/// Create a profile via the profiles service and append it to the store.
///
/// Capacity is checked before the collaborator call so the services never
/// see a request the store would refuse to record.
#[instrument(skip(state, session, auth, new_profile))]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(auth): RequireAuth,
    Json(new_profile): Json<NewProfile>,
) -> Result<(StatusCode, Json<Profile>)> {
    let mut store = store_for(&state, &auth);
    if !store.can_add_profile() {
        return Err(StoreError::CapacityExceeded {
            max: state.config().max_profiles,
        }
        .into());
    }

    let created = state
        .gateway()
        .create_profile(&auth.token, &new_profile)
        .await?;

    store.add_profile(created.clone())?;
    save_store(&session, auth, store).await?;

    tracing::info!(profile_id = %created.id, "profile created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// Apply a partial update to a profile.
#[instrument(skip(state, session, auth, changes))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(auth): RequireAuth,
    Path(id): Path<ProfileId>,
    Json(changes): Json<ProfileChanges>,
) -> Result<Json<Profile>> {
    if changes.is_empty() {
        return Err(AppError::BadRequest("No changes provided".to_string()));
    }

    let updated = state
        .gateway()
        .update_profile(&auth.token, &id, &changes)
        .await?;

    let mut store = store_for(&state, &auth);
    store.update_profile(&id, &changes);
    save_store(&session, auth, store).await?;

    Ok(Json(updated))
}

/// Remove a profile.
///
/// The store guard runs first, so a protected primary profile is never
/// deleted remotely either. Removing the active profile clears the active
/// reference.
#[instrument(skip(state, session, auth))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(auth): RequireAuth,
    Path(id): Path<ProfileId>,
) -> Result<StatusCode> {
    let mut store = store_for(&state, &auth);

    if store.get(&id).is_none() {
        return Err(AppError::NotFound(format!("Profile {id}")));
    }

    // Fails on the primary profile before any remote call happens
    store.remove_profile(&id)?;

    state.gateway().delete_profile(&auth.token, &id).await?;
    save_store(&session, auth, store).await?;

    tracing::info!(profile_id = %id, "profile removed");
    Ok(StatusCode::NO_CONTENT)
}

/// Select the active profile used for cart attribution.
///
/// The reference is stored without validating existence; resolution happens
/// lazily on read.
#[instrument(skip(state, session, auth))]
pub async fn activate(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(auth): RequireAuth,
    Path(id): Path<ProfileId>,
) -> Result<Json<Option<Profile>>> {
    let mut store = store_for(&state, &auth);
    store.set_active_profile(Some(id));

    let resolved = store.active_profile().cloned();
    save_store(&session, auth, store).await?;

    Ok(Json(resolved))
}

/// Resolve the active profile through the fallback chain.
#[instrument(skip(state, auth))]
pub async fn active(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
) -> Json<Option<Profile>> {
    let store = store_for(&state, &auth);
    Json(store.active_profile().cloned())
}
