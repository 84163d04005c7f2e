//! Auth route handlers: session establishment, bootstrap, and teardown.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use meridian_core::ProfileId;

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::gateway::SignupRequest;
use crate::middleware::{clear_credentials, load_auth, save_auth};
use crate::models::{AuthSnapshot, Profile, User, session_keys};
use crate::services::session::SessionService;
use crate::state::AppState;
use crate::stores::resolve_active;

/// Login form data.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Session state returned to the browser app.
///
/// The bearer token stays server-side; the client only ever sees identity
/// and profile data.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub user: User,
    pub profiles: Vec<Profile>,
    pub active_profile_id: Option<ProfileId>,
    pub active_profile: Option<Profile>,
}

impl SessionView {
    /// Project a snapshot into the client-facing view, resolving the active
    /// profile through the fallback chain.
    #[must_use]
    pub fn from_snapshot(snapshot: &AuthSnapshot) -> Self {
        let active_profile =
            resolve_active(&snapshot.profiles, snapshot.active_profile_id.as_ref()).cloned();
        Self {
            user: snapshot.user.clone(),
            profiles: snapshot.profiles.clone(),
            active_profile_id: snapshot.active_profile_id.clone(),
            active_profile,
        }
    }
}

/// Authenticate and hydrate the session.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<LoginForm>,
) -> Result<Json<SessionView>> {
    let service = SessionService::new(state.gateway());
    let snapshot = service.login(&form.email, &form.password).await?;

    save_auth(&session, &snapshot).await?;
    set_sentry_user(&snapshot.user.id, Some(snapshot.user.email.as_str()));

    tracing::info!(user_id = %snapshot.user.id, "user logged in");
    Ok(Json(SessionView::from_snapshot(&snapshot)))
}

/// Register a new account and hydrate the session.
#[instrument(skip(state, session, request))]
pub async fn signup(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<SessionView>)> {
    let service = SessionService::new(state.gateway());
    let snapshot = service.signup(&request).await?;

    save_auth(&session, &snapshot).await?;
    set_sentry_user(&snapshot.user.id, Some(snapshot.user.email.as_str()));

    tracing::info!(user_id = %snapshot.user.id, "account created");
    Ok((StatusCode::CREATED, Json(SessionView::from_snapshot(&snapshot))))
}

/// Invalidate the token and wipe all session state.
#[instrument(skip(state, session))]
pub async fn logout(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse> {
    if let Some(snapshot) = load_auth(&session).await {
        let service = SessionService::new(state.gateway());
        service.logout(&snapshot.token).await;
    }

    clear_credentials(&session).await?;
    session
        .remove::<serde_json::Value>(session_keys::CART_STATE)
        .await
        .map_err(AppError::from)?;
    clear_sentry_user();

    Ok(StatusCode::NO_CONTENT)
}

/// Bootstrap the session from its persisted token.
///
/// When a token exists, the current-user record and the profile list are
/// re-fetched concurrently and the snapshot refreshed. Any fetch failure
/// invalidates the session: the persisted auth state is wiped and the
/// client goes back to login. The active-profile selection survives the
/// refresh when it still resolves.
#[instrument(skip(state, session))]
pub async fn me(State(state): State<AppState>, session: Session) -> Result<Json<SessionView>> {
    let Some(previous) = load_auth(&session).await else {
        return Err(AppError::Unauthorized("Authentication required".to_string()));
    };

    let service = SessionService::new(state.gateway());
    let mut snapshot = match service.bootstrap(&previous.token).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            // Any fetch failure invalidates the session: discard both
            // results and wipe the persisted auth state
            clear_credentials(&session).await?;
            return Err(e.into());
        }
    };

    // Keep the explicit selection if the profile still exists
    if let Some(active_id) = previous.active_profile_id
        && snapshot.profiles.iter().any(|p| p.id == active_id)
    {
        snapshot.active_profile_id = Some(active_id);
    }

    save_auth(&session, &snapshot).await?;
    set_sentry_user(&snapshot.user.id, Some(snapshot.user.email.as_str()));

    Ok(Json(SessionView::from_snapshot(&snapshot)))
}
