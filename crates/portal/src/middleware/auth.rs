//! Authentication middleware and extractors.
//!
//! Provides the extractor that requires an authenticated session in route
//! handlers, plus the helpers that read and write the session's auth
//! snapshot.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tower_sessions::Session;

use crate::models::{AuthSnapshot, session_keys};

/// Extractor that requires an authenticated session.
///
/// The portal serves a browser app over JSON, so an unauthenticated request
/// gets a 401 and the client performs the login redirect.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(auth): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", auth.user.email)
/// }
/// ```
pub struct RequireAuth(pub AuthSnapshot);

/// Error returned when authentication is required but the session holds no
/// snapshot.
pub struct AuthRejection;

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Authentication required" })),
        )
            .into_response()
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts.extensions.get::<Session>().ok_or(AuthRejection)?;

        let snapshot: AuthSnapshot = session
            .get(session_keys::AUTH_STATE)
            .await
            .ok()
            .flatten()
            .ok_or(AuthRejection)?;

        Ok(Self(snapshot))
    }
}

/// Read the auth snapshot from the session.
pub async fn load_auth(session: &Session) -> Option<AuthSnapshot> {
    session
        .get::<AuthSnapshot>(session_keys::AUTH_STATE)
        .await
        .ok()
        .flatten()
}

/// Write the auth snapshot to the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn save_auth(
    session: &Session,
    snapshot: &AuthSnapshot,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::AUTH_STATE, snapshot).await
}

/// Clear the persisted credentials and any in-progress checkout.
///
/// Called on logout and whenever a collaborator reports the token dead.
/// The cart blob is independent and survives unless logout clears it.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_credentials(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<AuthSnapshot>(session_keys::AUTH_STATE)
        .await?;
    session
        .remove::<serde_json::Value>(session_keys::CHECKOUT_STATE)
        .await?;
    Ok(())
}
