//! Auth-expiry interception.
//!
//! Any 401 leaving the portal means the bearer token no longer
//! authenticates (or the session never had one), so the persisted
//! credentials are wiped here, globally, independent of which operation
//! triggered it. The client sees the 401 and routes to login.

use axum::{extract::Request, http::StatusCode, middleware::Next, response::Response};
use tower_sessions::Session;

use super::auth::clear_credentials;

/// Wipe session credentials whenever a response is 401.
pub async fn session_expiry_middleware(
    session: Session,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;

    if response.status() == StatusCode::UNAUTHORIZED
        && let Err(e) = clear_credentials(&session).await
    {
        tracing::warn!(error = %e, "failed to clear credentials after 401");
    }

    response
}
