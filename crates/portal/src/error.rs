//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-class errors to
//! Sentry before responding to the client. All route handlers return
//! `Result<T, AppError>`. Responses are JSON `{"message": ...}` bodies so
//! the browser app can toast the collaborator's message, with a generic
//! fallback when none is available.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::checkout::CheckoutError;
use crate::gateway::GatewayError;
use crate::services::session::AuthError;
use crate::stores::StoreError;

/// Application-level error type for the portal.
#[derive(Debug, Error)]
pub enum AppError {
    /// Session establishment or restoration failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// A backend collaborator call failed.
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// A store invariant was violated.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// A checkout transition was rejected.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<tower_sessions::session::Error> for AppError {
    fn from(e: tower_sessions::session::Error) -> Self {
        Self::Internal(format!("session error: {e}"))
    }
}

/// Whether a gateway failure is server-class (worth a Sentry event) rather
/// than a client or collaborator-validation problem.
const fn gateway_is_server_error(err: &GatewayError) -> bool {
    match err {
        GatewayError::Http(_) | GatewayError::Parse(_) => true,
        GatewayError::Api { status, .. } => *status >= 500,
        GatewayError::Unauthorized | GatewayError::NotFound(_) => false,
    }
}

impl AppError {
    /// Whether this error should be captured to Sentry.
    fn is_server_error(&self) -> bool {
        match self {
            Self::Internal(_) => true,
            Self::Gateway(err)
            | Self::Auth(AuthError::Gateway(err))
            | Self::Checkout(CheckoutError::Gateway(err)) => gateway_is_server_error(err),
            _ => false,
        }
    }

    /// HTTP status for a gateway failure: relay the collaborator's status
    /// where it is meaningful, 502 for transport and parse failures.
    fn gateway_status(err: &GatewayError) -> StatusCode {
        match err {
            GatewayError::Http(_) | GatewayError::Parse(_) => StatusCode::BAD_GATEWAY,
            GatewayError::Unauthorized => StatusCode::UNAUTHORIZED,
            GatewayError::NotFound(_) => StatusCode::NOT_FOUND,
            GatewayError::Api { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Auth(err) => match err {
                AuthError::InvalidEmail(_) => StatusCode::BAD_REQUEST,
                AuthError::InvalidCredentials | AuthError::SessionExpired => {
                    StatusCode::UNAUTHORIZED
                }
                AuthError::AccountExists => StatusCode::CONFLICT,
                AuthError::Gateway(inner) => Self::gateway_status(inner),
            },
            Self::Gateway(err) => Self::gateway_status(err),
            Self::Store(err) => match err {
                StoreError::CapacityExceeded { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                StoreError::PrimaryProfileProtected => StatusCode::CONFLICT,
            },
            Self::Checkout(err) => match err {
                CheckoutError::EmptyCart => StatusCode::BAD_REQUEST,
                CheckoutError::NoActiveOrder | CheckoutError::InvalidStep { .. } => {
                    StatusCode::CONFLICT
                }
                CheckoutError::Gateway(inner) => Self::gateway_status(inner),
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// User-facing message; never exposes internal detail.
    fn message(&self) -> String {
        match self {
            Self::Auth(err) => match err {
                AuthError::Gateway(inner) => inner.user_message(),
                other => other.to_string(),
            },
            Self::Gateway(err) => err.user_message(),
            Self::Checkout(err) => match err {
                CheckoutError::Gateway(inner) => inner.user_message(),
                other => other.to_string(),
            },
            Self::Store(err) => err.to_string(),
            Self::Internal(_) => "Internal server error".to_string(),
            Self::NotFound(what) => format!("{what} was not found"),
            Self::Unauthorized(msg) | Self::BadRequest(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = self.status();
        let body = Json(json!({ "message": self.message() }));
        (status, body).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("plan-123".to_string());
        assert_eq!(err.to_string(), "Not found: plan-123");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Unauthorized("test".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_store_invariants_map_to_client_errors() {
        assert_eq!(
            get_status(AppError::Store(StoreError::CapacityExceeded { max: 500 })),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            get_status(AppError::Store(StoreError::PrimaryProfileProtected)),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_dead_token_maps_to_unauthorized() {
        assert_eq!(
            get_status(AppError::Auth(AuthError::SessionExpired)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Gateway(GatewayError::Unauthorized)),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_collaborator_status_is_relayed() {
        let err = AppError::Gateway(GatewayError::Api {
            status: 422,
            message: "bad plan".to_string(),
        });
        assert_eq!(get_status(err), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_checkout_empty_cart_is_bad_request() {
        assert_eq!(
            get_status(AppError::Checkout(CheckoutError::EmptyCart)),
            StatusCode::BAD_REQUEST
        );
    }
}
