//! Session service error types.

use thiserror::Error;

use crate::gateway::GatewayError;

/// Errors that can occur establishing or restoring a session.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] meridian_core::EmailError),

    /// The auth service rejected the credentials.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The email is already registered.
    #[error("an account with this email already exists")]
    AccountExists,

    /// The persisted token no longer authenticates; the session must be
    /// cleared and the user sent back to login.
    #[error("session expired")]
    SessionExpired,

    /// A collaborator call failed for a non-auth reason.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}
