//! Auth service collaborator: login, registration, identity, logout.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use meridian_core::Email;

use crate::models::User;

use super::{GatewayClient, GatewayError};

/// Login payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest<'a> {
    email: &'a Email,
    password: &'a str,
}

/// Registration payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub password: String,
}

/// Token and identity returned by login/signup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

/// Auth service operations used by the session service.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Authenticate with email and password.
    async fn login(&self, email: &Email, password: &str) -> Result<AuthResponse, GatewayError>;

    /// Register a new account.
    async fn signup(&self, request: &SignupRequest) -> Result<AuthResponse, GatewayError>;

    /// Fetch the user the token belongs to.
    async fn current_user(&self, token: &str) -> Result<User, GatewayError>;

    /// Invalidate the token server-side.
    async fn logout(&self, token: &str) -> Result<(), GatewayError>;
}

#[async_trait]
impl AuthApi for GatewayClient {
    #[instrument(skip_all)]
    async fn login(&self, email: &Email, password: &str) -> Result<AuthResponse, GatewayError> {
        self.post_json("/api/auth/login", &LoginRequest { email, password }, None)
            .await
    }

    #[instrument(skip_all)]
    async fn signup(&self, request: &SignupRequest) -> Result<AuthResponse, GatewayError> {
        self.post_json("/api/auth/signup", request, None).await
    }

    #[instrument(skip(self, token))]
    async fn current_user(&self, token: &str) -> Result<User, GatewayError> {
        self.get_json("/api/auth/me", token).await
    }

    #[instrument(skip(self, token))]
    async fn logout(&self, token: &str) -> Result<(), GatewayError> {
        let builder = self
            .inner
            .client
            .post(self.endpoint("/api/auth/logout"))
            .bearer_auth(token);
        Self::send_unit(builder, "/api/auth/logout").await
    }
}
