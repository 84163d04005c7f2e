//! REST clients for the backend microservices.
//!
//! # Architecture
//!
//! The portal never talks to a database: the plans, customers, orders, and
//! payments services are the source of truth, reached as JSON-over-HTTP
//! collaborators through a single API gateway base URL. One shared
//! [`GatewayClient`] carries the `reqwest` client and a short-lived `moka`
//! cache for catalog reads.
//!
//! The seams the core logic depends on (`AuthApi`, `ProfilesApi`,
//! `OrdersApi`, `PaymentsApi`) are traits implemented by `GatewayClient`,
//! so the checkout machine and the session service are tested against
//! hand-written doubles instead of a live gateway.
//!
//! # Example
//!
//! ```rust,ignore
//! use meridian_portal::gateway::{GatewayClient, ProfilesApi};
//!
//! let gateway = GatewayClient::new(&config.gateway);
//! let profiles = gateway.list_profiles(&token).await?;
//! ```

mod auth;
mod orders;
mod payments;
mod plans;
mod profiles;

pub use auth::{AuthApi, AuthResponse, SignupRequest};
pub use orders::{OrderRequest, OrderRequestItem, OrdersApi};
pub use payments::{PaymentDetails, PaymentReceipt, PaymentRequest, PaymentsApi};
pub use plans::PlanSearchRequest;
pub use profiles::ProfilesApi;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::{RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::GatewayConfig;

use plans::PlanCacheValue;

/// Errors that can occur when calling the backend services.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// HTTP transport failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A service answered with a non-success status.
    #[error("gateway error: {status} - {message}")]
    Api {
        status: u16,
        message: String,
    },

    /// The bearer token was missing, invalid, or expired (401).
    #[error("authentication required")]
    Unauthorized,

    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Failed to parse a response body.
    #[error("parse error: {0}")]
    Parse(String),
}

impl GatewayError {
    /// Message safe to surface to the user.
    ///
    /// Collaborator-provided messages pass through; transport and parse
    /// failures collapse to a generic fallback.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { message, .. } if !message.is_empty() => message.clone(),
            Self::Unauthorized => "Your session has expired. Please sign in again.".to_string(),
            Self::NotFound(what) => format!("{what} was not found"),
            _ => "Something went wrong. Please try again.".to_string(),
        }
    }
}

/// Error body shape the services use for 4xx/5xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

// =============================================================================
// GatewayClient
// =============================================================================

/// Cache TTL for catalog reads (plan search, comparison, lookup).
const PLAN_CACHE_TTL: Duration = Duration::from_secs(300);

/// Client for the backend microservices behind the API gateway.
///
/// Cheaply cloneable via `Arc`; plan catalog responses are cached for five
/// minutes.
#[derive(Clone)]
pub struct GatewayClient {
    inner: Arc<GatewayClientInner>,
}

struct GatewayClientInner {
    client: reqwest::Client,
    base_url: String,
    plan_cache: Cache<String, PlanCacheValue>,
}

impl GatewayClient {
    /// Create a new gateway client.
    #[must_use]
    pub fn new(config: &GatewayConfig) -> Self {
        let plan_cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(PLAN_CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(GatewayClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.clone(),
                plan_cache,
            }),
        }
    }

    /// Full URL for a gateway path (`/api/...`).
    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// Attach the bearer token when present.
    fn with_bearer(builder: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a request and decode a JSON response body.
    async fn send_json<T: DeserializeOwned>(
        builder: RequestBuilder,
        context: &str,
    ) -> Result<T, GatewayError> {
        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(Self::error_for(status, response, context).await);
        }

        // Read as text first for better diagnostics on malformed bodies
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                context,
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse gateway response"
            );
            GatewayError::Parse(e.to_string())
        })
    }

    /// Send a request and discard any response body.
    async fn send_unit(builder: RequestBuilder, context: &str) -> Result<(), GatewayError> {
        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(Self::error_for(status, response, context).await);
        }

        Ok(())
    }

    /// Map a non-success response to a `GatewayError`.
    async fn error_for(
        status: StatusCode,
        response: reqwest::Response,
        context: &str,
    ) -> GatewayError {
        if status == StatusCode::UNAUTHORIZED {
            return GatewayError::Unauthorized;
        }
        if status == StatusCode::NOT_FOUND {
            return GatewayError::NotFound(context.to_string());
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|e| e.message)
            .unwrap_or_else(|| body.chars().take(200).collect());

        tracing::warn!(
            context,
            status = status.as_u16(),
            message = %message,
            "Gateway returned non-success status"
        );

        GatewayError::Api {
            status: status.as_u16(),
            message,
        }
    }

    /// GET a JSON resource with the bearer token.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &str,
    ) -> Result<T, GatewayError> {
        let builder = self.inner.client.get(self.endpoint(path)).bearer_auth(token);
        Self::send_json(builder, path).await
    }

    /// POST a JSON body and decode a JSON response.
    async fn post_json<B, T>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> Result<T, GatewayError>
    where
        B: serde::Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = Self::with_bearer(self.inner.client.post(self.endpoint(path)), token)
            .json(body);
        Self::send_json(builder, path).await
    }

    /// PUT a JSON body and decode a JSON response.
    async fn put_json<B, T>(&self, path: &str, body: &B, token: &str) -> Result<T, GatewayError>
    where
        B: serde::Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self
            .inner
            .client
            .put(self.endpoint(path))
            .bearer_auth(token)
            .json(body);
        Self::send_json(builder, path).await
    }

    /// DELETE a resource, discarding the response body.
    async fn delete_unit(&self, path: &str, token: &str) -> Result<(), GatewayError> {
        let builder = self
            .inner
            .client
            .delete(self.endpoint(path))
            .bearer_auth(token);
        Self::send_unit(builder, path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_error_display() {
        let err = GatewayError::NotFound("/api/plans/plan-123".to_string());
        assert_eq!(err.to_string(), "not found: /api/plans/plan-123");

        let err = GatewayError::Api {
            status: 502,
            message: "upstream unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "gateway error: 502 - upstream unavailable");
    }

    #[test]
    fn test_user_message_passes_collaborator_message_through() {
        let err = GatewayError::Api {
            status: 422,
            message: "Plan is not available in your state".to_string(),
        };
        assert_eq!(err.user_message(), "Plan is not available in your state");
    }

    #[test]
    fn test_user_message_generic_fallback_when_empty() {
        let err = GatewayError::Api {
            status: 500,
            message: String::new(),
        };
        assert_eq!(
            err.user_message(),
            "Something went wrong. Please try again."
        );
    }

    #[test]
    fn test_endpoint_joins_base_and_path() {
        let client = GatewayClient::new(&GatewayConfig {
            base_url: "http://localhost:8080".to_string(),
        });
        assert_eq!(
            client.endpoint("/api/profiles"),
            "http://localhost:8080/api/profiles"
        );
    }
}
