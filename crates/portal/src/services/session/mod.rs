//! Session service.
//!
//! Establishes and restores authenticated sessions against the auth and
//! profiles collaborators. The service returns a fully-hydrated
//! [`AuthSnapshot`] or an error - callers never observe a partially
//! bootstrapped session.

mod error;

pub use error::AuthError;

use tracing::instrument;

use meridian_core::Email;

use crate::gateway::{AuthApi, GatewayError, ProfilesApi, SignupRequest};
use crate::models::AuthSnapshot;

/// Session establishment and restoration over the auth/profiles
/// collaborators.
///
/// Generic over the collaborator seams so tests drive it with doubles.
pub struct SessionService<'a, G>
where
    G: AuthApi + ProfilesApi,
{
    gateway: &'a G,
}

impl<'a, G> SessionService<'a, G>
where
    G: AuthApi + ProfilesApi,
{
    /// Create a new session service.
    #[must_use]
    pub const fn new(gateway: &'a G) -> Self {
        Self { gateway }
    }

    /// Authenticate with email and password and hydrate the session.
    ///
    /// The profile list is fetched with the fresh token before anything is
    /// returned, so a snapshot always carries its profiles.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::InvalidCredentials` if the auth service rejects
    /// the login. Any other collaborator failure is returned as
    /// `AuthError::Gateway` and nothing is persisted.
    #[instrument(skip_all)]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSnapshot, AuthError> {
        let email = Email::parse(email)?;

        let auth = self
            .gateway
            .login(&email, password)
            .await
            .map_err(|e| match e {
                GatewayError::Unauthorized => AuthError::InvalidCredentials,
                other => AuthError::Gateway(other),
            })?;

        let profiles = self.gateway.list_profiles(&auth.token).await?;

        Ok(AuthSnapshot {
            user: auth.user,
            token: auth.token,
            profiles,
            active_profile_id: None,
        })
    }

    /// Register a new account and hydrate the session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::AccountExists` if the email is already
    /// registered; other collaborator failures as `AuthError::Gateway`.
    #[instrument(skip(self, request))]
    pub async fn signup(&self, request: &SignupRequest) -> Result<AuthSnapshot, AuthError> {
        let auth = self.gateway.signup(request).await.map_err(|e| match e {
            GatewayError::Api { status: 409, .. } => AuthError::AccountExists,
            other => AuthError::Gateway(other),
        })?;

        let profiles = self.gateway.list_profiles(&auth.token).await?;

        Ok(AuthSnapshot {
            user: auth.user,
            token: auth.token,
            profiles,
            active_profile_id: None,
        })
    }

    /// Restore a session from a persisted token.
    ///
    /// The current-user record and the profile list are fetched
    /// concurrently; both must succeed before the snapshot is returned. On
    /// the first failure the other fetch is abandoned and its result
    /// discarded - no partial bootstrap is observable. A 401 from either
    /// collaborator means the token is dead and the caller must clear the
    /// persisted session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::SessionExpired` when the token no longer
    /// authenticates; other collaborator failures as `AuthError::Gateway`.
    #[instrument(skip(self, token))]
    pub async fn bootstrap(&self, token: &str) -> Result<AuthSnapshot, AuthError> {
        let (user, profiles) = tokio::try_join!(
            self.gateway.current_user(token),
            self.gateway.list_profiles(token),
        )
        .map_err(|e| match e {
            GatewayError::Unauthorized => AuthError::SessionExpired,
            other => AuthError::Gateway(other),
        })?;

        Ok(AuthSnapshot {
            user,
            token: token.to_string(),
            profiles,
            active_profile_id: None,
        })
    }

    /// Notify the auth service that the token is being abandoned.
    ///
    /// Best effort: the local session is cleared regardless, so a failed
    /// collaborator call is only logged.
    #[instrument(skip(self, token))]
    pub async fn logout(&self, token: &str) {
        if let Err(e) = self.gateway.logout(token).await {
            tracing::warn!(error = %e, "logout call to auth service failed");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::Utc;

    use meridian_core::UserId;
    use crate::gateway::AuthResponse;
    use crate::models::{Profile, User};
    use crate::stores::profiles::tests::make_profile;

    fn make_user() -> User {
        User {
            id: UserId::new("usr_1"),
            email: Email::parse("ada@example.com").unwrap(),
            first_name: "Ada".to_string(),
            last_name: "Tester".to_string(),
            phone: None,
            created_at: Utc::now(),
        }
    }

    /// Gateway double with per-call failure switches.
    #[derive(Default)]
    struct FakeGateway {
        reject_login: bool,
        reject_token: bool,
        fail_profiles: bool,
        profile_calls: AtomicUsize,
    }

    #[async_trait]
    impl AuthApi for FakeGateway {
        async fn login(
            &self,
            _email: &Email,
            _password: &str,
        ) -> Result<AuthResponse, GatewayError> {
            if self.reject_login {
                return Err(GatewayError::Unauthorized);
            }
            Ok(AuthResponse {
                token: "tok_fresh".to_string(),
                user: make_user(),
            })
        }

        async fn signup(&self, _request: &SignupRequest) -> Result<AuthResponse, GatewayError> {
            if self.reject_login {
                return Err(GatewayError::Api {
                    status: 409,
                    message: "email taken".to_string(),
                });
            }
            Ok(AuthResponse {
                token: "tok_fresh".to_string(),
                user: make_user(),
            })
        }

        async fn current_user(&self, _token: &str) -> Result<User, GatewayError> {
            if self.reject_token {
                return Err(GatewayError::Unauthorized);
            }
            Ok(make_user())
        }

        async fn logout(&self, _token: &str) -> Result<(), GatewayError> {
            Ok(())
        }
    }

    #[async_trait]
    impl ProfilesApi for FakeGateway {
        async fn list_profiles(&self, _token: &str) -> Result<Vec<Profile>, GatewayError> {
            self.profile_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_profiles {
                return Err(GatewayError::Api {
                    status: 503,
                    message: "profiles service down".to_string(),
                });
            }
            Ok(vec![
                make_profile("p1", "Ada", true),
                make_profile("p2", "Ben", false),
            ])
        }
    }

    #[tokio::test]
    async fn test_login_hydrates_snapshot() {
        let gateway = FakeGateway::default();
        let service = SessionService::new(&gateway);

        let snapshot = service.login("ada@example.com", "hunter22").await.unwrap();

        assert_eq!(snapshot.token, "tok_fresh");
        assert_eq!(snapshot.user.id, UserId::new("usr_1"));
        assert_eq!(snapshot.profiles.len(), 2);
        assert!(snapshot.active_profile_id.is_none());
    }

    #[tokio::test]
    async fn test_login_maps_unauthorized_to_invalid_credentials() {
        let gateway = FakeGateway {
            reject_login: true,
            ..FakeGateway::default()
        };
        let service = SessionService::new(&gateway);

        let err = service.login("ada@example.com", "wrong").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_login_rejects_malformed_email_without_collaborator_call() {
        let gateway = FakeGateway::default();
        let service = SessionService::new(&gateway);

        let err = service.login("not-an-email", "pw").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidEmail(_)));
        assert_eq!(gateway.profile_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_signup_maps_conflict_to_account_exists() {
        let gateway = FakeGateway {
            reject_login: true,
            ..FakeGateway::default()
        };
        let service = SessionService::new(&gateway);

        let request = SignupRequest {
            first_name: "Ada".to_string(),
            last_name: "Tester".to_string(),
            email: Email::parse("ada@example.com").unwrap(),
            phone: None,
            password: "hunter22".to_string(),
        };
        let err = service.signup(&request).await.unwrap_err();
        assert!(matches!(err, AuthError::AccountExists));
    }

    #[tokio::test]
    async fn test_bootstrap_hydrates_user_and_profiles() {
        let gateway = FakeGateway::default();
        let service = SessionService::new(&gateway);

        let snapshot = service.bootstrap("tok_persisted").await.unwrap();

        assert_eq!(snapshot.token, "tok_persisted");
        assert_eq!(snapshot.profiles.len(), 2);
    }

    #[tokio::test]
    async fn test_bootstrap_dead_token_is_session_expired() {
        let gateway = FakeGateway {
            reject_token: true,
            ..FakeGateway::default()
        };
        let service = SessionService::new(&gateway);

        let err = service.bootstrap("tok_stale").await.unwrap_err();
        assert!(matches!(err, AuthError::SessionExpired));
    }

    #[tokio::test]
    async fn test_bootstrap_discards_user_when_profiles_fail() {
        // First-failure-wins: either fetch failing must fail the whole
        // bootstrap, even when the other succeeded.
        let gateway = FakeGateway {
            fail_profiles: true,
            ..FakeGateway::default()
        };
        let service = SessionService::new(&gateway);

        let err = service.bootstrap("tok_persisted").await.unwrap_err();
        assert!(matches!(err, AuthError::Gateway(_)));
    }
}
