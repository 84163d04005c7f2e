//! Profiles service collaborator.

use async_trait::async_trait;
use tracing::instrument;

use meridian_core::ProfileId;

use crate::models::{NewProfile, Profile, ProfileChanges};

use super::{GatewayClient, GatewayError};

/// Profiles service operations used by the session bootstrap.
#[async_trait]
pub trait ProfilesApi: Send + Sync {
    /// Fetch all coverage profiles for the account.
    async fn list_profiles(&self, token: &str) -> Result<Vec<Profile>, GatewayError>;
}

#[async_trait]
impl ProfilesApi for GatewayClient {
    #[instrument(skip(self, token))]
    async fn list_profiles(&self, token: &str) -> Result<Vec<Profile>, GatewayError> {
        self.get_json("/api/profiles", token).await
    }
}

impl GatewayClient {
    /// Create a profile.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the profiles service rejects the payload or
    /// the request fails.
    #[instrument(skip(self, token, profile))]
    pub async fn create_profile(
        &self,
        token: &str,
        profile: &NewProfile,
    ) -> Result<Profile, GatewayError> {
        self.post_json("/api/profiles", profile, Some(token)).await
    }

    /// Apply a partial update to a profile.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the profile does not exist or the request
    /// fails.
    #[instrument(skip(self, token, changes))]
    pub async fn update_profile(
        &self,
        token: &str,
        id: &ProfileId,
        changes: &ProfileChanges,
    ) -> Result<Profile, GatewayError> {
        self.put_json(&format!("/api/profiles/{id}"), changes, token)
            .await
    }

    /// Delete a profile.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the profile does not exist or the request
    /// fails.
    #[instrument(skip(self, token))]
    pub async fn delete_profile(&self, token: &str, id: &ProfileId) -> Result<(), GatewayError> {
        self.delete_unit(&format!("/api/profiles/{id}"), token).await
    }
}
