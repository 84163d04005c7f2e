//! Plans service collaborator: catalog search, lookup, comparison.
//!
//! Catalog reads are cached for five minutes; the catalog changes on an
//! annual cycle, so staleness is not a concern while chattiness is.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use meridian_core::{MetalTier, PlanId};

use crate::models::{PagedResponse, Plan};

use super::{GatewayClient, GatewayError};

/// Plan search parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSearchRequest {
    pub page: u32,
    pub size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metal_tier: Option<MetalTier>,
}

/// Cached catalog responses.
#[derive(Clone)]
pub(super) enum PlanCacheValue {
    Page(PagedResponse<Plan>),
    List(Vec<Plan>),
    One(Plan),
}

impl GatewayClient {
    /// Search the plan catalog.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the plans service rejects the query or the
    /// request fails.
    #[instrument(skip(self, token, request))]
    pub async fn search_plans(
        &self,
        token: &str,
        request: &PlanSearchRequest,
    ) -> Result<PagedResponse<Plan>, GatewayError> {
        let cache_key = format!(
            "search:{}",
            serde_json::to_string(request).map_err(|e| GatewayError::Parse(e.to_string()))?
        );

        if let Some(PlanCacheValue::Page(page)) = self.inner.plan_cache.get(&cache_key).await {
            tracing::debug!(cache_key, "plan search cache hit");
            return Ok(page);
        }

        let page: PagedResponse<Plan> = self
            .post_json("/api/plans/search", request, Some(token))
            .await?;

        self.inner
            .plan_cache
            .insert(cache_key, PlanCacheValue::Page(page.clone()))
            .await;

        Ok(page)
    }

    /// Fetch a single plan by id.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::NotFound` if the plan does not exist.
    #[instrument(skip(self, token))]
    pub async fn get_plan(&self, token: &str, id: &PlanId) -> Result<Plan, GatewayError> {
        let cache_key = format!("plan:{id}");

        if let Some(PlanCacheValue::One(plan)) = self.inner.plan_cache.get(&cache_key).await {
            tracing::debug!(cache_key, "plan lookup cache hit");
            return Ok(plan);
        }

        let plan: Plan = self.get_json(&format!("/api/plans/{id}"), token).await?;

        self.inner
            .plan_cache
            .insert(cache_key, PlanCacheValue::One(plan.clone()))
            .await;

        Ok(plan)
    }

    /// Fetch several plans at once for side-by-side comparison.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the plans service rejects the request or it
    /// fails.
    #[instrument(skip(self, token))]
    pub async fn compare_plans(
        &self,
        token: &str,
        ids: &[PlanId],
    ) -> Result<Vec<Plan>, GatewayError> {
        let mut sorted: Vec<&PlanId> = ids.iter().collect();
        sorted.sort();
        let cache_key = format!(
            "bulk:{}",
            sorted
                .iter()
                .map(|id| id.as_str())
                .collect::<Vec<_>>()
                .join(",")
        );

        if let Some(PlanCacheValue::List(plans)) = self.inner.plan_cache.get(&cache_key).await {
            tracing::debug!(cache_key, "plan comparison cache hit");
            return Ok(plans);
        }

        let plans: Vec<Plan> = self.post_json("/api/plans/bulk", ids, Some(token)).await?;

        self.inner
            .plan_cache
            .insert(cache_key, PlanCacheValue::List(plans.clone()))
            .await;

        Ok(plans)
    }
}
