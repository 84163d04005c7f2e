//! Cart items: pending plan-for-profile selections.

use serde::{Deserialize, Serialize};

use meridian_core::{CartItemId, MetalTier, PlanId, Premium, ProfileId, Relationship};

use super::plan::Plan;
use super::profile::Profile;

/// A request to enroll one profile in one plan, held in the cart until
/// checkout.
///
/// Identity is the `(plan, profile)` pair; the display fields are
/// denormalized from the plan and profile at add time so cart views never
/// need another catalog fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: CartItemId,
    pub plan_id: PlanId,
    pub plan_code: String,
    pub plan_name: String,
    pub metal_tier: MetalTier,
    pub monthly_premium: Premium,
    pub profile_id: ProfileId,
    pub profile_name: String,
    pub relationship: Relationship,
}

impl CartItem {
    /// Build the cart item for enrolling `profile` in `plan`.
    #[must_use]
    pub fn for_selection(plan: &Plan, profile: &Profile) -> Self {
        Self {
            id: CartItemId::for_pair(&plan.id, &profile.id),
            plan_id: plan.id.clone(),
            plan_code: plan.plan_code.clone(),
            plan_name: plan.plan_name.clone(),
            metal_tier: plan.metal_tier,
            monthly_premium: plan.monthly_premium,
            profile_id: profile.id.clone(),
            profile_name: profile.full_name(),
            relationship: profile.relationship,
        }
    }
}
