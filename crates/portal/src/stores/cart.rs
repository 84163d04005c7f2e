//! Cart store: pending plan selections and their money totals.

use meridian_core::{CartItemId, PlanId, Premium, ProfileId};

use crate::models::{CartItem, Plan, Profile};

/// The shopping cart: at most one item per `(plan, profile)` pair, in
/// insertion order.
///
/// This is the single source of truth consulted at checkout. None of the
/// operations error - duplicates and absent ids are silent no-ops so a UI
/// that double-fires an action cannot corrupt the cart.
#[derive(Debug, Clone, Default)]
pub struct CartStore {
    items: Vec<CartItem>,
}

impl CartStore {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Rebuild a cart from snapshot items.
    #[must_use]
    pub const fn from_items(items: Vec<CartItem>) -> Self {
        Self { items }
    }

    /// Tear the cart back down into snapshot items.
    #[must_use]
    pub fn into_items(self) -> Vec<CartItem> {
        self.items
    }

    /// Add a plan selection for a profile.
    ///
    /// A duplicate `(plan, profile)` pair is a no-op; the item id is the
    /// deterministic composite of both ids, so identity is idempotent.
    pub fn add_item(&mut self, plan: &Plan, profile: &Profile) {
        if self.has_item(&plan.id, &profile.id) {
            return;
        }
        self.items.push(CartItem::for_selection(plan, profile));
    }

    /// Remove an item by exact id; no-op if absent.
    pub fn remove_item(&mut self, id: &CartItemId) {
        self.items.retain(|item| &item.id != id);
    }

    /// Apply an in-place edit to the matching item; no-op if absent.
    pub fn update_item(&mut self, id: &CartItemId, update: impl FnOnce(&mut CartItem)) {
        if let Some(item) = self.items.iter_mut().find(|item| &item.id == id) {
            update(item);
        }
    }

    /// Empty the cart (successful checkout, or explicit user action).
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Whether a `(plan, profile)` pair is already in the cart.
    #[must_use]
    pub fn has_item(&self, plan_id: &PlanId, profile_id: &ProfileId) -> bool {
        self.items
            .iter()
            .any(|item| &item.plan_id == plan_id && &item.profile_id == profile_id)
    }

    /// The items for one profile, in cart insertion order.
    #[must_use]
    pub fn items_for_profile(&self, profile_id: &ProfileId) -> Vec<&CartItem> {
        self.items
            .iter()
            .filter(|item| &item.profile_id == profile_id)
            .collect()
    }

    /// Sum of monthly premiums across all items.
    #[must_use]
    pub fn monthly_total(&self) -> Premium {
        self.items.iter().map(|item| item.monthly_premium).sum()
    }

    /// Sum of each item's annualized premium.
    ///
    /// Summed per item rather than `monthly_total() * 12` so the total stays
    /// correct if any item's annual computation ever diverges from a flat
    /// twelve-month rule.
    #[must_use]
    pub fn annual_total(&self) -> Premium {
        self.items
            .iter()
            .map(|item| item.monthly_premium.annualized())
            .sum()
    }

    /// Number of items in the cart.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// All items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;
    use crate::stores::profiles::tests::make_profile;
    use meridian_core::MetalTier;
    use rust_decimal::Decimal;

    /// Build a test plan with the given monthly premium in whole dollars.
    pub(crate) fn make_plan(id: &str, name: &str, monthly: i64) -> Plan {
        Plan {
            id: PlanId::new(id),
            plan_code: format!("{}-CODE", id.to_uppercase()),
            plan_name: name.to_string(),
            plan_type: "HMO".to_string(),
            metal_tier: MetalTier::Silver,
            issuer_name: "Acme Mutual".to_string(),
            state: "CO".to_string(),
            monthly_premium: Premium::new(Decimal::from(monthly)),
            annual_deductible: Decimal::from(2500),
            out_of_pocket_max: Decimal::from(8000),
            copay_primary_care: Decimal::from(25),
            copay_specialist: Decimal::from(50),
            copay_emergency: Decimal::from(250),
            coinsurance: Decimal::from(20),
            hsa_eligible: false,
            hra_eligible: false,
            network_type: "STATEWIDE".to_string(),
            description: None,
            status: "ACTIVE".to_string(),
            year: 2026,
        }
    }

    #[test]
    fn test_add_item_denormalizes_display_fields() {
        let mut cart = CartStore::new();
        cart.add_item(&make_plan("plan_a", "Silver Select", 200), &make_profile("p1", "Ada", true));

        let item = cart.items().first().unwrap();
        assert_eq!(item.id, CartItemId::new("plan_a-p1"));
        assert_eq!(item.plan_name, "Silver Select");
        assert_eq!(item.profile_name, "Ada Tester");
    }

    #[test]
    fn test_duplicate_pair_is_noop() {
        let plan = make_plan("plan_a", "Silver Select", 200);
        let profile = make_profile("p1", "Ada", true);

        let mut cart = CartStore::new();
        cart.add_item(&plan, &profile);
        cart.add_item(&plan, &profile);

        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_same_plan_for_two_profiles_is_two_items() {
        let plan = make_plan("plan_a", "Silver Select", 200);

        let mut cart = CartStore::new();
        cart.add_item(&plan, &make_profile("p1", "Ada", true));
        cart.add_item(&plan, &make_profile("p2", "Ben", false));

        assert_eq!(cart.item_count(), 2);
        assert!(cart.has_item(&PlanId::new("plan_a"), &ProfileId::new("p2")));
    }

    #[test]
    fn test_pair_uniqueness_over_arbitrary_add_sequences() {
        let plans = [
            make_plan("plan_a", "A", 100),
            make_plan("plan_b", "B", 150),
        ];
        let profiles = [
            make_profile("p1", "Ada", true),
            make_profile("p2", "Ben", false),
        ];

        let mut cart = CartStore::new();
        // Interleave and repeat every combination a few times
        for _ in 0..3 {
            for plan in &plans {
                for profile in &profiles {
                    cart.add_item(plan, profile);
                }
            }
        }

        assert_eq!(cart.item_count(), 4);
        let mut pairs: Vec<(String, String)> = cart
            .items()
            .iter()
            .map(|i| (i.plan_id.to_string(), i.profile_id.to_string()))
            .collect();
        pairs.sort();
        pairs.dedup();
        assert_eq!(pairs.len(), 4);
    }

    #[test]
    fn test_remove_item_by_id_and_absent_noop() {
        let mut cart = CartStore::new();
        cart.add_item(&make_plan("plan_a", "A", 100), &make_profile("p1", "Ada", true));

        cart.remove_item(&CartItemId::new("ghost"));
        assert_eq!(cart.item_count(), 1);

        cart.remove_item(&CartItemId::new("plan_a-p1"));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_totals_match_spec_scenario() {
        // cart = [{plan A, $200, profile P1}, {plan B, $150, profile P2}]
        let mut cart = CartStore::new();
        cart.add_item(&make_plan("plan_a", "A", 200), &make_profile("p1", "Ada", true));
        cart.add_item(&make_plan("plan_b", "B", 150), &make_profile("p2", "Ben", false));

        assert_eq!(cart.monthly_total(), Premium::new(Decimal::from(350)));
        assert_eq!(cart.annual_total(), Premium::new(Decimal::from(4200)));
    }

    #[test]
    fn test_totals_on_empty_cart_are_zero() {
        let cart = CartStore::new();
        assert_eq!(cart.monthly_total(), Premium::zero());
        assert_eq!(cart.annual_total(), Premium::zero());
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn test_items_for_profile_preserves_insertion_order() {
        let ada = make_profile("p1", "Ada", true);
        let mut cart = CartStore::new();
        cart.add_item(&make_plan("plan_b", "B", 150), &ada);
        cart.add_item(&make_plan("plan_a", "A", 100), &make_profile("p2", "Ben", false));
        cart.add_item(&make_plan("plan_c", "C", 120), &ada);

        let ada_items = cart.items_for_profile(&ProfileId::new("p1"));
        let plan_ids: Vec<&str> = ada_items.iter().map(|i| i.plan_id.as_str()).collect();
        assert_eq!(plan_ids, vec!["plan_b", "plan_c"]);
    }

    #[test]
    fn test_update_item_edits_in_place() {
        let mut cart = CartStore::new();
        cart.add_item(&make_plan("plan_a", "A", 100), &make_profile("p1", "Ada", true));

        let id = CartItemId::new("plan_a-p1");
        cart.update_item(&id, |item| {
            item.monthly_premium = Premium::new(Decimal::from(110));
        });

        assert_eq!(cart.monthly_total(), Premium::new(Decimal::from(110)));
    }

    #[test]
    fn test_clear_empties_cart() {
        let mut cart = CartStore::new();
        cart.add_item(&make_plan("plan_a", "A", 100), &make_profile("p1", "Ada", true));
        cart.clear();
        assert!(cart.is_empty());
    }
}
