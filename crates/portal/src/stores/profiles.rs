//! Profile store: the coverage profiles for the current session.

use meridian_core::ProfileId;

use crate::models::{Profile, ProfileChanges};

use super::StoreError;

/// Authoritative collection of coverage profiles plus the active-profile
/// reference used for cart attribution.
///
/// Profiles keep insertion/creation order, which is also display order. The
/// active reference is set without validation; resolution happens lazily in
/// [`resolve_active`] so a dangling reference degrades to the fallback chain
/// instead of an error.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    profiles: Vec<Profile>,
    active_id: Option<ProfileId>,
    max_profiles: usize,
}

impl ProfileStore {
    /// Create an empty store with the given profile cap.
    #[must_use]
    pub const fn new(max_profiles: usize) -> Self {
        Self {
            profiles: Vec::new(),
            active_id: None,
            max_profiles,
        }
    }

    /// Rebuild a store from snapshot state.
    #[must_use]
    pub const fn from_parts(
        profiles: Vec<Profile>,
        active_id: Option<ProfileId>,
        max_profiles: usize,
    ) -> Self {
        Self {
            profiles,
            active_id,
            max_profiles,
        }
    }

    /// Tear the store back down into snapshot state.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Profile>, Option<ProfileId>) {
        (self.profiles, self.active_id)
    }

    /// Replace the collection wholesale (used after a fetch-all).
    ///
    /// Ids are unique by construction of the source, so no validation runs.
    pub fn set_profiles(&mut self, profiles: Vec<Profile>) {
        self.profiles = profiles;
    }

    /// Append a profile in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::CapacityExceeded`] when the collection is
    /// already at the configured maximum; the collection is left untouched.
    pub fn add_profile(&mut self, profile: Profile) -> Result<(), StoreError> {
        if self.profiles.len() >= self.max_profiles {
            return Err(StoreError::CapacityExceeded {
                max: self.max_profiles,
            });
        }
        self.profiles.push(profile);
        Ok(())
    }

    /// Merge changes into the matching profile; no-op if the id is absent.
    pub fn update_profile(&mut self, id: &ProfileId, changes: &ProfileChanges) {
        if let Some(profile) = self.profiles.iter_mut().find(|p| &p.id == id) {
            changes.apply_to(profile);
        }
    }

    /// Remove a profile.
    ///
    /// Removing the active profile clears the active reference. Removing an
    /// absent id is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::PrimaryProfileProtected`] when the targeted
    /// profile is primary; the collection is left untouched.
    pub fn remove_profile(&mut self, id: &ProfileId) -> Result<(), StoreError> {
        let is_primary = self
            .profiles
            .iter()
            .any(|p| &p.id == id && p.is_primary);
        if is_primary {
            return Err(StoreError::PrimaryProfileProtected);
        }

        self.profiles.retain(|p| &p.id != id);
        if self.active_id.as_ref() == Some(id) {
            self.active_id = None;
        }
        Ok(())
    }

    /// Set (or clear) the active-profile reference without validating
    /// existence.
    pub fn set_active_profile(&mut self, id: Option<ProfileId>) {
        self.active_id = id;
    }

    /// Resolve the active profile through the fallback chain.
    #[must_use]
    pub fn active_profile(&self) -> Option<&Profile> {
        resolve_active(&self.profiles, self.active_id.as_ref())
    }

    /// The profile flagged primary, if any.
    #[must_use]
    pub fn primary_profile(&self) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.is_primary)
    }

    /// Whether another profile fits under the cap.
    #[must_use]
    pub fn can_add_profile(&self) -> bool {
        self.profiles.len() < self.max_profiles
    }

    /// Look up a profile by id.
    #[must_use]
    pub fn get(&self, id: &ProfileId) -> Option<&Profile> {
        self.profiles.iter().find(|p| &p.id == id)
    }

    /// All profiles in insertion order.
    #[must_use]
    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    /// The raw active-profile reference (unresolved).
    #[must_use]
    pub const fn active_id(&self) -> Option<&ProfileId> {
        self.active_id.as_ref()
    }

    /// Number of profiles held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Whether the store holds no profiles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

/// Resolve the profile the UI should treat as active.
///
/// Resolution order: the explicit reference if it resolves to an existing
/// profile, else the profile flagged primary, else the first profile by
/// insertion order, else none. As soon as any profile exists this returns
/// one, so callers always have a sensible default.
#[must_use]
pub fn resolve_active<'a>(
    profiles: &'a [Profile],
    active_id: Option<&ProfileId>,
) -> Option<&'a Profile> {
    active_id
        .and_then(|id| profiles.iter().find(|p| &p.id == id))
        .or_else(|| profiles.iter().find(|p| p.is_primary))
        .or_else(|| profiles.first())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;
    use chrono::Utc;
    use meridian_core::{Gender, Relationship, UserId};

    /// Build a test profile; the first one created is usually the primary.
    pub(crate) fn make_profile(id: &str, name: &str, is_primary: bool) -> Profile {
        let now = Utc::now();
        Profile {
            id: ProfileId::new(id),
            user_id: UserId::new("usr_1"),
            first_name: name.to_string(),
            last_name: "Tester".to_string(),
            date_of_birth: "1990-04-01".parse().unwrap(),
            gender: Gender::Other,
            relationship: if is_primary {
                Relationship::AccountHolder
            } else {
                Relationship::Child
            },
            ssn: None,
            email: None,
            phone: None,
            address: None,
            is_primary,
            created_at: now,
            updated_at: now,
        }
    }

    fn store_with(profiles: Vec<Profile>) -> ProfileStore {
        ProfileStore::from_parts(profiles, None, 500)
    }

    #[test]
    fn test_add_profile_appends_in_order() {
        let mut store = ProfileStore::new(500);
        store.add_profile(make_profile("p1", "Ada", true)).unwrap();
        store.add_profile(make_profile("p2", "Ben", false)).unwrap();

        let names: Vec<&str> = store
            .profiles()
            .iter()
            .map(|p| p.first_name.as_str())
            .collect();
        assert_eq!(names, vec!["Ada", "Ben"]);
    }

    #[test]
    fn test_set_profiles_replaces_wholesale() {
        let mut store = store_with(vec![make_profile("p1", "Ada", true)]);
        store.set_profiles(vec![
            make_profile("p9", "Zoe", false),
            make_profile("p10", "Yan", true),
        ]);

        assert_eq!(store.len(), 2);
        assert!(store.get(&ProfileId::new("p1")).is_none());
        assert_eq!(
            store.primary_profile().map(|p| p.id.clone()),
            Some(ProfileId::new("p10"))
        );
    }

    #[test]
    fn test_add_profile_at_capacity_fails_without_mutation() {
        let mut store = ProfileStore::new(2);
        store.add_profile(make_profile("p1", "Ada", true)).unwrap();
        store.add_profile(make_profile("p2", "Ben", false)).unwrap();

        assert!(!store.can_add_profile());
        let err = store
            .add_profile(make_profile("p3", "Cam", false))
            .unwrap_err();
        assert_eq!(err, StoreError::CapacityExceeded { max: 2 });
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_capacity_scenario_at_500() {
        let mut store = ProfileStore::new(500);
        for i in 0..500 {
            store
                .add_profile(make_profile(&format!("p{i}"), "Member", i == 0))
                .unwrap();
        }

        assert!(!store.can_add_profile());
        assert!(matches!(
            store.add_profile(make_profile("p500", "Overflow", false)),
            Err(StoreError::CapacityExceeded { max: 500 })
        ));
        assert_eq!(store.len(), 500);
    }

    #[test]
    fn test_remove_primary_profile_is_protected() {
        let mut store = store_with(vec![
            make_profile("p1", "Ada", true),
            make_profile("p2", "Ben", false),
        ]);

        let err = store.remove_profile(&ProfileId::new("p1")).unwrap_err();
        assert_eq!(err, StoreError::PrimaryProfileProtected);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_remove_active_profile_clears_reference() {
        let mut store = store_with(vec![
            make_profile("p1", "Ada", true),
            make_profile("p2", "Ben", false),
        ]);
        store.set_active_profile(Some(ProfileId::new("p2")));

        store.remove_profile(&ProfileId::new("p2")).unwrap();
        assert!(store.active_id().is_none());
        // Resolution falls back to the primary
        assert_eq!(store.active_profile().unwrap().id, ProfileId::new("p1"));
    }

    #[test]
    fn test_remove_absent_profile_is_noop() {
        let mut store = store_with(vec![make_profile("p1", "Ada", true)]);
        store.remove_profile(&ProfileId::new("ghost")).unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_update_profile_merges_fields() {
        let mut store = store_with(vec![make_profile("p1", "Ada", true)]);
        store.update_profile(
            &ProfileId::new("p1"),
            &ProfileChanges {
                phone: Some("555-0100".to_string()),
                ..ProfileChanges::default()
            },
        );

        let profile = store.get(&ProfileId::new("p1")).unwrap();
        assert_eq!(profile.phone.as_deref(), Some("555-0100"));
        assert_eq!(profile.first_name, "Ada");
    }

    #[test]
    fn test_update_absent_profile_is_noop() {
        let mut store = store_with(vec![make_profile("p1", "Ada", true)]);
        store.update_profile(
            &ProfileId::new("ghost"),
            &ProfileChanges {
                phone: Some("555-0100".to_string()),
                ..ProfileChanges::default()
            },
        );
        assert!(store.get(&ProfileId::new("p1")).unwrap().phone.is_none());
    }

    // The four branches of the resolution chain, in order.

    #[test]
    fn test_resolve_active_prefers_explicit_reference() {
        let profiles = vec![
            make_profile("p1", "Ada", true),
            make_profile("p2", "Ben", false),
        ];
        let active = ProfileId::new("p2");
        let resolved = resolve_active(&profiles, Some(&active)).unwrap();
        assert_eq!(resolved.id, ProfileId::new("p2"));
    }

    #[test]
    fn test_resolve_active_falls_back_to_primary_on_dangling_reference() {
        let profiles = vec![
            make_profile("p1", "Ada", false),
            make_profile("p2", "Ben", true),
        ];
        let dangling = ProfileId::new("ghost");
        let resolved = resolve_active(&profiles, Some(&dangling)).unwrap();
        assert_eq!(resolved.id, ProfileId::new("p2"));
    }

    #[test]
    fn test_resolve_active_falls_back_to_first_without_primary() {
        let profiles = vec![
            make_profile("p1", "Ada", false),
            make_profile("p2", "Ben", false),
        ];
        let resolved = resolve_active(&profiles, None).unwrap();
        assert_eq!(resolved.id, ProfileId::new("p1"));
    }

    #[test]
    fn test_resolve_active_none_when_empty() {
        assert!(resolve_active(&[], None).is_none());
    }
}
