//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types. All backend services
//! mint opaque string identifiers, so the wrappers hold a `String`.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>`, and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use meridian_core::define_id;
/// define_id!(UserId);
/// define_id!(OrderId);
///
/// let user_id = UserId::new("usr_01");
/// let order_id = OrderId::new("ord_01");
///
/// // These are different types, so this won't compile:
/// // let _: UserId = order_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from a string value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return its inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// Define standard entity IDs
define_id!(UserId);
define_id!(ProfileId);
define_id!(PlanId);
define_id!(CartItemId);
define_id!(OrderId);
define_id!(PaymentId);

impl CartItemId {
    /// Build the deterministic composite ID for a `(plan, profile)` pair.
    ///
    /// Cart items are identified by the plan/profile pair they represent, so
    /// the same pair always yields the same ID and duplicate detection and
    /// removal need no separate lookup table.
    #[must_use]
    pub fn for_pair(plan_id: &PlanId, profile_id: &ProfileId) -> Self {
        Self(format!("{}-{}", plan_id.as_str(), profile_id.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_as_str() {
        let id = ProfileId::new("prof_123");
        assert_eq!(id.as_str(), "prof_123");
        assert_eq!(format!("{id}"), "prof_123");
    }

    #[test]
    fn test_composite_cart_item_id_is_deterministic() {
        let plan = PlanId::new("plan_a");
        let profile = ProfileId::new("prof_1");
        assert_eq!(
            CartItemId::for_pair(&plan, &profile),
            CartItemId::new("plan_a-prof_1")
        );
        assert_eq!(
            CartItemId::for_pair(&plan, &profile),
            CartItemId::for_pair(&plan, &profile)
        );
    }

    #[test]
    fn test_serde_transparent() {
        let id = PlanId::new("plan_9");
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, "\"plan_9\"");
        let back: PlanId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, id);
    }
}
