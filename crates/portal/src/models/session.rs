//! Session-stored state.
//!
//! The browser apps this portal replaced kept two independent namespaced
//! blobs in local storage; here the same two blobs live in the server-side
//! session, rehydrated wholesale on read and written back at an explicit
//! save boundary after each mutating operation.

use serde::{Deserialize, Serialize};

use meridian_core::ProfileId;

use super::cart::CartItem;
use super::profile::Profile;
use super::user::User;

/// Authenticated-session snapshot: user identity plus the profile collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSnapshot {
    /// The authenticated account holder.
    pub user: User,
    /// Bearer token issued by the auth service, replayed to every
    /// collaborator call.
    pub token: String,
    /// Coverage profiles in insertion/creation order.
    pub profiles: Vec<Profile>,
    /// Explicitly selected active profile, if any.
    pub active_profile_id: Option<ProfileId>,
}

/// Cart snapshot: the pending plan selections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    pub items: Vec<CartItem>,
}

/// Session keys.
///
/// The auth and cart blobs are independent on purpose: clearing the cart
/// never touches credentials and vice versa (logout clears both explicitly).
pub mod session_keys {
    /// Key for the authenticated-session snapshot.
    pub const AUTH_STATE: &str = "auth-storage";

    /// Key for the cart snapshot.
    pub const CART_STATE: &str = "cart-storage";

    /// Key for the in-progress checkout state machine.
    pub const CHECKOUT_STATE: &str = "checkout-state";
}
