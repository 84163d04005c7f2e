//! Session-scoped state stores.
//!
//! Each store is a plain value constructed from its session snapshot at the
//! start of a request, mutated only through its own methods, and written
//! back at an explicit save boundary. No ambient singletons: handlers pass
//! stores around like any other value, and tests build them directly.
//!
//! Invariant violations (profile cap, primary-profile deletion) are errors
//! because they indicate a caller bug - the UI should never offer those
//! actions. Cart operations never error: add/remove are idempotent no-ops on
//! duplicates and absences, matching a UI that may double-fire them.

pub mod cart;
pub mod profiles;

pub use cart::CartStore;
pub use profiles::{ProfileStore, resolve_active};

use thiserror::Error;

/// Errors raised by store invariants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The profile collection is already at the configured maximum.
    #[error("maximum of {max} profiles allowed")]
    CapacityExceeded { max: usize },

    /// The targeted profile is the primary profile, which is never removable.
    #[error("cannot delete primary profile")]
    PrimaryProfileProtected,
}
