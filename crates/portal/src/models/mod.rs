//! Domain records exchanged with the gateway and held in sessions.

pub mod cart;
pub mod order;
pub mod plan;
pub mod profile;
pub mod session;
pub mod user;

pub use cart::CartItem;
pub use order::{Order, OrderItem};
pub use plan::{PagedResponse, Plan};
pub use profile::{Address, NewProfile, Profile, ProfileChanges};
pub use session::{AuthSnapshot, CartSnapshot, session_keys};
pub use user::User;
