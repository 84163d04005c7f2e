//! HTTP middleware stack for the portal.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Session layer (tower-sessions, in-memory store)
//! 4. Session expiry (wipe credentials on any 401 response)

pub mod auth;
pub mod expiry;
pub mod session;

pub use auth::{RequireAuth, clear_credentials, load_auth, save_auth};
pub use expiry::session_expiry_middleware;
pub use session::create_session_layer;
