//! HTTP route handlers for the portal.
//!
//! All handlers speak JSON; page rendering belongs to the browser app.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check (in main)
//!
//! # Auth
//! POST /auth/login             - Authenticate, hydrate the session
//! POST /auth/signup            - Register, hydrate the session
//! POST /auth/logout            - Invalidate the token, wipe the session
//! GET  /auth/me                - Bootstrap/refresh the session from its token
//!
//! # Profiles (require auth)
//! GET    /profiles             - List coverage profiles
//! POST   /profiles             - Create a profile (capacity-guarded)
//! PUT    /profiles/{id}        - Partial update
//! DELETE /profiles/{id}        - Remove (primary is protected)
//! POST   /profiles/{id}/activate - Select the active profile
//! GET    /profiles/active      - Resolve the active profile
//!
//! # Plans (require auth)
//! POST /plans/search           - Paged catalog search
//! POST /plans/compare          - Side-by-side comparison
//! GET  /plans/{id}             - Single plan
//!
//! # Cart (require auth)
//! GET    /cart                 - Cart with totals
//! GET    /cart/count           - Item count badge
//! POST   /cart/items           - Add a plan for a profile (idempotent)
//! DELETE /cart/items/{id}      - Remove an item
//! DELETE /cart                 - Clear the cart
//!
//! # Checkout (require auth)
//! GET  /checkout               - Current step, grouped items, totals
//! POST /checkout/order         - review -> payment (creates the order)
//! POST /checkout/payment       - payment -> confirmation (charges the order)
//! POST /checkout/back          - payment -> review
//!
//! # Orders (require auth)
//! GET /orders                  - Order history
//! GET /orders/{id}             - Single order
//! ```

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod orders;
pub mod plans;
pub mod profiles;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/signup", post(auth::signup))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

/// Create the profile routes router.
pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(profiles::list).post(profiles::create))
        .route(
            "/{id}",
            axum::routing::put(profiles::update).delete(profiles::remove),
        )
        .route("/{id}/activate", post(profiles::activate))
        .route("/active", get(profiles::active))
}

/// Create the plan routes router.
pub fn plan_routes() -> Router<AppState> {
    Router::new()
        .route("/search", post(plans::search))
        .route("/compare", post(plans::compare))
        .route("/{id}", get(plans::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route("/count", get(cart::count))
        .route("/items", post(cart::add))
        .route("/items/{id}", delete(cart::remove))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(checkout::show))
        .route("/order", post(checkout::create_order))
        .route("/payment", post(checkout::process_payment))
        .route("/back", post(checkout::back))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::list))
        .route("/{id}", get(orders::show))
}

/// Create all routes for the portal.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/profiles", profile_routes())
        .nest("/plans", plan_routes())
        .nest("/cart", cart_routes())
        .nest("/checkout", checkout_routes())
        .nest("/orders", order_routes())
}
