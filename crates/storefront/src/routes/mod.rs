//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                         - Home page (featured, new arrivals, categories)
//!
//! # Products
//! GET  /products                 - Product listing (?category=&q=)
//! GET  /products/{id}            - Product detail with option selectors
//!
//! # Cart
//! GET  /cart                     - Cart page
//! POST /cart/add                 - Add product (rate limited)
//! POST /cart/update              - Set quantity, 0 removes (rate limited)
//! POST /cart/remove              - Remove line (rate limited)
//! GET  /cart/count               - Cart count badge (fragment)
//!
//! # Checkout
//! GET  /checkout                 - Billing form and order summary
//! POST /checkout                 - Place cash-on-delivery order (rate limited)
//! GET  /checkout/complete/{id}   - Confirmation page
//! ```

pub mod cart;
pub mod checkout;
pub mod home;
pub mod layout;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::{cart_rate_limiter, checkout_rate_limiter};
use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    let mutations = Router::new()
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .layer(cart_rate_limiter());

    Router::new()
        .route("/", get(cart::show))
        .route("/count", get(cart::count))
        .merge(mutations)
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(checkout::show)
                .merge(post(checkout::place_order).layer(checkout_rate_limiter())),
        )
        .route("/complete/{id}", get(checkout::complete))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .nest("/checkout", checkout_routes())
}
