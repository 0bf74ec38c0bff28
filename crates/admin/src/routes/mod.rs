//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                                       - Liveness check
//! GET  /health/ready                                 - Backend reachability check
//!
//! # Dashboard
//! GET  /                                             - Counts overview
//!
//! # Categories
//! GET  /categories                                   - Category tree with create form
//! POST /categories                                   - Create category
//! POST /categories/reorder                           - Drag-drop move (JSON or form)
//! GET  /categories/{id}/edit                         - Edit form
//! POST /categories/{id}/edit                         - Update category
//! GET  /categories/{id}/delete                       - Delete confirmation
//! POST /categories/{id}/delete                       - Delete (confirm=yes)
//! GET  /categories/{id}/subcategories/new            - Subcategory form
//! POST /categories/{id}/subcategories                - Add subcategory
//! GET  /categories/{id}/subcategories/{name}/edit    - Edit subcategory
//! POST /categories/{id}/subcategories/{name}/edit    - Update subcategory
//! GET  /categories/{id}/subcategories/{name}/delete  - Delete confirmation
//! POST /categories/{id}/subcategories/{name}/delete  - Delete (confirm=yes)
//!
//! # Orders
//! GET  /orders                                       - Filtered order table
//! GET  /orders/export                                - CSV of the filtered table
//! GET  /orders/{id}                                  - Order detail
//! POST /orders/{id}/status                           - Change status
//! GET  /orders/{id}/delete                           - Delete confirmation
//! POST /orders/{id}/delete                           - Delete (confirm=yes)
//!
//! # Profile
//! GET  /profile                                      - Operator profile (?edit=true)
//! POST /profile                                      - Update profile
//! ```

pub mod categories;
pub mod confirm;
pub mod dashboard;
pub mod orders;
pub mod profile;
pub mod subcategories;

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};
use tower_sessions::Session;

use crate::error::Result;
use crate::models::Notice;
use crate::state::AppState;

pub use dashboard::OperatorView;

/// Create the category routes router.
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(categories::index).post(categories::create))
        .route("/reorder", post(categories::reorder))
        .route(
            "/{id}/edit",
            get(categories::edit).post(categories::update),
        )
        .route(
            "/{id}/delete",
            get(categories::confirm_delete).post(categories::delete),
        )
        .route("/{id}/subcategories", post(subcategories::create))
        .route("/{id}/subcategories/new", get(subcategories::new))
        .route(
            "/{id}/subcategories/{name}/edit",
            get(subcategories::edit).post(subcategories::update),
        )
        .route(
            "/{id}/subcategories/{name}/delete",
            get(subcategories::confirm_delete).post(subcategories::delete),
        )
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/export", get(orders::export))
        .route("/{id}", get(orders::show))
        .route("/{id}/status", post(orders::update_status))
        .route(
            "/{id}/delete",
            get(orders::confirm_delete).post(orders::delete),
        )
}

/// Create all page routes for the admin console.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::index))
        .nest("/categories", category_routes())
        .nest("/orders", order_routes())
        .route("/profile", get(profile::show).post(profile::update))
}

/// Queue `notice` for the next page and redirect to `to`.
pub(crate) async fn redirect_with(session: &Session, notice: Notice, to: &str) -> Result<Redirect> {
    notice.flash(session).await?;
    Ok(Redirect::to(to))
}
