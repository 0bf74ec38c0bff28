//! Order console route handlers.
//!
//! Listing with composable filters, CSV export, a read-only detail view,
//! status changes and confirmed deletes. Every redirect carries the list's
//! filter query string so the operator lands back on the same view.

mod actions;
mod detail;
mod list;
pub mod types;

pub use types::{LineItemView, OrderDetailView, OrderRowView, OrdersQuery};

pub use list::{OrdersIndexTemplate, export, index};

pub use detail::{OrderShowTemplate, show};

pub use actions::{StatusInput, confirm_delete, delete, update_status};
