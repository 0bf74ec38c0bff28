//! Bazaar Core - shared domain types and logic.
//!
//! Used by every Bazaar component:
//! - `storefront` - public shop: product browsing, cart, checkout
//! - `admin` - operator console: category tree, orders, profile
//! - `cli` - command-line access to the same backend
//!
//! # Architecture
//!
//! The core crate holds types and pure functions only - no I/O and no HTTP
//! clients. Everything that talks to the REST backend lives in the binaries.
//!
//! # Modules
//!
//! - [`catalog`] - categories, name-keyed subcategories, drag reordering
//! - [`order`] - orders, line items, console filtering
//! - [`export`] - CSV export of filtered orders
//! - [`profile`] - user records and the profile update payload
//! - [`product`] - storefront products
//! - [`types`] - newtypes for IDs, emails, money and order status
//! - [`validation`] - form field checks

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod export;
pub mod order;
pub mod product;
pub mod profile;
pub mod types;
pub mod validation;

pub use catalog::{
    Category, CategoryInput, CategoryRank, ReorderError, ReorderPayload, SubCategory,
    SubCategoryError, SubCategoryInput,
};
pub use export::{ExportError, export_file_name, orders_csv};
pub use order::{BillingInfo, LineItem, NewOrder, Order, OrderFilter, PaymentInfo, StatusUpdate};
pub use product::{Product, ProductOption};
pub use profile::{ProfileForm, ProfileUpdate, UserProfile};
pub use types::*;
pub use validation::ValidationError;
