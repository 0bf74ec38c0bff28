//! Session-backed models for the storefront.

pub mod cart;
pub mod session;

pub use cart::{Cart, CartError, CartLine};
pub use session::{Flash, keys as session_keys};
