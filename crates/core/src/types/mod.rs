//! Core newtypes for Bazaar.
//!
//! Type-safe wrappers for identifiers, email addresses, money and statuses.

pub mod email;
pub mod id;
pub mod money;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use money::{CurrencyCode, Money, format_plain};
pub use status::OrderStatus;
