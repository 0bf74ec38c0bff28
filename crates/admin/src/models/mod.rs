//! Session-backed models for admin.

pub mod session;

pub use session::{CurrentOperator, Notice, NoticeKind, keys as session_keys};
