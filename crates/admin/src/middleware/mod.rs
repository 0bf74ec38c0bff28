//! HTTP middleware stack for admin.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Session layer (tower-sessions, in-memory store, SameSite=Strict)
//! 4. Operator extractor (per handler, loads the operator into the session)

pub mod operator;
pub mod session;

pub use operator::{RequireOperator, store_operator};
pub use session::create_session_layer;
