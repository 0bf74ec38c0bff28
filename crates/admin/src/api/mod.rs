//! REST backend client for the admin console.
//!
//! # Architecture
//!
//! - Plain JSON over HTTP with `reqwest`; the backend is the source of truth
//! - Reads go through an in-memory `moka` cache (5 minute TTL)
//! - Mutations never touch cached values; after the backend accepts one, every
//!   entry carrying the affected [`CacheTag`] is invalidated so the next read refetches
//! - No automatic retries
//!
//! # Example
//!
//! ```rust,ignore
//! use bazaar_admin::api::ApiClient;
//!
//! let api = ApiClient::new(&config.api)?;
//! let categories = api.list_categories().await?;
//! ```

mod cache;
mod categories;
mod client;
mod orders;
mod users;

pub use cache::CacheTag;
pub use client::ApiClient;

use thiserror::Error;

/// Longest slice of a response body quoted in an error.
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Errors that can occur when calling the REST backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Backend answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },
}

impl ApiError {
    /// The backend-provided explanation, when there is one worth showing an operator.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } if !message.is_empty() => Some(message),
            _ => None,
        }
    }

    /// Text for a failure notice: the server message when present, else a generic one.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::RateLimited(secs) => {
                format!("The server is busy. Try again in {secs} seconds.")
            }
            Self::NotFound(_) => "That record no longer exists.".to_string(),
            _ => self
                .server_message()
                .map_or_else(|| "Something went wrong. Please try again.".to_string(), str::to_string),
        }
    }
}

/// Pull a human-readable message out of an error response body.
///
/// Prefers a JSON `message` or `error` string field, then falls back to the
/// raw body, truncated.
fn extract_error_message(body: &str) -> String {
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "error"] {
            if let Some(serde_json::Value::String(message)) = map.get(key) {
                return message.clone();
            }
        }
    }
    body.trim().chars().take(MAX_ERROR_BODY_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_message_field() {
        assert_eq!(
            extract_error_message(r#"{"message":"Category name already exists"}"#),
            "Category name already exists"
        );
        assert_eq!(extract_error_message(r#"{"error":"Invalid id"}"#), "Invalid id");
    }

    #[test]
    fn test_extract_falls_back_to_truncated_body() {
        let body = "x".repeat(500);
        assert_eq!(extract_error_message(&body).len(), MAX_ERROR_BODY_CHARS);
        assert_eq!(extract_error_message(r#"{"ok":false}"#), r#"{"ok":false}"#);
    }

    #[test]
    fn test_user_message() {
        let err = ApiError::Status {
            status: 409,
            message: "Duplicate name".to_string(),
        };
        assert_eq!(err.user_message(), "Duplicate name");
        assert_eq!(err.to_string(), "HTTP 409: Duplicate name");

        let err = ApiError::Status {
            status: 500,
            message: String::new(),
        };
        assert_eq!(err.user_message(), "Something went wrong. Please try again.");
        assert_eq!(
            ApiError::RateLimited(30).to_string(),
            "Rate limited, retry after 30 seconds"
        );
    }
}
