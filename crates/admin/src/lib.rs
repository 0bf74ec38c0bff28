//! Bazaar Admin library.
//!
//! This crate provides the admin console as a library, allowing the router
//! to be built by the binary and by the integration tests.
//!
//! # Features
//!
//! - Category tree editor with drag-and-drop ordering and name-keyed
//!   subcategories
//! - Order console with composable filters, status changes, CSV export
//! - Operator profile editor
//!
//! All data lives behind the external REST backend; [`api::ApiClient`] caches
//! reads and invalidates them after each mutation.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod components;
pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;

use axum::{Router, extract::State, http::StatusCode, routing::get};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::middleware::create_session_layer;
use crate::state::AppState;

/// Build the full admin application router.
///
/// Sentry layers are left to the binary so tests run without a hub.
pub fn build_app(state: AppState) -> Router {
    let session_layer = create_session_layer(state.config());

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::routes())
        .nest_service(
            "/static",
            ServeDir::new(concat!(env!("CARGO_MANIFEST_DIR"), "/static")),
        )
        .layer(session_layer)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the REST backend is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.api().ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use bazaar_core::Email;
    use tower::ServiceExt;

    use crate::config::{AdminConfig, ApiConfig};

    /// State pointing at a port nothing listens on.
    fn unreachable_state() -> AppState {
        let config = AdminConfig {
            api: ApiConfig::new("http://127.0.0.1:1"),
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
            base_url: "http://localhost:3001".to_string(),
            operator_email: Email::parse("ops@example.com").unwrap(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 0.0,
            sentry_traces_sample_rate: 0.0,
        };
        AppState::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_health_is_ok_without_backend() {
        let app = build_app(unreachable_state());
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_readiness_reports_unreachable_backend() {
        let app = build_app(unreachable_state());
        let response = app
            .oneshot(Request::get("/health/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_pages_fail_with_bad_gateway_when_operator_cannot_load() {
        let app = build_app(unreachable_state());
        let response = app
            .oneshot(Request::get("/categories").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
