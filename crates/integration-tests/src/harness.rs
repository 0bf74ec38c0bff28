//! Spawning apps on ephemeral ports and talking to them.

use std::net::SocketAddr;

use axum::Router;
use bazaar_admin::config::{AdminConfig, ApiConfig};
use bazaar_core::{CurrencyCode, Email};
use bazaar_storefront::config::{BackendConfig, StorefrontConfig};
use reqwest::{Client, Response, header};

use crate::backend::{BackendData, FakeBackend};
use crate::fixtures::OPERATOR_EMAIL;

/// Serve `router` on a free local port and return its base URL.
///
/// # Panics
///
/// Panics if no local port can be bound.
pub async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr: SocketAddr = listener.local_addr().expect("Failed to read local address");
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    format!("http://{addr}")
}

/// Client that keeps cookies and does not follow redirects.
///
/// Sends a fixed `x-forwarded-for` so the storefront rate limiter can key
/// requests.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn client() -> Client {
    let mut headers = header::HeaderMap::new();
    headers.insert("x-forwarded-for", header::HeaderValue::from_static("203.0.113.7"));
    Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .default_headers(headers)
        .build()
        .expect("Failed to create HTTP client")
}

/// A running app, its fake backend and a session-keeping client.
pub struct TestContext {
    pub backend: FakeBackend,
    pub app_url: String,
    pub client: Client,
}

impl TestContext {
    /// Start the admin console over a backend seeded with `data`.
    ///
    /// # Panics
    ///
    /// Panics if the app state cannot be built.
    pub async fn admin(data: BackendData) -> Self {
        let backend = FakeBackend::new(data);
        let backend_url = spawn(backend.router()).await;

        let config = AdminConfig {
            api: ApiConfig::new(&backend_url),
            host: "127.0.0.1".parse().expect("valid IP"),
            port: 0,
            base_url: "http://localhost:3001".to_string(),
            operator_email: Email::parse(OPERATOR_EMAIL).expect("valid operator email"),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 0.0,
            sentry_traces_sample_rate: 0.0,
        };
        let state = bazaar_admin::state::AppState::new(config).expect("admin state");
        let app_url = spawn(bazaar_admin::build_app(state)).await;

        Self {
            backend,
            app_url,
            client: client(),
        }
    }

    /// Start the storefront over a backend seeded with `data`.
    ///
    /// # Panics
    ///
    /// Panics if the app state cannot be built.
    pub async fn storefront(data: BackendData) -> Self {
        let backend = FakeBackend::new(data);
        let backend_url = spawn(backend.router()).await;

        let config = StorefrontConfig {
            host: "127.0.0.1".parse().expect("valid IP"),
            port: 0,
            base_url: "http://localhost:3000".to_string(),
            backend: BackendConfig::new(&backend_url),
            currency: CurrencyCode::BDT,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 0.0,
            sentry_traces_sample_rate: 0.0,
        };
        let state = bazaar_storefront::state::AppState::new(config).expect("storefront state");
        let app_url = spawn(bazaar_storefront::build_app(state)).await;

        Self {
            backend,
            app_url,
            client: client(),
        }
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.app_url)
    }

    /// `GET path`.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request failed")
    }

    /// `GET path` and return the body text.
    ///
    /// # Panics
    ///
    /// Panics if the request fails or the body cannot be read.
    pub async fn page(&self, path: &str) -> String {
        self.get(path).await.text().await.expect("Failed to read body")
    }

    /// `POST path` with a urlencoded form.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST request failed")
    }
}

/// The `Location` header of a redirect.
#[must_use]
pub fn location(response: &Response) -> Option<String> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
