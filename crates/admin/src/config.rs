//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `API_BASE_URL` - Base URL of the Bazaar REST backend
//! - `ADMIN_BASE_URL` - Public URL for the admin console
//! - `ADMIN_OPERATOR_EMAIL` - Email of the operator whose profile the console edits
//!
//! ## Optional
//! - `API_TOKEN` - Bearer token sent to the backend (placeholder and entropy checked)
//! - `API_TIMEOUT_SECS` - Per-request timeout (default: 15)
//! - `ADMIN_HOST` - Bind address (default: 127.0.0.1)
//! - `ADMIN_PORT` - Listen port (default: 3001)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Traces sample rate (default: 1.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use bazaar_core::Email;
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_API_TIMEOUT_SECS: u64 = 15;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Connection settings for the REST backend.
///
/// Shared by the admin console and the CLI. Implements `Debug` manually to
/// redact the token.
#[derive(Clone)]
pub struct ApiConfig {
    /// Backend base URL without a trailing slash.
    pub base_url: String,
    /// Optional bearer token.
    pub token: Option<SecretString>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ApiConfig {
    /// Settings for an unauthenticated backend at `base_url` with the default timeout.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
            timeout: Duration::from_secs(DEFAULT_API_TIMEOUT_SECS),
        }
    }

    /// Load backend settings from the environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `API_BASE_URL` is missing or not a URL, if the
    /// timeout is not a number, or if `API_TOKEN` looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(&|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_url = required(lookup, "API_BASE_URL")?;
        let url = Url::parse(&raw_url)
            .map_err(|e| ConfigError::InvalidEnvVar("API_BASE_URL".to_string(), e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEnvVar(
                "API_BASE_URL".to_string(),
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }

        let token = match lookup("API_TOKEN").filter(|t| !t.is_empty()) {
            Some(token) => {
                validate_secret_strength(&token, "API_TOKEN")?;
                Some(SecretString::from(token))
            }
            None => None,
        };

        let timeout_secs = lookup("API_TIMEOUT_SECS")
            .map(|raw| {
                raw.parse::<u64>().map_err(|e| {
                    ConfigError::InvalidEnvVar("API_TIMEOUT_SECS".to_string(), e.to_string())
                })
            })
            .transpose()?
            .unwrap_or(DEFAULT_API_TIMEOUT_SECS);

        Ok(Self {
            base_url: raw_url.trim_end_matches('/').to_string(),
            token,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// Admin application configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// REST backend connection
    pub api: ApiConfig,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the admin console
    pub base_url: String,
    /// Operator whose record the profile editor shows
    pub operator_email: Email,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid, or
    /// if the API token fails validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(&|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api = ApiConfig::from_lookup(lookup)?;
        let host = or_default(lookup, "ADMIN_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_HOST".to_string(), e.to_string()))?;
        let port = or_default(lookup, "ADMIN_PORT", "3001")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_PORT".to_string(), e.to_string()))?;
        let base_url = required(lookup, "ADMIN_BASE_URL")?;
        let operator_email = Email::parse(&required(lookup, "ADMIN_OPERATOR_EMAIL")?).map_err(
            |e| ConfigError::InvalidEnvVar("ADMIN_OPERATOR_EMAIL".to_string(), e.to_string()),
        )?;

        Ok(Self {
            api,
            host,
            port,
            base_url,
            operator_email,
            sentry_dsn: lookup("SENTRY_DSN"),
            sentry_environment: lookup("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: lookup("SENTRY_SAMPLE_RATE")
                .and_then(|s| s.parse().ok())
                .unwrap_or(1.0),
            sentry_traces_sample_rate: lookup("SENTRY_TRACES_SAMPLE_RATE")
                .and_then(|s| s.parse().ok())
                .unwrap_or(1.0),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn required(lookup: &dyn Fn(&str) -> Option<String>, key: &str) -> Result<String, ConfigError> {
    lookup(key)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

fn or_default(lookup: &dyn Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    lookup(key).unwrap_or_else(|| default.to_string())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)]
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated token."
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const BASE: &[(&str, &str)] = &[
        ("API_BASE_URL", "http://localhost:5000/api/"),
        ("ADMIN_BASE_URL", "http://localhost:3001"),
        ("ADMIN_OPERATOR_EMAIL", "ops@bazaar.test"),
    ];

    #[test]
    fn test_defaults() {
        let config = AdminConfig::from_lookup(&env(BASE)).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:5000/api");
        assert_eq!(config.api.timeout, Duration::from_secs(15));
        assert!(config.api.token.is_none());
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3001");
        assert_eq!(config.operator_email.as_str(), "ops@bazaar.test");
        assert!(!config.is_secure());
    }

    #[test]
    fn test_missing_required() {
        let err = AdminConfig::from_lookup(&env(&BASE[..2])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref k) if k == "ADMIN_OPERATOR_EMAIL"));
    }

    #[test]
    fn test_invalid_operator_email() {
        let mut pairs = BASE.to_vec();
        pairs[2] = ("ADMIN_OPERATOR_EMAIL", "not-an-email");
        let err = AdminConfig::from_lookup(&env(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(..)));
    }

    #[test]
    fn test_api_base_url_must_be_http() {
        let err = ApiConfig::from_lookup(&env(&[("API_BASE_URL", "ftp://files.test")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(..)));
    }

    #[test]
    fn test_placeholder_token_rejected() {
        let result = ApiConfig::from_lookup(&env(&[
            ("API_BASE_URL", "http://localhost:5000"),
            ("API_TOKEN", "your-api-token-here"),
        ]));
        assert!(matches!(result, Err(ConfigError::InsecureSecret(..))));
    }

    #[test]
    fn test_strong_token_accepted_and_redacted() {
        let config = ApiConfig::from_lookup(&env(&[
            ("API_BASE_URL", "https://api.bazaar.test"),
            ("API_TOKEN", "aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6"),
            ("API_TIMEOUT_SECS", "30"),
        ]))
        .unwrap();
        assert_eq!(config.timeout, Duration::from_secs(30));
        let debug = format!("{config:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("aB3$xY9"));
    }

    #[test]
    fn test_shannon_entropy() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
        assert!((shannon_entropy("ab") - 1.0).abs() < 0.01);
        assert!(shannon_entropy("aB3$xY9!mK2@nL5#") > 3.3);
    }

    #[test]
    fn test_low_entropy_rejected() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "API_TOKEN");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(..))));
    }
}
