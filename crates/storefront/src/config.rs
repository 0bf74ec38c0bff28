//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `API_BASE_URL` - Base URL of the Bazaar REST backend
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront
//!
//! ## Optional
//! - `API_TOKEN` - Bearer token sent to the backend (placeholder and entropy checked)
//! - `API_TIMEOUT_SECS` - Per-request timeout (default: 15)
//! - `STOREFRONT_HOST` - Bind address (default: 0.0.0.0)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STORE_CURRENCY` - Display currency, `BDT` or `USD` (default: BDT)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Traces sample rate (default: 0.1)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use bazaar_core::CurrencyCode;
use secrecy::SecretString;
use thiserror::Error;

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
    "insert",
    "put-your",
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

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// REST backend connection
    pub backend: BackendConfig,
    /// Currency prices are displayed in
    pub currency: CurrencyCode,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    pub sentry_environment: Option<String>,
    pub sentry_sample_rate: f32,
    pub sentry_traces_sample_rate: f32,
}

/// REST backend connection settings.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct BackendConfig {
    /// Backend base URL without a trailing slash
    pub base_url: String,
    /// Optional bearer token
    pub token: Option<SecretString>,
    pub timeout: Duration,
}

impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl BackendConfig {
    /// Unauthenticated backend at `base_url` with the default timeout.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
            timeout: Duration::from_secs(DEFAULT_API_TIMEOUT_SECS),
        }
    }

    fn from_env() -> Result<Self, ConfigError> {
        let base_url = get_required_env("API_BASE_URL")?;
        url::Url::parse(&base_url)
            .map_err(|e| ConfigError::InvalidEnvVar("API_BASE_URL".to_string(), e.to_string()))?;

        let token = match get_optional_env("API_TOKEN") {
            Some(token) => {
                validate_secret_strength(&token, "API_TOKEN")?;
                Some(SecretString::from(token))
            }
            None => None,
        };

        let timeout_secs = get_env_or_default("API_TIMEOUT_SECS", "15")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("API_TIMEOUT_SECS".to_string(), e.to_string())
            })?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the API token fails validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("STOREFRONT_HOST", "0.0.0.0")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;
        let base_url = get_required_env("STOREFRONT_BASE_URL")?;
        let currency = parse_currency(&get_env_or_default("STORE_CURRENCY", "BDT"))?;

        Ok(Self {
            host,
            port,
            base_url,
            backend: BackendConfig::from_env()?,
            currency,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_rate(get_optional_env("SENTRY_SAMPLE_RATE"), 1.0),
            sentry_traces_sample_rate: parse_rate(
                get_optional_env("SENTRY_TRACES_SAMPLE_RATE"),
                0.1,
            ),
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

/// Get a required, non-empty environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    get_optional_env(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable, treating empty as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

fn parse_currency(raw: &str) -> Result<CurrencyCode, ConfigError> {
    raw.parse()
        .map_err(|e: String| ConfigError::InvalidEnvVar("STORE_CURRENCY".to_string(), e))
}

/// Parse a sample rate, clamping to `0.0..=1.0`.
fn parse_rate(raw: Option<String>, default: f32) -> f32 {
    raw.and_then(|s| s.parse::<f32>().ok())
        .map_or(default, |rate| rate.clamp(0.0, 1.0))
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
    let len = s.chars().count() as f64;
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

    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(**p)) {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("appears to be a placeholder (contains '{pattern}')"),
        ));
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1})"
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config(base_url: &str) -> StorefrontConfig {
        StorefrontConfig {
            host: "0.0.0.0".parse().unwrap(),
            port: 3000,
            base_url: base_url.to_string(),
            backend: BackendConfig::new("http://localhost:5000/"),
            currency: CurrencyCode::default(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.1,
        }
    }

    #[test]
    fn test_socket_addr() {
        let addr = config("http://localhost:3000").socket_addr();
        assert_eq!(addr.ip().to_string(), "0.0.0.0");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_secure_only_over_https() {
        assert!(!config("http://localhost:3000").is_secure());
        assert!(config("https://shop.example.com").is_secure());
    }

    #[test]
    fn test_backend_config_trims_slash_and_redacts() {
        let mut backend = BackendConfig::new("http://localhost:5000/");
        assert_eq!(backend.base_url, "http://localhost:5000");

        backend.token = Some(SecretString::from("tok_9fK2mQ7xLp3Zr8Vw"));
        let debug_output = format!("{backend:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("tok_9fK2mQ7xLp3Zr8Vw"));
    }

    #[test]
    fn test_parse_currency() {
        assert_eq!(parse_currency("usd").unwrap(), CurrencyCode::USD);
        assert!(matches!(
            parse_currency("EUR"),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
    }

    #[test]
    fn test_parse_rate_clamps_and_defaults() {
        assert!((parse_rate(Some("0.25".to_string()), 1.0) - 0.25).abs() < f32::EPSILON);
        assert!((parse_rate(Some("7".to_string()), 1.0) - 1.0).abs() < f32::EPSILON);
        assert!((parse_rate(Some("many".to_string()), 0.1) - 0.1).abs() < f32::EPSILON);
        assert!((parse_rate(None, 0.1) - 0.1).abs() < f32::EPSILON);
    }

    #[test]
    fn test_shannon_entropy() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
        assert!((shannon_entropy("aaaa") - 0.0).abs() < f64::EPSILON);
        assert!((shannon_entropy("ab") - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_secret_strength() {
        assert!(validate_secret_strength("your-api-token", "API_TOKEN").is_err());
        assert!(validate_secret_strength("zzzzzzzzzzzzzzzzzzzz", "API_TOKEN").is_err());
        assert!(validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6", "API_TOKEN").is_ok());
    }
}
