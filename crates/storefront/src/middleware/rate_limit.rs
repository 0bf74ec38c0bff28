//! Rate limiting for cart and checkout submissions using governor and `tower_governor`.
//!
//! - `cart_rate_limiter`: ~60 cart changes per minute per IP
//! - `checkout_rate_limiter`: ~6 order submissions per minute per IP

use std::net::IpAddr;
use std::sync::Arc;

use axum::http::Request;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use tower_governor::{GovernorError, GovernorLayer, governor::GovernorConfigBuilder};

/// Proxy headers consulted for the client IP, most trusted first.
const CLIENT_IP_HEADERS: [&str; 4] = [
    "cf-connecting-ip",
    "fly-client-ip",
    "x-real-ip",
    "x-forwarded-for",
];

/// Key extractor reading the client IP from proxy headers.
///
/// `X-Forwarded-For` contributes its first (client) entry.
#[derive(Clone, Copy)]
pub struct ProxyIpKeyExtractor;

impl tower_governor::key_extractor::KeyExtractor for ProxyIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        let headers = req.headers();
        CLIENT_IP_HEADERS
            .iter()
            .filter_map(|name| headers.get(*name).and_then(|v| v.to_str().ok()))
            .find_map(|value| value.split(',').next()?.trim().parse::<IpAddr>().ok())
            .ok_or(GovernorError::UnableToExtractKey)
    }
}

/// Rate limiter layer type for Axum.
pub type RateLimiterLayer =
    GovernorLayer<ProxyIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

fn limiter(replenish_secs: u64, burst: u32) -> RateLimiterLayer {
    let config = GovernorConfigBuilder::default()
        .key_extractor(ProxyIpKeyExtractor)
        .per_second(replenish_secs)
        .burst_size(burst)
        .finish()
        .expect("rate limiter config with positive period and burst is valid");
    GovernorLayer::new(Arc::new(config))
}

/// Cart add/update/remove: 1 token per second, burst of 20.
///
/// # Panics
///
/// Never; the period and burst are positive constants.
#[must_use]
pub fn cart_rate_limiter() -> RateLimiterLayer {
    limiter(1, 20)
}

/// Order placement: 1 token every 10 seconds, burst of 3.
///
/// # Panics
///
/// Never; the period and burst are positive constants.
#[must_use]
pub fn checkout_rate_limiter() -> RateLimiterLayer {
    limiter(10, 3)
}
