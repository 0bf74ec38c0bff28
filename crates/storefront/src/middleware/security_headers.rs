//! Security headers middleware for XSS, clickjacking, and isolation protection.
//!
//! Product images come from whatever HTTPS host the backend stores, so
//! `img-src` allows any `https:` source and the embedder policy is
//! `credentialless` rather than `require-corp`.

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};

const CONTENT_SECURITY_POLICY: &str = "default-src 'none'; \
     script-src 'self'; \
     style-src 'self'; \
     font-src 'self'; \
     img-src 'self' https: data:; \
     connect-src 'self'; \
     frame-src 'none'; \
     object-src 'none'; \
     base-uri 'self'; \
     form-action 'self'; \
     frame-ancestors 'none'";

const PERMISSIONS_POLICY: &str = "camera=(), \
     geolocation=(), \
     microphone=(), \
     payment=(), \
     usb=(), \
     browsing-topics=(), \
     interest-cohort=()";

/// Headers applied to every response.
const SECURITY_HEADERS: [(&str, &str); 9] = [
    ("x-frame-options", "DENY"),
    ("x-content-type-options", "nosniff"),
    ("referrer-policy", "strict-origin-when-cross-origin"),
    ("content-security-policy", CONTENT_SECURITY_POLICY),
    ("permissions-policy", PERMISSIONS_POLICY),
    ("cross-origin-opener-policy", "same-origin"),
    ("cross-origin-resource-policy", "same-origin"),
    ("cross-origin-embedder-policy", "credentialless"),
    ("x-dns-prefetch-control", "off"),
];

/// Add security headers to all responses.
///
/// Cart and checkout responses are additionally marked `Cache-Control: no-store`.
pub async fn security_headers_middleware(request: Request, next: Next) -> Response {
    let private = is_private_path(request.uri().path());
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    for (name, value) in SECURITY_HEADERS {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }

    if private {
        headers.insert(
            HeaderName::from_static("cache-control"),
            HeaderValue::from_static("no-store, max-age=0"),
        );
    }

    response
}

fn is_private_path(path: &str) -> bool {
    path.starts_with("/cart") || path.starts_with("/checkout")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_private_paths() {
        assert!(is_private_path("/cart"));
        assert!(is_private_path("/checkout/complete/o1"));
        assert!(!is_private_path("/products/p1"));
        assert!(!is_private_path("/"));
    }

    #[test]
    fn test_header_names_are_lowercase() {
        for (name, _) in SECURITY_HEADERS {
            assert_eq!(name, name.to_ascii_lowercase());
        }
    }
}
