//! Custom Askama template filters.

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Returns the content hash of `store.css`, computed at build time.
///
/// Usage in templates: `/static/css/store.css?v={{ ""|css_hash }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn css_hash(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<&'static str> {
    Ok(env!("CSS_HASH"))
}

/// Percent-encodes a value for use in a URL path segment or query value.
///
/// Usage in templates: `/products?category={{ category.name|url_encode }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn url_encode(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(urlencoding::encode(&value.to_string()).into_owned())
}
