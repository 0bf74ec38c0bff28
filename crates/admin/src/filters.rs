//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

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

/// Percent-encodes a value for use as one URL path segment.
///
/// Subcategories are addressed by name, so links need this.
///
/// Usage in templates: `{{ sub.name|path_segment }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn path_segment(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(urlencoding::encode(&value.to_string()).into_owned())
}
