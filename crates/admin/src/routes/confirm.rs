//! Shared confirmation page for destructive actions.
//!
//! Every delete renders this page first; the destructive call only happens
//! when the form posts back with `confirm=yes`.

use askama::Template;
use askama_web::WebTemplate;
use serde::Deserialize;

use crate::filters;
use crate::models::Notice;

use super::OperatorView;

/// Confirmation page template.
#[derive(Template, WebTemplate)]
#[template(path = "confirm.html")]
pub struct ConfirmTemplate {
    pub operator: OperatorView,
    pub current_path: String,
    pub notice: Option<Notice>,
    pub title: String,
    pub message: String,
    /// URL the form posts to.
    pub action: String,
    /// Where "Cancel" leads without posting.
    pub cancel_url: String,
}

/// Body posted by the confirmation form.
#[derive(Debug, Default, Deserialize)]
pub struct ConfirmForm {
    #[serde(default)]
    pub confirm: String,
}

impl ConfirmForm {
    /// Only an explicit `yes` confirms.
    #[must_use]
    pub fn confirmed(&self) -> bool {
        self.confirm.trim().eq_ignore_ascii_case("yes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_yes_confirms() {
        let form = |v: &str| ConfirmForm {
            confirm: v.to_string(),
        };
        assert!(form("yes").confirmed());
        assert!(form(" YES ").confirmed());
        assert!(!form("no").confirmed());
        assert!(!form("").confirmed());
        assert!(!ConfirmForm::default().confirmed());
    }
}
