//! Session-stored types for the admin console.

use bazaar_core::UserProfile;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

/// The operator using the console.
///
/// Holds the full user record so the profile editor can render without a
/// refetch; replaced wholesale by the backend's response after each update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentOperator {
    pub profile: UserProfile,
}

impl CurrentOperator {
    /// Name for the layout header, falling back to the email address.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.profile.name.trim().is_empty() {
            &self.profile.email
        } else {
            &self.profile.name
        }
    }
}

/// Severity of a one-shot notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Success,
    Error,
    Info,
}

/// A message shown once on the next rendered page, as a blocking dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }

    /// CSS class for the dialog.
    #[must_use]
    pub const fn css_class(&self) -> &'static str {
        match self.kind {
            NoticeKind::Success => "notice notice-success",
            NoticeKind::Error => "notice notice-error",
            NoticeKind::Info => "notice notice-info",
        }
    }

    /// Dialog heading.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self.kind {
            NoticeKind::Success => "Done",
            NoticeKind::Error => "Something went wrong",
            NoticeKind::Info => "Note",
        }
    }

    /// Queue this notice for the next page render.
    ///
    /// # Errors
    ///
    /// Returns the session store error.
    pub async fn flash(self, session: &Session) -> Result<(), tower_sessions::session::Error> {
        session.insert(keys::NOTICE, self).await
    }

    /// Remove and return the queued notice, if any.
    pub async fn take(session: &Session) -> Option<Self> {
        session.remove::<Self>(keys::NOTICE).await.ok().flatten()
    }
}

/// Session keys for admin state.
pub mod keys {
    /// Key for storing the current operator.
    pub const CURRENT_OPERATOR: &str = "current_operator";

    /// Key for the pending one-shot notice.
    pub const NOTICE: &str = "notice";
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use bazaar_core::UserId;

    fn operator(name: &str) -> CurrentOperator {
        CurrentOperator {
            profile: UserProfile {
                id: UserId::new("u1"),
                name: name.to_string(),
                email: "ops@bazaar.test".to_string(),
                phone: String::new(),
                address: String::new(),
                date_of_birth: None,
                gender: None,
                bio: String::new(),
                photo: None,
            },
        }
    }

    #[test]
    fn test_display_name_falls_back_to_email() {
        assert_eq!(operator("Nadia").display_name(), "Nadia");
        assert_eq!(operator("  ").display_name(), "ops@bazaar.test");
    }

    #[test]
    fn test_notice_round_trips_through_session_json() {
        let notice = Notice::error("Category name is required");
        let json = serde_json::to_string(&notice).unwrap();
        assert_eq!(json, r#"{"kind":"error","message":"Category name is required"}"#);
        assert_eq!(serde_json::from_str::<Notice>(&json).unwrap(), notice);
        assert_eq!(notice.css_class(), "notice notice-error");
    }

    #[tokio::test]
    async fn test_flash_is_taken_once() {
        let store = std::sync::Arc::new(tower_sessions::MemoryStore::default());
        let session = Session::new(None, store, None);
        Notice::success("Saved").flash(&session).await.unwrap();
        assert_eq!(Notice::take(&session).await, Some(Notice::success("Saved")));
        assert_eq!(Notice::take(&session).await, None);
    }
}
