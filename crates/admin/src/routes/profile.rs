//! Operator profile route handlers.
//!
//! The page is read-only until `?edit=true`. The email address is shown but
//! never editable and never part of the update payload.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::Redirect,
};
use bazaar_core::{ProfileForm, ProfileUpdate, UserProfile};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::{
    error::Result,
    filters,
    middleware::{RequireOperator, store_operator},
    models::Notice,
    routes::{OperatorView, redirect_with},
    state::AppState,
};

/// Gender choices offered by the form, as (value, label).
pub const GENDER_OPTIONS: [(&str, &str); 4] = [
    ("", "Prefer not to say"),
    ("male", "Male"),
    ("female", "Female"),
    ("other", "Other"),
];

/// Profile fields formatted for the form.
#[derive(Debug, Clone)]
pub struct ProfileView {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    /// `YYYY-MM-DD` or empty.
    pub date_of_birth: String,
    pub gender: String,
    pub bio: String,
    pub photo: String,
}

impl From<&UserProfile> for ProfileView {
    fn from(profile: &UserProfile) -> Self {
        Self {
            name: profile.name.clone(),
            email: profile.email.clone(),
            phone: profile.phone.clone(),
            address: profile.address.clone(),
            date_of_birth: profile
                .date_of_birth
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            gender: profile.gender.clone().unwrap_or_default(),
            bio: profile.bio.clone(),
            photo: profile.photo.clone().unwrap_or_default(),
        }
    }
}

/// Profile page template.
#[derive(Template, WebTemplate)]
#[template(path = "profile.html")]
pub struct ProfileTemplate {
    pub operator: OperatorView,
    pub current_path: String,
    pub notice: Option<Notice>,
    pub profile: ProfileView,
    /// Inputs are enabled only in edit mode.
    pub editing: bool,
    pub gender_options: Vec<(String, String)>,
}

/// Query parameters for the profile page.
#[derive(Debug, Default, Deserialize)]
pub struct ProfileQuery {
    #[serde(default)]
    pub edit: bool,
}

/// Profile page handler.
#[instrument(skip(operator, session))]
pub async fn show(
    RequireOperator(operator): RequireOperator,
    session: Session,
    Query(query): Query<ProfileQuery>,
) -> ProfileTemplate {
    ProfileTemplate {
        operator: OperatorView::from(&operator),
        current_path: "/profile".to_string(),
        notice: Notice::take(&session).await,
        profile: ProfileView::from(&operator.profile),
        editing: query.edit,
        gender_options: GENDER_OPTIONS
            .iter()
            .map(|(v, l)| ((*v).to_string(), (*l).to_string()))
            .collect(),
    }
}

/// Submit the editable fields as one update and store the returned record.
#[instrument(skip(operator, state, session, form))]
pub async fn update(
    RequireOperator(operator): RequireOperator,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ProfileForm>,
) -> Result<Redirect> {
    let update = match ProfileUpdate::from_form(&form) {
        Ok(update) => update,
        Err(e) => {
            let notice = Notice::error(e.to_string());
            return redirect_with(&session, notice, "/profile?edit=true").await;
        }
    };
    let user_id = operator.profile.id.clone();

    match state.api().update_user(&user_id, &update).await {
        Ok(profile) => {
            tracing::info!(user_id = %user_id, "Profile updated");
            store_operator(&session, profile).await?;
            redirect_with(&session, Notice::success("Profile updated."), "/profile").await
        }
        Err(e) => {
            tracing::error!(user_id = %user_id, error = %e, "Failed to update profile");
            redirect_with(&session, Notice::error(e.user_message()), "/profile?edit=true").await
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use bazaar_core::UserId;
    use chrono::NaiveDate;

    #[test]
    fn test_profile_view_formats_optional_fields() {
        let profile = UserProfile {
            id: UserId::new("u1"),
            name: "Nadia".to_string(),
            email: "nadia@example.com".to_string(),
            phone: String::new(),
            address: String::new(),
            date_of_birth: NaiveDate::from_ymd_opt(1994, 3, 12),
            gender: None,
            bio: String::new(),
            photo: None,
        };
        let view = ProfileView::from(&profile);
        assert_eq!(view.date_of_birth, "1994-03-12");
        assert_eq!(view.gender, "");
        assert_eq!(view.photo, "");
        assert_eq!(view.email, "nadia@example.com");
    }

    #[test]
    fn test_edit_flag_defaults_off() {
        let query: ProfileQuery = serde_json::from_str("{}").unwrap();
        assert!(!query.edit);
    }
}
