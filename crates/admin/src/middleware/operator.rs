//! Current-operator extractor.
//!
//! The console has a single configured operator. The first request in a
//! session loads that operator's record from the backend and keeps it in the
//! session; later requests read the session copy.

use axum::{extract::FromRequestParts, http::request::Parts};
use bazaar_core::UserProfile;
use tower_sessions::Session;

use crate::error::{AppError, set_sentry_user};
use crate::models::{CurrentOperator, session_keys};
use crate::state::AppState;

/// Extractor yielding the session's operator, bootstrapping it on first use.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(RequireOperator(operator): RequireOperator) -> impl IntoResponse {
///     format!("Hello, {}!", operator.display_name())
/// }
/// ```
pub struct RequireOperator(pub CurrentOperator);

impl FromRequestParts<AppState> for RequireOperator {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer missing".to_string()))?;

        if let Some(operator) = session
            .get::<CurrentOperator>(session_keys::CURRENT_OPERATOR)
            .await?
        {
            set_sentry_user(operator.profile.id.as_str(), &operator.profile.email);
            return Ok(Self(operator));
        }

        let email = &state.config().operator_email;
        let profile = state.api().get_user_by_email(email).await.inspect_err(|e| {
            tracing::error!(email = %email, error = %e, "Failed to load operator profile");
        })?;
        tracing::info!(user_id = %profile.id, "Operator session started");

        let operator = store_operator(&session, profile).await?;
        set_sentry_user(operator.profile.id.as_str(), &operator.profile.email);
        Ok(Self(operator))
    }
}

/// Replace the session's operator with `profile`.
///
/// # Errors
///
/// Returns the session store error.
pub async fn store_operator(
    session: &Session,
    profile: UserProfile,
) -> Result<CurrentOperator, tower_sessions::session::Error> {
    let operator = CurrentOperator { profile };
    session
        .insert(session_keys::CURRENT_OPERATOR, &operator)
        .await?;
    Ok(operator)
}
