//! User profile operations.

use bazaar_core::{Email, ProfileUpdate, UserId, UserProfile};
use reqwest::Method;
use tracing::{debug, instrument};

use super::cache::{CacheKey, CacheTag, CacheValue};
use super::client::segment;
use super::{ApiClient, ApiError};

impl ApiClient {
    /// Fetch a user record by email.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if no user has `email`, or the request error.
    #[instrument(skip(self), fields(email = %email))]
    pub async fn get_user_by_email(&self, email: &Email) -> Result<UserProfile, ApiError> {
        let key = CacheKey::User(email.as_str().to_lowercase());
        if let Some(CacheValue::User(user)) = self.cached(&key).await {
            debug!("Cache hit for user");
            return Ok(*user);
        }

        let user: UserProfile = self
            .get_json(&format!("/user/{}", segment(email.as_str())))
            .await?;
        self.store(key, CacheValue::User(Box::new(user.clone())))
            .await;
        Ok(user)
    }

    /// Submit the editable profile fields; returns the stored record.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the update or the request fails.
    #[instrument(skip(self, update), fields(user_id = %id))]
    pub async fn update_user(
        &self,
        id: &UserId,
        update: &ProfileUpdate,
    ) -> Result<UserProfile, ApiError> {
        let path = format!("/user/{}", segment(id.as_str()));
        let user = self.send_json(Method::PATCH, &path, update).await?;
        self.invalidate(CacheTag::User);
        Ok(user)
    }
}
