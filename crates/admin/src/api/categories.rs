//! Category and subcategory operations.

use std::sync::Arc;

use bazaar_core::{Category, CategoryId, CategoryInput, ReorderPayload, SubCategoryInput};
use reqwest::Method;
use tracing::{debug, instrument};

use super::cache::{CacheKey, CacheTag, CacheValue};
use super::client::segment;
use super::{ApiClient, ApiError};

impl ApiClient {
    /// All categories, sorted by their display rank.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Arc<Vec<Category>>, ApiError> {
        if let Some(CacheValue::Categories(categories)) = self.cached(&CacheKey::Categories).await {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let categories: Vec<Category> = self.get_json("/categories").await?;
        let categories = Arc::new(Category::sorted(categories));
        self.store(
            CacheKey::Categories,
            CacheValue::Categories(Arc::clone(&categories)),
        )
        .await;
        Ok(categories)
    }

    /// Look up one category in the (cached) list.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if no category has `id`.
    pub async fn get_category(&self, id: &CategoryId) -> Result<Category, ApiError> {
        self.list_categories()
            .await?
            .iter()
            .find(|c| &c.id == id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("category {id}")))
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the input or the request fails.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_category(&self, input: &CategoryInput) -> Result<Category, ApiError> {
        let category = self.send_json(Method::POST, "/categories", input).await?;
        self.invalidate(CacheTag::Categories);
        Ok(category)
    }

    /// Replace a category's name, image and description.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the input or the request fails.
    #[instrument(skip(self, input), fields(category_id = %id))]
    pub async fn update_category(
        &self,
        id: &CategoryId,
        input: &CategoryInput,
    ) -> Result<Category, ApiError> {
        let path = format!("/categories/{}", segment(id.as_str()));
        let category = self.send_json(Method::PUT, &path, input).await?;
        self.invalidate(CacheTag::Categories);
        Ok(category)
    }

    /// Delete a category; the backend removes its subcategories with it.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(category_id = %id))]
    pub async fn delete_category(&self, id: &CategoryId) -> Result<(), ApiError> {
        self.delete(&format!("/categories/{}", segment(id.as_str())))
            .await?;
        self.invalidate(CacheTag::Categories);
        Ok(())
    }

    /// Send the full ranked id list after a drag-and-drop move.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails. Nothing is rolled back.
    #[instrument(skip(self, payload), fields(count = payload.categories.len()))]
    pub async fn reorder_categories(&self, payload: &ReorderPayload) -> Result<(), ApiError> {
        self.send_unit(Method::PUT, "/categories/reorder", payload)
            .await?;
        self.invalidate(CacheTag::Categories);
        Ok(())
    }

    /// Add a subcategory to `category_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the input or the request fails.
    #[instrument(skip(self, input), fields(category_id = %category_id, name = %input.name))]
    pub async fn add_subcategory(
        &self,
        category_id: &CategoryId,
        input: &SubCategoryInput,
    ) -> Result<(), ApiError> {
        let path = format!("/categories/{}/subcategories", segment(category_id.as_str()));
        self.send_unit(Method::POST, &path, input).await?;
        self.invalidate(CacheTag::Categories);
        Ok(())
    }

    /// Replace the subcategory currently named `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the input or the request fails.
    #[instrument(skip(self, input), fields(category_id = %category_id))]
    pub async fn update_subcategory(
        &self,
        category_id: &CategoryId,
        name: &str,
        input: &SubCategoryInput,
    ) -> Result<(), ApiError> {
        let path = format!(
            "/categories/{}/subcategories/{}",
            segment(category_id.as_str()),
            segment(name)
        );
        self.send_unit(Method::PUT, &path, input).await?;
        self.invalidate(CacheTag::Categories);
        Ok(())
    }

    /// Delete the subcategory named `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(category_id = %category_id))]
    pub async fn delete_subcategory(
        &self,
        category_id: &CategoryId,
        name: &str,
    ) -> Result<(), ApiError> {
        let path = format!(
            "/categories/{}/subcategories/{}",
            segment(category_id.as_str()),
            segment(name)
        );
        self.delete(&path).await?;
        self.invalidate(CacheTag::Categories);
        Ok(())
    }
}
