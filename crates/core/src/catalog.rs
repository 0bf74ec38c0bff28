//! Category tree: categories, their nested subcategories, and display ordering.
//!
//! Categories carry an explicit `order` rank. Drag-and-drop reordering is a
//! splice on the current list ([`move_item`]) followed by sending every
//! category's new rank to the backend ([`ReorderPayload`]).
//!
//! Subcategories have no identifier of their own; the backend addresses them
//! by name within the owning category. Because renames and case variants can
//! collide, [`Category::check_new_subcategory`] and
//! [`Category::check_subcategory_rename`] refuse ambiguous names up front.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::CategoryId;
use crate::validation::{ValidationError, required};

/// A top-level catalog category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub sub_categories: Vec<SubCategory>,
    #[serde(default)]
    pub order: i64,
}

/// A subcategory, owned by exactly one [`Category`] and keyed by `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubCategory {
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: String,
}

/// Body for creating or editing a category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryInput {
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: String,
}

/// Body for creating or editing a subcategory. Same shape as [`CategoryInput`].
pub type SubCategoryInput = CategoryInput;

impl CategoryInput {
    /// Trim every field and require a name.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Required`] when the name is blank.
    pub fn validate(self) -> Result<Self, ValidationError> {
        Ok(Self {
            name: required("name", &self.name)?,
            image: self.image.trim().to_owned(),
            description: self.description.trim().to_owned(),
        })
    }
}

impl From<&SubCategory> for CategoryInput {
    fn from(sub: &SubCategory) -> Self {
        Self {
            name: sub.name.clone(),
            image: sub.image.clone(),
            description: sub.description.clone(),
        }
    }
}

impl From<&Category> for CategoryInput {
    fn from(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            image: category.image.clone(),
            description: category.description.clone(),
        }
    }
}

/// Subcategory name problems detected before calling the backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubCategoryError {
    #[error("subcategory \"{0}\" not found")]
    NotFound(String),

    #[error("a subcategory named \"{0}\" already exists in this category")]
    DuplicateName(String),
}

impl Category {
    /// Sort categories by their `order` rank; ties keep their incoming order.
    #[must_use]
    pub fn sorted(mut categories: Vec<Self>) -> Vec<Self> {
        categories.sort_by_key(|c| c.order);
        categories
    }

    /// Exact-match lookup of a subcategory by name.
    #[must_use]
    pub fn find_subcategory(&self, name: &str) -> Option<&SubCategory> {
        self.sub_categories.iter().find(|s| s.name == name)
    }

    /// Check that `name` can be added without colliding with a sibling.
    ///
    /// # Errors
    ///
    /// Returns [`SubCategoryError::DuplicateName`] on a case-insensitive match.
    pub fn check_new_subcategory(&self, name: &str) -> Result<(), SubCategoryError> {
        if self.collides(name, None) {
            return Err(SubCategoryError::DuplicateName(name.to_owned()));
        }
        Ok(())
    }

    /// Check that the subcategory currently named `old_name` exists and can be
    /// renamed to `new_name`.
    ///
    /// # Errors
    ///
    /// Returns [`SubCategoryError::NotFound`] if `old_name` does not exist, or
    /// [`SubCategoryError::DuplicateName`] if `new_name` matches another sibling.
    pub fn check_subcategory_rename(
        &self,
        old_name: &str,
        new_name: &str,
    ) -> Result<(), SubCategoryError> {
        if self.find_subcategory(old_name).is_none() {
            return Err(SubCategoryError::NotFound(old_name.to_owned()));
        }
        if self.collides(new_name, Some(old_name)) {
            return Err(SubCategoryError::DuplicateName(new_name.to_owned()));
        }
        Ok(())
    }

    fn collides(&self, name: &str, except: Option<&str>) -> bool {
        let needle = name.trim().to_lowercase();
        self.sub_categories
            .iter()
            .filter(|s| Some(s.name.as_str()) != except)
            .any(|s| s.name.trim().to_lowercase() == needle)
    }
}

/// Drag-and-drop index errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReorderError {
    #[error("position {index} is out of range for {len} categories")]
    OutOfRange { index: usize, len: usize },

    /// The category at `from` is not the one the operator dragged.
    #[error("the category list has changed since it was loaded; reload and try again")]
    Stale { expected: CategoryId },
}

/// Remove the element at `from` and reinsert it at `to`.
///
/// After the call the moved element sits at index `to` and every other
/// element keeps its relative order.
///
/// # Errors
///
/// Returns [`ReorderError::OutOfRange`] without touching the list if either
/// index is past the end.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> Result<(), ReorderError> {
    let len = items.len();
    for index in [from, to] {
        if index >= len {
            return Err(ReorderError::OutOfRange { index, len });
        }
    }
    if from != to {
        let item = items.remove(from);
        items.insert(to, item);
    }
    Ok(())
}

/// One category's new rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRank {
    #[serde(rename = "_id")]
    pub id: CategoryId,
    pub order: usize,
}

/// Full ordering sent to `PUT /categories/reorder`.
///
/// The array order is the new visual order and `order` equals the index, so
/// the ranks always form a permutation of `0..n`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderPayload {
    pub categories: Vec<CategoryRank>,
}

impl ReorderPayload {
    #[must_use]
    pub fn from_categories(categories: &[Category]) -> Self {
        Self {
            categories: categories
                .iter()
                .enumerate()
                .map(|(order, c)| CategoryRank {
                    id: c.id.clone(),
                    order,
                })
                .collect(),
        }
    }

    /// Category IDs in their new order.
    #[must_use]
    pub fn ordered_ids(&self) -> Vec<&CategoryId> {
        self.categories.iter().map(|r| &r.id).collect()
    }
}

/// Apply a drag-and-drop move to `categories` and build the payload for it.
///
/// # Errors
///
/// Propagates [`ReorderError`] from [`move_item`].
pub fn reorder(
    categories: &mut Vec<Category>,
    from: usize,
    to: usize,
) -> Result<ReorderPayload, ReorderError> {
    move_item(categories, from, to)?;
    for (rank, category) in categories.iter_mut().enumerate() {
        category.order = i64::try_from(rank).unwrap_or(i64::MAX);
    }
    Ok(ReorderPayload::from_categories(categories))
}

/// Like [`reorder`], but only when the category at `from` is `expected`.
///
/// Positions come from the operator's view of the list; if the stored list
/// differs there, the move is refused instead of moving another category.
///
/// # Errors
///
/// Returns [`ReorderError::Stale`] on a mismatch, leaving the list
/// unchanged, and otherwise propagates [`ReorderError`] from [`move_item`].
pub fn reorder_expecting(
    categories: &mut Vec<Category>,
    expected: &CategoryId,
    from: usize,
    to: usize,
) -> Result<ReorderPayload, ReorderError> {
    let len = categories.len();
    let at_from = categories
        .get(from)
        .ok_or(ReorderError::OutOfRange { index: from, len })?;
    if &at_from.id != expected {
        return Err(ReorderError::Stale {
            expected: expected.clone(),
        });
    }
    reorder(categories, from, to)
}
