//! Category tree editor route handlers.
//!
//! Categories are listed in their stored rank order. Mutations redirect back
//! to the list with a notice; the category cache is invalidated by the API
//! client so the next render refetches.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Json,
    extract::{FromRequest, Path, Request, State},
    http::header,
    response::{IntoResponse, Redirect, Response},
};
use bazaar_core::{
    Category, CategoryId, CategoryInput, ReorderError, ReorderPayload, SubCategory, catalog,
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::{
    error::{AppError, Result},
    filters,
    middleware::RequireOperator,
    models::Notice,
    routes::{
        OperatorView,
        confirm::{ConfirmForm, ConfirmTemplate},
        redirect_with,
    },
    state::AppState,
};

// =============================================================================
// View Types
// =============================================================================

/// Subcategory display data.
#[derive(Debug, Clone)]
pub struct SubCategoryView {
    pub name: String,
    pub image: String,
    pub description: String,
}

impl From<&SubCategory> for SubCategoryView {
    fn from(sub: &SubCategory) -> Self {
        Self {
            name: sub.name.clone(),
            image: sub.image.clone(),
            description: sub.description.clone(),
        }
    }
}

/// Category display data.
#[derive(Debug, Clone)]
pub struct CategoryView {
    pub id: String,
    pub name: String,
    pub image: String,
    pub description: String,
    pub sub_categories: Vec<SubCategoryView>,
}

impl From<&Category> for CategoryView {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id.to_string(),
            name: category.name.clone(),
            image: category.image.clone(),
            description: category.description.clone(),
            sub_categories: category
                .sub_categories
                .iter()
                .map(SubCategoryView::from)
                .collect(),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Category list template.
#[derive(Template, WebTemplate)]
#[template(path = "categories/index.html")]
pub struct CategoriesIndexTemplate {
    pub operator: OperatorView,
    pub current_path: String,
    pub notice: Option<Notice>,
    pub categories: Vec<CategoryView>,
    /// Set when the list could not be fetched.
    pub load_error: Option<String>,
}

/// Category edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "categories/edit.html")]
pub struct CategoryEditTemplate {
    pub operator: OperatorView,
    pub current_path: String,
    pub notice: Option<Notice>,
    pub category: CategoryView,
}

// =============================================================================
// Form Inputs
// =============================================================================

/// Category form fields. Missing fields deserialize as empty.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CategoryForm {
    pub name: String,
    pub image: String,
    pub description: String,
}

impl From<CategoryForm> for CategoryInput {
    fn from(form: CategoryForm) -> Self {
        Self {
            name: form.name,
            image: form.image,
            description: form.description,
        }
    }
}

/// A drag-and-drop move, by position in the displayed list.
///
/// `id` names the category the operator moved; the move is refused when the
/// stored list holds a different one at `from`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReorderRequest {
    pub id: CategoryId,
    pub from: usize,
    pub to: usize,
}

/// JSON reply to a drag-and-drop move.
#[derive(Debug, Serialize)]
pub struct ReorderResponse {
    pub ok: bool,
    pub message: String,
    /// Category ids in their new order; empty on failure.
    pub order: Vec<CategoryId>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Category list page handler.
#[instrument(skip(operator, state, session))]
pub async fn index(
    RequireOperator(operator): RequireOperator,
    State(state): State<AppState>,
    session: Session,
) -> CategoriesIndexTemplate {
    let (categories, load_error) = match state.api().list_categories().await {
        Ok(list) => (list.iter().map(CategoryView::from).collect(), None),
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch categories");
            (vec![], Some(e.user_message()))
        }
    };

    CategoriesIndexTemplate {
        operator: OperatorView::from(&operator),
        current_path: "/categories".to_string(),
        notice: Notice::take(&session).await,
        categories,
        load_error,
    }
}

/// Create a category.
#[instrument(skip(_operator, state, session))]
pub async fn create(
    RequireOperator(_operator): RequireOperator,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CategoryForm>,
) -> Result<Redirect> {
    let notice = match CategoryInput::from(form).validate() {
        Err(e) => Notice::error(capitalize(&e.to_string())),
        Ok(input) => match state.api().create_category(&input).await {
            Ok(category) => {
                tracing::info!(category_id = %category.id, name = %category.name, "Category created");
                Notice::success(format!("Category \"{}\" created.", category.name))
            }
            Err(e) => {
                tracing::error!(name = %input.name, error = %e, "Failed to create category");
                Notice::error(e.user_message())
            }
        },
    };

    redirect_with(&session, notice, "/categories").await
}

/// Category edit page handler.
#[instrument(skip(operator, state, session))]
pub async fn edit(
    RequireOperator(operator): RequireOperator,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<CategoryEditTemplate> {
    let category = state.api().get_category(&CategoryId::new(id)).await?;

    Ok(CategoryEditTemplate {
        operator: OperatorView::from(&operator),
        current_path: "/categories".to_string(),
        notice: Notice::take(&session).await,
        category: CategoryView::from(&category),
    })
}

/// Update a category.
#[instrument(skip(_operator, state, session))]
pub async fn update(
    RequireOperator(_operator): RequireOperator,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Form(form): Form<CategoryForm>,
) -> Result<Redirect> {
    let id = CategoryId::new(id);
    let edit_url = category_url(&id, "edit");

    let input = match CategoryInput::from(form).validate() {
        Ok(input) => input,
        Err(e) => {
            return redirect_with(&session, Notice::error(capitalize(&e.to_string())), &edit_url)
                .await;
        }
    };

    match state.api().update_category(&id, &input).await {
        Ok(category) => {
            tracing::info!(category_id = %id, "Category updated");
            let notice = Notice::success(format!("Category \"{}\" updated.", category.name));
            redirect_with(&session, notice, "/categories").await
        }
        Err(e) => {
            tracing::error!(category_id = %id, error = %e, "Failed to update category");
            redirect_with(&session, Notice::error(e.user_message()), &edit_url).await
        }
    }
}

/// Delete confirmation page.
#[instrument(skip(operator, state, session))]
pub async fn confirm_delete(
    RequireOperator(operator): RequireOperator,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<ConfirmTemplate> {
    let category = state.api().get_category(&CategoryId::new(id)).await?;

    let message = match category.sub_categories.len() {
        0 => format!("Category \"{}\" will be permanently deleted.", category.name),
        n => format!(
            "Category \"{}\" and its {n} subcategor{} will be permanently deleted.",
            category.name,
            if n == 1 { "y" } else { "ies" }
        ),
    };

    Ok(ConfirmTemplate {
        operator: OperatorView::from(&operator),
        current_path: "/categories".to_string(),
        notice: Notice::take(&session).await,
        title: "Delete category?".to_string(),
        message,
        action: category_url(&category.id, "delete"),
        cancel_url: "/categories".to_string(),
    })
}

/// Delete a category once confirmed. The backend removes its subcategories.
#[instrument(skip(_operator, state, session))]
pub async fn delete(
    RequireOperator(_operator): RequireOperator,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Form(form): Form<ConfirmForm>,
) -> Result<Redirect> {
    if !form.confirmed() {
        return Ok(Redirect::to("/categories"));
    }

    let id = CategoryId::new(id);
    let notice = match state.api().delete_category(&id).await {
        Ok(()) => {
            tracing::info!(category_id = %id, "Category deleted");
            Notice::success("Category deleted.")
        }
        Err(e) => {
            tracing::error!(category_id = %id, error = %e, "Failed to delete category");
            Notice::error(e.user_message())
        }
    };

    redirect_with(&session, notice, "/categories").await
}

/// Apply a drag-and-drop move.
///
/// The drag script posts JSON and gets JSON back. The move-up/move-down
/// buttons post a form and get a redirect. Both name the moved category, and
/// a move computed against an outdated list is refused with 409 and no save.
/// Nothing is rolled back; the stored order shows after the next reload.
#[instrument(skip(_operator, state, session, request))]
pub async fn reorder(
    RequireOperator(_operator): RequireOperator,
    State(state): State<AppState>,
    session: Session,
    request: Request,
) -> Result<Response> {
    if is_json(&request) {
        let Json(body) = Json::<ReorderRequest>::from_request(request, &state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        let response = match apply_reorder(&state, body).await {
            Ok(payload) => Json(ReorderResponse {
                ok: true,
                message: "Category order saved.".to_string(),
                order: payload.ordered_ids().into_iter().cloned().collect(),
            })
            .into_response(),
            Err(e) => (
                e.status(),
                Json(ReorderResponse {
                    ok: false,
                    message: e.public_message(),
                    order: vec![],
                }),
            )
                .into_response(),
        };
        return Ok(response);
    }

    let Form(body) = Form::<ReorderRequest>::from_request(request, &state)
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?;

    let notice = match apply_reorder(&state, body).await {
        Ok(_) => Notice::success("Category order saved."),
        Err(e) => Notice::error(e.public_message()),
    };
    Ok(redirect_with(&session, notice, "/categories")
        .await?
        .into_response())
}

/// Move one category within the stored order and send the full new order.
async fn apply_reorder(state: &AppState, body: ReorderRequest) -> Result<ReorderPayload> {
    let mut categories = Vec::clone(&*state.api().list_categories().await?);
    let payload = catalog::reorder_expecting(&mut categories, &body.id, body.from, body.to)
        .map_err(|e| match &e {
            ReorderError::Stale { .. } => {
                tracing::warn!(category_id = %body.id, from = body.from, "Refused reorder of a stale list");
                AppError::Conflict(capitalize(&e.to_string()))
            }
            ReorderError::OutOfRange { .. } => AppError::BadRequest(e.to_string()),
        })?;

    if body.from == body.to {
        return Ok(payload);
    }

    state
        .api()
        .reorder_categories(&payload)
        .await
        .inspect_err(|e| {
            tracing::error!(category_id = %body.id, from = body.from, to = body.to, error = %e, "Failed to save category order");
        })?;
    tracing::info!(category_id = %body.id, from = body.from, to = body.to, "Category order saved");
    Ok(payload)
}

fn is_json(request: &Request) -> bool {
    request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"))
}

/// `/categories/{id}/{action}` with the id percent-encoded.
pub(crate) fn category_url(id: &CategoryId, action: &str) -> String {
    format!("/categories/{}/{action}", urlencoding::encode(id.as_str()))
}

/// Uppercase the first letter of a validation message.
pub(crate) fn capitalize(message: &str) -> String {
    let mut chars = message.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_category_view_carries_subcategories() {
        let category = Category {
            id: CategoryId::new("c1"),
            name: "Women".to_string(),
            image: "https://cdn.example.com/w.jpg".to_string(),
            description: String::new(),
            sub_categories: vec![SubCategory {
                name: "Saree".to_string(),
                image: String::new(),
                description: "Handloom".to_string(),
            }],
            order: 3,
        };
        let view = CategoryView::from(&category);
        assert_eq!(view.id, "c1");
        assert_eq!(view.sub_categories.len(), 1);
        assert_eq!(view.sub_categories[0].description, "Handloom");
    }

    #[test]
    fn test_category_form_to_input() {
        let input: CategoryInput = CategoryForm {
            name: " Kids ".to_string(),
            ..CategoryForm::default()
        }
        .into();
        assert_eq!(input.validate().unwrap().name, "Kids");
    }

    #[test]
    fn test_category_url_encodes_id() {
        assert_eq!(category_url(&CategoryId::new("a/b"), "edit"), "/categories/a%2Fb/edit");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("name is required"), "Name is required");
        assert_eq!(capitalize(""), "");
    }
}
