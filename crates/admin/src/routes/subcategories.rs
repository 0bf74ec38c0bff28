//! Subcategory route handlers.
//!
//! Subcategories have no identifier of their own; they are addressed by name
//! within their parent category. Name collisions are rejected here before the
//! backend is called.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::Redirect,
};
use bazaar_core::{Category, CategoryId, SubCategoryError, SubCategoryInput};
use tower_sessions::Session;
use tracing::instrument;

use crate::{
    error::{AppError, Result},
    filters,
    middleware::RequireOperator,
    models::Notice,
    routes::{
        OperatorView,
        categories::{CategoryForm, capitalize, category_url},
        confirm::{ConfirmForm, ConfirmTemplate},
        redirect_with,
    },
    state::AppState,
};

/// Subcategory form (create and edit) template.
#[derive(Template, WebTemplate)]
#[template(path = "categories/subcategory_form.html")]
pub struct SubCategoryFormTemplate {
    pub operator: OperatorView,
    pub current_path: String,
    pub notice: Option<Notice>,
    pub category_id: String,
    pub category_name: String,
    /// Heading, e.g. "Add subcategory".
    pub title: String,
    pub action: String,
    pub name: String,
    pub image: String,
    pub description: String,
}

/// `/categories/{id}/subcategories/{name}/{action}` with both segments encoded.
fn subcategory_url(id: &CategoryId, name: &str, action: &str) -> String {
    format!(
        "/categories/{}/subcategories/{}/{action}",
        urlencoding::encode(id.as_str()),
        urlencoding::encode(name)
    )
}

fn subcategory_error(err: &SubCategoryError) -> AppError {
    match err {
        SubCategoryError::NotFound(_) => AppError::NotFound(err.to_string()),
        SubCategoryError::DuplicateName(_) => AppError::BadRequest(err.to_string()),
    }
}

/// Fetch the parent category of a subcategory page.
async fn parent(state: &AppState, id: String) -> Result<Category> {
    Ok(state.api().get_category(&CategoryId::new(id)).await?)
}

/// New subcategory form.
#[instrument(skip(operator, state, session))]
pub async fn new(
    RequireOperator(operator): RequireOperator,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<SubCategoryFormTemplate> {
    let category = parent(&state, id).await?;

    Ok(SubCategoryFormTemplate {
        operator: OperatorView::from(&operator),
        current_path: "/categories".to_string(),
        notice: Notice::take(&session).await,
        category_id: category.id.to_string(),
        category_name: category.name.clone(),
        title: "Add subcategory".to_string(),
        action: category_url(&category.id, "subcategories"),
        name: String::new(),
        image: String::new(),
        description: String::new(),
    })
}

/// Add a subcategory.
#[instrument(skip(_operator, state, session))]
pub async fn create(
    RequireOperator(_operator): RequireOperator,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Form(form): Form<CategoryForm>,
) -> Result<Redirect> {
    let category = parent(&state, id).await?;
    let form_url = category_url(&category.id, "subcategories/new");

    let input = match SubCategoryInput::from(form).validate() {
        Ok(input) => input,
        Err(e) => {
            return redirect_with(&session, Notice::error(capitalize(&e.to_string())), &form_url)
                .await;
        }
    };

    if let Err(e) = category.check_new_subcategory(&input.name) {
        return redirect_with(&session, Notice::error(capitalize(&e.to_string())), &form_url).await;
    }

    match state.api().add_subcategory(&category.id, &input).await {
        Ok(()) => {
            tracing::info!(category_id = %category.id, name = %input.name, "Subcategory added");
            let notice = Notice::success(format!(
                "Subcategory \"{}\" added to {}.",
                input.name, category.name
            ));
            redirect_with(&session, notice, "/categories").await
        }
        Err(e) => {
            tracing::error!(category_id = %category.id, error = %e, "Failed to add subcategory");
            redirect_with(&session, Notice::error(e.user_message()), &form_url).await
        }
    }
}

/// Edit subcategory form.
#[instrument(skip(operator, state, session))]
pub async fn edit(
    RequireOperator(operator): RequireOperator,
    State(state): State<AppState>,
    session: Session,
    Path((id, name)): Path<(String, String)>,
) -> Result<SubCategoryFormTemplate> {
    let category = parent(&state, id).await?;
    let sub = category
        .find_subcategory(&name)
        .ok_or_else(|| subcategory_error(&SubCategoryError::NotFound(name.clone())))?;

    Ok(SubCategoryFormTemplate {
        operator: OperatorView::from(&operator),
        current_path: "/categories".to_string(),
        notice: Notice::take(&session).await,
        category_id: category.id.to_string(),
        category_name: category.name.clone(),
        title: format!("Edit subcategory \"{}\"", sub.name),
        action: subcategory_url(&category.id, &sub.name, "edit"),
        name: sub.name.clone(),
        image: sub.image.clone(),
        description: sub.description.clone(),
    })
}

/// Update the subcategory currently named `name`.
#[instrument(skip(_operator, state, session))]
pub async fn update(
    RequireOperator(_operator): RequireOperator,
    State(state): State<AppState>,
    session: Session,
    Path((id, name)): Path<(String, String)>,
    Form(form): Form<CategoryForm>,
) -> Result<Redirect> {
    let category = parent(&state, id).await?;
    let form_url = subcategory_url(&category.id, &name, "edit");

    let input = match SubCategoryInput::from(form).validate() {
        Ok(input) => input,
        Err(e) => {
            return redirect_with(&session, Notice::error(capitalize(&e.to_string())), &form_url)
                .await;
        }
    };

    match category.check_subcategory_rename(&name, &input.name) {
        Ok(()) => {}
        Err(e @ SubCategoryError::NotFound(_)) => {
            return redirect_with(&session, Notice::error(capitalize(&e.to_string())), "/categories")
                .await;
        }
        Err(e @ SubCategoryError::DuplicateName(_)) => {
            return redirect_with(&session, Notice::error(capitalize(&e.to_string())), &form_url)
                .await;
        }
    }

    match state.api().update_subcategory(&category.id, &name, &input).await {
        Ok(()) => {
            tracing::info!(category_id = %category.id, old_name = %name, name = %input.name, "Subcategory updated");
            let notice = Notice::success(format!("Subcategory \"{}\" updated.", input.name));
            redirect_with(&session, notice, "/categories").await
        }
        Err(e) => {
            tracing::error!(category_id = %category.id, name = %name, error = %e, "Failed to update subcategory");
            redirect_with(&session, Notice::error(e.user_message()), &form_url).await
        }
    }
}

/// Delete confirmation page.
#[instrument(skip(operator, state, session))]
pub async fn confirm_delete(
    RequireOperator(operator): RequireOperator,
    State(state): State<AppState>,
    session: Session,
    Path((id, name)): Path<(String, String)>,
) -> Result<ConfirmTemplate> {
    let category = parent(&state, id).await?;
    let sub = category
        .find_subcategory(&name)
        .ok_or_else(|| subcategory_error(&SubCategoryError::NotFound(name.clone())))?;

    Ok(ConfirmTemplate {
        operator: OperatorView::from(&operator),
        current_path: "/categories".to_string(),
        notice: Notice::take(&session).await,
        title: "Delete subcategory?".to_string(),
        message: format!(
            "Subcategory \"{}\" will be removed from {}.",
            sub.name, category.name
        ),
        action: subcategory_url(&category.id, &sub.name, "delete"),
        cancel_url: "/categories".to_string(),
    })
}

/// Delete a subcategory once confirmed.
#[instrument(skip(_operator, state, session))]
pub async fn delete(
    RequireOperator(_operator): RequireOperator,
    State(state): State<AppState>,
    session: Session,
    Path((id, name)): Path<(String, String)>,
    Form(form): Form<ConfirmForm>,
) -> Result<Redirect> {
    if !form.confirmed() {
        return Ok(Redirect::to("/categories"));
    }

    let id = CategoryId::new(id);
    let notice = match state.api().delete_subcategory(&id, &name).await {
        Ok(()) => {
            tracing::info!(category_id = %id, name = %name, "Subcategory deleted");
            Notice::success(format!("Subcategory \"{name}\" deleted."))
        }
        Err(e) => {
            tracing::error!(category_id = %id, name = %name, error = %e, "Failed to delete subcategory");
            Notice::error(e.user_message())
        }
    };

    redirect_with(&session, notice, "/categories").await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subcategory_url_encodes_name() {
        assert_eq!(
            subcategory_url(&CategoryId::new("c1"), "T-Shirts & Tops", "edit"),
            "/categories/c1/subcategories/T-Shirts%20%26%20Tops/edit"
        );
    }

    #[test]
    fn test_subcategory_errors_map_to_status() {
        let missing = subcategory_error(&SubCategoryError::NotFound("x".to_string()));
        assert_eq!(missing.status(), axum::http::StatusCode::NOT_FOUND);
        let dup = subcategory_error(&SubCategoryError::DuplicateName("x".to_string()));
        assert_eq!(dup.status(), axum::http::StatusCode::BAD_REQUEST);
    }
}
