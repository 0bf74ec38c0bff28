//! Order detail page handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, Query, State};
use bazaar_core::{OrderId, OrderStatus};
use tower_sessions::Session;
use tracing::instrument;

use crate::{
    error::Result,
    filters,
    middleware::RequireOperator,
    models::Notice,
    routes::OperatorView,
    state::AppState,
};

use super::types::{OrderDetailView, OrdersQuery};

/// Order detail overlay template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/show.html")]
pub struct OrderShowTemplate {
    pub operator: OperatorView,
    pub current_path: String,
    pub notice: Option<Notice>,
    pub order: OrderDetailView,
    /// The filtered list this overlay was opened from.
    pub close_url: String,
    pub query_string: String,
    pub statuses: Vec<OrderStatus>,
}

/// Order detail page handler.
#[instrument(skip(operator, state, session))]
pub async fn show(
    RequireOperator(operator): RequireOperator,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Query(query): Query<OrdersQuery>,
) -> Result<OrderShowTemplate> {
    let order = state.api().get_order(&OrderId::new(id)).await?;

    Ok(OrderShowTemplate {
        operator: OperatorView::from(&operator),
        current_path: "/orders".to_string(),
        notice: Notice::take(&session).await,
        order: OrderDetailView::from(&order),
        close_url: query.url_for("/orders"),
        query_string: query.query_string(),
        statuses: OrderStatus::ALL.to_vec(),
    })
}
