//! Orders list page and CSV export handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use bazaar_core::{ExportError, OrderStatus, export_file_name, orders_csv};
use tower_sessions::Session;
use tracing::instrument;

use crate::{
    components::data_table::{DataTableConfig, orders_table_config},
    error::Result,
    filters,
    middleware::RequireOperator,
    models::Notice,
    routes::{OperatorView, redirect_with},
    state::AppState,
};

use super::types::{OrderRowView, OrdersQuery};

/// Orders list page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/index.html")]
pub struct OrdersIndexTemplate {
    pub operator: OperatorView,
    pub current_path: String,
    pub notice: Option<Notice>,
    /// Columns, filter controls and empty state.
    pub table: DataTableConfig,
    /// Orders matching the active filters.
    pub orders: Vec<OrderRowView>,
    /// Size of the unfiltered list.
    pub total_count: usize,
    pub search_value: String,
    pub date_value: String,
    pub status_value: String,
    /// Encoded filter parameters to carry through links and forms.
    pub query_string: String,
    /// Options for the per-row status selector.
    pub statuses: Vec<OrderStatus>,
    /// Set when the order list could not be fetched.
    pub load_error: Option<String>,
}

impl OrdersIndexTemplate {
    /// Whether any filter narrowed the list.
    #[must_use]
    pub fn is_filtered(&self) -> bool {
        !self.query_string.is_empty()
    }

    /// `?query` suffix for links, or nothing.
    #[must_use]
    pub fn query_suffix(&self) -> String {
        if self.query_string.is_empty() {
            String::new()
        } else {
            format!("?{}", self.query_string)
        }
    }
}

/// Orders list page handler.
#[instrument(skip(operator, state, session))]
pub async fn index(
    RequireOperator(operator): RequireOperator,
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<OrdersQuery>,
) -> OrdersIndexTemplate {
    let (filter, warnings) = query.to_filter();

    let (orders, total_count, load_error) = match state.api().list_orders().await {
        Ok(all) => {
            let rows: Vec<OrderRowView> =
                filter.apply(&all).into_iter().map(OrderRowView::from).collect();
            (rows, all.len(), None)
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch orders");
            (vec![], 0, Some(e.user_message()))
        }
    };

    let flashed = Notice::take(&session).await;
    let notice = flashed.or_else(|| (!warnings.is_empty()).then(|| Notice::info(warnings.join(" "))));

    OrdersIndexTemplate {
        operator: OperatorView::from(&operator),
        current_path: "/orders".to_string(),
        notice,
        table: orders_table_config(),
        orders,
        total_count,
        search_value: query.search.clone().unwrap_or_default(),
        date_value: query.date.clone().unwrap_or_default(),
        status_value: query.status_value(),
        query_string: query.query_string(),
        statuses: OrderStatus::ALL.to_vec(),
        load_error,
    }
}

/// Download the filtered orders as CSV.
///
/// With nothing to export, redirects back to the list with a notice instead of
/// sending an empty file.
#[instrument(skip(_operator, state, session))]
pub async fn export(
    RequireOperator(_operator): RequireOperator,
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<OrdersQuery>,
) -> Result<Response> {
    let back = query.url_for("/orders");
    let all = match state.api().list_orders().await {
        Ok(all) => all,
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch orders for export");
            let notice = Notice::error(e.user_message());
            return Ok(redirect_with(&session, notice, &back).await?.into_response());
        }
    };

    let (filter, _) = query.to_filter();
    let filtered = filter.apply(&all);

    match orders_csv(&filtered) {
        Ok(csv) => {
            let file_name = export_file_name(chrono::Utc::now().date_naive());
            tracing::info!(rows = filtered.len(), file_name = %file_name, "Orders exported");
            Ok((
                [
                    (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{file_name}\""),
                    ),
                ],
                csv,
            )
                .into_response())
        }
        Err(ExportError::NoOrders) => {
            let notice = Notice::info("No orders match the current filters, so there is nothing to export.");
            Ok(redirect_with(&session, notice, &back).await?.into_response())
        }
    }
}
