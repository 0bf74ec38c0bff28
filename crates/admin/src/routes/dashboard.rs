//! Dashboard route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use bazaar_core::{Category, Order, OrderStatus};
use tower_sessions::Session;
use tracing::instrument;

use crate::{
    filters,
    middleware::RequireOperator,
    models::{CurrentOperator, Notice},
    state::AppState,
};

use super::orders::OrderRowView;

/// Number of orders listed under "Recent orders".
const RECENT_ORDERS: usize = 5;

/// Operator view for templates.
#[derive(Debug, Clone)]
pub struct OperatorView {
    pub name: String,
    pub email: String,
}

impl From<&CurrentOperator> for OperatorView {
    fn from(operator: &CurrentOperator) -> Self {
        Self {
            name: operator.display_name().to_string(),
            email: operator.profile.email.clone(),
        }
    }
}

/// Orders in one status.
#[derive(Debug, Clone)]
pub struct StatusCount {
    pub status: OrderStatus,
    pub count: usize,
}

/// Dashboard metrics.
#[derive(Debug, Clone, Default)]
pub struct DashboardMetrics {
    pub categories: usize,
    pub subcategories: usize,
    pub orders: usize,
    pub by_status: Vec<StatusCount>,
}

impl DashboardMetrics {
    #[must_use]
    pub fn compute(categories: &[Category], orders: &[Order]) -> Self {
        Self {
            categories: categories.len(),
            subcategories: categories.iter().map(|c| c.sub_categories.len()).sum(),
            orders: orders.len(),
            by_status: OrderStatus::ALL
                .into_iter()
                .map(|status| StatusCount {
                    status,
                    count: orders.iter().filter(|o| o.status == status).count(),
                })
                .collect(),
        }
    }
}

/// Dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub operator: OperatorView,
    pub current_path: String,
    pub notice: Option<Notice>,
    pub metrics: DashboardMetrics,
    pub recent_orders: Vec<OrderRowView>,
}

/// Most recent orders first.
fn recent_orders(orders: &[Order], limit: usize) -> Vec<OrderRowView> {
    let mut recent: Vec<&Order> = orders.iter().collect();
    recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    recent.into_iter().take(limit).map(OrderRowView::from).collect()
}

/// Dashboard page handler.
#[instrument(skip(operator, state, session))]
pub async fn index(
    RequireOperator(operator): RequireOperator,
    State(state): State<AppState>,
    session: Session,
) -> DashboardTemplate {
    let (categories, orders) = tokio::join!(state.api().list_categories(), state.api().list_orders());

    let categories = categories.unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to fetch categories for dashboard");
        std::sync::Arc::default()
    });
    let orders = orders.unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to fetch orders for dashboard");
        std::sync::Arc::default()
    });

    DashboardTemplate {
        operator: OperatorView::from(&operator),
        current_path: "/".to_string(),
        notice: Notice::take(&session).await,
        metrics: DashboardMetrics::compute(&categories, &orders),
        recent_orders: recent_orders(&orders, RECENT_ORDERS),
    }
}
