//! Single order mutations: status change and delete.

use axum::{
    Form,
    extract::{Path, Query, State},
    response::Redirect,
};
use bazaar_core::{OrderId, OrderStatus};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::{
    error::Result,
    middleware::RequireOperator,
    models::Notice,
    routes::{
        OperatorView,
        confirm::{ConfirmForm, ConfirmTemplate},
        redirect_with,
    },
    state::AppState,
};

use super::types::OrdersQuery;

/// Form input for a status change.
#[derive(Debug, Deserialize)]
pub struct StatusInput {
    pub status: String,
}

/// Change an order's status immediately. No confirmation step.
#[instrument(skip(_operator, state, session))]
pub async fn update_status(
    RequireOperator(_operator): RequireOperator,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Query(query): Query<OrdersQuery>,
    Form(input): Form<StatusInput>,
) -> Result<Redirect> {
    let back = query.url_for("/orders");

    let Ok(status) = input.status.parse::<OrderStatus>() else {
        let notice = Notice::error(format!("\"{}\" is not an order status.", input.status));
        return redirect_with(&session, notice, &back).await;
    };

    let order_id = OrderId::new(id);
    let notice = match state.api().update_order_status(&order_id, status).await {
        Ok(()) => {
            tracing::info!(order_id = %order_id, status = %status, "Order status updated");
            Notice::success(format!("Order {order_id} is now {}.", status.label()))
        }
        Err(e) => {
            tracing::error!(order_id = %order_id, error = %e, "Failed to update order status");
            Notice::error(e.user_message())
        }
    };

    redirect_with(&session, notice, &back).await
}

/// Delete confirmation page.
#[instrument(skip(operator, state, session))]
pub async fn confirm_delete(
    RequireOperator(operator): RequireOperator,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Query(query): Query<OrdersQuery>,
) -> Result<ConfirmTemplate> {
    let order = state.api().get_order(&OrderId::new(id)).await?;

    Ok(ConfirmTemplate {
        operator: OperatorView::from(&operator),
        current_path: "/orders".to_string(),
        notice: Notice::take(&session).await,
        title: "Delete order?".to_string(),
        message: format!(
            "Order {} from {} will be permanently deleted.",
            order.id, order.billing_info.name
        ),
        action: query.url_for(&format!("/orders/{}/delete", urlencoding::encode(order.id.as_str()))),
        cancel_url: query.url_for("/orders"),
    })
}

/// Delete an order once confirmed; anything but `confirm=yes` changes nothing.
#[instrument(skip(_operator, state, session))]
pub async fn delete(
    RequireOperator(_operator): RequireOperator,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Query(query): Query<OrdersQuery>,
    Form(form): Form<ConfirmForm>,
) -> Result<Redirect> {
    let back = query.url_for("/orders");
    if !form.confirmed() {
        return Ok(Redirect::to(&back));
    }

    let order_id = OrderId::new(id);
    let notice = match state.api().delete_order(&order_id).await {
        Ok(()) => {
            tracing::info!(order_id = %order_id, "Order deleted");
            Notice::success(format!("Order {order_id} deleted."))
        }
        Err(e) => {
            tracing::error!(order_id = %order_id, error = %e, "Failed to delete order");
            Notice::error(e.user_message())
        }
    };

    redirect_with(&session, notice, &back).await
}
