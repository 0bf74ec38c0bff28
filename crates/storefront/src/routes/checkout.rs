//! Checkout route handlers.
//!
//! Orders are placed with the backend as `pending`, paid cash on delivery.
//! There is no payment gateway; the confirmation page is the end of the flow.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use bazaar_core::{BillingInfo, Email, NewOrder, ValidationError, validation};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::models::{Cart, Flash, session_keys};
use crate::routes::cart::CartView;
use crate::routes::layout::Layout;
use crate::state::AppState;

/// Billing form as posted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CheckoutForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

impl CheckoutForm {
    /// Validate every field, collecting all failures.
    ///
    /// # Errors
    ///
    /// Returns one [`ValidationError`] per missing or malformed field, in
    /// form order.
    pub fn validate(&self) -> std::result::Result<BillingInfo, Vec<ValidationError>> {
        let name = validation::required("Name", &self.name);
        let email = validation::required("Email", &self.email).and_then(|raw| {
            Email::parse(&raw)
                .map(Email::into_inner)
                .map_err(|e| ValidationError::Invalid {
                    field: "Email",
                    reason: e.to_string(),
                })
        });
        let phone = validation::required("Phone", &self.phone);
        let address = validation::required("Address", &self.address);

        match (name, email, phone, address) {
            (Ok(name), Ok(email), Ok(phone), Ok(address)) => Ok(BillingInfo {
                name,
                email,
                phone,
                address,
            }),
            (name, email, phone, address) => Err([name, email, phone, address]
                .into_iter()
                .filter_map(std::result::Result::err)
                .collect()),
        }
    }
}

/// Summary of the order just placed, kept in the session for the confirmation page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedOrder {
    pub id: String,
    pub email: String,
    pub item_count: u32,
    pub total: Decimal,
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub layout: Layout,
    pub cart: CartView,
    pub form: CheckoutForm,
    pub errors: Vec<String>,
}

/// Order confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/complete.html")]
pub struct CompleteTemplate {
    pub layout: Layout,
    pub order_id: String,
    pub email: String,
    pub item_count: u32,
    pub total: String,
}

/// Flash and redirect to the cart when there is nothing to check out.
async fn empty_cart_redirect(session: &Session) -> Response {
    Flash::error("Your cart is empty.").set(session).await;
    Redirect::to("/cart").into_response()
}

/// Show the form again with the shopper's input and what went wrong.
async fn rerender(
    state: &AppState,
    session: &Session,
    cart: &Cart,
    form: CheckoutForm,
    errors: Vec<String>,
    status: StatusCode,
) -> Response {
    let template = CheckoutTemplate {
        layout: Layout::load(session, "/checkout").await,
        cart: CartView::new(cart, state),
        form,
        errors,
    };
    (status, template).into_response()
}

/// Billing form and order summary.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Response> {
    let cart = Cart::load(&session).await?;
    if cart.is_empty() {
        return Ok(empty_cart_redirect(&session).await);
    }

    Ok(CheckoutTemplate {
        layout: Layout::load(&session, "/checkout").await,
        cart: CartView::new(&cart, &state),
        form: CheckoutForm::default(),
        errors: Vec::new(),
    }
    .into_response())
}

/// Validate billing details and place the order.
#[instrument(skip(state, session, form))]
pub async fn place_order(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CheckoutForm>,
) -> Result<Response> {
    let cart = Cart::load(&session).await?;
    if cart.is_empty() {
        return Ok(empty_cart_redirect(&session).await);
    }

    let billing = match form.validate() {
        Ok(billing) => billing,
        Err(errors) => {
            let messages = errors.iter().map(ToString::to_string).collect();
            let status = StatusCode::UNPROCESSABLE_ENTITY;
            return Ok(rerender(&state, &session, &cart, form, messages, status).await);
        }
    };

    let order = NewOrder::pending(billing, cart.to_line_items());
    match state.api().place_order(&order).await {
        Ok(placed) => {
            tracing::info!(
                order_id = %placed.id,
                items = cart.item_count(),
                total = %order.total_amount,
                "Order placed"
            );
            add_breadcrumb(
                "checkout",
                "Order placed",
                Some(&[("order_id", placed.id.as_str())]),
            );

            let summary = PlacedOrder {
                id: placed.id.to_string(),
                email: order.billing_info.email.clone(),
                item_count: cart.item_count(),
                total: order.total_amount,
            };
            session.insert(session_keys::LAST_ORDER, &summary).await?;
            Cart::clear(&session).await?;

            let url = format!("/checkout/complete/{}", urlencoding::encode(&summary.id));
            Ok(Redirect::to(&url).into_response())
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to place order");
            let message = "We couldn't place your order. Please try again.".to_string();
            let status = StatusCode::BAD_GATEWAY;
            Ok(rerender(&state, &session, &cart, form, vec![message], status).await)
        }
    }
}

/// Confirmation page for the order this session just placed.
///
/// Any other id redirects home; confirmation pages are not shareable.
#[instrument(skip(state, session))]
pub async fn complete(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Response> {
    let placed = session
        .get::<PlacedOrder>(session_keys::LAST_ORDER)
        .await?
        .filter(|p| p.id == id);

    let Some(placed) = placed else {
        return Ok(Redirect::to("/").into_response());
    };

    Ok(CompleteTemplate {
        layout: Layout::load(&session, "/checkout").await,
        order_id: placed.id,
        email: placed.email,
        item_count: placed.item_count,
        total: state.price(placed.total),
    }
    .into_response())
}
