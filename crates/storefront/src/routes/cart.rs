//! Cart route handlers.
//!
//! The cart lives in the session. Mutations answer with a redirect to the
//! cart page, or with the count badge fragment and an `HX-Trigger` header
//! when the request came from HTMX.

use std::collections::BTreeMap;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::HeaderMap,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use bazaar_core::ProductId;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::api::ApiError;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::models::{Cart, CartLine, Flash};
use crate::routes::layout::Layout;
use crate::state::AppState;

/// Cart line display data for templates.
#[derive(Debug, Clone)]
pub struct CartItemView {
    /// Line key posted back by the update/remove forms.
    pub key: String,
    pub product_id: String,
    pub name: String,
    pub image: String,
    pub options: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

/// Cart display data for templates.
#[derive(Debug, Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u32,
}

impl CartView {
    #[must_use]
    pub fn new(cart: &Cart, state: &AppState) -> Self {
        Self {
            items: cart
                .lines
                .iter()
                .map(|line| CartItemView::new(line, state))
                .collect(),
            subtotal: state.price(cart.subtotal()),
            item_count: cart.item_count(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl CartItemView {
    fn new(line: &CartLine, state: &AppState) -> Self {
        Self {
            key: line.key(),
            product_id: line.product_id.to_string(),
            name: line.name.clone(),
            image: line.image.clone(),
            options: line
                .options
                .iter()
                .map(|(k, v)| format!("{k}: {v}"))
                .collect::<Vec<_>>()
                .join(", "),
            quantity: line.quantity,
            price: state.price(line.unit_price),
            line_price: state.price(line.line_total()),
        }
    }
}

// =============================================================================
// Forms
// =============================================================================

/// Add-to-cart submission.
///
/// Posted fields are `product_id`, optional `quantity` (default 1) and one
/// `option[<name>]` field per product option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddToCartForm {
    pub product_id: ProductId,
    pub quantity: u32,
    pub options: BTreeMap<String, String>,
}

impl AddToCartForm {
    /// Build from raw form pairs.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::BadRequest`] when `product_id` is missing or the
    /// quantity is not a number.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Result<Self> {
        let mut product_id = None;
        let mut quantity = 1;
        let mut options = BTreeMap::new();

        for (name, value) in pairs {
            if let Some(option) = name
                .strip_prefix("option[")
                .and_then(|rest| rest.strip_suffix(']'))
            {
                options.insert(option.to_string(), value);
                continue;
            }
            match name.as_str() {
                "product_id" if !value.trim().is_empty() => {
                    product_id = Some(ProductId::new(value.trim()));
                }
                "quantity" if !value.trim().is_empty() => {
                    quantity = value.trim().parse().map_err(|_| {
                        AppError::BadRequest(format!("invalid quantity '{value}'"))
                    })?;
                }
                _ => {}
            }
        }

        Ok(Self {
            product_id: product_id
                .ok_or_else(|| AppError::BadRequest("product_id is required".to_string()))?,
            quantity,
            options,
        })
    }
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub key: String,
    pub quantity: u32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub key: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub layout: Layout,
    pub cart: CartView,
}

/// Cart count badge fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

fn is_htmx(headers: &HeaderMap) -> bool {
    headers.get("hx-request").is_some_and(|v| v == "true")
}

/// Answer a cart mutation: badge fragment for HTMX, otherwise flash and redirect.
async fn respond(session: &Session, headers: &HeaderMap, cart: &Cart, flash: Flash) -> Response {
    if is_htmx(headers) && !flash.is_error {
        return (
            AppendHeaders([("HX-Trigger", "cart-updated")]),
            CartCountTemplate {
                count: cart.item_count(),
            },
        )
            .into_response();
    }
    flash.set(session).await;
    Redirect::to("/cart").into_response()
}

// =============================================================================
// Handlers
// =============================================================================

/// Display cart page.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<CartShowTemplate> {
    let cart = Cart::load(&session).await?;
    Ok(CartShowTemplate {
        layout: Layout::load(&session, "/cart").await,
        cart: CartView::new(&cart, &state),
    })
}

/// Add a product to the cart.
#[instrument(skip(state, session, headers, pairs))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response> {
    let form = AddToCartForm::from_pairs(pairs)?;
    let product_url = format!("/products/{}", urlencoding::encode(form.product_id.as_str()));

    let product = match state.api().get_product(&form.product_id).await {
        Ok(product) => product,
        Err(ApiError::NotFound(_)) => {
            Flash::error("That product is no longer available.").set(&session).await;
            return Ok(Redirect::to("/products").into_response());
        }
        Err(e) => return Err(e.into()),
    };

    let mut cart = Cart::load(&session).await?;
    if let Err(e) = cart.add(&product, form.quantity, &form.options) {
        tracing::info!(product_id = %product.id, reason = %e, "Add to cart refused");
        Flash::error(e.to_string()).set(&session).await;
        return Ok(Redirect::to(&product_url).into_response());
    }
    cart.save(&session).await?;

    let quantity = form.quantity.to_string();
    add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[
            ("product_id", product.id.as_str()),
            ("quantity", quantity.as_str()),
        ]),
    );
    tracing::info!(product_id = %product.id, quantity = form.quantity, "Added to cart");

    let flash = Flash::success(format!("Added {} to your cart.", product.name));
    Ok(respond(&session, &headers, &cart, flash).await)
}

/// Set a line's quantity; zero removes the line.
///
/// Non-zero quantities are checked against the product's current stock.
#[instrument(skip(state, session, headers))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    let mut cart = Cart::load(&session).await?;
    let Some(line) = cart.line(&form.key) else {
        let flash = Flash::error("That item is no longer in your cart.");
        return Ok(respond(&session, &headers, &cart, flash).await);
    };

    let stock = if form.quantity == 0 {
        0
    } else {
        match state.api().get_product(&line.product_id).await {
            Ok(product) => product.stock,
            Err(ApiError::NotFound(_)) => 0,
            Err(e) => return Err(e.into()),
        }
    };

    let flash = match cart.set_quantity(&form.key, form.quantity, stock) {
        Ok(_) => {
            cart.save(&session).await?;
            Flash::success("Cart updated.")
        }
        Err(e) => {
            tracing::info!(key = %form.key, quantity = form.quantity, reason = %e, "Cart update refused");
            Flash::error(e.to_string())
        }
    };
    Ok(respond(&session, &headers, &cart, flash).await)
}

/// Remove a line from the cart.
#[instrument(skip(session, headers))]
pub async fn remove(
    session: Session,
    headers: HeaderMap,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response> {
    let mut cart = Cart::load(&session).await?;
    let flash = if cart.remove(&form.key) {
        cart.save(&session).await?;
        Flash::success("Item removed.")
    } else {
        Flash::error("That item is no longer in your cart.")
    };
    Ok(respond(&session, &headers, &cart, flash).await)
}

/// Cart count badge fragment.
#[instrument(skip(session))]
pub async fn count(session: Session) -> CartCountTemplate {
    let count = Cart::load(&session)
        .await
        .map(|cart| cart.item_count())
        .unwrap_or(0);
    CartCountTemplate { count }
}
