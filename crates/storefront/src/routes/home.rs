//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use bazaar_core::Product;
use tower_sessions::Session;
use tracing::instrument;

use crate::filters;
use crate::routes::layout::Layout;
use crate::routes::products::{CategoryLinkView, ProductCardView};
use crate::state::AppState;

/// Cards per carousel.
const CAROUSEL_SIZE: usize = 8;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub layout: Layout,
    pub featured: Vec<ProductCardView>,
    pub new_arrivals: Vec<ProductCardView>,
    pub categories: Vec<CategoryLinkView>,
}

/// Products flagged `featured`, in backend order.
fn featured(products: &[Product]) -> impl Iterator<Item = &Product> {
    products.iter().filter(|p| p.featured).take(CAROUSEL_SIZE)
}

/// The most recently listed products; the backend returns oldest first.
fn new_arrivals(products: &[Product]) -> impl Iterator<Item = &Product> {
    products.iter().rev().take(CAROUSEL_SIZE)
}

fn cards<'a>(products: impl Iterator<Item = &'a Product>, state: &AppState) -> Vec<ProductCardView> {
    products.map(|p| ProductCardView::new(p, state)).collect()
}

/// Display the home page.
///
/// A backend failure degrades to empty sections rather than an error page.
#[instrument(skip(state, session))]
pub async fn home(State(state): State<AppState>, session: Session) -> IndexTemplate {
    let (products, categories) =
        tokio::join!(state.api().list_products(), state.api().list_categories());

    let products = products.unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to load products for home page");
        std::sync::Arc::default()
    });
    let categories = categories.unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to load categories for home page");
        std::sync::Arc::default()
    });

    IndexTemplate {
        layout: Layout::load(&session, "/").await,
        featured: cards(featured(&products), &state),
        new_arrivals: cards(new_arrivals(&products), &state),
        categories: categories.iter().map(CategoryLinkView::from).collect(),
    }
}
