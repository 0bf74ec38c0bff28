//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, Query, State};
use bazaar_core::{Category, Product, ProductId};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::api::ApiError;
use crate::error::{AppError, Result};
use crate::filters;
use crate::routes::layout::Layout;
use crate::state::AppState;

/// How many same-category products the detail page suggests.
const RELATED_LIMIT: usize = 4;

/// Product card display data for templates.
#[derive(Debug, Clone)]
pub struct ProductCardView {
    pub id: String,
    pub name: String,
    pub image: Option<String>,
    /// Effective price, formatted.
    pub price: String,
    /// Crossed-out list price when discounted.
    pub compare_at_price: Option<String>,
    pub discount_percent: u32,
    pub in_stock: bool,
}

impl ProductCardView {
    #[must_use]
    pub fn new(product: &Product, state: &AppState) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            image: product.primary_image().map(str::to_string),
            price: state.price(product.effective_price()),
            compare_at_price: product
                .is_discounted()
                .then(|| state.price(product.price)),
            discount_percent: product.discount_percent(),
            in_stock: product.in_stock(),
        }
    }
}

/// A selectable option and its values.
#[derive(Debug, Clone)]
pub struct OptionView {
    pub name: String,
    pub values: Vec<String>,
}

/// Product detail display data for templates.
#[derive(Debug, Clone)]
pub struct ProductDetailView {
    pub card: ProductCardView,
    pub description: String,
    pub images: Vec<String>,
    pub category: String,
    pub sub_category: Option<String>,
    pub options: Vec<OptionView>,
    pub stock: u32,
}

impl ProductDetailView {
    #[must_use]
    pub fn new(product: &Product, state: &AppState) -> Self {
        Self {
            card: ProductCardView::new(product, state),
            description: product.description.clone(),
            images: product.images.clone(),
            category: product.category.clone(),
            sub_category: product.sub_category.clone(),
            options: product
                .options
                .iter()
                .filter(|o| !o.values.is_empty())
                .map(|o| OptionView {
                    name: o.name.clone(),
                    values: o.values.clone(),
                })
                .collect(),
            stock: product.stock,
        }
    }
}

/// Catalog filter query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    /// Category or subcategory name.
    pub category: Option<String>,
    /// Free-text search.
    pub q: Option<String>,
}

impl CatalogQuery {
    fn category(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }

    fn search(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }

    /// Products passing both filters, in backend order.
    #[must_use]
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        products
            .iter()
            .filter(|p| self.category().is_none_or(|c| p.in_category(c)))
            .filter(|p| self.search().is_none_or(|q| p.matches_query(q)))
            .collect()
    }

    /// Page heading for the current filters.
    #[must_use]
    pub fn heading(&self) -> String {
        match (self.category(), self.search()) {
            (Some(c), Some(q)) => format!("\u{201c}{q}\u{201d} in {c}"),
            (Some(c), None) => c.to_string(),
            (None, Some(q)) => format!("Results for \u{201c}{q}\u{201d}"),
            (None, None) => "All products".to_string(),
        }
    }
}

/// Category link for the filter strip.
#[derive(Debug, Clone)]
pub struct CategoryLinkView {
    pub name: String,
    pub image: String,
    pub subcategories: Vec<String>,
}

impl From<&Category> for CategoryLinkView {
    fn from(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            image: category.image.clone(),
            subcategories: category
                .sub_categories
                .iter()
                .map(|s| s.name.clone())
                .collect(),
        }
    }
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub layout: Layout,
    pub heading: String,
    pub products: Vec<ProductCardView>,
    pub categories: Vec<CategoryLinkView>,
    pub selected_category: String,
    pub search: String,
}

impl ProductsIndexTemplate {
    fn is_selected(&self, category: &str) -> bool {
        self.selected_category.eq_ignore_ascii_case(category)
    }
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub layout: Layout,
    pub product: ProductDetailView,
    pub related_products: Vec<ProductCardView>,
}

/// Display product listing page.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<CatalogQuery>,
) -> Result<ProductsIndexTemplate> {
    let (products, categories) =
        tokio::join!(state.api().list_products(), state.api().list_categories());
    let products = products?;
    let categories = categories.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load categories for filter strip");
        std::sync::Arc::default()
    });

    let matching = query.apply(&products);
    tracing::debug!(matching = matching.len(), total = products.len(), "Filtered catalog");

    Ok(ProductsIndexTemplate {
        layout: Layout::load(&session, "/products").await,
        heading: query.heading(),
        products: matching
            .into_iter()
            .map(|p| ProductCardView::new(p, &state))
            .collect(),
        categories: categories.iter().map(CategoryLinkView::from).collect(),
        selected_category: query.category().unwrap_or_default().to_string(),
        search: query.search().unwrap_or_default().to_string(),
    })
}

/// Display product detail page.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<ProductShowTemplate> {
    let id = ProductId::new(id);
    let product = state.api().get_product(&id).await.map_err(|e| match e {
        ApiError::NotFound(_) => AppError::NotFound(format!("product {id}")),
        other => AppError::Api(other),
    })?;

    // Suggestions are best-effort
    let related_products = match state.api().list_products().await {
        Ok(all) => related(&product, &all)
            .map(|p| ProductCardView::new(p, &state))
            .collect(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load related products");
            Vec::new()
        }
    };

    Ok(ProductShowTemplate {
        layout: Layout::load(&session, "/products").await,
        product: ProductDetailView::new(&product, &state),
        related_products,
    })
}

/// In-stock products from the same category, excluding `product` itself.
fn related<'a>(product: &'a Product, all: &'a [Product]) -> impl Iterator<Item = &'a Product> {
    all.iter()
        .filter(move |p| p.id != product.id && p.in_stock() && p.in_category(&product.category))
        .take(RELATED_LIMIT)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
pub(crate) mod tests {
    use super::*;
    use bazaar_core::ProductOption;
    use rust_decimal::Decimal;

    pub(crate) fn product(id: &str, name: &str, category: &str, stock: u32) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            description: format!("{name} description"),
            price: Decimal::from(1200),
            discount_price: None,
            images: vec![format!("https://cdn.example.com/{id}.jpg")],
            category: category.to_string(),
            sub_category: None,
            options: vec![ProductOption {
                name: "Size".to_string(),
                values: vec!["M".to_string()],
            }],
            stock,
            featured: false,
        }
    }

    fn query(category: Option<&str>, q: Option<&str>) -> CatalogQuery {
        CatalogQuery {
            category: category.map(str::to_string),
            q: q.map(str::to_string),
        }
    }

    #[test]
    fn test_catalog_filters_compose() {
        let products = vec![
            product("1", "Silk Saree", "Women", 2),
            product("2", "Cotton Panjabi", "Men", 2),
            product("3", "Cotton Kurti", "Women", 2),
        ];
        let ids = |q: &CatalogQuery| {
            q.apply(&products)
                .iter()
                .map(|p| p.id.to_string())
                .collect::<Vec<_>>()
        };

        assert_eq!(ids(&query(None, None)), vec!["1", "2", "3"]);
        assert_eq!(ids(&query(Some("women"), None)), vec!["1", "3"]);
        assert_eq!(ids(&query(None, Some("cotton"))), vec!["2", "3"]);
        assert_eq!(ids(&query(Some("Women"), Some("cotton"))), vec!["3"]);
        assert_eq!(ids(&query(Some("  "), Some(""))), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_heading() {
        assert_eq!(query(None, None).heading(), "All products");
        assert_eq!(query(Some("Men"), None).heading(), "Men");
        assert_eq!(
            query(None, Some("saree")).heading(),
            "Results for \u{201c}saree\u{201d}"
        );
    }

    #[test]
    fn test_related_excludes_self_and_sold_out() {
        let all = vec![
            product("1", "A", "Women", 1),
            product("2", "B", "Women", 0),
            product("3", "C", "Men", 1),
            product("4", "D", "Women", 1),
        ];
        let ids: Vec<_> = related(&all[0], &all).map(|p| p.id.to_string()).collect();
        assert_eq!(ids, vec!["4"]);
    }
}
