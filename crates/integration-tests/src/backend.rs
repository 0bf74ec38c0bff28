//! In-process stand-in for the REST backend.
//!
//! Serves the same endpoints the admin console and storefront call, keeps its
//! records in memory, and records every request so tests can assert on the
//! exact payloads that went over the wire.

use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    Json, Router,
    body::{Body, to_bytes},
    extract::{Path, Request, State},
    http::{Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use bazaar_core::{
    Category, CategoryId, CategoryInput, NewOrder, Order, OrderId, Product, ProfileUpdate,
    ReorderPayload, StatusUpdate, SubCategory, UserProfile,
};
use serde_json::{Value, json};

/// Records held by the fake backend.
#[derive(Debug, Clone, Default)]
pub struct BackendData {
    pub categories: Vec<Category>,
    pub orders: Vec<Order>,
    pub users: Vec<UserProfile>,
    pub products: Vec<Product>,
}

/// One request as the backend received it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    /// Parsed JSON body, when there was one.
    pub body: Option<Value>,
}

/// Cheap-clone handle to the fake backend's state.
#[derive(Debug, Clone, Default)]
pub struct FakeBackend {
    data: Arc<Mutex<BackendData>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl FakeBackend {
    #[must_use]
    pub fn new(data: BackendData) -> Self {
        Self {
            data: Arc::new(Mutex::new(data)),
            requests: Arc::default(),
        }
    }

    fn data(&self) -> MutexGuard<'_, BackendData> {
        self.data.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Copy of the current records.
    #[must_use]
    pub fn snapshot(&self) -> BackendData {
        self.data().clone()
    }

    /// Every request received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Requests other than `GET`.
    #[must_use]
    pub fn mutations(&self) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method != Method::GET)
            .collect()
    }

    /// The single non-`GET` request to `path`.
    ///
    /// # Panics
    ///
    /// Panics unless exactly one such request was recorded.
    #[must_use]
    pub fn only_mutation(&self, method: &Method, path: &str) -> RecordedRequest {
        let matching: Vec<_> = self
            .mutations()
            .into_iter()
            .filter(|r| &r.method == method && r.path == path)
            .collect();
        assert_eq!(
            matching.len(),
            1,
            "expected one {method} {path}, got {:?}",
            self.mutations()
        );
        matching.into_iter().next().unwrap_or_else(|| unreachable!())
    }

    fn record(&self, request: RecordedRequest) {
        self.requests
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(request);
    }

    /// Router serving the backend endpoints.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/categories", get(list_categories).post(create_category))
            .route("/categories/reorder", put(reorder_categories))
            .route(
                "/categories/{id}",
                put(update_category).delete(delete_category),
            )
            .route("/categories/{id}/subcategories", post(add_subcategory))
            .route(
                "/categories/{id}/subcategories/{name}",
                put(update_subcategory).delete(delete_subcategory),
            )
            .route("/orders", get(list_orders).post(create_order))
            .route("/orders/{id}", axum::routing::patch(update_order).delete(delete_order))
            .route("/user/{key}", get(get_user).patch(update_user))
            .route("/products", get(list_products))
            .route("/products/{id}", get(get_product))
            .layer(middleware::from_fn_with_state(self.clone(), record_request))
            .with_state(self.clone())
    }
}

/// Buffer the body, record the request, and pass it on unchanged.
async fn record_request(State(backend): State<FakeBackend>, request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = to_bytes(body, usize::MAX).await.unwrap_or_default();
    backend.record(RecordedRequest {
        method: parts.method.clone(),
        path: parts.uri.path().to_string(),
        body: serde_json::from_slice(&bytes).ok(),
    });
    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

fn not_found(what: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": format!("{what} not found") })),
    )
        .into_response()
}

fn ok() -> Response {
    Json(json!({ "success": true })).into_response()
}

// =============================================================================
// Categories
// =============================================================================

async fn list_categories(State(backend): State<FakeBackend>) -> Json<Vec<Category>> {
    Json(backend.data().categories.clone())
}

async fn create_category(
    State(backend): State<FakeBackend>,
    Json(input): Json<CategoryInput>,
) -> Response {
    let mut data = backend.data();
    if data
        .categories
        .iter()
        .any(|c| c.name.eq_ignore_ascii_case(&input.name))
    {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "message": "Category already exists" })),
        )
            .into_response();
    }

    let category = Category {
        id: CategoryId::new(format!("cat-{}", uuid::Uuid::new_v4().simple())),
        name: input.name,
        image: input.image,
        description: input.description,
        sub_categories: vec![],
        order: i64::try_from(data.categories.len()).unwrap_or(i64::MAX),
    };
    data.categories.push(category.clone());
    (StatusCode::CREATED, Json(category)).into_response()
}

async fn reorder_categories(
    State(backend): State<FakeBackend>,
    Json(payload): Json<ReorderPayload>,
) -> Response {
    let mut data = backend.data();
    for rank in payload.categories {
        if let Some(category) = data.categories.iter_mut().find(|c| c.id == rank.id) {
            category.order = i64::try_from(rank.order).unwrap_or(i64::MAX);
        }
    }
    data.categories.sort_by_key(|c| c.order);
    ok()
}

async fn update_category(
    State(backend): State<FakeBackend>,
    Path(id): Path<String>,
    Json(input): Json<CategoryInput>,
) -> Response {
    let mut data = backend.data();
    let Some(category) = data.categories.iter_mut().find(|c| c.id.as_str() == id) else {
        return not_found("Category");
    };
    category.name = input.name;
    category.image = input.image;
    category.description = input.description;
    Json(category.clone()).into_response()
}

async fn delete_category(State(backend): State<FakeBackend>, Path(id): Path<String>) -> Response {
    let mut data = backend.data();
    let before = data.categories.len();
    data.categories.retain(|c| c.id.as_str() != id);
    if data.categories.len() == before {
        return not_found("Category");
    }
    ok()
}

async fn add_subcategory(
    State(backend): State<FakeBackend>,
    Path(id): Path<String>,
    Json(input): Json<CategoryInput>,
) -> Response {
    let mut data = backend.data();
    let Some(category) = data.categories.iter_mut().find(|c| c.id.as_str() == id) else {
        return not_found("Category");
    };
    category.sub_categories.push(SubCategory {
        name: input.name,
        image: input.image,
        description: input.description,
    });
    (StatusCode::CREATED, Json(category.clone())).into_response()
}

async fn update_subcategory(
    State(backend): State<FakeBackend>,
    Path((id, name)): Path<(String, String)>,
    Json(input): Json<CategoryInput>,
) -> Response {
    let mut data = backend.data();
    let Some(sub) = data
        .categories
        .iter_mut()
        .find(|c| c.id.as_str() == id)
        .and_then(|c| c.sub_categories.iter_mut().find(|s| s.name == name))
    else {
        return not_found("Subcategory");
    };
    sub.name = input.name;
    sub.image = input.image;
    sub.description = input.description;
    ok()
}

async fn delete_subcategory(
    State(backend): State<FakeBackend>,
    Path((id, name)): Path<(String, String)>,
) -> Response {
    let mut data = backend.data();
    let Some(category) = data.categories.iter_mut().find(|c| c.id.as_str() == id) else {
        return not_found("Category");
    };
    category.sub_categories.retain(|s| s.name != name);
    ok()
}

// =============================================================================
// Orders
// =============================================================================

async fn list_orders(State(backend): State<FakeBackend>) -> Json<Vec<Order>> {
    Json(backend.data().orders.clone())
}

async fn create_order(
    State(backend): State<FakeBackend>,
    Json(new_order): Json<NewOrder>,
) -> Response {
    let order = Order {
        id: OrderId::new(format!("ord-{}", uuid::Uuid::new_v4().simple())),
        billing_info: new_order.billing_info,
        items: new_order.items,
        total_amount: new_order.total_amount,
        status: new_order.status,
        payment_info: new_order.payment_info,
        created_at: chrono::Utc::now(),
    };
    backend.data().orders.push(order.clone());
    (StatusCode::CREATED, Json(order)).into_response()
}

async fn update_order(
    State(backend): State<FakeBackend>,
    Path(id): Path<String>,
    Json(update): Json<StatusUpdate>,
) -> Response {
    let mut data = backend.data();
    let Some(order) = data.orders.iter_mut().find(|o| o.id.as_str() == id) else {
        return not_found("Order");
    };
    order.status = update.status;
    ok()
}

async fn delete_order(State(backend): State<FakeBackend>, Path(id): Path<String>) -> Response {
    let mut data = backend.data();
    let before = data.orders.len();
    data.orders.retain(|o| o.id.as_str() != id);
    if data.orders.len() == before {
        return not_found("Order");
    }
    ok()
}

// =============================================================================
// Users
// =============================================================================

async fn get_user(State(backend): State<FakeBackend>, Path(key): Path<String>) -> Response {
    backend
        .data()
        .users
        .iter()
        .find(|u| u.email.eq_ignore_ascii_case(&key) || u.id.as_str() == key)
        .cloned()
        .map_or_else(|| not_found("User"), |user| Json(user).into_response())
}

async fn update_user(
    State(backend): State<FakeBackend>,
    Path(id): Path<String>,
    Json(update): Json<ProfileUpdate>,
) -> Response {
    let mut data = backend.data();
    let Some(user) = data.users.iter_mut().find(|u| u.id.as_str() == id) else {
        return not_found("User");
    };
    user.name = update.name;
    user.phone = update.phone;
    user.address = update.address;
    user.date_of_birth = update.date_of_birth;
    user.gender = update.gender;
    user.bio = update.bio;
    user.photo = update.photo;
    Json(user.clone()).into_response()
}

// =============================================================================
// Products
// =============================================================================

async fn list_products(State(backend): State<FakeBackend>) -> Json<Vec<Product>> {
    Json(backend.data().products.clone())
}

async fn get_product(State(backend): State<FakeBackend>, Path(id): Path<String>) -> Response {
    backend
        .data()
        .products
        .iter()
        .find(|p| p.id.as_str() == id)
        .cloned()
        .map_or_else(|| not_found("Product"), |product| Json(product).into_response())
}
