//! Integration tests for the storefront catalog, cart and checkout.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::http::Method;
use bazaar_core::OrderStatus;
use bazaar_integration_tests::TestContext;
use bazaar_integration_tests::fixtures::sample_data;
use bazaar_integration_tests::harness::{client, location};
use reqwest::{StatusCode, header};

const SAREE_KEY: &str = "prod-saree|Size=M";

async fn add_saree(ctx: &TestContext, quantity: &str) -> reqwest::Response {
    ctx.post_form(
        "/cart/add",
        &[
            ("product_id", "prod-saree"),
            ("quantity", quantity),
            ("option[Size]", "M"),
        ],
    )
    .await
}

async fn cart_count(ctx: &TestContext) -> String {
    ctx.page("/cart/count").await
}

// ============================================================================
// Catalog
// ============================================================================

#[tokio::test]
async fn test_home_lists_new_arrivals_and_categories() {
    let ctx = TestContext::storefront(sample_data()).await;

    let resp = ctx.get("/").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["x-frame-options"], "DENY");
    let body = resp.text().await.unwrap();
    assert!(body.contains("Party Frock"));
    assert!(body.contains("Silk Saree"));
    assert!(body.contains("/products?category=Women"));
}

#[tokio::test]
async fn test_category_filter_and_search() {
    let ctx = TestContext::storefront(sample_data()).await;

    let body = ctx.page("/products?category=Men").await;
    assert!(body.contains("Cotton Panjabi"));
    assert!(!body.contains("Silk Saree"));

    let body = ctx.page("/products?q=saree").await;
    assert!(body.contains("Silk Saree"));
    assert!(!body.contains("Cotton Panjabi"));
}

#[tokio::test]
async fn test_product_page_and_missing_product() {
    let ctx = TestContext::storefront(sample_data()).await;

    let resp = ctx.get("/products/prod-saree").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert!(body.contains("name=\"option[Size]\""));
    assert!(body.contains("-20%"));

    let resp = ctx.get("/products/prod-missing").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Cart
// ============================================================================

#[tokio::test]
async fn test_add_requires_option() {
    let ctx = TestContext::storefront(sample_data()).await;

    let resp = ctx
        .post_form("/cart/add", &[("product_id", "prod-saree"), ("quantity", "1")])
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp).as_deref(), Some("/products/prod-saree"));

    let body = ctx.page("/products/prod-saree").await;
    assert!(body.contains("Please choose a size"));
    assert!(cart_count(&ctx).await.contains(">0<"));
}

#[tokio::test]
async fn test_sold_out_product_cannot_be_added() {
    let ctx = TestContext::storefront(sample_data()).await;

    let resp = ctx
        .post_form(
            "/cart/add",
            &[("product_id", "prod-frock"), ("option[Size]", "S")],
        )
        .await;
    assert_eq!(location(&resp).as_deref(), Some("/products/prod-frock"));
    assert!(cart_count(&ctx).await.contains(">0<"));
}

#[tokio::test]
async fn test_quantity_is_capped_by_stock() {
    let ctx = TestContext::storefront(sample_data()).await;

    add_saree(&ctx, "4").await;
    let resp = add_saree(&ctx, "2").await;
    assert_eq!(location(&resp).as_deref(), Some("/products/prod-saree"));

    let body = ctx.page("/products/prod-saree").await;
    assert!(body.contains("Only 5 of Silk Saree available"));
    assert!(cart_count(&ctx).await.contains(">4<"));
}

#[tokio::test]
async fn test_htmx_add_returns_badge_fragment() {
    let ctx = TestContext::storefront(sample_data()).await;

    let resp = ctx
        .client
        .post(ctx.url("/cart/add"))
        .header("hx-request", "true")
        .form(&[
            ("product_id", "prod-saree"),
            ("quantity", "2"),
            ("option[Size]", "M"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["hx-trigger"], "cart-updated");
    assert!(resp.text().await.unwrap().contains(">2<"));
}

#[tokio::test]
async fn test_update_and_remove_lines() {
    let ctx = TestContext::storefront(sample_data()).await;
    add_saree(&ctx, "1").await;

    let resp = ctx.get("/cart").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(
        resp.headers()[header::CACHE_CONTROL]
            .to_str()
            .unwrap()
            .contains("no-store")
    );
    let body = resp.text().await.unwrap();
    assert!(body.contains("Silk Saree"));
    assert!(body.contains("Size: M"));

    let resp = ctx
        .post_form("/cart/update", &[("key", SAREE_KEY), ("quantity", "3")])
        .await;
    assert_eq!(location(&resp).as_deref(), Some("/cart"));
    assert!(cart_count(&ctx).await.contains(">3<"));

    ctx.post_form("/cart/remove", &[("key", SAREE_KEY)]).await;
    let body = ctx.page("/cart").await;
    assert!(body.contains("Item removed."));
    assert!(body.contains("Your cart is empty."));
}

#[tokio::test]
async fn test_update_cannot_exceed_stock() {
    let ctx = TestContext::storefront(sample_data()).await;
    add_saree(&ctx, "1").await;

    let resp = ctx
        .post_form("/cart/update", &[("key", SAREE_KEY), ("quantity", "50")])
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp).as_deref(), Some("/cart"));

    let body = ctx.page("/cart").await;
    assert!(body.contains("Only 5 of Silk Saree available"));
    assert!(cart_count(&ctx).await.contains(">1<"));

    ctx.post_form("/cart/update", &[("key", SAREE_KEY), ("quantity", "5")])
        .await;
    assert!(cart_count(&ctx).await.contains(">5<"));
}

// ============================================================================
// Checkout
// ============================================================================

#[tokio::test]
async fn test_checkout_with_empty_cart_redirects() {
    let ctx = TestContext::storefront(sample_data()).await;

    let resp = ctx.get("/checkout").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp).as_deref(), Some("/cart"));
}

#[tokio::test]
async fn test_checkout_places_cash_on_delivery_order() {
    let ctx = TestContext::storefront(sample_data()).await;
    add_saree(&ctx, "2").await;

    let resp = ctx.get("/checkout").await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = ctx
        .post_form("/checkout", &[("name", ""), ("email", "not-an-email")])
        .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Name is required"));
    assert!(body.contains("Address is required"));
    assert!(body.contains("not-an-email"));
    assert!(ctx.backend.mutations().is_empty());

    let resp = ctx
        .post_form(
            "/checkout",
            &[
                ("name", " Rahim Uddin "),
                ("email", "rahim@example.com"),
                ("phone", "01711000000"),
                ("address", "House 1, Road 2, Dhaka"),
            ],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let complete_url = location(&resp).unwrap();
    assert!(complete_url.starts_with("/checkout/complete/ord-"));

    let request = ctx.backend.only_mutation(&Method::POST, "/orders");
    let body = request.body.unwrap();
    assert_eq!(body["billingInfo"]["name"], "Rahim Uddin");
    assert_eq!(body["status"], "pending");
    assert_eq!(body["paymentInfo"]["method"], "cash_on_delivery");
    assert_eq!(body["items"][0]["quantity"], 2);
    assert_eq!(body["items"][0]["selectedOptions"]["Size"], "M");
    assert_eq!(body["totalAmount"].as_f64(), Some(2400.0));

    let stored = ctx.backend.snapshot().orders;
    assert_eq!(stored.len(), 5);
    assert_eq!(stored[4].status, OrderStatus::Pending);

    let resp = ctx.get(&complete_url).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert!(body.contains(stored[4].id.as_str()));
    assert!(body.contains("rahim@example.com"));
    assert!(cart_count(&ctx).await.contains(">0<"));
}

#[tokio::test]
async fn test_confirmation_is_bound_to_session() {
    let ctx = TestContext::storefront(sample_data()).await;
    add_saree(&ctx, "1").await;
    let resp = ctx
        .post_form(
            "/checkout",
            &[
                ("name", "Rahim Uddin"),
                ("email", "rahim@example.com"),
                ("phone", "01711000000"),
                ("address", "Dhaka"),
            ],
        )
        .await;
    let complete_url = location(&resp).unwrap();

    let stranger = client();
    let resp = stranger.get(ctx.url(&complete_url)).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp).as_deref(), Some("/"));
}
