//! JSON host routes that answer without calling Shopify.

#![allow(clippy::unwrap_used)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use secrecy::SecretString;
use serde_json::Value;
use tower::ServiceExt;
use wishlist_sync::config::{ShopifyConfig, SyncConfig, WishlistConfig};
use wishlist_sync::state::AppState;

fn app() -> Router {
    let config = WishlistConfig {
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        shopify: ShopifyConfig {
            store: "test.myshopify.com".to_string(),
            api_version: "2025-01".to_string(),
            storefront_private_token: SecretString::from("3f9a1c07be5d42e8a6b0c9d1f27e84a5"),
            customer_shop_id: "12345678901".to_string(),
            admin_access_token: None,
            request_timeout: None,
        },
        sync: SyncConfig::default(),
        sentry_dsn: None,
        sentry_environment: None,
    };
    wishlist_sync::router(AppState::new(config).unwrap())
}

fn customer_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", "Bearer shcat_test")
        .header("x-customer-id", "7012")
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health() {
    let response = app()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"ok");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let response = app()
        .oneshot(
            Request::get("/health")
                .header("x-request-id", "req-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers()["x-request-id"], "req-42");
}

#[tokio::test]
async fn test_onboarding_active_step() {
    let response = app()
        .oneshot(Request::get("/onboarding?active=1").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["activeStep"], 1);
    assert_eq!(json["steps"].as_array().unwrap().len(), 2);
    assert_eq!(json["steps"][1]["isComplete"], true);
}

#[tokio::test]
async fn test_block_requires_customer_headers() {
    let response = app()
        .oneshot(Request::get("/wishlist/block").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_misconfigured_block_is_hidden_for_customers() {
    let response = app()
        .oneshot(customer_request(
            "GET",
            "/wishlist/block?metafield_namespace=&metafield_key=wishlist",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["view"]["state"], "hidden");
    assert_eq!(json["showFullPageButton"], true);
}

#[tokio::test]
async fn test_invalid_product_id_is_rejected() {
    let response = app()
        .oneshot(customer_request("POST", "/wishlist/items/pineapple"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_misconfigured_remove_is_a_no_op() {
    let response = app()
        .oneshot(customer_request(
            "DELETE",
            "/wishlist/items/8123456789?surface=order_list_block&metafield_key=",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["view"]["state"], "hidden");
}
