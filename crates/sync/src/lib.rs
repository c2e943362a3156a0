//! Wishlist sync library.
//!
//! Keeps a customer's wishlist, a JSON array of product IDs in a customer
//! metafield, in sync across independent customer account surfaces.
//!
//! # Modules
//!
//! - [`shopify`] - Storefront, Customer Account and Admin API clients
//! - [`wishlist`] - Identifier store, product hydrator, reconciling mutator and surfaces
//! - [`routes`] - JSON surface host

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod shopify;
pub mod state;
pub mod wishlist;

use axum::{
    Router,
    http::{HeaderName, Method, header},
    routing::get,
};
use tower_http::cors::{Any, CorsLayer};

use crate::middleware::{CUSTOMER_ID_HEADER, EDITOR_PREVIEW_HEADER, REQUEST_ID_HEADER};
use crate::state::AppState;

/// Build the application router with state and request-scoped middleware.
///
/// Tracing and Sentry layers are added by the binary.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static(CUSTOMER_ID_HEADER),
            HeaderName::from_static(EDITOR_PREVIEW_HEADER),
        ])
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)]);

    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(cors)
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check Shopify.
async fn health() -> &'static str {
    "ok"
}
