//! HTTP route handlers for the wishlist host.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                 - Health check
//!
//! # Wishlist surfaces (settings in the query string)
//! GET    /wishlist/block         - Order-list block
//! GET    /wishlist/page          - Full page with product links
//! GET    /wishlist/suggestions   - Tagged products not yet wishlisted
//! POST   /wishlist/items/{id}    - Add item (?surface=order_list_block|full_page)
//! DELETE /wishlist/items/{id}    - Remove item
//!
//! # Merchant
//! GET    /onboarding             - Onboarding checklist
//! ```

pub mod onboarding;
pub mod wishlist;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/block", get(wishlist::block))
        .route("/page", get(wishlist::page))
        .route("/suggestions", get(wishlist::suggestions))
        .route(
            "/items/{id}",
            axum::routing::post(wishlist::add_item).delete(wishlist::remove_item),
        )
}

/// Create all routes for the wishlist host.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/wishlist", wishlist_routes())
        .route("/onboarding", get(onboarding::show))
}
