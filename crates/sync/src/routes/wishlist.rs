//! Wishlist surface route handlers.
//!
//! Each request builds a fresh surface from the caller's context and the
//! settings in the query string. No wishlist data outlives the request.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use wishlist_core::{ProductId, ProductRecord, Settings};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::CustomerContext;
use crate::shopify::{CustomerSession, StorefrontClient};
use crate::state::AppState;
use crate::wishlist::{
    DEFAULT_SUGGESTION_LIMIT, MAX_PRODUCTS_PER_PAGE, SurfaceKind, ViewState, WishlistSurface,
};

// The shop URL comes from the Storefront API so preview can link products
// without a customer token.
type HostedSurface = WishlistSurface<CustomerSession, StorefrontClient, StorefrontClient>;

/// Which surface a mutation is issued from.
#[derive(Debug, Deserialize)]
pub struct SurfaceParams {
    #[serde(default = "default_surface")]
    pub surface: SurfaceKind,
}

const fn default_surface() -> SurfaceKind {
    SurfaceKind::FullPage
}

/// Suggestion list parameters.
#[derive(Debug, Deserialize)]
pub struct SuggestionParams {
    pub limit: Option<usize>,
}

/// Order-list block response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockResponse {
    pub view: ViewState,
    pub show_full_page_button: bool,
}

/// Full page response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse {
    pub view: ViewState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shop_url: Option<String>,
    /// Tagged products offered when the wishlist is empty.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<ProductRecord>,
}

/// Mutation response.
#[derive(Debug, Serialize)]
pub struct MutationResponse {
    pub view: ViewState,
}

fn build_surface(
    state: &AppState,
    kind: SurfaceKind,
    settings: Settings,
    caller: CustomerContext,
) -> HostedSurface {
    // Preview never touches the Customer Account API
    let token = caller
        .access_token
        .unwrap_or_else(|| SecretString::from(String::new()));
    let session = state.customer_account().session(token);

    WishlistSurface::new(
        kind,
        settings,
        caller.render,
        session,
        state.storefront().clone(),
        state.storefront().clone(),
    )
    .with_update_policy(state.config().sync.update_policy)
}

fn product_id(raw: &str) -> Result<ProductId> {
    ProductId::parse(raw)
        .ok_or_else(|| AppError::BadRequest(format!("invalid product id: {raw}")))
}

fn suggestion_limit(params: &SuggestionParams) -> usize {
    params
        .limit
        .unwrap_or(DEFAULT_SUGGESTION_LIMIT)
        .min(MAX_PRODUCTS_PER_PAGE)
}

/// Order-list block.
#[instrument(skip(state, caller, settings))]
pub async fn block(
    State(state): State<AppState>,
    caller: CustomerContext,
    Query(settings): Query<Settings>,
) -> Json<BlockResponse> {
    let show_full_page_button = settings.show_full_page_button;
    let mut surface = build_surface(&state, SurfaceKind::OrderListBlock, settings, caller);
    let view = surface.load().await;

    Json(BlockResponse {
        view,
        show_full_page_button,
    })
}

/// Full wishlist page.
#[instrument(skip(state, caller, settings))]
pub async fn page(
    State(state): State<AppState>,
    caller: CustomerContext,
    Query(settings): Query<Settings>,
) -> Json<PageResponse> {
    let mut surface = build_surface(&state, SurfaceKind::FullPage, settings, caller);
    let view = surface.load().await;

    let suggestions = if view == ViewState::Empty {
        surface.suggestions(DEFAULT_SUGGESTION_LIMIT).await
    } else {
        Vec::new()
    };

    Json(PageResponse {
        shop_url: surface.shop_url().map(str::to_string),
        view,
        suggestions,
    })
}

/// Tagged products not already on the wishlist.
#[instrument(skip(state, caller, settings))]
pub async fn suggestions(
    State(state): State<AppState>,
    caller: CustomerContext,
    Query(settings): Query<Settings>,
    Query(params): Query<SuggestionParams>,
) -> Json<Vec<ProductRecord>> {
    let mut surface = build_surface(&state, SurfaceKind::OrderListBlock, settings, caller);
    surface.load().await;

    Json(surface.suggestions(suggestion_limit(&params)).await)
}

/// Add a product to the front of the wishlist.
#[instrument(skip(state, caller, settings))]
pub async fn add_item(
    State(state): State<AppState>,
    caller: CustomerContext,
    Path(raw_id): Path<String>,
    Query(params): Query<SurfaceParams>,
    Query(settings): Query<Settings>,
) -> Result<Json<MutationResponse>> {
    let product_id = product_id(&raw_id)?;
    add_breadcrumb("wishlist", "Add item", Some(&[("product_id", product_id.as_str())]));

    let mut surface = build_surface(&state, params.surface, settings, caller);
    let view = surface.add(&product_id).await;
    if let Some(e) = surface.take_load_error() {
        return Err(e.into());
    }

    Ok(Json(MutationResponse { view }))
}

/// Remove a product from the wishlist.
#[instrument(skip(state, caller, settings))]
pub async fn remove_item(
    State(state): State<AppState>,
    caller: CustomerContext,
    Path(raw_id): Path<String>,
    Query(params): Query<SurfaceParams>,
    Query(settings): Query<Settings>,
) -> Result<Json<MutationResponse>> {
    let product_id = product_id(&raw_id)?;
    add_breadcrumb(
        "wishlist",
        "Remove item",
        Some(&[("product_id", product_id.as_str())]),
    );

    let mut surface = build_surface(&state, params.surface, settings, caller);
    let view = surface.remove(&product_id).await;
    if let Some(e) = surface.take_load_error() {
        return Err(e.into());
    }

    Ok(Json(MutationResponse { view }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_id_accepts_gid_and_numeric() {
        assert_eq!(
            product_id("gid://shopify/Product/1").unwrap().as_str(),
            "gid://shopify/Product/1"
        );
        assert_eq!(
            product_id("42").unwrap().as_str(),
            "gid://shopify/Product/42"
        );
    }

    #[test]
    fn test_product_id_rejects_garbage() {
        assert!(matches!(product_id(""), Err(AppError::BadRequest(_))));
        assert!(matches!(
            product_id("pineapple"),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_suggestion_limit_is_capped() {
        let limit = |limit| suggestion_limit(&SuggestionParams { limit });
        assert_eq!(limit(None), DEFAULT_SUGGESTION_LIMIT);
        assert_eq!(limit(Some(3)), 3);
        assert_eq!(limit(Some(usize::MAX)), MAX_PRODUCTS_PER_PAGE);
    }

    #[test]
    fn test_block_response_shape() {
        let json = serde_json::to_value(BlockResponse {
            view: ViewState::Empty,
            show_full_page_button: true,
        })
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "view": { "state": "empty" }, "showFullPageButton": true })
        );
    }
}
