//! Wishlist state synchronization.
//!
//! The wishlist is an ordered list of product IDs held in one customer
//! metafield. Every surface reads, mutates and re-hydrates that list on its
//! own, through three components:
//!
//! - [`IdentifierStore`] - reads and writes the durable identifier list
//! - [`ProductHydrator`] - resolves identifiers into product records
//! - [`ReconcilingMutator`] - applies one add/remove and re-hydrates
//!
//! Surfaces never share state. Two surfaces showing the same wishlist
//! diverge until each one re-reads; the last write wins.
//!
//! # Example
//!
//! ```rust,ignore
//! let store = IdentifierStore::new(session.clone());
//! let hydrator = ProductHydrator::new(storefront.clone());
//! let mutator = ReconcilingMutator::new(&store, &hydrator, UpdatePolicy::default());
//!
//! let current = store.read_identifiers(&key).await;
//! let outcome = mutator.remove_product(&key, &customer, &current, &product_id).await;
//! ```

mod hydrator;
mod mutator;
mod onboarding;
mod store;
mod surface;

use std::future::Future;

use wishlist_core::{CustomerRef, MetafieldKey, ProductId, ProductRecord};

use crate::shopify::ShopifyError;

pub use hydrator::{
    DEFAULT_PREVIEW_LIMIT, DEFAULT_SUGGESTION_LIMIT, MAX_PRODUCTS_PER_PAGE, ProductHydrator,
};
pub use mutator::{MutationOutcome, ReconcilingMutator};
pub use onboarding::{OnboardingList, OnboardingStep};
pub use store::IdentifierStore;
pub use surface::{
    RenderContext, SurfaceKind, ViewState, WishlistItem, WishlistSurface, MISCONFIGURED_WARNING,
};

/// Remote key-value store holding customer metafields.
pub trait MetafieldStore: Send + Sync {
    /// Raw value at `key`, `None` when unset.
    fn get(
        &self,
        key: &MetafieldKey,
    ) -> impl Future<Output = Result<Option<String>, ShopifyError>> + Send;

    /// Overwrite the value at `key` for `owner`.
    fn set(
        &self,
        key: &MetafieldKey,
        owner: &CustomerRef,
        value: String,
    ) -> impl Future<Output = Result<(), ShopifyError>> + Send;
}

/// Read-only product catalog.
pub trait ProductLookup: Send + Sync {
    /// Batched lookup, parallel to `ids`. `None` marks an ID that did not
    /// resolve to a product.
    fn lookup_by_ids(
        &self,
        ids: &[ProductId],
    ) -> impl Future<Output = Result<Vec<Option<ProductRecord>>, ShopifyError>> + Send;

    /// Up to `first` products, optionally filtered by a search query.
    fn list_products(
        &self,
        first: usize,
        query: Option<&str>,
    ) -> impl Future<Output = Result<Vec<ProductRecord>, ShopifyError>> + Send;
}

/// Shop-level context needed to link products.
pub trait ShopContext: Send + Sync {
    /// Public base URL of the shop.
    fn shop_url(&self) -> impl Future<Output = Result<String, ShopifyError>> + Send;
}

impl<T: MetafieldStore> MetafieldStore for &T {
    fn get(
        &self,
        key: &MetafieldKey,
    ) -> impl Future<Output = Result<Option<String>, ShopifyError>> + Send {
        (**self).get(key)
    }

    fn set(
        &self,
        key: &MetafieldKey,
        owner: &CustomerRef,
        value: String,
    ) -> impl Future<Output = Result<(), ShopifyError>> + Send {
        (**self).set(key, owner, value)
    }
}

impl<T: ProductLookup> ProductLookup for &T {
    fn lookup_by_ids(
        &self,
        ids: &[ProductId],
    ) -> impl Future<Output = Result<Vec<Option<ProductRecord>>, ShopifyError>> + Send {
        (**self).lookup_by_ids(ids)
    }

    fn list_products(
        &self,
        first: usize,
        query: Option<&str>,
    ) -> impl Future<Output = Result<Vec<ProductRecord>, ShopifyError>> + Send {
        (**self).list_products(first, query)
    }
}

impl<T: ShopContext> ShopContext for &T {
    fn shop_url(&self) -> impl Future<Output = Result<String, ShopifyError>> + Send {
        (**self).shop_url()
    }
}

/// When a removal becomes visible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UpdatePolicy {
    /// Drop the removed item immediately, restore it if the write fails.
    Optimistic,
    /// Change the visible list only after the write is acknowledged.
    #[default]
    WaitForConfirmation,
}
