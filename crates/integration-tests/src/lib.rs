//! Integration tests for wishlist synchronization.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p wishlist-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `wishlist_sync` - Store, hydrator and mutator contracts
//! - `surfaces` - Independent surfaces sharing one metafield
//! - `http` - JSON host routes that need no Shopify access
//!
//! Shopify is replaced by the in-memory fakes below. They record every
//! call so tests can assert on what went over the wire.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use rust_decimal::Decimal;
use wishlist_core::{CustomerRef, MetafieldKey, Money, PriceRange, ProductId, ProductRecord};
use wishlist_sync::shopify::ShopifyError;
use wishlist_sync::wishlist::{MetafieldStore, ProductLookup, ShopContext};

/// A write observed by [`FakeMetafields`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedWrite {
    /// `namespace.key`
    pub key: String,
    /// Owner GID.
    pub owner: String,
    pub value: String,
}

/// In-memory customer metafield store.
#[derive(Debug, Default)]
pub struct FakeMetafields {
    value: Mutex<Option<String>>,
    writes: Mutex<Vec<RecordedWrite>>,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
}

impl FakeMetafields {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose metafield already holds `value`.
    #[must_use]
    pub fn holding(value: &str) -> Self {
        Self {
            value: Mutex::new(Some(value.to_string())),
            ..Self::default()
        }
    }

    /// Overwrite the stored value without recording a write.
    pub fn set_value(&self, value: &str) {
        *self.value.lock().unwrap_or_else(PoisonError::into_inner) = Some(value.to_string());
    }

    /// Make subsequent writes fail.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent reads fail.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// The stored raw value.
    #[must_use]
    pub fn value(&self) -> Option<String> {
        self.value
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Every successful write, oldest first.
    #[must_use]
    pub fn writes(&self) -> Vec<RecordedWrite> {
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl MetafieldStore for FakeMetafields {
    async fn get(&self, _key: &MetafieldKey) -> Result<Option<String>, ShopifyError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(ShopifyError::Unauthorized("expired token".to_string()));
        }
        Ok(self.value())
    }

    async fn set(
        &self,
        key: &MetafieldKey,
        owner: &CustomerRef,
        value: String,
    ) -> Result<(), ShopifyError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ShopifyError::UserError("metafields.0.value: invalid".to_string()));
        }
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedWrite {
                key: key.to_string(),
                owner: owner.owner_gid(),
                value: value.clone(),
            });
        *self.value.lock().unwrap_or_else(PoisonError::into_inner) = Some(value);
        Ok(())
    }
}

/// In-memory product catalog.
#[derive(Debug, Default)]
pub struct FakeCatalog {
    products: Vec<ProductRecord>,
    lookups: Mutex<Vec<Vec<ProductId>>>,
    listings: Mutex<Vec<(usize, Option<String>)>>,
    fail_lookups: AtomicBool,
}

impl FakeCatalog {
    #[must_use]
    pub fn with_products(products: impl IntoIterator<Item = ProductRecord>) -> Self {
        Self {
            products: products.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Make subsequent ID lookups fail as if Shopify were throttling.
    pub fn fail_lookups(&self, fail: bool) {
        self.fail_lookups.store(fail, Ordering::SeqCst);
    }

    /// Every batched lookup, oldest first.
    #[must_use]
    pub fn lookups(&self) -> Vec<Vec<ProductId>> {
        self.lookups
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Every listing call as `(first, query)`.
    #[must_use]
    pub fn listings(&self) -> Vec<(usize, Option<String>)> {
        self.listings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ProductLookup for FakeCatalog {
    async fn lookup_by_ids(
        &self,
        ids: &[ProductId],
    ) -> Result<Vec<Option<ProductRecord>>, ShopifyError> {
        self.lookups
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(ids.to_vec());
        if self.fail_lookups.load(Ordering::SeqCst) {
            return Err(ShopifyError::RateLimited(2));
        }
        Ok(ids
            .iter()
            .map(|id| self.products.iter().find(|p| &p.id == id).cloned())
            .collect())
    }

    async fn list_products(
        &self,
        first: usize,
        query: Option<&str>,
    ) -> Result<Vec<ProductRecord>, ShopifyError> {
        self.listings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((first, query.map(str::to_string)));
        Ok(self.products.iter().take(first).cloned().collect())
    }
}

/// Fixed shop context.
#[derive(Debug, Clone)]
pub struct FakeShop(pub String);

impl Default for FakeShop {
    fn default() -> Self {
        Self("https://naked-pineapple.example".to_string())
    }
}

impl ShopContext for FakeShop {
    async fn shop_url(&self) -> Result<String, ShopifyError> {
        Ok(self.0.clone())
    }
}

/// A $25.00 product whose handle and image derive from `title`.
#[must_use]
pub fn product(id: &str, title: &str) -> ProductRecord {
    ProductRecord::new(id, title)
        .with_handle(title.to_lowercase().replace(' ', "-"))
        .with_price_range(PriceRange {
            min_variant_price: Money::new(Decimal::new(2500, 2), "USD"),
            max_variant_price: Money::new(Decimal::new(2500, 2), "USD"),
        })
        .with_image(format!("https://cdn.example/{title}.png"))
}
