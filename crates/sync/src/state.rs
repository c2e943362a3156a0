//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::WishlistConfig;
use crate::shopify::{CustomerAccountClient, ShopifyError, StorefrontClient};

/// Application state shared across all handlers.
///
/// Holds configuration and the Shopify clients. There is deliberately no
/// wishlist state here: every request builds its own surface.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: WishlistConfig,
    storefront: StorefrontClient,
    customer_account: CustomerAccountClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if a Shopify HTTP client cannot be built.
    pub fn new(config: WishlistConfig) -> Result<Self, ShopifyError> {
        let storefront = StorefrontClient::new(&config.shopify)?;
        let customer_account = CustomerAccountClient::new(&config.shopify)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                storefront,
                customer_account,
            }),
        })
    }

    /// Get a reference to the wishlist configuration.
    #[must_use]
    pub fn config(&self) -> &WishlistConfig {
        &self.inner.config
    }

    /// Get a reference to the Shopify Storefront API client.
    #[must_use]
    pub fn storefront(&self) -> &StorefrontClient {
        &self.inner.storefront
    }

    /// Get a reference to the Shopify Customer Account API client.
    #[must_use]
    pub fn customer_account(&self) -> &CustomerAccountClient {
        &self.inner.customer_account
    }
}
