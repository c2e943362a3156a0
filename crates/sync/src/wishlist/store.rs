//! Durable identifier list accessor.

use tracing::{debug, instrument, warn};
use wishlist_core::{CustomerRef, MetafieldKey, WishlistIdentifierList};

use super::MetafieldStore;
use crate::shopify::ShopifyError;

/// Reads and writes the wishlist identifier list in a customer metafield.
///
/// Reads never fail: anything other than a well-formed JSON array of IDs
/// reads as an empty wishlist. Writes overwrite unconditionally, with no
/// version check and no retry.
#[derive(Debug, Clone)]
pub struct IdentifierStore<M> {
    metafields: M,
}

impl<M: MetafieldStore> IdentifierStore<M> {
    pub const fn new(metafields: M) -> Self {
        Self { metafields }
    }

    /// The underlying metafield store.
    pub const fn metafields(&self) -> &M {
        &self.metafields
    }

    /// Read the identifier list stored at `key`.
    ///
    /// Unset, null and unparsable values, as well as transport failures,
    /// all read as an empty list.
    #[instrument(skip(self), fields(metafield = %key))]
    pub async fn read_identifiers(&self, key: &MetafieldKey) -> WishlistIdentifierList {
        self.fetch_identifiers(key).await.unwrap_or_else(|e| {
            warn!(error = %e, "Failed to read wishlist metafield, treating as empty");
            WishlistIdentifierList::new()
        })
    }

    /// Read the identifier list stored at `key`, keeping transport failures
    /// apart from an empty wishlist.
    ///
    /// Unset, null and unparsable values still read as an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error if the metafield could not be read.
    pub async fn fetch_identifiers(
        &self,
        key: &MetafieldKey,
    ) -> Result<WishlistIdentifierList, ShopifyError> {
        let Some(value) = self.metafields.get(key).await? else {
            debug!("Wishlist metafield is unset");
            return Ok(WishlistIdentifierList::new());
        };

        match WishlistIdentifierList::parse(&value) {
            Ok(list) => {
                debug!(count = list.len(), "Wishlist loaded");
                Ok(list)
            }
            Err(e) => {
                warn!(error = %e, "Unparsable wishlist metafield, treating as empty");
                Ok(WishlistIdentifierList::new())
            }
        }
    }

    /// Overwrite the identifier list at `key` for `owner`.
    ///
    /// Issues exactly one write.
    ///
    /// # Errors
    ///
    /// Returns an error if the write is rejected or does not reach Shopify.
    #[instrument(skip(self, ids), fields(metafield = %key, owner = %owner, count = ids.len()))]
    pub async fn write_identifiers(
        &self,
        key: &MetafieldKey,
        owner: &CustomerRef,
        ids: &WishlistIdentifierList,
    ) -> Result<(), ShopifyError> {
        self.metafields
            .set(key, owner, ids.to_metafield_value())
            .await
    }
}
