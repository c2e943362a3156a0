//! Product records resolved from wishlist identifiers.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::{Money, PriceRange};

/// Product image reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    /// Image URL.
    pub url: String,
}

/// Read-only projection of a product, as displayed by wishlist surfaces.
///
/// Records are built fresh on every hydration and never cached. Price and
/// images are optional: a missing price hides the price line, an empty
/// image list hides the image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    /// Shopify product GID.
    pub id: ProductId,
    /// Product title.
    pub title: String,
    /// URL handle, used to build storefront links.
    pub handle: Option<String>,
    /// Variant price range.
    pub price_range: Option<PriceRange>,
    /// Product images (only the first is ever requested).
    #[serde(default)]
    pub images: Vec<ProductImage>,
}

impl ProductRecord {
    /// Create a record with only the required fields set.
    #[must_use]
    pub fn new(id: impl Into<ProductId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            handle: None,
            price_range: None,
            images: Vec::new(),
        }
    }

    /// Set the URL handle.
    #[must_use]
    pub fn with_handle(mut self, handle: impl Into<String>) -> Self {
        self.handle = Some(handle.into());
        self
    }

    /// Set the price range.
    #[must_use]
    pub fn with_price_range(mut self, price_range: PriceRange) -> Self {
        self.price_range = Some(price_range);
        self
    }

    /// Append an image.
    #[must_use]
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.images.push(ProductImage { url: url.into() });
        self
    }

    /// URL of the first image, if any.
    #[must_use]
    pub fn featured_image_url(&self) -> Option<&str> {
        self.images.first().map(|image| image.url.as_str())
    }

    /// Price shown on a wishlist card (the minimum variant price).
    #[must_use]
    pub fn display_price(&self) -> Option<&Money> {
        self.price_range.as_ref().map(|range| &range.min_variant_price)
    }

    /// Storefront link for this product, when it has a handle.
    #[must_use]
    pub fn storefront_url(&self, shop_url: &str) -> Option<String> {
        let handle = self.handle.as_deref().filter(|h| !h.is_empty())?;
        Some(format!(
            "{}/products/{handle}",
            shop_url.trim_end_matches('/')
        ))
    }
}
