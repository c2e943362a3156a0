//! The wishlist identifier list.

use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// Ordered, duplicate-free list of wishlisted product IDs.
///
/// Stored as a JSON array string in a customer metafield. Duplicates are
/// collapsed wherever a list is built (first occurrence wins), including
/// when deserializing a stored value that somehow contains repeats.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<ProductId>", into = "Vec<ProductId>")]
pub struct WishlistIdentifierList(Vec<ProductId>);

impl WishlistIdentifierList {
    /// An empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Build a list from IDs, dropping repeats.
    #[must_use]
    pub fn from_ids<I, T>(ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<ProductId>,
    {
        let mut list = Self::new();
        for id in ids {
            let id = id.into();
            if !list.contains(&id) {
                list.0.push(id);
            }
        }
        list
    }

    /// Parse a stored metafield value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a JSON array of strings.
    pub fn parse(value: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(value)
    }

    /// Serialize to the stored metafield form (a JSON array string).
    #[must_use]
    pub fn to_metafield_value(&self) -> String {
        let ids: Vec<&str> = self.0.iter().map(ProductId::as_str).collect();
        serde_json::Value::from(ids).to_string()
    }

    /// A copy of this list without `product_id`.
    #[must_use]
    pub fn without(&self, product_id: &ProductId) -> Self {
        Self(self.0.iter().filter(|id| *id != product_id).cloned().collect())
    }

    /// A copy of this list with `product_id` at the front.
    ///
    /// An ID that is already present keeps its position.
    #[must_use]
    pub fn with_front(&self, product_id: &ProductId) -> Self {
        if self.contains(product_id) {
            return self.clone();
        }
        let mut ids = Vec::with_capacity(self.0.len() + 1);
        ids.push(product_id.clone());
        ids.extend(self.0.iter().cloned());
        Self(ids)
    }

    /// Whether `product_id` is wishlisted.
    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.0.contains(product_id)
    }

    /// Number of IDs.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over IDs in order.
    pub fn iter(&self) -> std::slice::Iter<'_, ProductId> {
        self.0.iter()
    }

    /// The IDs as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[ProductId] {
        &self.0
    }
}

impl From<Vec<ProductId>> for WishlistIdentifierList {
    fn from(ids: Vec<ProductId>) -> Self {
        Self::from_ids(ids)
    }
}

impl From<WishlistIdentifierList> for Vec<ProductId> {
    fn from(list: WishlistIdentifierList) -> Self {
        list.0
    }
}

impl<'a> IntoIterator for &'a WishlistIdentifierList {
    type Item = &'a ProductId;
    type IntoIter = std::slice::Iter<'a, ProductId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<ProductId> for WishlistIdentifierList {
    fn from_iter<I: IntoIterator<Item = ProductId>>(iter: I) -> Self {
        Self::from_ids(iter)
    }
}
