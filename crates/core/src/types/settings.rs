//! Surface settings supplied by the host at render time.

use serde::{Deserialize, Serialize};

/// Default metafield namespace when the merchant leaves the setting unset.
pub const DEFAULT_METAFIELD_NAMESPACE: &str = "custom";

/// Default metafield key when the merchant leaves the setting unset.
pub const DEFAULT_METAFIELD_KEY: &str = "wishlist";

/// Location of the wishlist in the customer's metafields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MetafieldKey {
    /// Metafield namespace (e.g., `custom` or `$app:wishlist`).
    pub namespace: String,
    /// Metafield key within the namespace.
    pub key: String,
}

impl MetafieldKey {
    /// Create a key from namespace and key parts.
    #[must_use]
    pub fn new(namespace: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            key: key.into(),
        }
    }
}

impl Default for MetafieldKey {
    fn default() -> Self {
        Self::new(DEFAULT_METAFIELD_NAMESPACE, DEFAULT_METAFIELD_KEY)
    }
}

impl std::fmt::Display for MetafieldKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.namespace, self.key)
    }
}

/// Immutable settings bag for a wishlist surface.
///
/// Resolved once per render and never mutated. Unknown keys in the bag are
/// ignored; missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Metafield namespace holding the wishlist.
    pub metafield_namespace: String,
    /// Metafield key holding the wishlist.
    pub metafield_key: String,
    /// Whether wishlist cards offer a remove action.
    pub show_remove_button: bool,
    /// Whether the block links to the full-page wishlist.
    pub show_full_page_button: bool,
    /// Tag used for the suggestion surface. No tag, no suggestions.
    pub product_tag: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            metafield_namespace: DEFAULT_METAFIELD_NAMESPACE.to_string(),
            metafield_key: DEFAULT_METAFIELD_KEY.to_string(),
            show_remove_button: true,
            show_full_page_button: true,
            product_tag: None,
        }
    }
}

impl Settings {
    /// Resolve settings from a host-supplied JSON bag.
    ///
    /// # Errors
    ///
    /// Returns an error if a recognized key has the wrong type.
    pub fn from_bag(bag: serde_json::Value) -> Result<Self, serde_json::Error> {
        if bag.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(bag)
    }

    /// The metafield holding the wishlist, or `None` when the merchant
    /// cleared the namespace or key.
    #[must_use]
    pub fn metafield(&self) -> Option<MetafieldKey> {
        let namespace = self.metafield_namespace.trim();
        let key = self.metafield_key.trim();
        if namespace.is_empty() || key.is_empty() {
            return None;
        }
        Some(MetafieldKey::new(namespace, key))
    }

    /// The suggestion tag, ignoring blank values.
    #[must_use]
    pub fn suggestion_tag(&self) -> Option<&str> {
        self.product_tag
            .as_deref()
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
    }
}
