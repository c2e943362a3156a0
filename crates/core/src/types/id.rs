//! Newtype IDs for Shopify global identifiers.
//!
//! Use the `define_gid!` macro to create type-safe wrappers around opaque
//! Shopify GIDs (`gid://shopify/<Resource>/<id>`) so product and customer
//! references cannot be mixed up.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Prefix shared by every Shopify global ID.
pub const GID_PREFIX: &str = "gid://shopify/";

/// Macro to define a type-safe GID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use wishlist_core::define_gid;
/// define_gid!(VariantId);
///
/// let id = VariantId::new("gid://shopify/ProductVariant/1");
/// assert_eq!(id.as_str(), "gid://shopify/ProductVariant/1");
/// ```
#[macro_export]
macro_rules! define_gid {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return its inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_gid!(ProductId);

impl ProductId {
    /// Parse a product reference supplied by a caller.
    ///
    /// Accepts a full GID or a bare numeric ID, which is expanded to
    /// `gid://shopify/Product/<id>`. Anything else is rejected.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.starts_with(GID_PREFIX) {
            Some(Self::new(raw))
        } else if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
            Some(Self::new(format!("{GID_PREFIX}Product/{raw}")))
        } else {
            None
        }
    }
}

/// Reference to the customer that owns a wishlist.
///
/// Customer surfaces hand us either a bare numeric ID (`"7012"`) or a full
/// GID. Metafield writes always need the GID form, so both are accepted and
/// normalized by [`CustomerRef::owner_gid`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerRef(String);

impl CustomerRef {
    /// Create a customer reference from a numeric ID or a GID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into().trim().to_owned())
    }

    /// The reference exactly as supplied.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The metafield owner ID (`gid://shopify/Customer/<id>`).
    #[must_use]
    pub fn owner_gid(&self) -> String {
        if self.0.starts_with(GID_PREFIX) {
            self.0.clone()
        } else {
            format!("{GID_PREFIX}Customer/{}", self.0)
        }
    }
}

impl fmt::Display for CustomerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CustomerRef {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_id_roundtrips_as_plain_string() {
        let id = ProductId::new("gid://shopify/Product/1");
        let json = serde_json::to_string(&id).unwrap_or_default();
        assert_eq!(json, "\"gid://shopify/Product/1\"");
    }

    #[test]
    fn test_product_id_parse() {
        assert_eq!(
            ProductId::parse(" 8123456789 ").map(ProductId::into_inner),
            Some("gid://shopify/Product/8123456789".to_string())
        );
        assert_eq!(
            ProductId::parse("gid://shopify/Product/1").map(ProductId::into_inner),
            Some("gid://shopify/Product/1".to_string())
        );
        assert_eq!(ProductId::parse(""), None);
        assert_eq!(ProductId::parse("pineapple"), None);
        assert_eq!(ProductId::parse("12a"), None);
    }

    #[test]
    fn test_customer_owner_gid_from_numeric() {
        let customer = CustomerRef::new("7012");
        assert_eq!(customer.owner_gid(), "gid://shopify/Customer/7012");
    }

    #[test]
    fn test_customer_owner_gid_passthrough() {
        let customer = CustomerRef::new("gid://shopify/Customer/7012");
        assert_eq!(customer.owner_gid(), "gid://shopify/Customer/7012");
    }

    #[test]
    fn test_customer_ref_trims_whitespace() {
        let customer = CustomerRef::new(" 42 \n");
        assert_eq!(customer.as_str(), "42");
    }
}
