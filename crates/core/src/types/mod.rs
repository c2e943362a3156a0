//! Core types for wishlist synchronization.
//!
//! This module provides type-safe wrappers for the wishlist domain.

pub mod id;
pub mod identifiers;
pub mod price;
pub mod product;
pub mod settings;

pub use id::*;
pub use identifiers::WishlistIdentifierList;
pub use price::{Money, PriceRange};
pub use product::{ProductImage, ProductRecord};
pub use settings::{DEFAULT_METAFIELD_KEY, DEFAULT_METAFIELD_NAMESPACE, MetafieldKey, Settings};
