//! CLI command implementations.

pub mod provision;
pub mod wishlist;

use thiserror::Error;
use wishlist_sync::config::ConfigError;
use wishlist_sync::shopify::ShopifyError;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Shopify API call failed.
    #[error("Shopify error: {0}")]
    Shopify(#[from] ShopifyError),

    /// Output could not be serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid command input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
