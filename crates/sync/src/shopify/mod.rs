//! Shopify API clients used by the wishlist.
//!
//! # Architecture
//!
//! - Hand-written GraphQL documents implementing `graphql_client::GraphQLQuery`
//!   (only the fields the wishlist depends on)
//! - Shopify is source of truth - NO local sync, NO response cache; every
//!   hydration reads fresh product data
//!
//! # APIs
//!
//! ## Storefront API
//! - Batched product lookup by ID (`nodes`)
//! - Product listing, optionally filtered by tag
//!
//! ## Customer Account API
//! - Wishlist metafield read/write for the signed-in customer
//! - Shop base URL for product links
//!
//! ## Admin API
//! - Wishlist metafield definition provisioning (operator tooling only)
//!
//! # Example
//!
//! ```rust,ignore
//! use wishlist_sync::shopify::StorefrontClient;
//!
//! let client = StorefrontClient::new(&config.shopify)?;
//! let nodes = client.get_products_by_ids(&ids).await?;
//! ```

mod admin;
mod conversions;
mod customer;
mod graphql;
pub mod queries;
mod storefront;

pub use admin::{
    AdminClient, MetafieldDefinition, PROVISIONED_KEY, PROVISIONED_NAMESPACE, ProvisionOutcome,
};
pub use customer::{CustomerAccountClient, CustomerSession};
pub use storefront::StorefrontClient;

use thiserror::Error;

/// Errors that can occur when interacting with Shopify APIs.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by Shopify.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Access token rejected.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// User error from mutation (e.g., invalid input).
    #[error("User error: {0}")]
    UserError(String),

    /// A call needs a credential that is not configured.
    #[error("Missing credential: {0}")]
    MissingCredential(&'static str),
}

/// A GraphQL error returned by the Shopify API.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Source locations in the query.
    pub locations: Vec<GraphQLErrorLocation>,
    /// Path to the error in the response.
    pub path: Vec<serde_json::Value>,
}

impl GraphQLError {
    /// An error with only a message.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            locations: vec![],
            path: vec![],
        }
    }
}

/// Location in a GraphQL query where an error occurred.
#[derive(Debug, Clone)]
pub struct GraphQLErrorLocation {
    /// Line number (1-indexed).
    pub line: i64,
    /// Column number (1-indexed).
    pub column: i64,
}

/// A `userErrors` entry from a Shopify mutation.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct UserError {
    /// Path to the offending input field.
    pub field: Option<Vec<String>>,
    /// Human-readable message.
    pub message: String,
}

/// Fold mutation user errors into a single `ShopifyError::UserError`.
pub(crate) fn check_user_errors(errors: Vec<UserError>) -> Result<(), ShopifyError> {
    if errors.is_empty() {
        return Ok(());
    }

    Err(ShopifyError::UserError(
        errors
            .into_iter()
            .map(|e| match e.field {
                Some(field) if !field.is_empty() => format!("{}: {}", field.join("."), e.message),
                _ => e.message,
            })
            .collect::<Vec<_>>()
            .join("; "),
    ))
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    if errors.is_empty() {
        return "(no error details provided)".to_string();
    }

    errors
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let mut parts = Vec::new();

            if !e.message.is_empty() {
                parts.push(e.message.clone());
            }

            if !e.path.is_empty() {
                let path_str = e
                    .path
                    .iter()
                    .map(|p| match p {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(".");
                parts.push(format!("path: {path_str}"));
            }

            if let Some(loc) = e.locations.first() {
                parts.push(format!("at line {}:{}", loc.line, loc.column));
            }

            if parts.is_empty() {
                format!("[error {}]: (no details)", i + 1)
            } else {
                parts.join(" ")
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shopify_error_display() {
        let err = ShopifyError::NotFound("customer".to_string());
        assert_eq!(err.to_string(), "Not found: customer");
    }

    #[test]
    fn test_graphql_error_formatting() {
        let errors = vec![
            GraphQLError::message("Field not found"),
            GraphQLError::message("Invalid ID"),
        ];
        let err = ShopifyError::GraphQL(errors);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: Field not found; Invalid ID"
        );
    }

    #[test]
    fn test_graphql_error_path_and_location() {
        let errors = vec![GraphQLError {
            message: String::new(),
            locations: vec![GraphQLErrorLocation { line: 5, column: 10 }],
            path: vec![
                serde_json::Value::String("nodes".to_string()),
                serde_json::Value::Number(0.into()),
            ],
        }];
        let err = ShopifyError::GraphQL(errors);
        assert_eq!(err.to_string(), "GraphQL errors: path: nodes.0 at line 5:10");
    }

    #[test]
    fn test_graphql_error_no_details() {
        let err = ShopifyError::GraphQL(vec![GraphQLError::message("")]);
        assert_eq!(err.to_string(), "GraphQL errors: [error 1]: (no details)");

        let err = ShopifyError::GraphQL(vec![]);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: (no error details provided)"
        );
    }

    #[test]
    fn test_user_errors_joined_with_field_path() {
        let result = check_user_errors(vec![
            UserError {
                field: Some(vec!["metafields".to_string(), "0".to_string(), "value".to_string()]),
                message: "Value is invalid JSON".to_string(),
            },
            UserError {
                field: None,
                message: "Owner not found".to_string(),
            },
        ]);
        let Err(ShopifyError::UserError(message)) = result else {
            panic!("expected user error");
        };
        assert_eq!(
            message,
            "metafields.0.value: Value is invalid JSON; Owner not found"
        );
    }

    #[test]
    fn test_no_user_errors_is_ok() {
        assert!(check_user_errors(vec![]).is_ok());
    }
}
