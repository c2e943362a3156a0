//! Metafield definition provisioning.
//!
//! # Usage
//!
//! ```bash
//! # Create the app-owned wishlist definition ($app:wishlist.items)
//! wishlist-cli provision
//!
//! # Use a merchant-owned namespace and key instead
//! wishlist-cli provision --namespace custom --key wishlist
//! ```
//!
//! # Environment Variables
//!
//! - `SHOPIFY_STORE` - Store domain
//! - `SHOPIFY_ADMIN_ACCESS_TOKEN` - Admin API token with metafield definition access

use wishlist_sync::config::ShopifyConfig;
use wishlist_sync::shopify::{AdminClient, MetafieldDefinition, ProvisionOutcome};

use super::CommandError;

/// Ensure the customer metafield definition exists.
///
/// Safe to run repeatedly: an existing definition is left untouched.
pub async fn run(definition: MetafieldDefinition) -> Result<ProvisionOutcome, CommandError> {
    let config = ShopifyConfig::from_env()?;
    let client = AdminClient::new(&config)?;

    tracing::info!(
        store = %config.store,
        namespace = %definition.namespace,
        key = %definition.key,
        "Provisioning wishlist metafield definition"
    );

    let outcome = client.ensure_metafield_definition(&definition).await?;
    match &outcome {
        ProvisionOutcome::AlreadyExists { id } => {
            tracing::info!("Definition already exists: {id}");
        }
        ProvisionOutcome::Created { id } => {
            tracing::info!("Definition created: {id}");
        }
    }

    Ok(outcome)
}
