//! Customer wishlist inspection and mutation.
//!
//! Runs the same surface code the server uses, against one customer.
//!
//! # Usage
//!
//! ```bash
//! export WISHLIST_CUSTOMER_TOKEN=...
//!
//! wishlist-cli show --customer 7012
//! wishlist-cli add 8123456789 --customer 7012
//! wishlist-cli remove gid://shopify/Product/8123456789 --customer 7012
//! ```

use secrecy::SecretString;
use wishlist_core::{CustomerRef, ProductId, Settings};
use wishlist_sync::config::WishlistConfig;
use wishlist_sync::shopify::{CustomerAccountClient, CustomerSession, StorefrontClient};
use wishlist_sync::wishlist::{RenderContext, SurfaceKind, ViewState, WishlistSurface};

use super::CommandError;

/// Action to apply to the wishlist.
#[derive(Debug, Clone)]
pub enum Action {
    Show,
    Add(String),
    Remove(String),
}

/// Where the wishlist lives and who owns it.
#[derive(Debug, Clone)]
pub struct Target {
    pub customer: CustomerRef,
    pub access_token: SecretString,
    pub namespace: String,
    pub key: String,
}

/// Load the customer's wishlist, apply `action`, and print the resulting
/// full-page view as JSON.
pub async fn run(target: Target, action: Action) -> Result<ViewState, CommandError> {
    let config = WishlistConfig::from_env()?;
    let storefront = StorefrontClient::new(&config.shopify)?;
    let session = CustomerAccountClient::new(&config.shopify)?.session(target.access_token);

    let settings = Settings {
        metafield_namespace: target.namespace,
        metafield_key: target.key,
        ..Settings::default()
    };
    if settings.metafield().is_none() {
        return Err(CommandError::InvalidInput(
            "metafield namespace and key must not be blank".to_string(),
        ));
    }

    let mut surface: WishlistSurface<CustomerSession, StorefrontClient, CustomerSession> =
        WishlistSurface::new(
            SurfaceKind::FullPage,
            settings,
            RenderContext::Customer(target.customer),
            session.clone(),
            storefront,
            session,
        )
        .with_update_policy(config.sync.update_policy);

    let mutating = !matches!(action, Action::Show);
    let view = match action {
        Action::Show => surface.load().await,
        Action::Add(raw) => surface.add(&parse_product_id(&raw)?).await,
        Action::Remove(raw) => surface.remove(&parse_product_id(&raw)?).await,
    };
    // A mutation skipped because the wishlist could not be read is an error
    if let Some(e) = surface.take_load_error().filter(|_| mutating) {
        return Err(e.into());
    }

    print_view(&view)?;
    Ok(view)
}

#[allow(clippy::print_stdout)]
fn print_view(view: &ViewState) -> Result<(), CommandError> {
    println!("{}", serde_json::to_string_pretty(view)?);
    Ok(())
}

/// Accept bare numeric product IDs as well as GIDs.
fn parse_product_id(raw: &str) -> Result<ProductId, CommandError> {
    ProductId::parse(raw)
        .ok_or_else(|| CommandError::InvalidInput(format!("invalid product id: {}", raw.trim())))
}
