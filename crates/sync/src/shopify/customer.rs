//! Shopify Customer Account API client.
//!
//! Owns the wishlist's durable state: a JSON array of product IDs in a
//! customer metafield. Calls are made on behalf of one customer, using the
//! access token the customer account surface hands us.
//!
//! # Example
//!
//! ```rust,ignore
//! use wishlist_sync::shopify::CustomerAccountClient;
//!
//! let client = CustomerAccountClient::new(&config.shopify)?;
//! let session = client.session(access_token);
//!
//! let value = client
//!     .get_metafield_value(&token, &MetafieldKey::default())
//!     .await?;
//! ```

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;
use wishlist_core::{CustomerRef, MetafieldKey};

use super::graphql::{execute, http_client};
use super::queries::{
    GetShop, GetWishlistMetafield, SetWishlistMetafield, get_shop, get_wishlist_metafield,
    set_wishlist_metafield,
};
use super::{ShopifyError, check_user_errors};
use crate::config::ShopifyConfig;
use crate::wishlist::{MetafieldStore, ShopContext};

/// Client for the Shopify Customer Account API.
#[derive(Clone)]
pub struct CustomerAccountClient {
    inner: Arc<CustomerAccountClientInner>,
}

struct CustomerAccountClientInner {
    client: reqwest::Client,
    endpoint: String,
}

impl CustomerAccountClient {
    /// Create a new Customer Account API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &ShopifyConfig) -> Result<Self, ShopifyError> {
        let endpoint = format!(
            "https://shopify.com/{}/account/customer/api/{}/graphql",
            config.customer_shop_id, config.api_version
        );

        Ok(Self {
            inner: Arc::new(CustomerAccountClientInner {
                client: http_client(config.request_timeout)?,
                endpoint,
            }),
        })
    }

    /// The GraphQL endpoint this client talks to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.inner.endpoint
    }

    /// Bind this client to one customer's access token.
    #[must_use]
    pub fn session(&self, access_token: SecretString) -> CustomerSession {
        CustomerSession {
            client: self.clone(),
            access_token,
        }
    }

    async fn execute<Q: graphql_client::GraphQLQuery>(
        &self,
        access_token: &SecretString,
        variables: Q::Variables,
    ) -> Result<Q::ResponseData, ShopifyError> {
        execute::<Q>(
            &self.inner.client,
            &self.inner.endpoint,
            ("Authorization", access_token.expose_secret()),
            variables,
        )
        .await
    }

    /// Get the raw metafield value, `None` if the metafield is unset.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, access_token), fields(metafield = %key))]
    pub async fn get_metafield_value(
        &self,
        access_token: &SecretString,
        key: &MetafieldKey,
    ) -> Result<Option<String>, ShopifyError> {
        let variables = get_wishlist_metafield::Variables {
            namespace: key.namespace.clone(),
            key: key.key.clone(),
        };

        let data = self
            .execute::<GetWishlistMetafield>(access_token, variables)
            .await?;

        Ok(data
            .customer
            .and_then(|customer| customer.metafield)
            .and_then(|metafield| metafield.value))
    }

    /// Overwrite the metafield value for `owner`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or Shopify reports user
    /// errors for the write.
    #[instrument(skip(self, access_token, value), fields(metafield = %key, owner = %owner))]
    pub async fn set_metafield_value(
        &self,
        access_token: &SecretString,
        key: &MetafieldKey,
        owner: &CustomerRef,
        value: String,
    ) -> Result<(), ShopifyError> {
        let variables = set_wishlist_metafield::Variables {
            metafields: vec![set_wishlist_metafield::MetafieldsSetInput {
                namespace: key.namespace.clone(),
                key: key.key.clone(),
                owner_id: owner.owner_gid(),
                value,
            }],
        };

        let data = self
            .execute::<SetWishlistMetafield>(access_token, variables)
            .await?;

        let payload = data
            .metafields_set
            .ok_or_else(|| ShopifyError::UserError("metafieldsSet returned no payload".to_string()))?;
        check_user_errors(payload.user_errors)
    }

    /// Get the shop's public base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, access_token))]
    pub async fn get_shop_url(&self, access_token: &SecretString) -> Result<String, ShopifyError> {
        let data = self
            .execute::<GetShop>(access_token, get_shop::Variables)
            .await?;
        Ok(data.shop.url)
    }
}

/// A Customer Account API client bound to one customer's access token.
///
/// This is the remote key-value metafield store and shop-context accessor
/// used by wishlist surfaces.
#[derive(Clone)]
pub struct CustomerSession {
    client: CustomerAccountClient,
    access_token: SecretString,
}

impl std::fmt::Debug for CustomerSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomerSession")
            .field("endpoint", &self.client.endpoint())
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

impl MetafieldStore for CustomerSession {
    async fn get(&self, key: &MetafieldKey) -> Result<Option<String>, ShopifyError> {
        self.client
            .get_metafield_value(&self.access_token, key)
            .await
    }

    async fn set(
        &self,
        key: &MetafieldKey,
        owner: &CustomerRef,
        value: String,
    ) -> Result<(), ShopifyError> {
        self.client
            .set_metafield_value(&self.access_token, key, owner, value)
            .await
    }
}

impl ShopContext for CustomerSession {
    async fn shop_url(&self) -> Result<String, ShopifyError> {
        self.client.get_shop_url(&self.access_token).await
    }
}
