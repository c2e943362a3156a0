//! Shopify Storefront API client.
//!
//! Resolves wishlist identifiers into product records and reads the shop's
//! primary domain for product links. Nothing is cached:
//! products can be deleted or unpublished at any time, so every call reads
//! fresh data.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument};
use wishlist_core::{ProductId, ProductRecord};

use super::conversions::convert_product;
use super::graphql::{execute, http_client};
use super::queries::{
    GetProducts, GetProductsByIds, GetStorefrontShop, get_products, get_products_by_ids,
    get_storefront_shop,
};
use crate::config::ShopifyConfig;
use crate::shopify::ShopifyError;
use crate::wishlist::{ProductLookup, ShopContext};

/// Client for the Shopify Storefront API.
#[derive(Clone)]
pub struct StorefrontClient {
    inner: Arc<StorefrontClientInner>,
}

struct StorefrontClientInner {
    client: reqwest::Client,
    endpoint: String,
    access_token: SecretString,
}

impl StorefrontClient {
    /// Create a new Storefront API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &ShopifyConfig) -> Result<Self, ShopifyError> {
        let endpoint = format!(
            "https://{}/api/{}/graphql.json",
            config.store, config.api_version
        );

        Ok(Self {
            inner: Arc::new(StorefrontClientInner {
                client: http_client(config.request_timeout)?,
                endpoint,
                access_token: config.storefront_private_token.clone(),
            }),
        })
    }

    /// The GraphQL endpoint this client talks to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.inner.endpoint
    }

    async fn execute<Q: graphql_client::GraphQLQuery>(
        &self,
        variables: Q::Variables,
    ) -> Result<Q::ResponseData, ShopifyError> {
        // Private access tokens use a different header than public tokens
        execute::<Q>(
            &self.inner.client,
            &self.inner.endpoint,
            (
                "Shopify-Storefront-Private-Token",
                self.inner.access_token.expose_secret(),
            ),
            variables,
        )
        .await
    }

    /// Look up products by ID in one batched call.
    ///
    /// The result is parallel to `ids`: `None` where the ID did not resolve
    /// to a live product.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, ids), fields(count = ids.len()))]
    pub async fn get_products_by_ids(
        &self,
        ids: &[ProductId],
    ) -> Result<Vec<Option<ProductRecord>>, ShopifyError> {
        let variables = get_products_by_ids::Variables {
            ids: ids.iter().map(|id| id.as_str().to_string()).collect(),
        };

        let data = self.execute::<GetProductsByIds>(variables).await?;

        let records: Vec<Option<ProductRecord>> = data
            .nodes
            .into_iter()
            .map(|node| node.and_then(convert_product))
            .collect();
        debug!(
            resolved = records.iter().filter(|r| r.is_some()).count(),
            "Product lookup complete"
        );

        Ok(records)
    }

    /// List up to `first` products, optionally filtered by a search query.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_products(
        &self,
        first: usize,
        query: Option<&str>,
    ) -> Result<Vec<ProductRecord>, ShopifyError> {
        let variables = get_products::Variables {
            first: i64::try_from(first).unwrap_or(i64::MAX),
            query: query.map(str::to_string),
        };

        let data = self.execute::<GetProducts>(variables).await?;

        Ok(data
            .products
            .nodes
            .into_iter()
            .flatten()
            .filter_map(convert_product)
            .collect())
    }

    /// Get the shop's primary storefront URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_shop_url(&self) -> Result<String, ShopifyError> {
        let data = self
            .execute::<GetStorefrontShop>(get_storefront_shop::Variables)
            .await?;
        Ok(data.shop.primary_domain.url)
    }
}

impl ProductLookup for StorefrontClient {
    async fn lookup_by_ids(
        &self,
        ids: &[ProductId],
    ) -> Result<Vec<Option<ProductRecord>>, ShopifyError> {
        self.get_products_by_ids(ids).await
    }

    async fn list_products(
        &self,
        first: usize,
        query: Option<&str>,
    ) -> Result<Vec<ProductRecord>, ShopifyError> {
        self.get_products(first, query).await
    }
}

impl ShopContext for StorefrontClient {
    async fn shop_url(&self) -> Result<String, ShopifyError> {
        self.get_shop_url().await
    }
}
