//! Shopify Admin API client (operator tooling only).
//!
//! Used once per shop to provision the customer metafield definition the
//! wishlist lives in. The request path of a running server never touches
//! the Admin API.

use secrecy::{ExposeSecret, SecretString};
use tracing::{info, instrument};

use super::graphql::{execute, http_client};
use super::queries::{
    CreateMetafieldDefinition, GetMetafieldDefinition, create_metafield_definition,
    get_metafield_definition,
};
use super::{ShopifyError, check_user_errors};
use crate::config::ShopifyConfig;

/// Namespace of the app-owned wishlist metafield.
pub const PROVISIONED_NAMESPACE: &str = "$app:wishlist";
/// Key of the app-owned wishlist metafield.
pub const PROVISIONED_KEY: &str = "items";

/// Shape of a customer metafield definition to provision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetafieldDefinition {
    pub name: String,
    pub namespace: String,
    pub key: String,
    /// Shopify metafield type, e.g. `list.product_reference`.
    pub type_name: String,
}

impl Default for MetafieldDefinition {
    fn default() -> Self {
        Self {
            name: "Wishlist items".to_string(),
            namespace: PROVISIONED_NAMESPACE.to_string(),
            key: PROVISIONED_KEY.to_string(),
            type_name: "list.product_reference".to_string(),
        }
    }
}

/// Result of [`AdminClient::ensure_metafield_definition`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionOutcome {
    /// A definition with this namespace and key already existed.
    AlreadyExists { id: String },
    /// A new definition was created.
    Created { id: String },
}

impl ProvisionOutcome {
    /// GID of the metafield definition.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::AlreadyExists { id } | Self::Created { id } => id,
        }
    }
}

/// Client for the Shopify Admin API.
#[derive(Clone)]
pub struct AdminClient {
    client: reqwest::Client,
    endpoint: String,
    access_token: SecretString,
}

impl std::fmt::Debug for AdminClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminClient")
            .field("endpoint", &self.endpoint)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

impl AdminClient {
    /// Create a new Admin API client.
    ///
    /// # Errors
    ///
    /// Returns `MissingCredential` if no Admin API token is configured, or an
    /// error if the HTTP client cannot be built.
    pub fn new(config: &ShopifyConfig) -> Result<Self, ShopifyError> {
        let access_token = config
            .admin_access_token
            .clone()
            .ok_or(ShopifyError::MissingCredential("SHOPIFY_ADMIN_ACCESS_TOKEN"))?;

        Ok(Self {
            client: http_client(config.request_timeout)?,
            endpoint: format!(
                "https://{}/admin/api/{}/graphql.json",
                config.store, config.api_version
            ),
            access_token,
        })
    }

    /// The GraphQL endpoint this client talks to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn execute<Q: graphql_client::GraphQLQuery>(
        &self,
        variables: Q::Variables,
    ) -> Result<Q::ResponseData, ShopifyError> {
        execute::<Q>(
            &self.client,
            &self.endpoint,
            ("X-Shopify-Access-Token", self.access_token.expose_secret()),
            variables,
        )
        .await
    }

    /// Find the ID of an existing customer metafield definition.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn find_metafield_definition(
        &self,
        namespace: &str,
        key: &str,
    ) -> Result<Option<String>, ShopifyError> {
        let variables = get_metafield_definition::Variables {
            key: key.to_string(),
            namespace: namespace.to_string(),
            owner_type: "CUSTOMER".to_string(),
        };

        let data = self.execute::<GetMetafieldDefinition>(variables).await?;
        Ok(data
            .metafield_definitions
            .nodes
            .into_iter()
            .next()
            .map(|node| node.id))
    }

    /// Create the customer metafield definition unless it already exists.
    ///
    /// The definition grants customer accounts read/write access so the
    /// Customer Account API can store the wishlist.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or Shopify rejects the
    /// definition.
    #[instrument(skip(self), fields(namespace = %definition.namespace, key = %definition.key))]
    pub async fn ensure_metafield_definition(
        &self,
        definition: &MetafieldDefinition,
    ) -> Result<ProvisionOutcome, ShopifyError> {
        if let Some(id) = self
            .find_metafield_definition(&definition.namespace, &definition.key)
            .await?
        {
            info!(id = %id, "Metafield definition already exists");
            return Ok(ProvisionOutcome::AlreadyExists { id });
        }

        let variables = create_metafield_definition::Variables {
            definition: create_metafield_definition::MetafieldDefinitionInput {
                name: definition.name.clone(),
                namespace: definition.namespace.clone(),
                key: definition.key.clone(),
                owner_type: "CUSTOMER".to_string(),
                type_name: definition.type_name.clone(),
                access: create_metafield_definition::MetafieldAccessInput {
                    customer_account: "READ_WRITE".to_string(),
                },
            },
        };

        let data = self.execute::<CreateMetafieldDefinition>(variables).await?;
        let payload = data.metafield_definition_create.ok_or_else(|| {
            ShopifyError::UserError("metafieldDefinitionCreate returned no payload".to_string())
        })?;
        check_user_errors(payload.user_errors)?;

        let created = payload
            .created_definition
            .ok_or_else(|| ShopifyError::NotFound("created metafield definition".to_string()))?;
        info!(id = %created.id, "Metafield definition created");

        Ok(ProvisionOutcome::Created { id: created.id })
    }
}
