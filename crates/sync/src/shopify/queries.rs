//! GraphQL documents used by the wishlist.
//!
//! Each query is a unit struct implementing [`GraphQLQuery`] with a sibling
//! module holding its `Variables` and `ResponseData`, mirroring the layout
//! `graphql_client` codegen produces. Only the fields the wishlist reads are
//! selected.

use graphql_client::{GraphQLQuery, QueryBody};
use serde::{Deserialize, Serialize};

use super::UserError;

/// Append the `ProductFields` fragment shared by every product query.
macro_rules! with_product_fragment {
    ($query:literal) => {
        concat!(
            $query,
            r"
    fragment ProductFields on Product {
        id
        title
        handle
        priceRange {
            minVariantPrice {
                amount
                currencyCode
            }
            maxVariantPrice {
                amount
                currencyCode
            }
        }
        images(first: 1) {
            nodes {
                url
            }
        }
    }
"
        )
    };
}

/// Product node as selected by `ProductFields`.
///
/// Every field is optional: `nodes(ids:)` returns `{}` for IDs that resolve
/// to something other than a product, and `null` for IDs that resolve to
/// nothing. Conversion decides what is usable.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductNode {
    pub id: Option<String>,
    pub title: Option<String>,
    pub handle: Option<String>,
    pub price_range: Option<PriceRangeNode>,
    pub images: Option<ImageConnection>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRangeNode {
    pub min_variant_price: MoneyNode,
    pub max_variant_price: MoneyNode,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoneyNode {
    pub amount: String,
    pub currency_code: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageConnection {
    pub nodes: Vec<ImageNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageNode {
    pub url: String,
}

// =============================================================================
// Storefront API
// =============================================================================

/// Batched product lookup: one `nodes(ids:)` call for the whole wishlist.
pub struct GetProductsByIds;

pub mod get_products_by_ids {
    use super::{Deserialize, ProductNode, Serialize};

    pub const OPERATION_NAME: &str = "GetProductsByIds";
    pub const QUERY: &str = with_product_fragment!(
        r"
    query GetProductsByIds($ids: [ID!]!) {
        nodes(ids: $ids) {
            ... on Product {
                ...ProductFields
            }
        }
    }
"
    );

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub ids: Vec<String>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        /// Parallel to the requested IDs; `None` where nothing resolved.
        pub nodes: Vec<Option<ProductNode>>,
    }
}

impl GraphQLQuery for GetProductsByIds {
    type Variables = get_products_by_ids::Variables;
    type ResponseData = get_products_by_ids::ResponseData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: get_products_by_ids::QUERY,
            operation_name: get_products_by_ids::OPERATION_NAME,
        }
    }
}

/// Product listing, optionally narrowed with a search query (`tag:"..."`).
pub struct GetProducts;

pub mod get_products {
    use super::{Deserialize, ProductNode, Serialize};

    pub const OPERATION_NAME: &str = "GetProducts";
    pub const QUERY: &str = with_product_fragment!(
        r"
    query GetProducts($first: Int!, $query: String) {
        products(first: $first, query: $query) {
            nodes {
                ...ProductFields
            }
        }
    }
"
    );

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub first: i64,
        pub query: Option<String>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub products: ProductConnection,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ProductConnection {
        pub nodes: Vec<Option<ProductNode>>,
    }
}

impl GraphQLQuery for GetProducts {
    type Variables = get_products::Variables;
    type ResponseData = get_products::ResponseData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: get_products::QUERY,
            operation_name: get_products::OPERATION_NAME,
        }
    }
}

/// Storefront domain, used to link products when no customer is signed in.
pub struct GetStorefrontShop;

pub mod get_storefront_shop {
    use super::{Deserialize, Serialize};

    pub const OPERATION_NAME: &str = "GetStorefrontShop";
    pub const QUERY: &str = r"
    query GetStorefrontShop {
        shop {
            primaryDomain {
                url
            }
        }
    }
";

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables;

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub shop: Shop,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Shop {
        pub primary_domain: Domain,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct Domain {
        pub url: String,
    }
}

impl GraphQLQuery for GetStorefrontShop {
    type Variables = get_storefront_shop::Variables;
    type ResponseData = get_storefront_shop::ResponseData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: get_storefront_shop::QUERY,
            operation_name: get_storefront_shop::OPERATION_NAME,
        }
    }
}

// =============================================================================
// Customer Account API
// =============================================================================

/// Read the wishlist metafield of the signed-in customer.
pub struct GetWishlistMetafield;

pub mod get_wishlist_metafield {
    use super::{Deserialize, Serialize};

    pub const OPERATION_NAME: &str = "GetWishlistMetafield";
    pub const QUERY: &str = r"
    query GetWishlistMetafield($namespace: String!, $key: String!) {
        customer {
            metafield(namespace: $namespace, key: $key) {
                value
            }
        }
    }
";

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub namespace: String,
        pub key: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub customer: Option<Customer>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct Customer {
        pub metafield: Option<Metafield>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct Metafield {
        pub value: Option<String>,
    }
}

impl GraphQLQuery for GetWishlistMetafield {
    type Variables = get_wishlist_metafield::Variables;
    type ResponseData = get_wishlist_metafield::ResponseData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: get_wishlist_metafield::QUERY,
            operation_name: get_wishlist_metafield::OPERATION_NAME,
        }
    }
}

/// Overwrite the wishlist metafield (full-value set, no partial update).
pub struct SetWishlistMetafield;

pub mod set_wishlist_metafield {
    use super::{Deserialize, Serialize, UserError};

    pub const OPERATION_NAME: &str = "SetWishlistMetafield";
    pub const QUERY: &str = r"
    mutation SetWishlistMetafield($metafields: [MetafieldsSetInput!]!) {
        metafieldsSet(metafields: $metafields) {
            userErrors {
                field
                message
            }
        }
    }
";

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub metafields: Vec<MetafieldsSetInput>,
    }

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MetafieldsSetInput {
        pub namespace: String,
        pub key: String,
        pub owner_id: String,
        pub value: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub metafields_set: Option<MetafieldsSetPayload>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MetafieldsSetPayload {
        pub user_errors: Vec<UserError>,
    }
}

impl GraphQLQuery for SetWishlistMetafield {
    type Variables = set_wishlist_metafield::Variables;
    type ResponseData = set_wishlist_metafield::ResponseData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: set_wishlist_metafield::QUERY,
            operation_name: set_wishlist_metafield::OPERATION_NAME,
        }
    }
}

/// Shop base URL, used to build product links.
pub struct GetShop;

pub mod get_shop {
    use super::{Deserialize, Serialize};

    pub const OPERATION_NAME: &str = "GetShop";
    pub const QUERY: &str = r"
    query GetShop {
        shop {
            url
        }
    }
";

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables;

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub shop: Shop,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct Shop {
        pub url: String,
    }
}

impl GraphQLQuery for GetShop {
    type Variables = get_shop::Variables;
    type ResponseData = get_shop::ResponseData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: get_shop::QUERY,
            operation_name: get_shop::OPERATION_NAME,
        }
    }
}

// =============================================================================
// Admin API
// =============================================================================

/// Look up an existing metafield definition.
pub struct GetMetafieldDefinition;

pub mod get_metafield_definition {
    use super::{Deserialize, Serialize};

    pub const OPERATION_NAME: &str = "GetMetafieldDefinition";
    pub const QUERY: &str = r"
    query GetMetafieldDefinition($key: String!, $namespace: String!, $ownerType: MetafieldOwnerType!) {
        metafieldDefinitions(first: 1, key: $key, namespace: $namespace, ownerType: $ownerType) {
            nodes {
                id
            }
        }
    }
";

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub key: String,
        pub namespace: String,
        pub owner_type: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub metafield_definitions: DefinitionConnection,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct DefinitionConnection {
        pub nodes: Vec<DefinitionNode>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct DefinitionNode {
        pub id: String,
    }
}

impl GraphQLQuery for GetMetafieldDefinition {
    type Variables = get_metafield_definition::Variables;
    type ResponseData = get_metafield_definition::ResponseData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: get_metafield_definition::QUERY,
            operation_name: get_metafield_definition::OPERATION_NAME,
        }
    }
}

/// Create the wishlist metafield definition.
pub struct CreateMetafieldDefinition;

pub mod create_metafield_definition {
    use super::{Deserialize, Serialize, UserError};

    pub const OPERATION_NAME: &str = "CreateMetafieldDefinition";
    pub const QUERY: &str = r"
    mutation CreateMetafieldDefinition($definition: MetafieldDefinitionInput!) {
        metafieldDefinitionCreate(definition: $definition) {
            createdDefinition {
                id
                key
                namespace
            }
            userErrors {
                field
                message
            }
        }
    }
";

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub definition: MetafieldDefinitionInput,
    }

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MetafieldDefinitionInput {
        pub name: String,
        pub namespace: String,
        pub key: String,
        pub owner_type: String,
        #[serde(rename = "type")]
        pub type_name: String,
        pub access: MetafieldAccessInput,
    }

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MetafieldAccessInput {
        pub customer_account: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub metafield_definition_create: Option<CreatePayload>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CreatePayload {
        pub created_definition: Option<CreatedDefinition>,
        pub user_errors: Vec<UserError>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct CreatedDefinition {
        pub id: String,
        pub key: String,
        pub namespace: String,
    }
}

impl GraphQLQuery for CreateMetafieldDefinition {
    type Variables = create_metafield_definition::Variables;
    type ResponseData = create_metafield_definition::ResponseData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: create_metafield_definition::QUERY,
            operation_name: create_metafield_definition::OPERATION_NAME,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_queries_include_fragment() {
        assert!(get_products_by_ids::QUERY.contains("fragment ProductFields on Product"));
        assert!(get_products::QUERY.contains("fragment ProductFields on Product"));
        assert_eq!(
            get_products_by_ids::QUERY.matches("fragment ProductFields").count(),
            1
        );
    }

    #[test]
    fn test_build_query_serializes_operation_name() {
        let body = GetProductsByIds::build_query(get_products_by_ids::Variables {
            ids: vec!["gid://shopify/Product/1".to_string()],
        });
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["operationName"], "GetProductsByIds");
        assert_eq!(json["variables"]["ids"][0], "gid://shopify/Product/1");
    }

    #[test]
    fn test_metafields_set_input_is_camel_case() {
        let body = SetWishlistMetafield::build_query(set_wishlist_metafield::Variables {
            metafields: vec![set_wishlist_metafield::MetafieldsSetInput {
                namespace: "custom".to_string(),
                key: "wishlist".to_string(),
                owner_id: "gid://shopify/Customer/1".to_string(),
                value: "[]".to_string(),
            }],
        });
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json["variables"]["metafields"][0]["ownerId"],
            "gid://shopify/Customer/1"
        );
    }

    #[test]
    fn test_nodes_response_tolerates_nulls_and_non_products() {
        let data: get_products_by_ids::ResponseData = serde_json::from_value(serde_json::json!({
            "nodes": [
                { "id": "gid://shopify/Product/1", "title": "Tee", "handle": "tee",
                  "priceRange": null, "images": { "nodes": [] } },
                null,
                {}
            ]
        }))
        .unwrap();
        assert_eq!(data.nodes.len(), 3);
        assert!(data.nodes[1].is_none());
        assert!(data.nodes[2].as_ref().unwrap().id.is_none());
    }

    #[test]
    fn test_storefront_shop_reads_primary_domain() {
        let data: get_storefront_shop::ResponseData = serde_json::from_value(serde_json::json!({
            "shop": { "primaryDomain": { "url": "https://naked-pineapple.example" } }
        }))
        .unwrap();
        assert_eq!(data.shop.primary_domain.url, "https://naked-pineapple.example");
    }

    #[test]
    fn test_definition_input_uses_type_key() {
        let body =
            CreateMetafieldDefinition::build_query(create_metafield_definition::Variables {
                definition: create_metafield_definition::MetafieldDefinitionInput {
                    name: "Wishlist items".to_string(),
                    namespace: "$app:wishlist".to_string(),
                    key: "items".to_string(),
                    owner_type: "CUSTOMER".to_string(),
                    type_name: "list.product_reference".to_string(),
                    access: create_metafield_definition::MetafieldAccessInput {
                        customer_account: "READ_WRITE".to_string(),
                    },
                },
            });
        let json = serde_json::to_value(&body).unwrap();
        let definition = &json["variables"]["definition"];
        assert_eq!(definition["type"], "list.product_reference");
        assert_eq!(definition["ownerType"], "CUSTOMER");
        assert_eq!(definition["access"]["customerAccount"], "READ_WRITE");
    }
}
