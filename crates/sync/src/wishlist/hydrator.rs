//! Resolves wishlist identifiers into product records.

use std::collections::HashMap;

use tracing::{debug, error, instrument};
use wishlist_core::{ProductId, ProductRecord, WishlistIdentifierList};

use super::ProductLookup;
use crate::shopify::ShopifyError;

/// Number of sample products shown in editor preview.
pub const DEFAULT_PREVIEW_LIMIT: usize = 3;

/// Number of tagged products offered as suggestions.
pub const DEFAULT_SUGGESTION_LIMIT: usize = 10;

/// Largest `first` the Storefront API accepts on a product connection.
pub const MAX_PRODUCTS_PER_PAGE: usize = 250;

/// Turns identifiers into displayable product records.
///
/// Every call goes to the catalog; nothing is cached between calls. Lookup
/// failures degrade to an empty result and are logged.
#[derive(Debug, Clone)]
pub struct ProductHydrator<L> {
    lookup: L,
}

impl<L: ProductLookup> ProductHydrator<L> {
    pub const fn new(lookup: L) -> Self {
        Self { lookup }
    }

    /// The underlying product catalog.
    pub const fn lookup(&self) -> &L {
        &self.lookup
    }

    /// Resolve `ids` in one batched lookup.
    ///
    /// IDs that do not resolve to a product are dropped. The surviving
    /// records keep the order of `ids`. An empty input makes no call, and a
    /// failed lookup reads as no products.
    #[instrument(skip(self, ids), fields(count = ids.len()))]
    pub async fn hydrate(&self, ids: &[ProductId]) -> Vec<ProductRecord> {
        self.try_hydrate(ids).await.unwrap_or_else(|e| {
            error!(error = %e, "Failed to hydrate wishlist products");
            Vec::new()
        })
    }

    /// [`Self::hydrate`], but a failed lookup is returned instead of read as
    /// no products.
    ///
    /// # Errors
    ///
    /// Returns an error if the batched lookup fails.
    pub async fn try_hydrate(
        &self,
        ids: &[ProductId],
    ) -> Result<Vec<ProductRecord>, ShopifyError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let resolved = self.lookup.lookup_by_ids(ids).await?;

        // Match by ID rather than response position
        let mut by_id: HashMap<ProductId, ProductRecord> = resolved
            .into_iter()
            .flatten()
            .map(|record| (record.id.clone(), record))
            .collect();
        let records: Vec<ProductRecord> = ids.iter().filter_map(|id| by_id.remove(id)).collect();

        if records.len() < ids.len() {
            debug!(
                dropped = ids.len() - records.len(),
                "Dropped unresolved wishlist identifiers"
            );
        }

        Ok(records)
    }

    /// Convenience wrapper over [`Self::hydrate`] for a stored list.
    pub async fn hydrate_list(&self, ids: &WishlistIdentifierList) -> Vec<ProductRecord> {
        self.hydrate(ids.as_slice()).await
    }

    /// Sample products for editor preview, independent of any wishlist.
    #[instrument(skip(self))]
    pub async fn hydrate_preview(&self, limit: usize) -> Vec<ProductRecord> {
        if limit == 0 {
            return Vec::new();
        }

        match self.lookup.list_products(limit, None).await {
            Ok(mut records) => {
                records.truncate(limit);
                records
            }
            Err(e) => {
                error!(error = %e, "Failed to load preview products");
                Vec::new()
            }
        }
    }

    /// Products tagged `tag` that are not already in `wishlisted`.
    #[instrument(skip(self, wishlisted), fields(wishlisted = wishlisted.len()))]
    pub async fn suggestions(
        &self,
        tag: &str,
        limit: usize,
        wishlisted: &WishlistIdentifierList,
    ) -> Vec<ProductRecord> {
        if limit == 0 {
            return Vec::new();
        }

        let query = tag_query(tag);
        let limit = limit.min(MAX_PRODUCTS_PER_PAGE);
        let first = limit
            .saturating_add(wishlisted.len())
            .min(MAX_PRODUCTS_PER_PAGE);

        match self.lookup.list_products(first, Some(&query)).await {
            Ok(records) => records
                .into_iter()
                .filter(|record| !wishlisted.contains(&record.id))
                .take(limit)
                .collect(),
            Err(e) => {
                error!(error = %e, "Failed to load suggested products");
                Vec::new()
            }
        }
    }
}

/// Storefront search query matching products with `tag`.
fn tag_query(tag: &str) -> String {
    let escaped = tag.replace('\\', "\\\\").replace('"', "\\\"");
    format!("tag:\"{escaped}\"")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct Catalog {
        products: Vec<ProductRecord>,
        lookups: Mutex<Vec<Vec<ProductId>>>,
        queries: Mutex<Vec<(usize, Option<String>)>>,
        fail: bool,
    }

    impl Catalog {
        fn with(ids: &[&str]) -> Self {
            Self {
                products: ids
                    .iter()
                    .map(|id| ProductRecord::new(*id, id.to_uppercase()))
                    .collect(),
                ..Default::default()
            }
        }
    }

    impl ProductLookup for Catalog {
        async fn lookup_by_ids(
            &self,
            ids: &[ProductId],
        ) -> Result<Vec<Option<ProductRecord>>, ShopifyError> {
            self.lookups.lock().unwrap().push(ids.to_vec());
            if self.fail {
                return Err(ShopifyError::RateLimited(2));
            }
            // Respond in reverse to prove ordering comes from the input
            Ok(ids
                .iter()
                .rev()
                .map(|id| self.products.iter().find(|p| &p.id == id).cloned())
                .collect())
        }

        async fn list_products(
            &self,
            first: usize,
            query: Option<&str>,
        ) -> Result<Vec<ProductRecord>, ShopifyError> {
            self.queries
                .lock()
                .unwrap()
                .push((first, query.map(str::to_string)));
            if self.fail {
                return Err(ShopifyError::RateLimited(2));
            }
            Ok(self.products.iter().take(first).cloned().collect())
        }
    }

    fn ids(values: &[&str]) -> Vec<ProductId> {
        values.iter().map(|v| ProductId::new(*v)).collect()
    }

    fn titles(records: &[ProductRecord]) -> Vec<&str> {
        records.iter().map(|r| r.title.as_str()).collect()
    }

    #[tokio::test]
    async fn test_hydrate_empty_makes_no_call() {
        let hydrator = ProductHydrator::new(Catalog::with(&["a"]));
        assert!(hydrator.hydrate(&[]).await.is_empty());
        assert!(hydrator.lookup().lookups.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_hydrate_drops_unresolved_and_keeps_input_order() {
        let hydrator = ProductHydrator::new(Catalog::with(&["a", "c"]));
        let records = hydrator.hydrate(&ids(&["c", "b", "a"])).await;
        assert_eq!(titles(&records), vec!["C", "A"]);
        assert_eq!(hydrator.lookup().lookups.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_hydrate_failure_is_empty() {
        let hydrator = ProductHydrator::new(Catalog {
            fail: true,
            ..Catalog::with(&["a"])
        });
        assert!(hydrator.hydrate(&ids(&["a"])).await.is_empty());
    }

    #[tokio::test]
    async fn test_preview_is_bounded() {
        let hydrator = ProductHydrator::new(Catalog::with(&["a", "b", "c", "d"]));
        let records = hydrator.hydrate_preview(DEFAULT_PREVIEW_LIMIT).await;
        assert_eq!(titles(&records), vec!["A", "B", "C"]);
        assert_eq!(
            hydrator.lookup().queries.lock().unwrap().clone(),
            vec![(3, None)]
        );
    }

    #[tokio::test]
    async fn test_suggestions_exclude_wishlisted() {
        let hydrator = ProductHydrator::new(Catalog::with(&["a", "b", "c"]));
        let wishlisted = WishlistIdentifierList::from_ids(["b"]);
        let records = hydrator.suggestions("summer", 2, &wishlisted).await;
        assert_eq!(titles(&records), vec!["A", "C"]);
        assert_eq!(
            hydrator.lookup().queries.lock().unwrap().clone(),
            vec![(3, Some("tag:\"summer\"".to_string()))]
        );
    }

    #[tokio::test]
    async fn test_try_hydrate_reports_lookup_failure() {
        let hydrator = ProductHydrator::new(Catalog {
            fail: true,
            ..Catalog::with(&["a"])
        });
        let result = hydrator.try_hydrate(&ids(&["a"])).await;
        assert!(matches!(result, Err(ShopifyError::RateLimited(2))));
    }

    #[tokio::test]
    async fn test_suggestions_stay_within_page_size() {
        let hydrator = ProductHydrator::new(Catalog::with(&["a", "b"]));
        let wishlisted = WishlistIdentifierList::from_ids(["x", "y"]);
        hydrator.suggestions("summer", 1_000, &wishlisted).await;
        assert_eq!(
            hydrator.lookup().queries.lock().unwrap().clone(),
            vec![(MAX_PRODUCTS_PER_PAGE, Some("tag:\"summer\"".to_string()))]
        );
    }

    #[test]
    fn test_tag_query_escapes_quotes() {
        assert_eq!(tag_query(r#"say "hi""#), r#"tag:"say \"hi\"""#);
    }
}
