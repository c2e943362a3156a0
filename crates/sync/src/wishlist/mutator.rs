//! Single-step wishlist mutations.

use tracing::{error, info, instrument};
use wishlist_core::{CustomerRef, MetafieldKey, ProductId, ProductRecord, WishlistIdentifierList};

use super::{IdentifierStore, MetafieldStore, ProductHydrator, ProductLookup, UpdatePolicy};
use crate::shopify::ShopifyError;

/// Result of one add or remove.
#[derive(Debug)]
pub enum MutationOutcome {
    /// The write was acknowledged and the new list re-hydrated.
    Applied {
        identifiers: WishlistIdentifierList,
        products: Vec<ProductRecord>,
    },
    /// The write failed. Nothing changed and nothing was re-hydrated.
    Rejected {
        retained: WishlistIdentifierList,
        error: ShopifyError,
    },
}

impl MutationOutcome {
    /// The identifier list in effect after this mutation.
    #[must_use]
    pub const fn identifiers(&self) -> &WishlistIdentifierList {
        match self {
            Self::Applied { identifiers, .. } => identifiers,
            Self::Rejected { retained, .. } => retained,
        }
    }

    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// Applies one mutation against the store, then re-hydrates.
///
/// Every surface funnels its adds and removes through here. The write comes
/// first; re-hydration only happens once Shopify acknowledged it. There is
/// no retry and no version check, so concurrent writers race and the last
/// one wins.
#[derive(Debug)]
pub struct ReconcilingMutator<'a, M, L> {
    store: &'a IdentifierStore<M>,
    hydrator: &'a ProductHydrator<L>,
    policy: UpdatePolicy,
}

impl<'a, M: MetafieldStore, L: ProductLookup> ReconcilingMutator<'a, M, L> {
    pub const fn new(
        store: &'a IdentifierStore<M>,
        hydrator: &'a ProductHydrator<L>,
        policy: UpdatePolicy,
    ) -> Self {
        Self {
            store,
            hydrator,
            policy,
        }
    }

    pub const fn policy(&self) -> UpdatePolicy {
        self.policy
    }

    /// What to show while a removal is in flight, if anything.
    ///
    /// Only the optimistic policy changes the visible list before the write
    /// is acknowledged.
    #[must_use]
    pub fn pending_removal(
        &self,
        visible: &[ProductRecord],
        product_id: &ProductId,
    ) -> Option<Vec<ProductRecord>> {
        match self.policy {
            UpdatePolicy::Optimistic => Some(
                visible
                    .iter()
                    .filter(|record| &record.id != product_id)
                    .cloned()
                    .collect(),
            ),
            UpdatePolicy::WaitForConfirmation => None,
        }
    }

    /// Remove `product_id` from `current` and persist the result.
    ///
    /// Removing an ID that is not present rewrites the unchanged list.
    #[instrument(skip(self, current), fields(metafield = %key, product_id = %product_id))]
    pub async fn remove_product(
        &self,
        key: &MetafieldKey,
        owner: &CustomerRef,
        current: &WishlistIdentifierList,
        product_id: &ProductId,
    ) -> MutationOutcome {
        let next = current.without(product_id);
        self.commit(key, owner, current, next).await
    }

    /// Put `product_id` at the front of `current` and persist the result.
    ///
    /// Adding an ID that is already present rewrites the unchanged list.
    #[instrument(skip(self, current), fields(metafield = %key, product_id = %product_id))]
    pub async fn add_product(
        &self,
        key: &MetafieldKey,
        owner: &CustomerRef,
        current: &WishlistIdentifierList,
        product_id: &ProductId,
    ) -> MutationOutcome {
        let next = current.with_front(product_id);
        self.commit(key, owner, current, next).await
    }

    async fn commit(
        &self,
        key: &MetafieldKey,
        owner: &CustomerRef,
        current: &WishlistIdentifierList,
        next: WishlistIdentifierList,
    ) -> MutationOutcome {
        if let Err(e) = self.store.write_identifiers(key, owner, &next).await {
            error!(error = %e, "Wishlist write failed, keeping previous list");
            return MutationOutcome::Rejected {
                retained: current.clone(),
                error: e,
            };
        }

        info!(count = next.len(), "Wishlist updated");
        let products = self.hydrator.hydrate_list(&next).await;

        MutationOutcome::Applied {
            identifiers: next,
            products,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[derive(Default)]
    struct Metafields {
        writes: Mutex<Vec<String>>,
        fail: bool,
    }

    impl MetafieldStore for Metafields {
        async fn get(&self, _key: &MetafieldKey) -> Result<Option<String>, ShopifyError> {
            Ok(self.writes.lock().unwrap().last().cloned())
        }

        async fn set(
            &self,
            _key: &MetafieldKey,
            _owner: &CustomerRef,
            value: String,
        ) -> Result<(), ShopifyError> {
            if self.fail {
                return Err(ShopifyError::UserError("Owner not found".to_string()));
            }
            self.writes.lock().unwrap().push(value);
            Ok(())
        }
    }

    #[derive(Default)]
    struct Catalog {
        lookups: AtomicUsize,
    }

    impl ProductLookup for Catalog {
        async fn lookup_by_ids(
            &self,
            ids: &[ProductId],
        ) -> Result<Vec<Option<ProductRecord>>, ShopifyError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            Ok(ids
                .iter()
                .map(|id| Some(ProductRecord::new(id.clone(), id.as_str())))
                .collect())
        }

        async fn list_products(
            &self,
            _first: usize,
            _query: Option<&str>,
        ) -> Result<Vec<ProductRecord>, ShopifyError> {
            Ok(Vec::new())
        }
    }

    fn list(ids: &[&str]) -> WishlistIdentifierList {
        WishlistIdentifierList::from_ids(ids.iter().copied())
    }

    fn titles(outcome: &MutationOutcome) -> Vec<String> {
        match outcome {
            MutationOutcome::Applied { products, .. } => {
                products.iter().map(|p| p.title.clone()).collect()
            }
            MutationOutcome::Rejected { .. } => panic!("expected applied outcome"),
        }
    }

    #[tokio::test]
    async fn test_remove_writes_then_hydrates() {
        let store = IdentifierStore::new(Metafields::default());
        let hydrator = ProductHydrator::new(Catalog::default());
        let mutator = ReconcilingMutator::new(&store, &hydrator, UpdatePolicy::default());

        let outcome = mutator
            .remove_product(
                &MetafieldKey::default(),
                &CustomerRef::new("1"),
                &list(&["A", "B", "C"]),
                &ProductId::new("B"),
            )
            .await;

        assert_eq!(titles(&outcome), vec!["A", "C"]);
        assert_eq!(
            store.metafields().writes.lock().unwrap().clone(),
            vec![r#"["A","C"]"#.to_string()]
        );
    }

    #[tokio::test]
    async fn test_add_moves_new_id_to_front() {
        let store = IdentifierStore::new(Metafields::default());
        let hydrator = ProductHydrator::new(Catalog::default());
        let mutator = ReconcilingMutator::new(&store, &hydrator, UpdatePolicy::default());

        let outcome = mutator
            .add_product(
                &MetafieldKey::default(),
                &CustomerRef::new("1"),
                &list(&["A"]),
                &ProductId::new("B"),
            )
            .await;

        assert_eq!(outcome.identifiers(), &list(&["B", "A"]));
        assert_eq!(titles(&outcome), vec!["B", "A"]);
    }

    #[tokio::test]
    async fn test_rejected_write_skips_hydration() {
        let store = IdentifierStore::new(Metafields {
            fail: true,
            ..Default::default()
        });
        let hydrator = ProductHydrator::new(Catalog::default());
        let mutator = ReconcilingMutator::new(&store, &hydrator, UpdatePolicy::default());

        let outcome = mutator
            .remove_product(
                &MetafieldKey::default(),
                &CustomerRef::new("1"),
                &list(&["A", "B"]),
                &ProductId::new("A"),
            )
            .await;

        assert!(!outcome.is_applied());
        assert_eq!(outcome.identifiers(), &list(&["A", "B"]));
        assert_eq!(hydrator.lookup().lookups.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_pending_removal_follows_policy() {
        let store = IdentifierStore::new(Metafields::default());
        let hydrator = ProductHydrator::new(Catalog::default());
        let visible = vec![ProductRecord::new("A", "A"), ProductRecord::new("B", "B")];
        let id = ProductId::new("A");

        let waiting = ReconcilingMutator::new(&store, &hydrator, UpdatePolicy::WaitForConfirmation);
        assert!(waiting.pending_removal(&visible, &id).is_none());

        let optimistic = ReconcilingMutator::new(&store, &hydrator, UpdatePolicy::Optimistic);
        let pending = optimistic.pending_removal(&visible, &id).unwrap();
        assert_eq!(pending, vec![ProductRecord::new("B", "B")]);
    }
}
