//! Store, hydrator and mutator contracts.
//!
//! Each test drives the protocol components directly against the in-memory
//! fakes and asserts on what was written and looked up.

#![allow(clippy::unwrap_used)]

use wishlist_core::{CustomerRef, MetafieldKey, ProductId, WishlistIdentifierList};
use wishlist_integration_tests::{FakeCatalog, FakeMetafields, RecordedWrite, product};
use wishlist_sync::wishlist::{
    IdentifierStore, MutationOutcome, ProductHydrator, ReconcilingMutator, UpdatePolicy,
};

fn key() -> MetafieldKey {
    MetafieldKey::new("custom", "wishlist")
}

fn customer() -> CustomerRef {
    CustomerRef::new("7012")
}

fn ids(values: &[&str]) -> WishlistIdentifierList {
    WishlistIdentifierList::from_ids(values.iter().copied())
}

fn catalog_abc() -> FakeCatalog {
    FakeCatalog::with_products([product("A", "Alpha"), product("B", "Bravo"), product("C", "Charlie")])
}

fn applied_titles(outcome: &MutationOutcome) -> Vec<String> {
    match outcome {
        MutationOutcome::Applied { products, .. } => {
            products.iter().map(|p| p.title.clone()).collect()
        }
        MutationOutcome::Rejected { error, .. } => panic!("write rejected: {error}"),
    }
}

// ============================================================================
// Identifier store
// ============================================================================

#[tokio::test]
async fn test_unset_and_unparsable_values_read_as_empty() {
    let store = IdentifierStore::new(FakeMetafields::new());
    assert!(store.read_identifiers(&key()).await.is_empty());

    let store = IdentifierStore::new(FakeMetafields::holding("definitely not json"));
    assert!(store.read_identifiers(&key()).await.is_empty());

    let store = IdentifierStore::new(FakeMetafields::holding("null"));
    assert!(store.read_identifiers(&key()).await.is_empty());
}

#[tokio::test]
async fn test_read_failure_reads_as_empty() {
    let metafields = FakeMetafields::holding(r#"["A"]"#);
    metafields.fail_reads(true);
    let store = IdentifierStore::new(&metafields);
    assert!(store.read_identifiers(&key()).await.is_empty());
}

#[tokio::test]
async fn test_write_targets_customer_owned_key() {
    let metafields = FakeMetafields::new();
    let store = IdentifierStore::new(&metafields);

    store
        .write_identifiers(&key(), &customer(), &ids(&["A", "B"]))
        .await
        .unwrap();

    assert_eq!(
        metafields.writes(),
        vec![RecordedWrite {
            key: "custom.wishlist".to_string(),
            owner: "gid://shopify/Customer/7012".to_string(),
            value: r#"["A","B"]"#.to_string(),
        }]
    );
}

// ============================================================================
// Product hydrator
// ============================================================================

#[tokio::test]
async fn test_hydrate_empty_makes_no_lookup() {
    let catalog = catalog_abc();
    let hydrator = ProductHydrator::new(&catalog);

    assert!(hydrator.hydrate(&[]).await.is_empty());
    assert!(catalog.lookups().is_empty());
}

#[tokio::test]
async fn test_hydrate_drops_unresolved_ids() {
    let catalog = FakeCatalog::with_products([product("A", "Alpha")]);
    let hydrator = ProductHydrator::new(&catalog);

    let records = hydrator
        .hydrate(&[ProductId::new("A"), ProductId::new("B")])
        .await;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id.as_str(), "A");
    assert_eq!(catalog.lookups().len(), 1);
}

// ============================================================================
// Reconciling mutator
// ============================================================================

#[tokio::test]
async fn test_remove_writes_remaining_ids_and_rehydrates() {
    let metafields = FakeMetafields::holding(r#"["A","B","C"]"#);
    let catalog = catalog_abc();
    let store = IdentifierStore::new(&metafields);
    let hydrator = ProductHydrator::new(&catalog);
    let mutator = ReconcilingMutator::new(&store, &hydrator, UpdatePolicy::default());

    let outcome = mutator
        .remove_product(&key(), &customer(), &ids(&["A", "B", "C"]), &ProductId::new("B"))
        .await;

    assert_eq!(applied_titles(&outcome), vec!["Alpha", "Charlie"]);
    assert_eq!(metafields.value().as_deref(), Some(r#"["A","C"]"#));
    assert_eq!(
        catalog.lookups(),
        vec![vec![ProductId::new("A"), ProductId::new("C")]]
    );
}

#[tokio::test]
async fn test_removing_absent_id_rewrites_same_value() {
    let metafields = FakeMetafields::holding(r#"["A","C"]"#);
    let catalog = catalog_abc();
    let store = IdentifierStore::new(&metafields);
    let hydrator = ProductHydrator::new(&catalog);
    let mutator = ReconcilingMutator::new(&store, &hydrator, UpdatePolicy::default());

    let first = mutator
        .remove_product(&key(), &customer(), &ids(&["A", "C"]), &ProductId::new("B"))
        .await;
    let second = mutator
        .remove_product(&key(), &customer(), first.identifiers(), &ProductId::new("B"))
        .await;

    assert_eq!(applied_titles(&first), applied_titles(&second));
    let writes = metafields.writes();
    assert_eq!(writes.len(), 2);
    assert!(writes.iter().all(|w| w.value == r#"["A","C"]"#));
}

#[tokio::test]
async fn test_adding_present_id_keeps_list() {
    let metafields = FakeMetafields::holding(r#"["A"]"#);
    let catalog = catalog_abc();
    let store = IdentifierStore::new(&metafields);
    let hydrator = ProductHydrator::new(&catalog);
    let mutator = ReconcilingMutator::new(&store, &hydrator, UpdatePolicy::default());

    let outcome = mutator
        .add_product(&key(), &customer(), &ids(&["A"]), &ProductId::new("A"))
        .await;

    assert_eq!(outcome.identifiers(), &ids(&["A"]));
    assert_eq!(applied_titles(&outcome), vec!["Alpha"]);
    assert_eq!(metafields.value().as_deref(), Some(r#"["A"]"#));
}

#[tokio::test]
async fn test_add_puts_new_id_first() {
    let metafields = FakeMetafields::holding(r#"["A","B"]"#);
    let catalog = catalog_abc();
    let store = IdentifierStore::new(&metafields);
    let hydrator = ProductHydrator::new(&catalog);
    let mutator = ReconcilingMutator::new(&store, &hydrator, UpdatePolicy::default());

    let outcome = mutator
        .add_product(&key(), &customer(), &ids(&["A", "B"]), &ProductId::new("C"))
        .await;

    assert_eq!(applied_titles(&outcome), vec!["Charlie", "Alpha", "Bravo"]);
    assert_eq!(metafields.value().as_deref(), Some(r#"["C","A","B"]"#));
}

#[tokio::test]
async fn test_failed_write_keeps_previous_list_and_skips_hydration() {
    let metafields = FakeMetafields::holding(r#"["A","B","C"]"#);
    metafields.fail_writes(true);
    let catalog = catalog_abc();
    let store = IdentifierStore::new(&metafields);
    let hydrator = ProductHydrator::new(&catalog);
    let mutator = ReconcilingMutator::new(&store, &hydrator, UpdatePolicy::default());

    let outcome = mutator
        .remove_product(&key(), &customer(), &ids(&["A", "B", "C"]), &ProductId::new("B"))
        .await;

    let MutationOutcome::Rejected { retained, .. } = outcome else {
        panic!("expected rejected outcome");
    };
    assert_eq!(retained, ids(&["A", "B", "C"]));
    assert_eq!(metafields.value().as_deref(), Some(r#"["A","B","C"]"#));
    assert!(metafields.writes().is_empty());
    assert!(catalog.lookups().is_empty());
}
