//! Wishlist rendering surfaces.
//!
//! A surface is one independent view of the wishlist: the order-list block
//! or the full page. Each surface loads, mutates and re-hydrates on its own
//! and publishes its visible state through a `watch` channel. Two surfaces
//! never talk to each other.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, instrument, warn};
use wishlist_core::{
    CustomerRef, MetafieldKey, ProductId, ProductRecord, Settings, WishlistIdentifierList,
};

use crate::shopify::ShopifyError;

use super::{
    DEFAULT_PREVIEW_LIMIT, IdentifierStore, MetafieldStore, MutationOutcome, ProductHydrator,
    ProductLookup, ReconcilingMutator, ShopContext, UpdatePolicy,
};

/// Shown in editor preview when the metafield namespace or key is blank.
pub const MISCONFIGURED_WARNING: &str = "Missing required settings. Please provide a metafield namespace and key in the app block settings. The following is a preview - this app block will not be visible to customers until you provide the required settings.";

/// Which surface is rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceKind {
    /// Compact block on the order list.
    OrderListBlock,
    /// Dedicated wishlist page with product links.
    FullPage,
}

/// Who the surface renders for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderContext {
    /// A signed-in customer viewing their own wishlist.
    Customer(CustomerRef),
    /// The merchant's editor. Shows sample products and never writes.
    Preview,
}

impl RenderContext {
    #[must_use]
    pub const fn is_preview(&self) -> bool {
        matches!(self, Self::Preview)
    }
}

/// A product as displayed on a surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItem {
    #[serde(flatten)]
    pub product: ProductRecord,
    /// Storefront link, full page only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Whether the remove action is offered.
    pub removable: bool,
}

/// Visible state of a surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ViewState {
    Loading,
    /// Nothing is rendered.
    Hidden,
    /// The wishlist has no displayable products.
    Empty,
    Ready {
        items: Vec<WishlistItem>,
        #[serde(skip_serializing_if = "Option::is_none")]
        warning: Option<String>,
    },
}

/// One wishlist surface.
///
/// A load that succeeds records the identifiers of the products it could
/// show, so identifiers that no longer resolve are pruned from the stored
/// list on the next write. A load that fails records nothing, and the
/// surface refuses to mutate until a later load succeeds.
pub struct WishlistSurface<M, L, S> {
    kind: SurfaceKind,
    settings: Settings,
    context: RenderContext,
    policy: UpdatePolicy,
    store: IdentifierStore<M>,
    hydrator: ProductHydrator<L>,
    shop: S,
    loaded: bool,
    records: Vec<ProductRecord>,
    base: Option<WishlistIdentifierList>,
    load_error: Option<ShopifyError>,
    shop_url: Option<String>,
    warning: Option<String>,
    state: watch::Sender<ViewState>,
}

impl<M, L, S> WishlistSurface<M, L, S>
where
    M: MetafieldStore,
    L: ProductLookup,
    S: ShopContext,
{
    pub fn new(
        kind: SurfaceKind,
        settings: Settings,
        context: RenderContext,
        metafields: M,
        catalog: L,
        shop: S,
    ) -> Self {
        Self {
            kind,
            settings,
            context,
            policy: UpdatePolicy::default(),
            store: IdentifierStore::new(metafields),
            hydrator: ProductHydrator::new(catalog),
            shop,
            loaded: false,
            records: Vec::new(),
            base: None,
            load_error: None,
            shop_url: None,
            warning: None,
            state: watch::Sender::new(ViewState::Loading),
        }
    }

    #[must_use]
    pub const fn with_update_policy(mut self, policy: UpdatePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub const fn kind(&self) -> SurfaceKind {
        self.kind
    }

    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Observe visible state transitions.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.subscribe()
    }

    /// The current visible state.
    pub fn state(&self) -> ViewState {
        self.state.borrow().clone()
    }

    /// Products currently shown.
    pub fn records(&self) -> &[ProductRecord] {
        &self.records
    }

    /// Identifiers the next mutation starts from, `None` until a load
    /// succeeds.
    pub const fn identifiers(&self) -> Option<&WishlistIdentifierList> {
        self.base.as_ref()
    }

    /// Why the last load could not read the wishlist.
    pub const fn load_error(&self) -> Option<&ShopifyError> {
        self.load_error.as_ref()
    }

    /// Take the error from the last load, leaving the surface unloaded.
    pub fn take_load_error(&mut self) -> Option<ShopifyError> {
        self.load_error.take()
    }

    /// Shop base URL, once loaded by the full page.
    pub fn shop_url(&self) -> Option<&str> {
        self.shop_url.as_deref()
    }

    /// Load the wishlist and publish the result.
    #[instrument(skip(self), fields(kind = ?self.kind, preview = self.context.is_preview()))]
    pub async fn load(&mut self) -> ViewState {
        self.state.send_replace(ViewState::Loading);

        let Some(key) = self.settings.metafield() else {
            return self.load_misconfigured().await;
        };

        let (records, shop_url) = if self.kind == SurfaceKind::FullPage {
            let (records, shop_url) = tokio::join!(self.load_records(&key), self.shop.shop_url());
            (records, Some(shop_url))
        } else {
            (self.load_records(&key).await, None)
        };

        if let Some(shop_url) = shop_url {
            self.shop_url = match shop_url {
                Ok(url) => Some(url),
                Err(e) => {
                    warn!(error = %e, "Failed to load shop URL, products will not be linked");
                    None
                }
            };
        }

        self.loaded = true;
        match records {
            Ok(records) => {
                self.set_records(records);
                self.load_error = None;
            }
            Err(e) => {
                warn!(error = %e, "Failed to load wishlist, mutations disabled until it loads");
                self.records.clear();
                self.base = None;
                self.load_error = Some(e);
            }
        }

        self.publish()
    }

    async fn load_records(&self, key: &MetafieldKey) -> Result<Vec<ProductRecord>, ShopifyError> {
        match &self.context {
            RenderContext::Preview => Ok(self.hydrator.hydrate_preview(DEFAULT_PREVIEW_LIMIT).await),
            RenderContext::Customer(_) => {
                let identifiers = self.store.fetch_identifiers(key).await?;
                self.hydrator.try_hydrate(identifiers.as_slice()).await
            }
        }
    }

    fn set_records(&mut self, records: Vec<ProductRecord>) {
        self.base = Some(records.iter().map(|record| record.id.clone()).collect());
        self.records = records;
    }

    async fn load_misconfigured(&mut self) -> ViewState {
        self.loaded = true;
        if !self.context.is_preview() {
            debug!("Wishlist metafield not configured, hiding surface");
            self.records.clear();
            self.base = None;
            self.state.send_replace(ViewState::Hidden);
            return ViewState::Hidden;
        }

        self.warning = Some(MISCONFIGURED_WARNING.to_string());
        let records = self.hydrator.hydrate_preview(DEFAULT_PREVIEW_LIMIT).await;
        self.set_records(records);
        self.publish()
    }

    /// Remove `product_id` and publish the reconciled list.
    ///
    /// In preview the block re-hydrates locally without writing and the
    /// full page ignores the request.
    #[instrument(skip(self), fields(kind = ?self.kind, product_id = %product_id))]
    pub async fn remove(&mut self, product_id: &ProductId) -> ViewState {
        self.ensure_loaded().await;

        if !self.settings.show_remove_button {
            debug!("Remove button disabled, ignoring removal");
            return self.state();
        }

        let customer = match &self.context {
            RenderContext::Customer(customer) => customer.clone(),
            RenderContext::Preview => return self.remove_in_preview(product_id).await,
        };
        let Some(key) = self.settings.metafield() else {
            return self.state();
        };

        let Some(current) = self.base.clone() else {
            warn!("Wishlist not loaded, refusing to remove");
            return self.state();
        };
        let mutator = ReconcilingMutator::new(&self.store, &self.hydrator, self.policy);

        if let Some(pending) = mutator.pending_removal(&self.records, product_id) {
            self.state.send_replace(self.view(&pending));
        }

        let outcome = mutator
            .remove_product(&key, &customer, &current, product_id)
            .await;
        self.reconcile(outcome)
    }

    async fn remove_in_preview(&mut self, product_id: &ProductId) -> ViewState {
        if self.kind == SurfaceKind::FullPage {
            return self.state();
        }

        let Some(current) = &self.base else {
            return self.state();
        };
        let remaining = current.without(product_id);
        let records = self.hydrator.hydrate_list(&remaining).await;
        self.set_records(records);
        self.publish()
    }

    /// Add `product_id` to the front of the wishlist and publish the
    /// reconciled list. Preview never writes.
    #[instrument(skip(self), fields(kind = ?self.kind, product_id = %product_id))]
    pub async fn add(&mut self, product_id: &ProductId) -> ViewState {
        self.ensure_loaded().await;

        let RenderContext::Customer(customer) = &self.context else {
            return self.state();
        };
        let customer = customer.clone();
        let Some(key) = self.settings.metafield() else {
            return self.state();
        };

        let Some(current) = self.base.clone() else {
            warn!("Wishlist not loaded, refusing to add");
            return self.state();
        };
        let outcome = ReconcilingMutator::new(&self.store, &self.hydrator, self.policy)
            .add_product(&key, &customer, &current, product_id)
            .await;
        self.reconcile(outcome)
    }

    /// Tagged products not already on the wishlist, when a suggestion tag
    /// is configured.
    pub async fn suggestions(&self, limit: usize) -> Vec<ProductRecord> {
        let Some(tag) = self.settings.suggestion_tag() else {
            return Vec::new();
        };
        let wishlisted = self.base.clone().unwrap_or_default();
        self.hydrator.suggestions(tag, limit, &wishlisted).await
    }

    async fn ensure_loaded(&mut self) {
        if !self.loaded || self.base.is_none() {
            self.load().await;
        }
    }

    fn reconcile(&mut self, outcome: MutationOutcome) -> ViewState {
        match outcome {
            MutationOutcome::Applied {
                identifiers,
                products,
            } => {
                // The written list stays the base even if re-hydration failed
                self.base = Some(identifiers);
                self.records = products;
            }
            MutationOutcome::Rejected { error, .. } => {
                debug!(error = %error, "Restoring previous wishlist");
            }
        }
        self.publish()
    }

    fn publish(&self) -> ViewState {
        let view = self.view(&self.records);
        self.state.send_replace(view.clone());
        view
    }

    fn view(&self, records: &[ProductRecord]) -> ViewState {
        if records.is_empty() && self.warning.is_none() {
            return ViewState::Empty;
        }

        let removable = self.settings.show_remove_button
            && !(self.kind == SurfaceKind::FullPage && self.context.is_preview());
        let items = records
            .iter()
            .map(|record| WishlistItem {
                url: match self.kind {
                    SurfaceKind::FullPage => self
                        .shop_url
                        .as_deref()
                        .and_then(|shop_url| record.storefront_url(shop_url)),
                    SurfaceKind::OrderListBlock => None,
                },
                product: record.clone(),
                removable,
            })
            .collect();

        ViewState::Ready {
            items,
            warning: self.warning.clone(),
        }
    }
}

impl<M, L, S> std::fmt::Debug for WishlistSurface<M, L, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WishlistSurface")
            .field("kind", &self.kind)
            .field("context", &self.context)
            .field("policy", &self.policy)
            .field("records", &self.records.len())
            .finish_non_exhaustive()
    }
}
