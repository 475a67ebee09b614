//! Cart store: the session's single source of truth for the cart.
//!
//! Mutations are serialized through an async lock. Each one works on a copy
//! of the committed cart, persists the change through the [`CartService`],
//! and only then publishes the copy. A failed remote call therefore leaves
//! the committed cart exactly as it was, and readers never observe a half
//! applied change, even while a call is suspended.

use crate::cart::{resolve_size, Cart, LineItem};
use crate::catalog::Product;
use crate::config::CommerceConfig;
use crate::error::CommerceError;
use crate::ids::LineItemId;
use crate::money::{Currency, Money};
use crate::services::CartService;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tracing::{debug, warn};

/// Owned cart state for one session.
pub struct CartStore {
    service: Arc<dyn CartService>,
    state: watch::Sender<Cart>,
    mutation: Mutex<()>,
    loading: AtomicUsize,
    currency: Currency,
    default_size: String,
    max_quantity: i64,
}

impl CartStore {
    /// Create an empty store. Call [`CartStore::load`] to sync with the server.
    pub fn new(service: Arc<dyn CartService>, config: &CommerceConfig) -> Self {
        let (state, _) = watch::channel(Cart::new(config.currency));
        Self {
            service,
            state,
            mutation: Mutex::new(()),
            loading: AtomicUsize::new(0),
            currency: config.currency,
            default_size: config.default_size.clone(),
            max_quantity: config.max_quantity_per_line,
        }
    }

    /// Replace local state with the server's snapshot.
    ///
    /// Safe to call repeatedly. Calls are serialized with every other
    /// mutation, so the last one to complete wins.
    pub async fn load(&self) -> Result<(), CommerceError> {
        let _loading = LoadingFlag::raise(&self.loading);
        let _guard = self.mutation.lock().await;

        let snapshot = self.service.fetch_cart().await.map_err(|e| {
            warn!(error = %e, "cart snapshot fetch failed");
            CommerceError::Sync(e)
        })?;

        let cart = Cart::from_items(snapshot.items, self.currency)?;
        if cart.subtotal() != snapshot.total {
            warn!(
                reported = %snapshot.total,
                computed = %cart.subtotal(),
                "cart snapshot total disagrees with its lines; using computed total"
            );
        }

        debug!(
            lines = cart.line_count(),
            items = cart.item_count(),
            subtotal = %cart.subtotal(),
            "cart loaded"
        );
        self.state.send_replace(cart);
        Ok(())
    }

    /// Add one unit of `product` in `size`.
    ///
    /// Sizeless products go in the configured default size. Returns the
    /// resulting line.
    pub async fn add_item(
        &self,
        product: &Product,
        size: Option<&str>,
    ) -> Result<LineItem, CommerceError> {
        let size = resolve_size(product, size, &self.default_size)?;

        let _guard = self.mutation.lock().await;
        let mut draft = self.snapshot();
        let line = draft.add_product(product, &size, self.max_quantity)?;

        self.service.add_item(&line).await.map_err(|e| {
            warn!(product_id = %product.id, size = %size, error = %e, "add to cart failed");
            CommerceError::Sync(e)
        })?;

        debug!(
            line_id = %line.id,
            product_id = %product.id,
            size = %size,
            quantity = line.quantity,
            "cart item added"
        );
        self.commit(draft);
        Ok(line)
    }

    /// Remove a line. Removing a line that is not in the cart is a no-op.
    ///
    /// Returns the removed line, if there was one.
    pub async fn remove_item(
        &self,
        line_id: &LineItemId,
    ) -> Result<Option<LineItem>, CommerceError> {
        let _guard = self.mutation.lock().await;
        self.remove_locked(line_id).await
    }

    /// Set a line's quantity exactly. Quantities below 1 remove the line.
    ///
    /// Returns the updated line, or `None` if it was removed.
    pub async fn update_quantity(
        &self,
        line_id: &LineItemId,
        quantity: i64,
    ) -> Result<Option<LineItem>, CommerceError> {
        let _guard = self.mutation.lock().await;
        if quantity < 1 {
            self.remove_locked(line_id).await?;
            return Ok(None);
        }

        let mut draft = self.snapshot();
        let line = draft
            .set_quantity(line_id, quantity, self.max_quantity)?
            .ok_or_else(|| CommerceError::LineItemNotFound(line_id.to_string()))?;

        self.service.set_quantity(line_id, quantity).await.map_err(|e| {
            warn!(line_id = %line_id, quantity, error = %e, "quantity update failed");
            CommerceError::Sync(e)
        })?;

        debug!(line_id = %line_id, quantity, "cart quantity updated");
        self.commit(draft);
        Ok(Some(line))
    }

    /// Empty the cart on the server and locally.
    pub async fn clear(&self) -> Result<(), CommerceError> {
        let _guard = self.mutation.lock().await;
        self.service.clear().await.map_err(|e| {
            warn!(error = %e, "cart clear failed");
            CommerceError::Sync(e)
        })?;

        debug!("cart cleared");
        self.commit(Cart::new(self.currency));
        Ok(())
    }

    /// Drop local state without contacting the server.
    ///
    /// Used when the server already consumed the cart (a placed order) or the
    /// session is ending.
    pub async fn discard(&self) {
        let _guard = self.mutation.lock().await;
        debug!("cart discarded");
        self.commit(Cart::new(self.currency));
    }

    /// Drop lines a placed order consumed, without contacting the server.
    ///
    /// Only the ordered quantities are removed; anything added while the
    /// order was in flight stays in the cart.
    pub async fn consume(&self, ordered: &[LineItem]) -> Result<(), CommerceError> {
        let _guard = self.mutation.lock().await;
        let mut draft = self.snapshot();
        draft.consume(ordered)?;
        debug!(
            consumed = ordered.len(),
            remaining = draft.line_count(),
            "ordered cart lines consumed"
        );
        self.commit(draft);
        Ok(())
    }

    /// Copy of the committed cart.
    pub fn snapshot(&self) -> Cart {
        self.state.borrow().clone()
    }

    /// Subscribe to committed cart changes.
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.state.subscribe()
    }

    /// Sum of (unit price x quantity) over the committed lines.
    pub fn subtotal(&self) -> Money {
        self.state.borrow().subtotal()
    }

    /// Sum of quantities over the committed lines.
    pub fn item_count(&self) -> i64 {
        self.state.borrow().item_count()
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.state.borrow().line_count()
    }

    pub fn is_empty(&self) -> bool {
        self.state.borrow().is_empty()
    }

    /// Get a committed line by ID.
    pub fn line(&self, line_id: &LineItemId) -> Option<LineItem> {
        self.state.borrow().get_item(line_id).cloned()
    }

    /// True while a [`CartStore::load`] is waiting or in flight.
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire) > 0
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    async fn remove_locked(
        &self,
        line_id: &LineItemId,
    ) -> Result<Option<LineItem>, CommerceError> {
        let mut draft = self.snapshot();
        let Some(removed) = draft.remove_item(line_id) else {
            debug!(line_id = %line_id, "remove of absent cart line ignored");
            return Ok(None);
        };

        self.service.remove_item(line_id).await.map_err(|e| {
            warn!(line_id = %line_id, error = %e, "cart remove failed");
            CommerceError::Sync(e)
        })?;

        debug!(line_id = %line_id, "cart item removed");
        self.commit(draft);
        Ok(Some(removed))
    }

    fn commit(&self, cart: Cart) {
        self.state.send_replace(cart);
    }
}

/// Counts a pending load for as long as it lives.
struct LoadingFlag<'a>(&'a AtomicUsize);

impl<'a> LoadingFlag<'a> {
    fn raise(pending: &'a AtomicUsize) -> Self {
        pending.fetch_add(1, Ordering::AcqRel);
        Self(pending)
    }
}

impl Drop for LoadingFlag<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}
