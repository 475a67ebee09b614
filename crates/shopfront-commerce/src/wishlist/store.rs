//! Wishlist store.

use crate::catalog::Product;
use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::services::WishlistService;
use crate::wishlist::Wishlist;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tracing::{debug, warn};

/// Owned wishlist state for one session.
///
/// Toggles are serialized, so a burst of toggles on the same product settles
/// on the state implied by their count and never stores it twice.
pub struct WishlistStore {
    service: Arc<dyn WishlistService>,
    state: watch::Sender<Wishlist>,
    mutation: Mutex<()>,
}

impl WishlistStore {
    pub fn new(service: Arc<dyn WishlistService>) -> Self {
        let (state, _) = watch::channel(Wishlist::new());
        Self {
            service,
            state,
            mutation: Mutex::new(()),
        }
    }

    /// Replace local state with the server's snapshot.
    pub async fn load(&self) -> Result<(), CommerceError> {
        let _guard = self.mutation.lock().await;
        let snapshot = self.service.fetch_wishlist().await.map_err(|e| {
            warn!(error = %e, "wishlist snapshot fetch failed");
            CommerceError::Sync(e)
        })?;

        let wishlist = Wishlist::from_products(snapshot.products);
        debug!(entries = wishlist.len(), "wishlist loaded");
        self.state.send_replace(wishlist);
        Ok(())
    }

    /// Add the product if absent, remove it if present.
    ///
    /// Returns whether the product is wishlisted afterwards. On a remote
    /// failure membership is left unchanged.
    pub async fn toggle(&self, product: &Product) -> Result<bool, CommerceError> {
        let _guard = self.mutation.lock().await;
        let mut draft = self.state.borrow().clone();

        let liked = draft.remove(&product.id).is_none();
        let result = if liked {
            draft.insert(product.clone());
            self.service.add(&product.id).await
        } else {
            self.service.remove(&product.id).await
        };
        result.map_err(|e| {
            warn!(product_id = %product.id, error = %e, "wishlist toggle failed");
            CommerceError::Sync(e)
        })?;

        debug!(product_id = %product.id, liked, "wishlist toggled");
        self.state.send_replace(draft);
        Ok(liked)
    }

    /// Check membership. No side effects.
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.state.borrow().contains(product_id)
    }

    /// Wishlisted products, oldest like first.
    pub fn list(&self) -> Vec<Product> {
        self.state.borrow().products().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.state.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.borrow().is_empty()
    }

    /// Subscribe to committed wishlist changes.
    pub fn subscribe(&self) -> watch::Receiver<Wishlist> {
        self.state.subscribe()
    }

    /// Drop local state without contacting the server.
    pub async fn discard(&self) {
        let _guard = self.mutation.lock().await;
        debug!("wishlist discarded");
        self.state.send_replace(Wishlist::new());
    }
}
