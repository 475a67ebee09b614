//! Wishlist type.

use crate::catalog::Product;
use crate::ids::ProductId;
use indexmap::IndexMap;

/// Liked products in the order they were liked, oldest first.
///
/// Membership tests are O(1); a product appears at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Wishlist {
    entries: IndexMap<ProductId, Product>,
}

impl Wishlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a server snapshot. Repeated products keep their first
    /// position.
    pub fn from_products(products: impl IntoIterator<Item = Product>) -> Self {
        let mut wishlist = Self::new();
        for product in products {
            wishlist.entries.entry(product.id.clone()).or_insert(product);
        }
        wishlist
    }

    /// Add a product at the end. Returns false if it was already present.
    pub fn insert(&mut self, product: Product) -> bool {
        if self.entries.contains_key(&product.id) {
            return false;
        }
        self.entries.insert(product.id.clone(), product);
        true
    }

    /// Remove a product, keeping the order of the rest.
    pub fn remove(&mut self, product_id: &ProductId) -> Option<Product> {
        self.entries.shift_remove(product_id)
    }

    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.entries.contains_key(product_id)
    }

    /// Products, oldest like first.
    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
