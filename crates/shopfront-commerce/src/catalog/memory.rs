//! In-memory catalog, for offline use and tests.

use crate::catalog::{Product, ProductFilter};
use crate::ids::ProductId;
use crate::services::{CatalogService, ServiceError};
use async_trait::async_trait;
use indexmap::IndexMap;

/// Catalog backed by a fixed product list, in listing order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    products: IndexMap<ProductId, Product>,
}

impl InMemoryCatalog {
    /// Create a catalog from products. Later duplicates replace earlier ones
    /// but keep the earlier position.
    pub fn new(products: impl IntoIterator<Item = Product>) -> Self {
        Self {
            products: products.into_iter().map(|p| (p.id.clone(), p)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[async_trait]
impl CatalogService for InMemoryCatalog {
    async fn get_by_id(&self, id: &ProductId) -> Result<Option<Product>, ServiceError> {
        Ok(self.products.get(id).cloned())
    }

    async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, ServiceError> {
        Ok(filter.apply(self.products.values()))
    }
}
