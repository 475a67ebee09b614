//! Catalog filter.

use crate::catalog::Product;
use serde::{Deserialize, Serialize};

/// Filter for listing products.
///
/// All set criteria must match. An empty filter matches everything.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct ProductFilter {
    /// Category label, compared case-insensitively.
    pub category: Option<String>,
    /// Text searched in name and description, case-insensitively.
    pub search: Option<String>,
    /// Maximum number of results.
    pub limit: Option<usize>,
}

impl ProductFilter {
    /// Match everything.
    pub fn all() -> Self {
        Self::default()
    }

    /// Filter by category. Empty strings mean "all categories".
    pub fn category(mut self, category: impl Into<String>) -> Self {
        let category = category.into();
        self.category = (!category.trim().is_empty()).then_some(category);
        self
    }

    /// Filter by search text. Blank strings are ignored.
    pub fn search(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.search = (!text.trim().is_empty()).then(|| text.trim().to_string());
        self
    }

    /// Cap the number of results.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Check a single product against the category and search criteria.
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(ref category) = self.category {
            let hit = product
                .category
                .as_deref()
                .is_some_and(|c| c.eq_ignore_ascii_case(category));
            if !hit {
                return false;
            }
        }

        if let Some(ref text) = self.search {
            let needle = text.to_lowercase();
            if !product.name.to_lowercase().contains(&needle)
                && !product.description.to_lowercase().contains(&needle)
            {
                return false;
            }
        }

        true
    }

    /// Apply the filter to a product sequence, preserving order.
    pub fn apply<'a>(&self, products: impl IntoIterator<Item = &'a Product>) -> Vec<Product> {
        products
            .into_iter()
            .filter(|p| self.matches(p))
            .take(self.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect()
    }
}
