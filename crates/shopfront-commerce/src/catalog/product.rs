//! Product types.

use crate::ids::ProductId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A product in the catalog. Read-only from the client's side.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Current price.
    pub price: Money,
    /// Image URLs, first one is the cover.
    #[serde(default)]
    pub images: Vec<String>,
    /// Size options, `None` for sizeless products.
    #[serde(default)]
    pub sizes: Option<Vec<String>>,
    /// Full description.
    #[serde(default)]
    pub description: String,
    /// Category label used by catalog filters.
    #[serde(default)]
    pub category: Option<String>,
}

impl Product {
    /// Create a new sizeless product.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Money) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            images: Vec::new(),
            sizes: None,
            description: String::new(),
            category: None,
        }
    }

    /// Set the size options.
    pub fn with_sizes<I, S>(mut self, sizes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sizes = Some(sizes.into_iter().map(Into::into).collect());
        self
    }

    /// Add an image URL.
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.images.push(url.into());
        self
    }

    /// Set the category label.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Check if the product comes in sizes.
    pub fn has_sizes(&self) -> bool {
        self.sizes.as_ref().is_some_and(|s| !s.is_empty())
    }

    /// Check if a size is offered.
    pub fn offers_size(&self, size: &str) -> bool {
        self.sizes
            .as_ref()
            .is_some_and(|sizes| sizes.iter().any(|s| s == size))
    }

    /// Cover image, if any.
    pub fn cover_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    #[test]
    fn test_sizes() {
        let shirt = Product::new("p1", "Shirt", Money::new(49_900, Currency::INR))
            .with_sizes(["S", "M", "L"]);
        assert!(shirt.has_sizes());
        assert!(shirt.offers_size("M"));
        assert!(!shirt.offers_size("XL"));

        let mug = Product::new("p2", "Mug", Money::new(19_900, Currency::INR));
        assert!(!mug.has_sizes());
        assert!(!mug.offers_size("M"));

        let empty = Product::new("p3", "Cap", Money::new(9_900, Currency::INR))
            .with_sizes(Vec::<String>::new());
        assert!(!empty.has_sizes());
    }

    #[test]
    fn test_deserialize_minimal() {
        let json = r#"{"id":"p1","name":"Shirt","price":{"amount_minor":4990,"currency":"INR"}}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id.as_str(), "p1");
        assert!(product.images.is_empty());
        assert!(product.cover_image().is_none());
        assert!(product.sizes.is_none());
    }
}
