//! Cart and line item types.
//!
//! [`Cart`] keeps its total in step with its lines: every method that
//! changes a line recomputes the total before returning, and a method that
//! fails leaves the cart untouched.

use crate::catalog::Product;
use crate::error::CommerceError;
use crate::ids::{LineItemId, ProductId};
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// A shopping cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Cart {
    items: Vec<LineItem>,
    total: Money,
    currency: Currency,
}

impl Cart {
    /// Create an empty cart.
    pub fn new(currency: Currency) -> Self {
        Self {
            items: Vec::new(),
            total: Money::zero(currency),
            currency,
        }
    }

    /// Build a cart from server-sourced lines.
    ///
    /// Lines sharing a (product, size) pair are merged into the first one and
    /// all totals are recomputed locally.
    pub fn from_items(
        items: impl IntoIterator<Item = LineItem>,
        currency: Currency,
    ) -> Result<Self, CommerceError> {
        let mut cart = Self::new(currency);
        for mut item in items {
            if item.quantity < 1 {
                return Err(CommerceError::InvalidQuantity(item.quantity.to_string()));
            }
            if item.unit_price.currency != currency {
                return Err(currency_mismatch(currency, item.unit_price.currency));
            }
            if item.unit_price.is_negative() {
                return Err(CommerceError::InvalidAmount(item.unit_price.to_string()));
            }
            match cart.position(&item.product_id, &item.size) {
                Some(idx) => {
                    let existing = &mut cart.items[idx];
                    existing.quantity = existing
                        .quantity
                        .checked_add(item.quantity)
                        .ok_or(CommerceError::Overflow)?;
                    existing.update_total()?;
                }
                None => {
                    item.update_total()?;
                    cart.items.push(item);
                }
            }
        }
        cart.recompute_total()?;
        Ok(cart)
    }

    /// Add one unit of a product in a size.
    ///
    /// An existing (product, size) line is incremented; otherwise a new line
    /// is created at the product's current price. Returns the affected line.
    pub fn add_product(
        &mut self,
        product: &Product,
        size: &str,
        max_quantity: i64,
    ) -> Result<LineItem, CommerceError> {
        if product.price.currency != self.currency {
            return Err(currency_mismatch(self.currency, product.price.currency));
        }
        if product.price.is_negative() {
            return Err(CommerceError::InvalidAmount(product.price.to_string()));
        }

        let idx = match self.position(&product.id, size) {
            Some(idx) => {
                let new_quantity = self.items[idx]
                    .quantity
                    .checked_add(1)
                    .ok_or(CommerceError::Overflow)?;
                if new_quantity > max_quantity {
                    return Err(CommerceError::QuantityExceedsLimit(new_quantity, max_quantity));
                }
                let mut updated = self.items[idx].clone();
                updated.quantity = new_quantity;
                updated.update_total()?;
                self.replace_line(idx, updated)?;
                idx
            }
            None => {
                if max_quantity < 1 {
                    return Err(CommerceError::QuantityExceedsLimit(1, max_quantity));
                }
                let item = LineItem::from_product(product, size, 1)?;
                self.total = self.total.try_add(&item.total_price)?;
                self.items.push(item);
                self.items.len() - 1
            }
        };

        Ok(self.items[idx].clone())
    }

    /// Set a line's quantity exactly.
    ///
    /// Quantities below 1 behave like [`Cart::remove_item`] and return `None`,
    /// including for lines that are not in the cart. Otherwise the line must
    /// exist.
    pub fn set_quantity(
        &mut self,
        line_item_id: &LineItemId,
        quantity: i64,
        max_quantity: i64,
    ) -> Result<Option<LineItem>, CommerceError> {
        if quantity < 1 {
            self.remove_item(line_item_id);
            return Ok(None);
        }

        let idx = self
            .items
            .iter()
            .position(|i| &i.id == line_item_id)
            .ok_or_else(|| CommerceError::LineItemNotFound(line_item_id.to_string()))?;

        if quantity > max_quantity {
            return Err(CommerceError::QuantityExceedsLimit(quantity, max_quantity));
        }

        let mut updated = self.items[idx].clone();
        updated.quantity = quantity;
        updated.update_total()?;
        self.replace_line(idx, updated)?;
        Ok(Some(self.items[idx].clone()))
    }

    /// Remove a line, returning it if it was present.
    pub fn remove_item(&mut self, line_item_id: &LineItemId) -> Option<LineItem> {
        let idx = self.items.iter().position(|i| &i.id == line_item_id)?;
        let removed = self.items.remove(idx);
        match self.total.try_subtract(&removed.total_price) {
            Ok(total) => self.total = total,
            // The remaining non-negative lines sum to less than the old total.
            Err(_) => {
                let _ = self.recompute_total();
            }
        }
        Some(removed)
    }

    /// Take ordered lines out of the cart.
    ///
    /// Each ordered line gives up the quantity that was ordered. Quantity
    /// added after the order was taken stays, as do lines the order never
    /// saw.
    pub fn consume(&mut self, ordered: &[LineItem]) -> Result<(), CommerceError> {
        for line in ordered {
            let Some(idx) = self.items.iter().position(|i| i.id == line.id) else {
                continue;
            };
            let remaining = self.items[idx].quantity - line.quantity;
            if remaining < 1 {
                self.items.remove(idx);
            } else {
                self.items[idx].quantity = remaining;
                self.items[idx].update_total()?;
            }
        }
        self.recompute_total()
    }

    /// Remove all lines.
    pub fn clear(&mut self) {
        self.items.clear();
        self.total = Money::zero(self.currency);
    }

    /// Lines in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Sum of (unit price x quantity) over all lines.
    pub fn subtotal(&self) -> Money {
        self.total
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Total item count (sum of quantities).
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get a line by ID.
    pub fn get_item(&self, line_item_id: &LineItemId) -> Option<&LineItem> {
        self.items.iter().find(|i| &i.id == line_item_id)
    }

    /// Get the line for a (product, size) pair.
    pub fn find(&self, product_id: &ProductId, size: &str) -> Option<&LineItem> {
        self.position(product_id, size).map(|idx| &self.items[idx])
    }

    fn position(&self, product_id: &ProductId, size: &str) -> Option<usize> {
        self.items
            .iter()
            .position(|i| &i.product_id == product_id && i.size == size)
    }

    /// Swap in a new version of a line, adjusting the total. Nothing changes
    /// if the new total does not fit.
    fn replace_line(&mut self, idx: usize, updated: LineItem) -> Result<(), CommerceError> {
        let total = self
            .total
            .try_subtract(&self.items[idx].total_price)?
            .try_add(&updated.total_price)?;
        self.items[idx] = updated;
        self.total = total;
        Ok(())
    }

    fn recompute_total(&mut self) -> Result<(), CommerceError> {
        self.total = Money::try_sum(self.items.iter().map(|i| &i.total_price), self.currency)?;
        Ok(())
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new(Currency::default())
    }
}

/// A line item in the cart: one (product, size) pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LineItem {
    /// Unique line item identifier.
    pub id: LineItemId,
    /// Product ID.
    pub product_id: ProductId,
    /// Product name (denormalized for display).
    pub product_name: String,
    /// Cover image (denormalized for display).
    #[serde(default)]
    pub image: Option<String>,
    /// Size label.
    pub size: String,
    /// Quantity, at least 1.
    pub quantity: i64,
    /// Unit price captured when the line was created.
    pub unit_price: Money,
    /// Total price (unit_price * quantity).
    #[serde(default)]
    pub total_price: Money,
}

impl LineItem {
    /// Create a new line for a product.
    pub fn from_product(
        product: &Product,
        size: impl Into<String>,
        quantity: i64,
    ) -> Result<Self, CommerceError> {
        let mut item = Self {
            id: LineItemId::generate(),
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            image: product.cover_image().map(str::to_string),
            size: size.into(),
            quantity,
            unit_price: product.price,
            total_price: Money::zero(product.price.currency),
        };
        item.update_total()?;
        Ok(item)
    }

    /// Update the total price based on quantity.
    pub fn update_total(&mut self) -> Result<(), CommerceError> {
        self.total_price = self.unit_price.try_multiply(self.quantity)?;
        Ok(())
    }
}

/// Pick the size label a product is added to the cart with.
///
/// Sized products need a size they actually offer. Sizeless products always
/// get `default_size`.
pub fn resolve_size(
    product: &Product,
    size: Option<&str>,
    default_size: &str,
) -> Result<String, CommerceError> {
    if !product.has_sizes() {
        return Ok(default_size.to_string());
    }
    match size.map(str::trim).filter(|s| !s.is_empty()) {
        None => Err(CommerceError::SizeRequired(product.id.to_string())),
        Some(s) if product.offers_size(s) => Ok(s.to_string()),
        Some(s) => Err(CommerceError::SizeUnavailable {
            product_id: product.id.to_string(),
            size: s.to_string(),
        }),
    }
}

/// Parse a quantity typed by the user.
///
/// Only whole numbers are accepted; `"2.5"`, `"2.0"` and `"two"` are all
/// rejected rather than rounded.
pub fn parse_quantity(input: &str) -> Result<i64, CommerceError> {
    let trimmed = input.trim();
    trimmed
        .parse::<i64>()
        .map_err(|_| CommerceError::InvalidQuantity(trimmed.to_string()))
}

fn currency_mismatch(expected: Currency, got: Currency) -> CommerceError {
    CommerceError::CurrencyMismatch {
        expected: expected.code().to_string(),
        got: got.code().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX: i64 = 99;

    fn shirt() -> Product {
        Product::new("shirt", "Linen Shirt", Money::new(1000, Currency::INR))
            .with_sizes(["S", "M", "L"])
            .with_image("https://cdn.example/shirt.jpg")
    }

    fn mug() -> Product {
        Product::new("mug", "Mug", Money::new(250, Currency::INR))
    }

    fn assert_total_consistent(cart: &Cart) {
        let expected: i64 = cart
            .items()
            .iter()
            .map(|i| i.unit_price.amount_minor * i.quantity)
            .sum();
        assert_eq!(cart.subtotal().amount_minor, expected);
    }

    #[test]
    fn test_cart_creation() {
        let cart = Cart::new(Currency::INR);
        assert!(cart.is_empty());
        assert!(cart.subtotal().is_zero());
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn test_add_same_item_increases_quantity() {
        let mut cart = Cart::default();
        let first = cart.add_product(&shirt(), "M", MAX).unwrap();
        let second = cart.add_product(&shirt(), "M", MAX).unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.subtotal().amount_minor, 2000);
        assert_eq!(second.image.as_deref(), Some("https://cdn.example/shirt.jpg"));
    }

    #[test]
    fn test_different_sizes_are_separate_lines() {
        let mut cart = Cart::default();
        cart.add_product(&shirt(), "M", MAX).unwrap();
        cart.add_product(&shirt(), "L", MAX).unwrap();
        assert_eq!(cart.line_count(), 2);
        assert!(cart.find(&ProductId::new("shirt"), "L").is_some());
    }

    #[test]
    fn test_unit_price_captured_at_add_time() {
        let mut cart = Cart::default();
        cart.add_product(&shirt(), "M", MAX).unwrap();

        let mut repriced = shirt();
        repriced.price = Money::new(5000, Currency::INR);
        let line = cart.add_product(&repriced, "M", MAX).unwrap();

        assert_eq!(line.unit_price.amount_minor, 1000);
        assert_eq!(cart.subtotal().amount_minor, 2000);
    }

    #[test]
    fn test_item_count_sums_quantities() {
        let mut cart = Cart::default();
        let line = cart.add_product(&shirt(), "M", MAX).unwrap();
        cart.add_product(&mug(), "M", MAX).unwrap();
        cart.set_quantity(&line.id, 4, MAX).unwrap();

        assert_eq!(cart.line_count(), 2);
        assert_eq!(cart.item_count(), 5);
    }

    #[test]
    fn test_set_quantity_is_absolute() {
        let mut cart = Cart::default();
        let line = cart.add_product(&shirt(), "M", MAX).unwrap();
        cart.set_quantity(&line.id, 3, MAX).unwrap();
        cart.set_quantity(&line.id, 3, MAX).unwrap();
        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.subtotal().amount_minor, 3000);
    }

    #[test]
    fn test_set_quantity_zero_removes() {
        let mut cart = Cart::default();
        let line = cart.add_product(&shirt(), "M", MAX).unwrap();
        assert_eq!(cart.set_quantity(&line.id, 0, MAX).unwrap(), None);
        assert!(cart.is_empty());
        assert!(cart.subtotal().is_zero());
    }

    #[test]
    fn test_set_quantity_unknown_line_fails_without_mutation() {
        let mut cart = Cart::default();
        cart.add_product(&shirt(), "M", MAX).unwrap();
        let before = cart.clone();

        let err = cart
            .set_quantity(&LineItemId::new("missing"), 2, MAX)
            .unwrap_err();
        assert!(matches!(err, CommerceError::LineItemNotFound(_)));
        assert_eq!(cart, before);

        // A zero quantity is a removal, and removing a missing line is a no-op.
        assert_eq!(cart.set_quantity(&LineItemId::new("missing"), 0, MAX).unwrap(), None);
        assert_eq!(cart, before);
    }

    #[test]
    fn test_quantity_limit() {
        let mut cart = Cart::default();
        let line = cart.add_product(&shirt(), "M", 2).unwrap();
        cart.add_product(&shirt(), "M", 2).unwrap();
        let before = cart.clone();

        assert!(matches!(
            cart.add_product(&shirt(), "M", 2),
            Err(CommerceError::QuantityExceedsLimit(3, 2))
        ));
        assert!(cart.set_quantity(&line.id, 3, 2).is_err());
        assert_eq!(cart, before);
    }

    #[test]
    fn test_remove_item() {
        let mut cart = Cart::default();
        let line = cart.add_product(&shirt(), "M", MAX).unwrap();
        cart.add_product(&mug(), "M", MAX).unwrap();

        assert!(cart.remove_item(&line.id).is_some());
        assert!(cart.remove_item(&line.id).is_none());
        assert_eq!(cart.subtotal().amount_minor, 250);
        assert_total_consistent(&cart);
    }

    #[test]
    fn test_currency_mismatch_rejected() {
        let mut cart = Cart::new(Currency::USD);
        assert!(matches!(
            cart.add_product(&mug(), "M", MAX),
            Err(CommerceError::CurrencyMismatch { .. })
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_mixed_sequence_keeps_total_consistent() {
        let mut cart = Cart::default();
        let a = cart.add_product(&shirt(), "S", MAX).unwrap();
        cart.add_product(&shirt(), "M", MAX).unwrap();
        cart.add_product(&mug(), "M", MAX).unwrap();
        assert_total_consistent(&cart);

        cart.set_quantity(&a.id, 7, MAX).unwrap();
        assert_total_consistent(&cart);

        cart.add_product(&mug(), "M", MAX).unwrap();
        assert_total_consistent(&cart);

        cart.remove_item(&a.id);
        assert_total_consistent(&cart);
        assert_eq!(cart.subtotal().amount_minor, 1000 + 2 * 250);

        cart.clear();
        assert!(cart.subtotal().is_zero());
    }

    #[test]
    fn test_from_items_merges_and_recomputes() {
        let mut a = LineItem::from_product(&shirt(), "M", 2).unwrap();
        a.total_price = Money::new(1, Currency::INR); // stale server value
        let b = LineItem::from_product(&shirt(), "M", 1).unwrap();
        let c = LineItem::from_product(&mug(), "M", 1).unwrap();

        let cart = Cart::from_items([a.clone(), b, c], Currency::INR).unwrap();
        assert_eq!(cart.line_count(), 2);
        assert_eq!(cart.items()[0].id, a.id);
        assert_eq!(cart.items()[0].quantity, 3);
        assert_eq!(cart.subtotal().amount_minor, 3 * 1000 + 250);
    }

    #[test]
    fn test_from_items_rejects_bad_lines() {
        let mut zero = LineItem::from_product(&mug(), "M", 1).unwrap();
        zero.quantity = 0;
        assert!(Cart::from_items([zero], Currency::INR).is_err());

        let usd = LineItem::from_product(&mug(), "M", 1).unwrap();
        assert!(Cart::from_items([usd], Currency::USD).is_err());
    }

    #[test]
    fn test_resolve_size() {
        assert_eq!(resolve_size(&mug(), None, "M").unwrap(), "M");
        assert_eq!(resolve_size(&mug(), Some("XL"), "M").unwrap(), "M");
        assert_eq!(resolve_size(&shirt(), Some("L"), "M").unwrap(), "L");
        assert!(matches!(
            resolve_size(&shirt(), None, "M"),
            Err(CommerceError::SizeRequired(_))
        ));
        assert!(matches!(
            resolve_size(&shirt(), Some(" "), "M"),
            Err(CommerceError::SizeRequired(_))
        ));
        assert!(matches!(
            resolve_size(&shirt(), Some("XXL"), "M"),
            Err(CommerceError::SizeUnavailable { .. })
        ));
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("3").unwrap(), 3);
        assert_eq!(parse_quantity(" 12 ").unwrap(), 12);
        assert_eq!(parse_quantity("0").unwrap(), 0);
        assert!(parse_quantity("2.5").is_err());
        assert!(parse_quantity("2.0").is_err());
        assert!(parse_quantity("two").is_err());
        assert!(parse_quantity("").is_err());
    }

    #[test]
    fn test_negative_prices_rejected() {
        let mut cart = Cart::default();
        let refund = Product::new("refund", "Refund", Money::new(-500, Currency::INR));
        assert!(matches!(
            cart.add_product(&refund, "M", MAX),
            Err(CommerceError::InvalidAmount(_))
        ));
        assert!(cart.is_empty());

        let mut line = LineItem::from_product(&mug(), "M", 1).unwrap();
        line.unit_price = Money::new(-250, Currency::INR);
        assert!(matches!(
            Cart::from_items([line], Currency::INR),
            Err(CommerceError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_remove_recomputes_unusable_total() {
        let mut cart = Cart::default();
        let line = cart.add_product(&shirt(), "M", MAX).unwrap();
        cart.add_product(&mug(), "M", MAX).unwrap();
        cart.total = Money::new(0, Currency::USD);

        cart.remove_item(&line.id);
        assert_eq!(cart.subtotal(), Money::new(250, Currency::INR));
        assert_total_consistent(&cart);
    }

    #[test]
    fn test_consume_keeps_unordered_quantity() {
        let mut cart = Cart::default();
        let shirt_line = cart.add_product(&shirt(), "M", MAX).unwrap();
        let ordered = vec![shirt_line.clone()];

        // Placed after the order was taken.
        cart.add_product(&shirt(), "M", MAX).unwrap();
        let mug_line = cart.add_product(&mug(), "M", MAX).unwrap();

        cart.consume(&ordered).unwrap();
        assert_eq!(cart.get_item(&shirt_line.id).map(|l| l.quantity), Some(1));
        assert!(cart.get_item(&mug_line.id).is_some());
        assert_eq!(cart.subtotal().amount_minor, 1000 + 250);
        assert_total_consistent(&cart);

        let mug_now = cart.get_item(&mug_line.id).cloned().unwrap();
        cart.consume(&[mug_now]).unwrap();
        cart.consume(&ordered).unwrap();
        assert!(cart.is_empty());
        assert!(cart.subtotal().is_zero());
    }
}
