//! Order submission payload.

use crate::cart::{Cart, LineItem};
use crate::checkout::{CheckoutTotals, PaymentMethod};
use crate::ids::AddressId;
use serde::{Deserialize, Serialize};

/// What the order backend receives when the shopper places an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub address_id: AddressId,
    pub payment_method: PaymentMethod,
    pub line_items: Vec<LineItem>,
    pub totals: CheckoutTotals,
}

impl OrderRequest {
    /// Build a request from the cart as it is now.
    pub fn from_cart(
        cart: &Cart,
        address_id: AddressId,
        payment_method: PaymentMethod,
        totals: CheckoutTotals,
    ) -> Self {
        Self {
            address_id,
            payment_method,
            line_items: cart.items().to_vec(),
            totals,
        }
    }

    /// Sum of quantities across all lines.
    pub fn item_count(&self) -> i64 {
        self.line_items.iter().map(|item| item.quantity).sum()
    }
}
