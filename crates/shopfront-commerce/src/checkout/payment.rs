//! Payment methods.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How the shopper pays for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Pay when the order is delivered.
    #[default]
    CashOnDelivery,
    /// Card payment through a gateway.
    Card,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::CashOnDelivery => "cash_on_delivery",
            PaymentMethod::Card => "card",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PaymentMethod::CashOnDelivery => "Cash on Delivery",
            PaymentMethod::Card => "Card",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
