//! Shipping and tax.
//!
//! Totals are a pure function of the subtotal; the same inputs always give
//! the same result.

use crate::checkout::Address;
use crate::error::CommerceError;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Shipping and tax rules applied at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingRules {
    /// Fee charged on every non-empty order.
    pub flat_shipping: Money,
    /// Subtotal at or above which shipping is free.
    pub free_shipping_threshold: Option<Money>,
    /// Tax on the subtotal, in basis points.
    pub tax_rate_bps: u32,
}

impl PricingRules {
    /// 200.00 flat shipping and no tax.
    pub fn standard(currency: Currency) -> Self {
        Self {
            flat_shipping: Money::new(200 * currency.minor_per_major(), currency),
            free_shipping_threshold: None,
            tax_rate_bps: 0,
        }
    }

    /// Compute checkout totals for a subtotal.
    ///
    /// The address is accepted so region-dependent rules can be added
    /// without changing callers; the current rules ignore it.
    pub fn quote(
        &self,
        subtotal: Money,
        _address: Option<&Address>,
    ) -> Result<CheckoutTotals, CommerceError> {
        let shipping = self.shipping_for(&subtotal)?;
        let tax = subtotal.basis_points(self.tax_rate_bps)?;
        let grand_total = subtotal.try_add(&shipping)?.try_add(&tax)?;

        Ok(CheckoutTotals {
            subtotal,
            shipping,
            tax,
            grand_total,
        })
    }

    fn shipping_for(&self, subtotal: &Money) -> Result<Money, CommerceError> {
        if self.flat_shipping.currency != subtotal.currency {
            return Err(CommerceError::CurrencyMismatch {
                expected: subtotal.currency.code().to_string(),
                got: self.flat_shipping.currency.code().to_string(),
            });
        }

        if subtotal.is_zero() {
            return Ok(Money::zero(subtotal.currency));
        }

        match self.free_shipping_threshold {
            Some(threshold) if threshold.currency != subtotal.currency => {
                Err(CommerceError::CurrencyMismatch {
                    expected: subtotal.currency.code().to_string(),
                    got: threshold.currency.code().to_string(),
                })
            }
            Some(threshold) if subtotal.amount_minor >= threshold.amount_minor => {
                Ok(Money::zero(subtotal.currency))
            }
            _ => Ok(self.flat_shipping),
        }
    }
}

/// Order totals shown on the checkout screen and sent with the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutTotals {
    pub subtotal: Money,
    pub shipping: Money,
    pub tax: Money,
    /// subtotal + shipping + tax.
    pub grand_total: Money,
}
