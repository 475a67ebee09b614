//! Store and checkout configuration.
//!
//! Loaded from TOML; every field has a default so an empty document is a
//! valid configuration.

use crate::checkout::{PaymentMethod, PricingRules};
use crate::error::CommerceError;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Size label used for products that have no size options.
pub const DEFAULT_SIZE: &str = "M";

/// Maximum quantity allowed per line item unless configured otherwise.
pub const DEFAULT_MAX_QUANTITY: i64 = 99;

/// Configuration for the commerce stores and checkout.
///
/// ```toml
/// currency = "INR"
/// default_size = "M"
/// max_quantity_per_line = 99
/// supported_payment_methods = ["cash_on_delivery"]
///
/// [shipping]
/// flat_rate = "200.00"
/// free_shipping_threshold = "5000.00"
///
/// [tax]
/// rate_bps = 1800
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommerceConfig {
    /// Currency for carts and totals.
    pub currency: Currency,
    /// Size assigned to line items of sizeless products.
    pub default_size: String,
    /// Upper bound on a single line's quantity.
    pub max_quantity_per_line: i64,
    /// Payment methods the order backend accepts.
    pub supported_payment_methods: Vec<PaymentMethod>,
    /// Shipping rules.
    pub shipping: ShippingConfig,
    /// Tax rules.
    pub tax: TaxConfig,
}

/// Shipping section of [`CommerceConfig`]. Amounts are decimal strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShippingConfig {
    /// Fee charged on every non-empty order.
    pub flat_rate: String,
    /// Subtotal at or above which shipping is free.
    pub free_shipping_threshold: Option<String>,
}

/// Tax section of [`CommerceConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TaxConfig {
    /// Tax rate in basis points (1800 = 18%).
    pub rate_bps: u32,
}

impl Default for CommerceConfig {
    fn default() -> Self {
        Self {
            currency: Currency::default(),
            default_size: DEFAULT_SIZE.to_string(),
            max_quantity_per_line: DEFAULT_MAX_QUANTITY,
            supported_payment_methods: vec![PaymentMethod::CashOnDelivery],
            shipping: ShippingConfig::default(),
            tax: TaxConfig::default(),
        }
    }
}

impl Default for ShippingConfig {
    fn default() -> Self {
        Self {
            flat_rate: "200.00".to_string(),
            free_shipping_threshold: None,
        }
    }
}

impl CommerceConfig {
    /// Parse a TOML document and validate it.
    pub fn from_toml_str(input: &str) -> Result<Self, CommerceError> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration is usable.
    pub fn validate(&self) -> Result<(), CommerceError> {
        if self.default_size.trim().is_empty() {
            return Err(CommerceError::Config("default_size must not be empty".into()));
        }
        if self.max_quantity_per_line < 1 {
            return Err(CommerceError::Config(format!(
                "max_quantity_per_line must be at least 1, got {}",
                self.max_quantity_per_line
            )));
        }
        if self.supported_payment_methods.is_empty() {
            return Err(CommerceError::Config(
                "at least one payment method must be supported".into(),
            ));
        }
        self.pricing_rules().map(|_| ())
    }

    /// Build the shipping and tax rules used by checkout.
    pub fn pricing_rules(&self) -> Result<PricingRules, CommerceError> {
        let flat_rate = parse_non_negative(&self.shipping.flat_rate, self.currency)?;
        let free_shipping_threshold = self
            .shipping
            .free_shipping_threshold
            .as_deref()
            .map(|t| parse_non_negative(t, self.currency))
            .transpose()?;

        Ok(PricingRules {
            flat_shipping: flat_rate,
            free_shipping_threshold,
            tax_rate_bps: self.tax.rate_bps,
        })
    }

    /// Check whether orders may be placed with a payment method.
    pub fn supports(&self, method: PaymentMethod) -> bool {
        self.supported_payment_methods.contains(&method)
    }
}

fn parse_non_negative(input: &str, currency: Currency) -> Result<Money, CommerceError> {
    let amount = Money::parse(input, currency)
        .map_err(|e| CommerceError::Config(e.to_string()))?;
    if amount.is_negative() {
        return Err(CommerceError::Config(format!(
            "amount must not be negative: {}",
            input
        )));
    }
    Ok(amount)
}
