//! Commerce error types.

use crate::services::{OrderFailure, ServiceError};
use thiserror::Error;

/// Errors that can occur in cart, wishlist and checkout operations.
///
/// Variants fall into three groups: validation errors detected locally
/// (nothing was sent to a backend and nothing was mutated), synchronization
/// errors from the cart or wishlist services (local state is exactly as it
/// was before the call), and submission errors from order placement.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommerceError {
    /// Line item not in cart.
    #[error("Line item not in cart: {0}")]
    LineItemNotFound(String),

    /// Invalid quantity.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    /// Quantity exceeds maximum allowed.
    #[error("Quantity {0} exceeds maximum allowed ({1})")]
    QuantityExceedsLimit(i64, i64),

    /// The requested size is not offered for the product.
    #[error("Size {size} is not available for product {product_id}")]
    SizeUnavailable { product_id: String, size: String },

    /// A sized product was added without choosing a size.
    #[error("Select a size for product {0}")]
    SizeRequired(String),

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Malformed money amount.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// No shipping address selected for checkout.
    #[error("No shipping address selected")]
    NoAddressSelected,

    /// Payment method not supported by the order backend.
    #[error("Payment method not supported yet: {0}")]
    PaymentMethodUnsupported(String),

    /// Nothing to order.
    #[error("Cart is empty")]
    EmptyCart,

    /// Invalid checkout state transition.
    #[error("Invalid checkout transition: cannot {action} while {state}")]
    InvalidCheckoutTransition { state: String, action: String },

    /// Cart or wishlist service rejected or failed a call.
    #[error("Sync error: {0}")]
    Sync(ServiceError),

    /// Order submission failed.
    #[error("Order submission failed: {0}")]
    Submission(OrderFailure),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CommerceError {
    /// Check if this error was detected locally, before any backend call.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CommerceError::LineItemNotFound(_)
                | CommerceError::InvalidQuantity(_)
                | CommerceError::QuantityExceedsLimit(..)
                | CommerceError::SizeUnavailable { .. }
                | CommerceError::SizeRequired(_)
                | CommerceError::CurrencyMismatch { .. }
                | CommerceError::InvalidAmount(_)
                | CommerceError::NoAddressSelected
                | CommerceError::PaymentMethodUnsupported(_)
                | CommerceError::EmptyCart
        )
    }

    /// Check if retrying the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            CommerceError::Sync(e) => e.is_transient(),
            CommerceError::Submission(f) => f.is_retryable(),
            _ => false,
        }
    }
}

impl From<ServiceError> for CommerceError {
    fn from(e: ServiceError) -> Self {
        CommerceError::Sync(e)
    }
}

impl From<OrderFailure> for CommerceError {
    fn from(f: OrderFailure) -> Self {
        CommerceError::Submission(f)
    }
}

impl From<toml::de::Error> for CommerceError {
    fn from(e: toml::de::Error) -> Self {
        CommerceError::Config(e.to_string())
    }
}
