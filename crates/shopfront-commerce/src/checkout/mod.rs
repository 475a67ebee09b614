//! Checkout module.
//!
//! Contains addresses, payment methods, shipping and tax rules, the order
//! request, and the coordinator that drives submission.

mod address;
mod coordinator;
mod order;
mod payment;
mod pricing;

pub use address::{select_default, Address};
pub use coordinator::{CheckoutCoordinator, CheckoutState};
pub use order::OrderRequest;
pub use payment::PaymentMethod;
pub use pricing::{CheckoutTotals, PricingRules};
