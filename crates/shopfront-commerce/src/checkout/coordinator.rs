//! Checkout state machine.
//!
//! ```text
//! Selecting --place_order--> Submitting --ok--> Placed
//!     ^                          |
//!     +--------- Failed <--------+ err
//! ```
//!
//! `Failed` is transient: a failed submission records its reason and drops
//! straight back to `Selecting` with the shopper's selections intact.

use crate::cart::CartStore;
use crate::checkout::{
    select_default, Address, CheckoutTotals, OrderRequest, PaymentMethod, PricingRules,
};
use crate::config::CommerceConfig;
use crate::error::CommerceError;
use crate::services::{OrderConfirmation, OrderFailure, OrderService};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

/// Where a checkout is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CheckoutState {
    /// Shopper is choosing an address and payment method.
    Selecting,
    /// An order is in flight.
    Submitting,
    /// The order was accepted. Terminal.
    Placed,
    /// The last submission failed.
    Failed,
}

impl CheckoutState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutState::Selecting => "selecting",
            CheckoutState::Submitting => "submitting",
            CheckoutState::Placed => "placed",
            CheckoutState::Failed => "failed",
        }
    }
}

#[derive(Debug)]
struct Selection {
    state: CheckoutState,
    address: Option<Address>,
    payment_method: PaymentMethod,
    last_failure: Option<OrderFailure>,
}

/// Drives one checkout from selection to a placed order.
pub struct CheckoutCoordinator {
    cart: Arc<CartStore>,
    orders: Arc<dyn OrderService>,
    pricing: PricingRules,
    supported_methods: Vec<PaymentMethod>,
    addresses: Vec<Address>,
    selection: Mutex<Selection>,
}

impl CheckoutCoordinator {
    /// Start a checkout over the shopper's saved addresses.
    ///
    /// The default address is preselected (else the first one) along with
    /// cash on delivery. Only cash on delivery is accepted at submission;
    /// use [`CheckoutCoordinator::with_payment_methods`] to change that.
    pub fn begin(
        cart: Arc<CartStore>,
        orders: Arc<dyn OrderService>,
        addresses: Vec<Address>,
        pricing: PricingRules,
    ) -> Self {
        let address = select_default(&addresses).cloned();
        debug!(
            addresses = addresses.len(),
            address_id = address.as_ref().map(|a| a.id.as_str()),
            "checkout started"
        );
        Self {
            cart,
            orders,
            pricing,
            supported_methods: vec![PaymentMethod::CashOnDelivery],
            addresses,
            selection: Mutex::new(Selection {
                state: CheckoutState::Selecting,
                address,
                payment_method: PaymentMethod::CashOnDelivery,
                last_failure: None,
            }),
        }
    }

    /// Start a checkout with pricing and payment methods taken from config.
    pub fn from_config(
        cart: Arc<CartStore>,
        orders: Arc<dyn OrderService>,
        addresses: Vec<Address>,
        config: &CommerceConfig,
    ) -> Result<Self, CommerceError> {
        let pricing = config.pricing_rules()?;
        Ok(Self::begin(cart, orders, addresses, pricing)
            .with_payment_methods(config.supported_payment_methods.clone()))
    }

    /// Replace the payment methods accepted at submission.
    pub fn with_payment_methods(mut self, methods: Vec<PaymentMethod>) -> Self {
        self.supported_methods = methods;
        self
    }

    pub fn state(&self) -> CheckoutState {
        self.lock().state
    }

    pub fn is_placed(&self) -> bool {
        self.state() == CheckoutState::Placed
    }

    /// Addresses the checkout was started with.
    pub fn addresses(&self) -> &[Address] {
        &self.addresses
    }

    pub fn selected_address(&self) -> Option<Address> {
        self.lock().address.clone()
    }

    pub fn payment_method(&self) -> PaymentMethod {
        self.lock().payment_method
    }

    /// Reason the most recent submission failed, cleared on the next attempt.
    pub fn last_failure(&self) -> Option<OrderFailure> {
        self.lock().last_failure.clone()
    }

    /// Choose the shipping address.
    pub fn select_address(&self, address: Address) -> Result<(), CommerceError> {
        let mut selection = self.lock();
        ensure_selecting(&selection, "select an address")?;
        debug!(address_id = %address.id, "checkout address selected");
        selection.address = Some(address);
        Ok(())
    }

    /// Choose the payment method. Support is checked when the order is placed.
    pub fn select_payment_method(&self, method: PaymentMethod) -> Result<(), CommerceError> {
        let mut selection = self.lock();
        ensure_selecting(&selection, "select a payment method")?;
        debug!(payment_method = %method, "checkout payment method selected");
        selection.payment_method = method;
        Ok(())
    }

    /// Totals for the current cart and selected address.
    pub fn summary(&self) -> Result<CheckoutTotals, CommerceError> {
        let address = self.selected_address();
        self.pricing.quote(self.cart.subtotal(), address.as_ref())
    }

    /// Submit the order.
    ///
    /// Validation failures return an error without leaving `Selecting`.
    /// On success the ordered lines leave the local cart, since the backend
    /// consumed them; lines added meanwhile are kept.
    pub async fn place_order(&self) -> Result<OrderConfirmation, CommerceError> {
        let request = self.prepare()?;
        let mut submission = Submission::start(self);

        info!(
            address_id = %request.address_id,
            payment_method = %request.payment_method,
            lines = request.line_items.len(),
            grand_total = %request.totals.grand_total,
            "placing order"
        );

        match self.orders.place_order(&request).await {
            Ok(confirmation) => {
                submission.finish(CheckoutState::Placed, None);
                if let Err(e) = self.cart.consume(&request.line_items).await {
                    warn!(error = %e, "could not drop ordered lines from the cart");
                }
                info!(
                    order_id = %confirmation.order_id,
                    grand_total = %confirmation.grand_total,
                    "order placed"
                );
                Ok(confirmation)
            }
            Err(failure) => {
                warn!(
                    kind = ?failure.kind,
                    retryable = failure.is_retryable(),
                    error = %failure,
                    "order submission failed"
                );
                submission.finish(CheckoutState::Failed, Some(failure.clone()));
                Err(CommerceError::Submission(failure))
            }
        }
    }

    /// Validate the selection and move to `Submitting`.
    fn prepare(&self) -> Result<OrderRequest, CommerceError> {
        let mut selection = self.lock();
        ensure_selecting(&selection, "place an order")?;

        let address = selection
            .address
            .as_ref()
            .ok_or(CommerceError::NoAddressSelected)?;
        let method = selection.payment_method;
        if !self.supported_methods.contains(&method) {
            return Err(CommerceError::PaymentMethodUnsupported(
                method.display_name().to_string(),
            ));
        }

        let cart = self.cart.snapshot();
        if cart.is_empty() {
            return Err(CommerceError::EmptyCart);
        }
        let totals = self.pricing.quote(cart.subtotal(), Some(address))?;
        let request = OrderRequest::from_cart(&cart, address.id.clone(), method, totals);

        selection.state = CheckoutState::Submitting;
        selection.last_failure = None;
        Ok(request)
    }

    fn lock(&self) -> MutexGuard<'_, Selection> {
        self.selection.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn ensure_selecting(selection: &Selection, action: &str) -> Result<(), CommerceError> {
    if selection.state == CheckoutState::Selecting {
        return Ok(());
    }
    Err(CommerceError::InvalidCheckoutTransition {
        state: selection.state.as_str().to_string(),
        action: action.to_string(),
    })
}

/// An in-flight submission. If the `place_order` future is dropped before
/// the backend answers, the checkout falls back to `Selecting`.
struct Submission<'a> {
    coordinator: &'a CheckoutCoordinator,
    done: bool,
}

impl<'a> Submission<'a> {
    fn start(coordinator: &'a CheckoutCoordinator) -> Self {
        Self {
            coordinator,
            done: false,
        }
    }

    fn finish(&mut self, outcome: CheckoutState, failure: Option<OrderFailure>) {
        let mut selection = self.coordinator.lock();
        selection.state = outcome;
        if outcome == CheckoutState::Failed {
            debug!("checkout returning to selection");
            selection.state = CheckoutState::Selecting;
        }
        selection.last_failure = failure;
        self.done = true;
    }
}

impl Drop for Submission<'_> {
    fn drop(&mut self) {
        if !self.done {
            warn!("order submission abandoned before completion");
            self.coordinator.lock().state = CheckoutState::Selecting;
        }
    }
}
