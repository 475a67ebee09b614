//! Contracts for the remote services the stores consume.
//!
//! The cart snapshot service, wishlist service, order backend and product
//! catalog are all external; the stores only depend on these traits.

use crate::cart::LineItem;
use crate::catalog::{Product, ProductFilter};
use crate::checkout::OrderRequest;
use crate::ids::{LineItemId, OrderId, ProductId};
use crate::money::Money;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How a remote call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceErrorKind {
    /// Network trouble or a timeout; retrying may succeed.
    Transient,
    /// The service understood the call and refused it.
    Rejected,
    /// The current identity may not perform the call.
    Unauthorized,
}

/// Failure reported by a cart, wishlist or catalog service.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{kind:?}: {message}")]
pub struct ServiceError {
    pub kind: ServiceErrorKind,
    pub message: String,
}

impl ServiceError {
    pub fn new(kind: ServiceErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn transient(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::Transient, message)
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::Rejected, message)
    }

    pub fn is_transient(&self) -> bool {
        self.kind == ServiceErrorKind::Transient
    }
}

/// Why the order backend refused an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderFailureKind {
    /// The request was malformed or referenced invalid data.
    Validation,
    /// The backend cannot take this payment method.
    PaymentUnsupported,
    /// Network trouble or a temporary backend fault.
    Transient,
}

/// Structured failure from order submission.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{kind:?}: {message}")]
pub struct OrderFailure {
    pub kind: OrderFailureKind,
    pub message: String,
}

impl OrderFailure {
    pub fn new(kind: OrderFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Only transient failures are worth retrying unchanged.
    pub fn is_retryable(&self) -> bool {
        self.kind == OrderFailureKind::Transient
    }
}

/// Authoritative cart state read from the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartSnapshot {
    pub items: Vec<LineItem>,
    /// Total as reported by the server.
    pub total: Money,
}

/// Authoritative wishlist state read from the server, oldest like first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct WishlistSnapshot {
    pub products: Vec<Product>,
}

/// An order accepted by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderConfirmation {
    pub order_id: OrderId,
    pub grand_total: Money,
    pub placed_at: DateTime<Utc>,
}

/// Server-side cart persistence.
#[async_trait]
pub trait CartService: Send + Sync {
    /// Read the current identity's cart.
    async fn fetch_cart(&self) -> Result<CartSnapshot, ServiceError>;

    /// Persist an added line. `item` carries the line's resulting quantity,
    /// so an increment of an existing line sends the incremented value.
    async fn add_item(&self, item: &LineItem) -> Result<(), ServiceError>;

    /// Persist an exact quantity for an existing line.
    async fn set_quantity(&self, line_id: &LineItemId, quantity: i64) -> Result<(), ServiceError>;

    /// Persist the removal of a line.
    async fn remove_item(&self, line_id: &LineItemId) -> Result<(), ServiceError>;

    /// Persist an empty cart.
    async fn clear(&self) -> Result<(), ServiceError>;
}

/// Server-side wishlist persistence.
#[async_trait]
pub trait WishlistService: Send + Sync {
    async fn fetch_wishlist(&self) -> Result<WishlistSnapshot, ServiceError>;

    async fn add(&self, product_id: &ProductId) -> Result<(), ServiceError>;

    async fn remove(&self, product_id: &ProductId) -> Result<(), ServiceError>;
}

/// Order placement endpoint.
#[async_trait]
pub trait OrderService: Send + Sync {
    async fn place_order(&self, request: &OrderRequest) -> Result<OrderConfirmation, OrderFailure>;
}

/// Read-only product lookup.
#[async_trait]
pub trait CatalogService: Send + Sync {
    async fn get_by_id(&self, id: &ProductId) -> Result<Option<Product>, ServiceError>;

    async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, ServiceError>;
}
