//! In-memory service fakes shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use shopfront_commerce::prelude::*;
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::sync::Notify;

pub fn inr(major: i64) -> Money {
    Money::new(major * 100, Currency::INR)
}

pub fn product(id: &str, price_major: i64) -> Product {
    Product::new(id, format!("Product {}", id), inr(price_major))
        .with_image(format!("https://cdn.example.com/{}.jpg", id))
}

pub fn sized_product(id: &str, price_major: i64) -> Product {
    product(id, price_major).with_sizes(["S", "M", "L"])
}

pub fn address(id: &str) -> Address {
    Address::new(id, "Home", "12 MG Road", "Bengaluru", "KA", "560001", "India")
}

/// Cart service keeping a server-side copy of the lines.
#[derive(Default)]
pub struct FakeCartService {
    lines: Mutex<Vec<LineItem>>,
    queued: Mutex<VecDeque<Vec<LineItem>>>,
    reported_total: Mutex<Option<Money>>,
    failure: Mutex<Option<ServiceError>>,
    calls: Mutex<Vec<&'static str>>,
    gate: Option<Notify>,
}

impl FakeCartService {
    pub fn new() -> Self {
        Self::default()
    }

    /// A service whose `add_item` calls wait for [`FakeCartService::release`].
    pub fn gated() -> Self {
        Self {
            gate: Some(Notify::new()),
            ..Self::default()
        }
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    /// Serve `lines` from the next fetch instead of the server copy.
    pub fn queue_snapshot(&self, lines: Vec<LineItem>) {
        self.queued.lock().unwrap().push_back(lines);
    }

    pub fn with_lines(lines: Vec<LineItem>) -> Self {
        let service = Self::new();
        *service.lines.lock().unwrap() = lines;
        service
    }

    /// Make the next snapshot report this total instead of the real one.
    pub fn report_total(&self, total: Money) {
        *self.reported_total.lock().unwrap() = Some(total);
    }

    /// Fail the next call with `error`.
    pub fn fail_next(&self, error: ServiceError) {
        *self.failure.lock().unwrap() = Some(error);
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn server_lines(&self) -> Vec<LineItem> {
        self.lines.lock().unwrap().clone()
    }

    fn enter(&self, call: &'static str) -> Result<(), ServiceError> {
        self.calls.lock().unwrap().push(call);
        match self.failure.lock().unwrap().take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl CartService for FakeCartService {
    async fn fetch_cart(&self) -> Result<CartSnapshot, ServiceError> {
        tokio::task::yield_now().await;
        self.enter("fetch_cart")?;
        let queued = self.queued.lock().unwrap().pop_front();
        let items = queued.unwrap_or_else(|| self.server_lines());
        let computed = items
            .iter()
            .map(|item| item.total_price.amount_minor)
            .sum::<i64>();
        let total = self
            .reported_total
            .lock()
            .unwrap()
            .unwrap_or(Money::new(computed, Currency::INR));
        Ok(CartSnapshot { items, total })
    }

    async fn add_item(&self, item: &LineItem) -> Result<(), ServiceError> {
        tokio::task::yield_now().await;
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.enter("add_item")?;
        let mut lines = self.lines.lock().unwrap();
        match lines.iter_mut().find(|line| line.id == item.id) {
            Some(line) => *line = item.clone(),
            None => lines.push(item.clone()),
        }
        Ok(())
    }

    async fn set_quantity(&self, line_id: &LineItemId, quantity: i64) -> Result<(), ServiceError> {
        tokio::task::yield_now().await;
        self.enter("set_quantity")?;
        let mut lines = self.lines.lock().unwrap();
        let line = lines
            .iter_mut()
            .find(|line| &line.id == line_id)
            .ok_or_else(|| ServiceError::rejected("unknown line"))?;
        line.quantity = quantity;
        line.total_price = Money::new(line.unit_price.amount_minor * quantity, Currency::INR);
        Ok(())
    }

    async fn remove_item(&self, line_id: &LineItemId) -> Result<(), ServiceError> {
        tokio::task::yield_now().await;
        self.enter("remove_item")?;
        self.lines.lock().unwrap().retain(|line| &line.id != line_id);
        Ok(())
    }

    async fn clear(&self) -> Result<(), ServiceError> {
        tokio::task::yield_now().await;
        self.enter("clear")?;
        self.lines.lock().unwrap().clear();
        Ok(())
    }
}

/// Wishlist service keeping server-side membership.
#[derive(Default)]
pub struct FakeWishlistService {
    products: Mutex<Vec<Product>>,
    liked: Mutex<Vec<ProductId>>,
    failure: Mutex<Option<ServiceError>>,
    calls: Mutex<Vec<&'static str>>,
}

impl FakeWishlistService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `products` from the next snapshot, as stored.
    pub fn with_products(products: Vec<Product>) -> Self {
        let service = Self::new();
        *service.liked.lock().unwrap() = products.iter().map(|p| p.id.clone()).collect();
        *service.products.lock().unwrap() = products;
        service
    }

    pub fn fail_next(&self, error: ServiceError) {
        *self.failure.lock().unwrap() = Some(error);
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn liked(&self) -> Vec<ProductId> {
        self.liked.lock().unwrap().clone()
    }

    fn enter(&self, call: &'static str) -> Result<(), ServiceError> {
        self.calls.lock().unwrap().push(call);
        match self.failure.lock().unwrap().take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl WishlistService for FakeWishlistService {
    async fn fetch_wishlist(&self) -> Result<WishlistSnapshot, ServiceError> {
        tokio::task::yield_now().await;
        self.enter("fetch_wishlist")?;
        Ok(WishlistSnapshot {
            products: self.products.lock().unwrap().clone(),
        })
    }

    async fn add(&self, product_id: &ProductId) -> Result<(), ServiceError> {
        tokio::task::yield_now().await;
        self.enter("add")?;
        let mut liked = self.liked.lock().unwrap();
        if liked.contains(product_id) {
            return Err(ServiceError::rejected("already liked"));
        }
        liked.push(product_id.clone());
        Ok(())
    }

    async fn remove(&self, product_id: &ProductId) -> Result<(), ServiceError> {
        tokio::task::yield_now().await;
        self.enter("remove")?;
        self.liked.lock().unwrap().retain(|id| id != product_id);
        Ok(())
    }
}

/// Order backend that records requests. A gated backend holds every
/// submission until [`FakeOrderService::release`] is called.
#[derive(Default)]
pub struct FakeOrderService {
    requests: Mutex<Vec<OrderRequest>>,
    failure: Mutex<Option<OrderFailure>>,
    gate: Option<Notify>,
}

impl FakeOrderService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gated() -> Self {
        Self {
            gate: Some(Notify::new()),
            ..Self::default()
        }
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    pub fn fail_next(&self, failure: OrderFailure) {
        *self.failure.lock().unwrap() = Some(failure);
    }

    pub fn requests(&self) -> Vec<OrderRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl OrderService for FakeOrderService {
    async fn place_order(&self, request: &OrderRequest) -> Result<OrderConfirmation, OrderFailure> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.gate {
            Some(gate) => gate.notified().await,
            None => tokio::task::yield_now().await,
        }
        if let Some(failure) = self.failure.lock().unwrap().take() {
            return Err(failure);
        }
        Ok(OrderConfirmation {
            order_id: OrderId::generate(),
            grand_total: request.totals.grand_total,
            placed_at: Utc::now(),
        })
    }
}
