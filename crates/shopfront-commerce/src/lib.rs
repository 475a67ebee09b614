//! Client-side commerce session state for the Shopfront storefront.
//!
//! This crate owns the state a shopper edits between screens:
//!
//! - **Catalog**: Products, filters, an in-memory catalog
//! - **Cart**: Line items with exact fixed-point totals, synchronized with the cart service
//! - **Wishlist**: Insertion-ordered liked products
//! - **Checkout**: Address and payment selection, shipping and tax, order submission
//!
//! Remote services are consumed through the traits in [`services`].
//!
//! # Example
//!
//! ```rust,ignore
//! use shopfront_commerce::prelude::*;
//!
//! let config = CommerceConfig::from_toml_str(include_str!("shopfront.toml"))?;
//! let cart = Arc::new(CartStore::new(cart_service, &config));
//! cart.load().await?;
//!
//! let line = cart.add_item(&product, Some("L")).await?;
//! cart.update_quantity(&line.id, 3).await?;
//!
//! let checkout = CheckoutCoordinator::from_config(cart.clone(), orders, addresses, &config)?;
//! println!("Total: {}", checkout.summary()?.grand_total.display());
//! let confirmation = checkout.place_order().await?;
//! ```

pub mod config;
pub mod error;
pub mod ids;
pub mod money;
pub mod services;

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod wishlist;

pub use config::CommerceConfig;
pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::CommerceConfig;
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{InMemoryCatalog, Product, ProductFilter};

    // Cart
    pub use crate::cart::{Cart, CartStore, LineItem};

    // Wishlist
    pub use crate::wishlist::{Wishlist, WishlistStore};

    // Checkout
    pub use crate::checkout::{
        Address, CheckoutCoordinator, CheckoutState, CheckoutTotals, OrderRequest, PaymentMethod,
        PricingRules,
    };

    // Services
    pub use crate::services::{
        CartService, CartSnapshot, CatalogService, OrderConfirmation, OrderFailure,
        OrderFailureKind, OrderService, ServiceError, ServiceErrorKind, WishlistService,
        WishlistSnapshot,
    };
}
