//! Shopping cart module.
//!
//! Contains the cart model and the store that synchronizes it with the
//! cart service.

#[allow(clippy::module_inception)]
mod cart;
mod store;

pub use cart::{parse_quantity, resolve_size, Cart, LineItem};
pub use store::CartStore;
