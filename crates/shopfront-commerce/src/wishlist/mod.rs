//! Wishlist module.

mod store;
#[allow(clippy::module_inception)]
mod wishlist;

pub use store::WishlistStore;
pub use wishlist::Wishlist;
