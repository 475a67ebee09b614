//! Product catalog module.
//!
//! Products are owned by the remote catalog; this module only models them
//! and the filters used to list them.

mod filter;
mod memory;
mod product;

pub use filter::ProductFilter;
pub use memory::InMemoryCatalog;
pub use product::Product;
