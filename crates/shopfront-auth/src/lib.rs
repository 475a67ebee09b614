//! Authentication for the Shopfront client.
//!
//! Provides credential validation, the identity provider contract, and the
//! session that owns a shopper's cart and wishlist.

mod credentials;
mod error;
mod identity;
mod session;

pub use credentials::{validate_code, Credentials, SignUpProfile, MIN_PASSWORD_LEN};
pub use error::AuthError;
pub use identity::{AuthStatus, IdentityService};
pub use session::{SessionState, StorefrontSession};
