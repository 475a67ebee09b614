//! Newtype IDs for type-safe identifiers.
//!
//! Using newtypes prevents accidentally mixing up different ID types,
//! e.g., passing a ProductId where a LineItemId is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to generate newtype ID structs.
macro_rules! define_id {
    ($name:ident, $prefix:literal) => {
        /// A unique identifier.
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from a string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Generate a new random ID.
            pub fn generate() -> Self {
                Self(generate_id($prefix))
            }

            /// Get the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the inner string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(ProductId, "prod");
define_id!(LineItemId, "line");
define_id!(AddressId, "addr");
define_id!(OrderId, "ord");
define_id!(SessionId, "sess");

/// Random 64-bit ID with a type prefix, e.g. `line_9f3c0a1b2c3d4e5f`.
fn generate_id(prefix: &str) -> String {
    format!("{}_{:016x}", prefix, rand::random::<u64>())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_creation() {
        let id = ProductId::new("prod-123");
        assert_eq!(id.as_str(), "prod-123");
    }

    #[test]
    fn test_id_generation() {
        let id1 = LineItemId::generate();
        let id2 = LineItemId::generate();
        assert_ne!(id1, id2);
        assert!(id1.as_str().starts_with("line_"));
    }

    #[test]
    fn test_id_serializes_transparently() {
        let id = OrderId::new("ord-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"ord-1\"");
    }
}
