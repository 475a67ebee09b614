//! Address types.

use crate::ids::AddressId;
use serde::{Deserialize, Serialize};

/// A saved shipping address.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Address {
    pub id: AddressId,
    /// Label shown to the shopper ("Home", "Work").
    #[serde(rename = "type")]
    pub kind: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    #[serde(default)]
    pub is_default: bool,
}

impl Address {
    /// Create a non-default address.
    pub fn new(
        id: impl Into<AddressId>,
        kind: impl Into<String>,
        street: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        postal_code: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            street: street.into(),
            city: city.into(),
            state: state.into(),
            postal_code: postal_code.into(),
            country: country.into(),
            is_default: false,
        }
    }

    /// Mark this address as the default.
    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }

    /// Format as single line.
    pub fn one_line(&self) -> String {
        format!(
            "{}, {}, {} {}, {}",
            self.street, self.city, self.state, self.postal_code, self.country
        )
    }

    /// Format as multi-line, the way the checkout screen prints it.
    pub fn multi_line(&self) -> String {
        format!(
            "{}, {}\n{} {}\n{}",
            self.street, self.city, self.state, self.postal_code, self.country
        )
    }
}

/// Pick the address checkout starts with: the default one, else the first.
pub fn select_default(addresses: &[Address]) -> Option<&Address> {
    addresses
        .iter()
        .find(|a| a.is_default)
        .or_else(|| addresses.first())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address(id: &str) -> Address {
        Address::new(id, "Home", "12 MG Road", "Bengaluru", "KA", "560001", "India")
    }

    #[test]
    fn test_select_default_prefers_flag() {
        let addresses = vec![address("a1"), address("a2").as_default(), address("a3")];
        assert_eq!(select_default(&addresses).unwrap().id.as_str(), "a2");
    }

    #[test]
    fn test_select_default_falls_back_to_first() {
        let addresses = vec![address("a1"), address("a2")];
        assert_eq!(select_default(&addresses).unwrap().id.as_str(), "a1");
        assert!(select_default(&[]).is_none());
    }

    #[test]
    fn test_address_formatting() {
        let addr = address("a1");
        assert_eq!(addr.one_line(), "12 MG Road, Bengaluru, KA 560001, India");
        assert_eq!(addr.multi_line().lines().count(), 3);
    }

    #[test]
    fn test_address_json_uses_type_key() {
        let json = serde_json::to_value(address("a1")).unwrap();
        assert_eq!(json["type"], "Home");
        assert_eq!(json["is_default"], false);
    }
}
