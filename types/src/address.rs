//! Account address type.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::TypesError;

/// An account identity: certificate holders, the administrator, the fee
/// treasury and the ledger's custody account are all addresses.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address(String);

impl Address {
    /// Create a new address from a raw string.
    ///
    /// # Panics
    /// Panics if the string is empty. Use [`Address::parse`] for untrusted input.
    pub fn new(raw: impl Into<String>) -> Self {
        let s = raw.into();
        assert!(!s.is_empty(), "address must not be empty");
        Self(s)
    }

    /// Parse an address, rejecting empty or whitespace-only strings.
    pub fn parse(raw: impl Into<String>) -> Result<Self, TypesError> {
        let s = raw.into();
        if s.trim().is_empty() {
            return Err(TypesError::InvalidAddress(s));
        }
        Ok(Self(s))
    }

    /// Return the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Address {
    type Error = TypesError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rejects_blank() {
        assert!(Address::parse("").is_err());
        assert!(Address::parse("   ").is_err());
        assert_eq!(Address::parse("alice").unwrap().as_str(), "alice");
    }

    #[test]
    #[should_panic(expected = "address must not be empty")]
    fn test_new_panics_on_empty() {
        let _ = Address::new("");
    }
}
