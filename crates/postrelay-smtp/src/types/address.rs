//! Envelope address validation.

use crate::error::{Error, Result};

/// A validated envelope address for MAIL FROM / RCPT TO.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address(String);

impl Address {
    /// Creates a new address from a string.
    ///
    /// Validation covers only the envelope shape the wire commands need:
    /// a non-empty local part and domain around a single `@`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAddress`] if the shape does not hold.
    pub fn new(addr: impl Into<String>) -> Result<Self> {
        let addr = addr.into();

        let Some((local, domain)) = addr.split_once('@') else {
            return Err(Error::InvalidAddress(addr));
        };
        if local.is_empty() || domain.is_empty() || domain.contains('@') {
            return Err(Error::InvalidAddress(addr));
        }

        Ok(Self(addr))
    }

    /// Returns the address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::redundant_clone, clippy::manual_string_new, clippy::needless_collect, clippy::unreadable_literal, clippy::used_underscore_items, clippy::similar_names)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_address() {
        let addr = Address::new("user@example.com").unwrap();
        assert_eq!(addr.as_str(), "user@example.com");
    }

    #[test]
    fn rejects_missing_at() {
        assert!(Address::new("userexample.com").is_err());
    }

    #[test]
    fn rejects_empty_parts() {
        assert!(Address::new("").is_err());
        assert!(Address::new("@example.com").is_err());
        assert!(Address::new("user@").is_err());
    }

    #[test]
    fn rejects_double_at() {
        assert!(Address::new("user@host@example.com").is_err());
    }
}
