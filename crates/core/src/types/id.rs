//! Newtype IDs for type-safe entity references.
//!
//! The commerce API identifies products with opaque strings (e.g.
//! `"v4sLtEcMpzabRyfx"`). Wrapping them keeps product IDs from being mixed up
//! with usernames, search text or other free-form strings.

use serde::{Deserialize, Serialize};

/// Opaque product identifier assigned by the commerce API.
///
/// Serialized transparently as a JSON string.
///
/// # Example
///
/// ```rust
/// # use cartlane_core::ProductId;
/// let id = ProductId::new("upLK9JbQ4rMhTwt4");
/// assert_eq!(id.as_str(), "upLK9JbQ4rMhTwt4");
/// assert_eq!(id.to_string(), "upLK9JbQ4rMhTwt4");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create a new product ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<ProductId> for String {
    fn from(id: ProductId) -> Self {
        id.0
    }
}

impl PartialEq<str> for ProductId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ProductId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_id_serializes_transparently() {
        let id = ProductId::new("abc123");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc123\"");

        let parsed: ProductId = serde_json::from_str("\"abc123\"").unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_product_id_compares_with_str() {
        let id = ProductId::from("p1");
        assert!(id == "p1");
        assert!(id != "p2");
    }
}
