//! Product identifiers.

use std::borrow::Borrow;
use std::fmt;

/// A product identifier, such as `A001`.
///
/// # Invariants
///
/// - The ID is never empty or whitespace-only once constructed through
///   [`ProductId::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProductId(String);

impl ProductId {
    /// Parse a product ID, rejecting blank input.
    ///
    /// # Examples
    ///
    /// ```
    /// use catalog::types::ProductId;
    ///
    /// let id = ProductId::parse("A001").expect("valid id");
    /// assert_eq!(id.as_str(), "A001");
    /// assert!(ProductId::parse("   ").is_none());
    /// ```
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.trim().is_empty() {
            return None;
        }
        Some(Self(raw.to_string()))
    }

    /// The ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ProductId {
    fn borrow(&self) -> &str {
        &self.0
    }
}
