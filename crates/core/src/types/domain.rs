//! Shop domain type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`ShopDomain`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum DomainError {
    /// The input string is empty (or whitespace only).
    #[error("shop domain cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("shop domain must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains characters that cannot appear in a hostname.
    #[error("shop domain contains invalid character '{0}'")]
    InvalidCharacter(char),
}

/// A shop's canonical hostname (e.g. `shop-a.myshopify.com`).
///
/// This is the unique key for everything PageTest persists: one selection
/// record exists per domain. Parsing lowercases the input so lookups from
/// the storefront (which reads `window.location.hostname`) and saves from
/// the embedded admin UI always agree on the same key.
///
/// ## Constraints
///
/// - Length: 1-253 characters (DNS limit)
/// - Characters: alphanumerics, `-` and `.` only
///
/// ## Examples
///
/// ```
/// use pagetest_core::ShopDomain;
///
/// assert!(ShopDomain::parse("shop-a.myshopify.com").is_ok());
/// assert!(ShopDomain::parse("  Shop-A.MyShopify.com ").is_ok()); // normalized
///
/// assert!(ShopDomain::parse("").is_err());
/// assert!(ShopDomain::parse("shop a").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ShopDomain(String);

impl ShopDomain {
    /// Maximum length of a hostname (DNS limit).
    pub const MAX_LENGTH: usize = 253;

    /// Parse a `ShopDomain` from a string.
    ///
    /// Leading/trailing whitespace is trimmed and the domain is lowercased.
    ///
    /// # Errors
    ///
    /// Returns an error if the input:
    /// - Is empty after trimming
    /// - Is longer than 253 characters
    /// - Contains characters that cannot appear in a hostname
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(DomainError::Empty);
        }

        if trimmed.len() > Self::MAX_LENGTH {
            return Err(DomainError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if let Some(c) = trimmed
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '.'))
        {
            return Err(DomainError::InvalidCharacter(c));
        }

        Ok(Self(trimmed.to_ascii_lowercase()))
    }

    /// Returns the domain as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `ShopDomain` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ShopDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ShopDomain {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for ShopDomain {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_domains() {
        assert!(ShopDomain::parse("shop-a.myshopify.com").is_ok());
        assert!(ShopDomain::parse("example.com").is_ok());
        assert!(ShopDomain::parse("localhost").is_ok());
    }

    #[test]
    fn test_parse_normalizes_case_and_whitespace() {
        let domain = ShopDomain::parse("  Shop-A.MyShopify.com ").unwrap();
        assert_eq!(domain.as_str(), "shop-a.myshopify.com");
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(ShopDomain::parse(""), Err(DomainError::Empty)));
        assert!(matches!(ShopDomain::parse("   "), Err(DomainError::Empty)));
    }

    #[test]
    fn test_parse_too_long() {
        let long = "a".repeat(300);
        assert!(matches!(
            ShopDomain::parse(&long),
            Err(DomainError::TooLong { .. })
        ));
    }

    #[test]
    fn test_parse_invalid_characters() {
        assert!(matches!(
            ShopDomain::parse("shop a.com"),
            Err(DomainError::InvalidCharacter(' '))
        ));
        assert!(matches!(
            ShopDomain::parse("https://shop.com"),
            Err(DomainError::InvalidCharacter(':'))
        ));
    }

    #[test]
    fn test_display() {
        let domain = ShopDomain::parse("shop-a.myshopify.com").unwrap();
        assert_eq!(format!("{domain}"), "shop-a.myshopify.com");
    }

    #[test]
    fn test_from_str() {
        let domain: ShopDomain = "shop-a.myshopify.com".parse().unwrap();
        assert_eq!(domain.as_str(), "shop-a.myshopify.com");
    }
}
