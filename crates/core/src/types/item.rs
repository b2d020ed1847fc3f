//! Canonical item identifiers and catalog items.
//!
//! Shopify surfaces the same page or product under two identifier shapes
//! depending on the API: a namespaced GID (`gid://shopify/Product/101`) from
//! the Admin API, and a bare numeric id (`101`) from storefront page metadata.
//! PageTest canonicalizes to the bare platform id at every boundary - catalog
//! ingestion, selection save, and storefront comparison - so membership tests
//! are always an exact string match.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Namespace prefix of Shopify GIDs.
const GID_PREFIX: &str = "gid://";

/// A canonical page or product identifier.
///
/// Always stored in canonical form: the trailing segment of a GID, or the
/// trimmed input for identifiers that are not GIDs (the platform treats
/// these as opaque). An `ItemId` is never empty.
///
/// ## Examples
///
/// ```
/// use pagetest_core::ItemId;
///
/// assert_eq!(ItemId::canonicalize("gid://shopify/Product/101").unwrap().as_str(), "101");
/// assert_eq!(ItemId::canonicalize(" 42 ").unwrap().as_str(), "42");
/// assert!(ItemId::canonicalize("").is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Canonicalize a raw identifier.
    ///
    /// Returns `None` if the input is empty (or whitespace only) - empty
    /// identifiers are filtered out, never persisted or matched.
    #[must_use]
    pub fn canonicalize(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        let canonical = if trimmed.starts_with(GID_PREFIX) {
            // gid://shopify/Page/123 -> 123; a trailing slash yields an
            // empty segment, which is rejected like any other empty id
            trimmed.rsplit('/').next().unwrap_or_default()
        } else {
            trimmed
        };

        if canonical.is_empty() {
            return None;
        }

        Some(Self(canonical.to_owned()))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `ItemId` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ItemId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Which selection list a caller is asking about.
///
/// The public lookup endpoint requires exactly one of the two values; any
/// other `type` parameter is a client error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionType {
    /// Regular content pages.
    Pages,
    /// Products.
    Products,
}

impl SelectionType {
    /// The query-parameter value for this type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pages => "pages",
            Self::Products => "products",
        }
    }

    /// The JSON field name the lookup endpoint uses for this type.
    #[must_use]
    pub const fn field_name(self) -> &'static str {
        match self {
            Self::Pages => "selectedPages",
            Self::Products => "selectedProducts",
        }
    }
}

impl fmt::Display for SelectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a `type` parameter is not `pages` or `products`.
#[derive(thiserror::Error, Debug, Clone)]
#[error("invalid selection type '{0}', expected 'pages' or 'products'")]
pub struct InvalidSelectionType(pub String);

impl std::str::FromStr for SelectionType {
    type Err = InvalidSelectionType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pages" => Ok(Self::Pages),
            "products" => Ok(Self::Products),
            other => Err(InvalidSelectionType(other.to_owned())),
        }
    }
}

/// A page or product as listed in the merchant's catalog.
///
/// Sourced from the Admin API; the title is a display label only and is
/// never used for matching.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogItem {
    /// Canonical identifier.
    pub id: ItemId,
    /// Display title.
    pub title: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_canonicalize_gid() {
        let id = ItemId::canonicalize("gid://shopify/Product/101").unwrap();
        assert_eq!(id.as_str(), "101");

        let id = ItemId::canonicalize("gid://shopify/Page/987654321").unwrap();
        assert_eq!(id.as_str(), "987654321");
    }

    #[test]
    fn test_canonicalize_bare_id() {
        let id = ItemId::canonicalize("42").unwrap();
        assert_eq!(id.as_str(), "42");
    }

    #[test]
    fn test_canonicalize_opaque_id_passes_through() {
        // Non-GID, non-numeric identifiers are opaque to us
        let id = ItemId::canonicalize("about-us").unwrap();
        assert_eq!(id.as_str(), "about-us");
    }

    #[test]
    fn test_canonicalize_trims_whitespace() {
        let id = ItemId::canonicalize("  42 ").unwrap();
        assert_eq!(id.as_str(), "42");
    }

    #[test]
    fn test_canonicalize_empty() {
        assert!(ItemId::canonicalize("").is_none());
        assert!(ItemId::canonicalize("   ").is_none());
    }

    #[test]
    fn test_canonicalize_gid_with_trailing_slash() {
        assert!(ItemId::canonicalize("gid://shopify/Page/").is_none());
    }

    #[test]
    fn test_gid_and_bare_forms_agree() {
        // The same product from the Admin API and from page metadata must
        // canonicalize to the same id
        let from_admin = ItemId::canonicalize("gid://shopify/Product/101").unwrap();
        let from_meta = ItemId::canonicalize("101").unwrap();
        assert_eq!(from_admin, from_meta);
    }

    #[test]
    fn test_selection_type_from_str() {
        assert_eq!("pages".parse::<SelectionType>().unwrap(), SelectionType::Pages);
        assert_eq!(
            "products".parse::<SelectionType>().unwrap(),
            SelectionType::Products
        );
        assert!("".parse::<SelectionType>().is_err());
        assert!("Pages".parse::<SelectionType>().is_err());
        assert!("collections".parse::<SelectionType>().is_err());
    }

    #[test]
    fn test_selection_type_field_name() {
        assert_eq!(SelectionType::Pages.field_name(), "selectedPages");
        assert_eq!(SelectionType::Products.field_name(), "selectedProducts");
    }
}
