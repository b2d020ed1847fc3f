//! Selection sets and submission normalization.
//!
//! A merchant submits raw identifier lists from the embedded admin UI; the
//! lists may contain empty strings (unchecked rows serialize as blanks) and
//! duplicates. Normalization filters and canonicalizes them into
//! [`SelectionSet`]s before anything is persisted.

use serde::{Deserialize, Serialize};

use crate::types::{DomainError, ItemId, SelectionType, ShopDomain};

/// A deduplicated set of canonical item identifiers.
///
/// Insertion order is preserved for stable output, but order carries no
/// meaning. Membership is exact: `contains` never does substring matching.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct SelectionSet {
    items: Vec<ItemId>,
}

impl SelectionSet {
    /// An empty selection set.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a set from raw identifier strings.
    ///
    /// Empty entries are dropped, GIDs are canonicalized, and duplicates
    /// collapse to their first occurrence.
    pub fn from_raw<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut items: Vec<ItemId> = Vec::new();
        for entry in raw {
            if let Some(id) = ItemId::canonicalize(entry.as_ref())
                && !items.contains(&id)
            {
                items.push(id);
            }
        }
        Self { items }
    }

    /// Exact membership test against a canonical identifier.
    #[must_use]
    pub fn contains(&self, id: &ItemId) -> bool {
        self.items.contains(id)
    }

    /// Returns `true` if nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of selected identifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Iterate over the identifiers.
    pub fn iter(&self) -> std::slice::Iter<'_, ItemId> {
        self.items.iter()
    }

    /// The identifiers as plain strings (for transport/persistence).
    #[must_use]
    pub fn to_strings(&self) -> Vec<String> {
        self.items.iter().map(|id| id.as_str().to_owned()).collect()
    }
}

impl<'a> IntoIterator for &'a SelectionSet {
    type Item = &'a ItemId;
    type IntoIter = std::slice::Iter<'a, ItemId>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl FromIterator<ItemId> for SelectionSet {
    fn from_iter<I: IntoIterator<Item = ItemId>>(iter: I) -> Self {
        let mut items: Vec<ItemId> = Vec::new();
        for id in iter {
            if !items.contains(&id) {
                items.push(id);
            }
        }
        Self { items }
    }
}

/// The persisted selection state for one shop.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShopSelection {
    /// The shop's canonical hostname (unique key).
    pub domain: ShopDomain,
    /// Selected page identifiers.
    #[serde(rename = "selectedPages")]
    pub pages: SelectionSet,
    /// Selected product identifiers.
    #[serde(rename = "selectedProducts")]
    pub products: SelectionSet,
}

impl ShopSelection {
    /// A selection with nothing selected, as created on first install.
    #[must_use]
    pub const fn empty(domain: ShopDomain) -> Self {
        Self {
            domain,
            pages: SelectionSet::new(),
            products: SelectionSet::new(),
        }
    }

    /// The set for the given selection type.
    #[must_use]
    pub const fn set_for(&self, selection_type: SelectionType) -> &SelectionSet {
        match selection_type {
            SelectionType::Pages => &self.pages,
            SelectionType::Products => &self.products,
        }
    }
}

/// A merchant's raw save request, before normalization.
#[derive(Debug, Clone, Deserialize)]
pub struct SelectionSubmission {
    /// Raw shop domain string.
    pub domain: String,
    /// Raw page identifiers (may contain empties and duplicates).
    pub pages: Vec<String>,
    /// Raw product identifiers (may contain empties and duplicates).
    pub products: Vec<String>,
}

impl SelectionSubmission {
    /// Validate the domain and normalize both lists.
    ///
    /// Membership against the live catalog is deliberately not checked:
    /// the catalog may have changed since the merchant's UI snapshot was
    /// loaded, and stale identifiers are tolerated by all readers.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` if the domain is empty or malformed.
    pub fn normalize(self) -> Result<ShopSelection, DomainError> {
        let domain = ShopDomain::parse(&self.domain)?;
        Ok(ShopSelection {
            domain,
            pages: SelectionSet::from_raw(self.pages),
            products: SelectionSet::from_raw(self.products),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn ids(set: &SelectionSet) -> Vec<&str> {
        set.iter().map(ItemId::as_str).collect()
    }

    #[test]
    fn test_from_raw_filters_empty_entries() {
        let set = SelectionSet::from_raw(["1", "", "2", "   "]);
        assert_eq!(ids(&set), ["1", "2"]);
    }

    #[test]
    fn test_from_raw_deduplicates() {
        let set = SelectionSet::from_raw(["1", "2", "2", "1"]);
        assert_eq!(ids(&set), ["1", "2"]);
    }

    #[test]
    fn test_from_raw_collapses_gid_and_bare_duplicates() {
        let set = SelectionSet::from_raw(["gid://shopify/Product/101", "101"]);
        assert_eq!(ids(&set), ["101"]);
    }

    #[test]
    fn test_contains_is_exact_not_substring() {
        let set = SelectionSet::from_raw(["123"]);
        assert!(set.contains(&ItemId::canonicalize("123").unwrap()));
        // "12" is a substring of "123" but must not match
        assert!(!set.contains(&ItemId::canonicalize("12").unwrap()));
        assert!(!set.contains(&ItemId::canonicalize("1234").unwrap()));
    }

    #[test]
    fn test_normalize_submission() {
        let submission = SelectionSubmission {
            domain: "shop-a.myshopify.com".to_owned(),
            pages: vec!["1".into(), "2".into(), "2".into(), String::new()],
            products: vec!["101".into()],
        };

        let selection = submission.normalize().unwrap();
        assert_eq!(selection.domain.as_str(), "shop-a.myshopify.com");
        assert_eq!(ids(&selection.pages), ["1", "2"]);
        assert_eq!(ids(&selection.products), ["101"]);
    }

    #[test]
    fn test_normalize_rejects_empty_domain() {
        let submission = SelectionSubmission {
            domain: "  ".to_owned(),
            pages: vec![],
            products: vec![],
        };
        assert!(submission.normalize().is_err());
    }

    #[test]
    fn test_empty_selection() {
        let domain = ShopDomain::parse("shop-a.myshopify.com").unwrap();
        let selection = ShopSelection::empty(domain);
        assert!(selection.pages.is_empty());
        assert!(selection.products.is_empty());
    }

    #[test]
    fn test_set_for() {
        let domain = ShopDomain::parse("shop-a.myshopify.com").unwrap();
        let selection = ShopSelection {
            domain,
            pages: SelectionSet::from_raw(["1"]),
            products: SelectionSet::from_raw(["101"]),
        };

        assert_eq!(ids(selection.set_for(SelectionType::Pages)), ["1"]);
        assert_eq!(ids(selection.set_for(SelectionType::Products)), ["101"]);
    }

    #[test]
    fn test_selection_serializes_with_api_field_names() {
        let domain = ShopDomain::parse("shop-a.myshopify.com").unwrap();
        let selection = ShopSelection {
            domain,
            pages: SelectionSet::from_raw(["1", "2"]),
            products: SelectionSet::from_raw(["101"]),
        };

        let json = serde_json::to_value(&selection).unwrap();
        assert_eq!(json["selectedPages"], serde_json::json!(["1", "2"]));
        assert_eq!(json["selectedProducts"], serde_json::json!(["101"]));
    }
}
