//! Page classification.
//!
//! A storefront page is classified from two sources: platform-provided page
//! metadata (authoritative, carries the resource id) and the URL path
//! (fallback, carries only the kind). Metadata always wins when present.

use pagetest_core::{ItemId, SelectionType};

/// What kind of storefront page is being viewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    /// A product detail page.
    Product,
    /// A content page.
    Page,
    /// Anything else (home, collection, cart, checkout, ...).
    Other,
}

impl PageKind {
    /// The selection list this kind of page is checked against.
    #[must_use]
    pub const fn selection_type(self) -> Option<SelectionType> {
        match self {
            Self::Product => Some(SelectionType::Products),
            Self::Page => Some(SelectionType::Pages),
            Self::Other => None,
        }
    }
}

/// Page metadata as exposed by the platform on storefront pages.
#[derive(Debug, Clone, Default)]
pub struct PageMeta {
    /// The platform's page type string (e.g. `product`, `page`).
    pub page_type: Option<String>,
    /// The resource id of the page, when the platform exposes one.
    pub resource_id: Option<String>,
}

/// Everything known about the page a visitor is on.
#[derive(Debug, Clone)]
pub struct PageContext {
    /// URL path of the page (e.g. `/products/blue-shirt`).
    pub path: String,
    /// Platform page metadata, if any was present.
    pub meta: PageMeta,
}

impl PageContext {
    /// Classify the page.
    ///
    /// Metadata takes precedence; the URL path is only consulted when no
    /// metadata page type is present. Unknown metadata types fall through to
    /// the path as well, since a platform theme may emit types we have never
    /// seen.
    #[must_use]
    pub fn classify(&self) -> PageKind {
        match self.meta.page_type.as_deref() {
            Some("product") => return PageKind::Product,
            Some("page") => return PageKind::Page,
            _ => {}
        }

        if self.path.starts_with("/products/") {
            PageKind::Product
        } else if self.path.starts_with("/pages/") {
            PageKind::Page
        } else {
            PageKind::Other
        }
    }

    /// The canonical identifier of the viewed resource, if one is known.
    ///
    /// Only metadata carries an id; a path-classified page without metadata
    /// has no usable identifier and can never match a selection.
    #[must_use]
    pub fn resolve_item_id(&self) -> Option<ItemId> {
        ItemId::canonicalize(self.meta.resource_id.as_deref()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(path: &str, page_type: Option<&str>, resource_id: Option<&str>) -> PageContext {
        PageContext {
            path: path.to_owned(),
            meta: PageMeta {
                page_type: page_type.map(ToOwned::to_owned),
                resource_id: resource_id.map(ToOwned::to_owned),
            },
        }
    }

    #[test]
    fn test_classify_prefers_metadata_over_path() {
        // A product rendered under a vanity path is still a product
        let context = ctx("/pages/featured", Some("product"), Some("101"));
        assert_eq!(context.classify(), PageKind::Product);
    }

    #[test]
    fn test_classify_falls_back_to_path() {
        assert_eq!(ctx("/products/shirt", None, None).classify(), PageKind::Product);
        assert_eq!(ctx("/pages/about", None, None).classify(), PageKind::Page);
        assert_eq!(ctx("/collections/all", None, None).classify(), PageKind::Other);
        assert_eq!(ctx("/", None, None).classify(), PageKind::Other);
    }

    #[test]
    fn test_classify_unknown_metadata_type_uses_path() {
        let context = ctx("/pages/about", Some("collection"), None);
        assert_eq!(context.classify(), PageKind::Page);
    }

    #[test]
    fn test_resolve_item_id_canonicalizes_gid() {
        let context = ctx("/products/shirt", Some("product"), Some("gid://shopify/Product/101"));
        let id = context.resolve_item_id().expect("id");
        assert_eq!(id.as_str(), "101");
    }

    #[test]
    fn test_resolve_item_id_missing_metadata() {
        assert!(ctx("/products/shirt", None, None).resolve_item_id().is_none());
    }

    #[test]
    fn test_selection_type_mapping() {
        assert_eq!(PageKind::Product.selection_type(), Some(SelectionType::Products));
        assert_eq!(PageKind::Page.selection_type(), Some(SelectionType::Pages));
        assert_eq!(PageKind::Other.selection_type(), None);
    }
}
