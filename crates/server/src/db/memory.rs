//! In-memory selection store.
//!
//! Implements [`SelectionStore`] over a mutex-guarded map. Backs unit and
//! integration tests, which exercise the sync service and lookup semantics
//! without a running Postgres.

use std::collections::HashMap;
use std::sync::Mutex;

use pagetest_core::{ShopDomain, ShopSelection};

use super::{RepositoryError, SaveKind, SelectionStore};

/// A `SelectionStore` backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<ShopDomain, ShopSelection>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    /// Returns `true` if no records are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// The lock is held only for the map operation, never across an await.
#[allow(clippy::unwrap_used)]
impl SelectionStore for MemoryStore {
    async fn find(&self, domain: &ShopDomain) -> Result<Option<ShopSelection>, RepositoryError> {
        Ok(self.records.lock().unwrap().get(domain).cloned())
    }

    async fn ensure(&self, domain: &ShopDomain) -> Result<bool, RepositoryError> {
        let mut records = self.records.lock().unwrap();
        if records.contains_key(domain) {
            return Ok(false);
        }
        records.insert(domain.clone(), ShopSelection::empty(domain.clone()));
        Ok(true)
    }

    async fn replace(&self, selection: &ShopSelection) -> Result<SaveKind, RepositoryError> {
        let previous = self
            .records
            .lock()
            .unwrap()
            .insert(selection.domain.clone(), selection.clone());

        Ok(if previous.is_some() {
            SaveKind::Updated
        } else {
            SaveKind::Created
        })
    }

    async fn delete(&self, domain: &ShopDomain) -> Result<bool, RepositoryError> {
        Ok(self.records.lock().unwrap().remove(domain).is_some())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pagetest_core::SelectionSet;

    fn domain(s: &str) -> ShopDomain {
        ShopDomain::parse(s).unwrap()
    }

    #[tokio::test]
    async fn test_find_missing_returns_none() {
        let store = MemoryStore::new();
        let found = store.find(&domain("shop-a.myshopify.com")).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_ensure_creates_empty_record_once() {
        let store = MemoryStore::new();
        let d = domain("shop-a.myshopify.com");

        assert!(store.ensure(&d).await.unwrap());
        assert!(!store.ensure(&d).await.unwrap());

        let found = store.find(&d).await.unwrap().unwrap();
        assert!(found.pages.is_empty());
        assert!(found.products.is_empty());
    }

    #[tokio::test]
    async fn test_replace_reports_created_then_updated() {
        let store = MemoryStore::new();
        let d = domain("shop-a.myshopify.com");

        let selection = ShopSelection {
            domain: d.clone(),
            pages: SelectionSet::from_raw(["1"]),
            products: SelectionSet::new(),
        };

        assert_eq!(store.replace(&selection).await.unwrap(), SaveKind::Created);
        assert_eq!(store.replace(&selection).await.unwrap(), SaveKind::Updated);
    }

    #[tokio::test]
    async fn test_delete() {
        let store = MemoryStore::new();
        let d = domain("shop-a.myshopify.com");

        assert!(!store.delete(&d).await.unwrap());
        store.ensure(&d).await.unwrap();
        assert!(store.delete(&d).await.unwrap());
        assert!(store.find(&d).await.unwrap().is_none());
    }
}
