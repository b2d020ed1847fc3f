//! Selection sync service.
//!
//! Reconciles a merchant's submitted selection against the persisted record:
//! validates the domain, normalizes the identifier lists, and replaces the
//! stored record wholesale. This is the one write path for selections; the
//! public lookup endpoint and the admin read both go through the read side.
//!
//! Saves never surface internal errors to the caller - failures are logged
//! in full server-side and reported as a generic failure message.

use serde::Serialize;
use tracing::instrument;

use pagetest_core::{SelectionSet, SelectionSubmission, SelectionType, ShopDomain, ShopSelection};

use crate::db::{RepositoryError, SaveKind, SelectionStore};

/// Outcome of a save, as reported to the merchant.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SaveResult {
    /// Whether the selection was persisted.
    pub success: bool,
    /// Human-readable status, distinguishing "created" from "updated".
    pub message: String,
}

impl SaveResult {
    fn failure(message: &str) -> Self {
        Self {
            success: false,
            message: message.to_owned(),
        }
    }
}

/// Service that owns selection reads and writes over an injected store.
pub struct SelectionSyncService<S> {
    store: S,
}

impl<S: SelectionStore> SelectionSyncService<S> {
    /// Create a new sync service over the given store.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Persist a merchant's submission, replacing any prior selection.
    ///
    /// Both sets are replaced wholesale - submitting zero items for a
    /// category clears that category. Identifiers are not checked against
    /// the live catalog (it may have changed since the UI snapshot), and
    /// concurrent saves for the same domain are last-write-wins.
    #[instrument(skip(self, submission), fields(domain = %submission.domain))]
    pub async fn save(&self, submission: SelectionSubmission) -> SaveResult {
        let selection = match submission.normalize() {
            Ok(selection) => selection,
            Err(e) => {
                tracing::warn!(error = %e, "Rejected selection save");
                return SaveResult::failure("Invalid shop domain.");
            }
        };

        match self.store.replace(&selection).await {
            Ok(kind) => {
                let verb = match kind {
                    SaveKind::Created => "created",
                    SaveKind::Updated => "updated",
                };
                tracing::info!(
                    pages = selection.pages.len(),
                    products = selection.products.len(),
                    verb,
                    "Saved selections"
                );
                SaveResult {
                    success: true,
                    message: format!("Selections {verb} for {}.", selection.domain),
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to persist selections");
                SaveResult::failure("Failed to save selections. Please try again.")
            }
        }
    }

    /// The selected identifiers of one type for a domain.
    ///
    /// A domain with no record reads as an empty selection - the storefront
    /// must never be blocked by a missing record.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store itself fails.
    pub async fn selections_for(
        &self,
        domain: &ShopDomain,
        selection_type: SelectionType,
    ) -> Result<SelectionSet, RepositoryError> {
        let record = self.store.find(domain).await?;
        Ok(record
            .map(|r| r.set_for(selection_type).clone())
            .unwrap_or_default())
    }

    /// The full selection record for a domain, if one exists.
    ///
    /// Administrative callers use this to distinguish "never installed"
    /// (`None`) from "installed, nothing selected".
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store itself fails.
    pub async fn record(
        &self,
        domain: &ShopDomain,
    ) -> Result<Option<ShopSelection>, RepositoryError> {
        self.store.find(domain).await
    }

    /// Create an empty record on first authenticated access.
    ///
    /// Returns `true` if this was the first access (record created).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store itself fails.
    #[instrument(skip(self))]
    pub async fn install(&self, domain: &ShopDomain) -> Result<bool, RepositoryError> {
        let created = self.store.ensure(domain).await?;
        if created {
            tracing::info!(%domain, "Created shop record");
        }
        Ok(created)
    }

    /// Best-effort uninstall cleanup.
    ///
    /// Failures are logged and swallowed; orphaned records are tolerated by
    /// every reader, so cleanup is allowed to miss.
    #[instrument(skip(self))]
    pub async fn uninstall(&self, domain: &ShopDomain) {
        match self.store.delete(domain).await {
            Ok(true) => tracing::info!(%domain, "Deleted shop record on uninstall"),
            Ok(false) => tracing::debug!(%domain, "No shop record to delete on uninstall"),
            Err(e) => tracing::warn!(%domain, error = %e, "Uninstall cleanup failed"),
        }
    }
}
