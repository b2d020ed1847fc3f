//! Database operations for the PageTest `PostgreSQL` store.
//!
//! # Tables
//!
//! - `shop_selection` - one row per shop domain holding the two identifier
//!   sets (`TEXT[]` columns, whole-record replacement semantics)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p pagetest-cli -- migrate
//! ```
//! They are never run automatically on startup.

mod memory;
mod shops;

pub use memory::MemoryStore;
pub use shops::ShopRepository;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use pagetest_core::{ShopDomain, ShopSelection};

/// Error type for repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Whether a replace created the record or updated an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveKind {
    /// No record existed for the domain before this save.
    Created,
    /// An existing record was replaced.
    Updated,
}

/// Persistence interface for per-shop selection records.
///
/// The store is keyed by shop domain and only ever needs whole-record
/// semantics: a save replaces both identifier sets atomically, never merges.
/// The production implementation is [`ShopRepository`] (Postgres); tests use
/// [`MemoryStore`]. The host process constructs one store and passes it by
/// reference to the sync service and the lookup path.
pub trait SelectionStore {
    /// Look up the selection record for a domain.
    fn find(
        &self,
        domain: &ShopDomain,
    ) -> impl Future<Output = Result<Option<ShopSelection>, RepositoryError>> + Send;

    /// Create an empty record for a domain if none exists.
    ///
    /// Returns `true` if a record was created.
    fn ensure(
        &self,
        domain: &ShopDomain,
    ) -> impl Future<Output = Result<bool, RepositoryError>> + Send;

    /// Replace the record for a domain wholesale (create it if missing).
    ///
    /// Selecting zero items for a category clears that category; concurrent
    /// replaces for the same domain are last-write-wins.
    fn replace(
        &self,
        selection: &ShopSelection,
    ) -> impl Future<Output = Result<SaveKind, RepositoryError>> + Send;

    /// Delete the record for a domain.
    ///
    /// Returns `true` if a record existed. Used for best-effort uninstall
    /// cleanup; readers must tolerate records this never reached.
    fn delete(
        &self,
        domain: &ShopDomain,
    ) -> impl Future<Output = Result<bool, RepositoryError>> + Send;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
