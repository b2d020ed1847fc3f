//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;

use pagetest_core::{SelectionType, ShopDomain};

use crate::config::ServerConfig;
use crate::shopify::AdminClient;

/// How long a public lookup response may be served from the in-process
/// cache. This is the worst-case staleness a storefront can observe after a
/// merchant saves (intermediaries are told `no-store`, so this is the only
/// caching layer).
const LOOKUP_CACHE_TTL: Duration = Duration::from_secs(60);

/// Maximum number of `(domain, type)` entries held in the lookup cache.
const LOOKUP_CACHE_CAPACITY: u64 = 10_000;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to shared
/// resources like the database pool and configuration. The pool is the
/// process-wide store handle: constructed once at startup and passed by
/// reference into per-request repositories, never a hidden global.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    pool: PgPool,
    admin: AdminClient,
    lookup_cache: Cache<(ShopDomain, SelectionType), Vec<String>>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: ServerConfig, pool: PgPool) -> Self {
        let admin = AdminClient::new(&config.shopify);
        let lookup_cache = Cache::builder()
            .max_capacity(LOOKUP_CACHE_CAPACITY)
            .time_to_live(LOOKUP_CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                admin,
                lookup_cache,
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the Shopify Admin API client.
    #[must_use]
    pub fn admin(&self) -> &AdminClient {
        &self.inner.admin
    }

    /// Get a reference to the public lookup response cache.
    #[must_use]
    pub fn lookup_cache(&self) -> &Cache<(ShopDomain, SelectionType), Vec<String>> {
        &self.inner.lookup_cache
    }

    /// Drop any cached lookup responses for a domain.
    ///
    /// Called after a save so storefronts observe the new selection within
    /// one request rather than one cache TTL.
    pub async fn invalidate_lookups(&self, domain: &ShopDomain) {
        self.inner
            .lookup_cache
            .invalidate(&(domain.clone(), SelectionType::Pages))
            .await;
        self.inner
            .lookup_cache
            .invalidate(&(domain.clone(), SelectionType::Products))
            .await;
    }
}
