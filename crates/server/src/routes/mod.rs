//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (verifies database)
//!
//! # Public (unauthenticated, permissive CORS)
//! GET  /api/selections         - Selection lookup for storefronts
//! GET  /snippet.js             - Storefront decision snippet asset
//!
//! # Merchant app (bearer token; host owns the OAuth session)
//! GET  /app/catalog            - Full page/product catalog for the UI
//! GET  /app/selections         - Full selection record (404 if never installed)
//! POST /app/selections         - Save (replace) the selection
//! POST /app/uninstalled        - Best-effort uninstall cleanup
//! ```

pub mod api;
pub mod app;
pub mod snippet;

use axum::Router;

use crate::state::AppState;

/// Create all routes for the server.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api", api::router())
        .merge(snippet::router())
        .nest("/app", app::router())
}
