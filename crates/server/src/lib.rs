//! PageTest server - selection sync and public lookup API.
//!
//! This crate backs the embedded merchant app and the storefront snippet:
//!
//! - Merchant routes under `/app` (bearer token): catalog, selection
//!   read/save, uninstall cleanup
//! - Public routes: `/api/selections` lookup and the `/snippet.js` asset,
//!   both unauthenticated and CORS-open
//!
//! # Security
//!
//! This binary only has access to:
//! - The platform Admin API (catalog reads)
//! - The `pagetest` `PostgreSQL` database
//!
//! OAuth and merchant sessions are owned by the embedding host; this server
//! only verifies the shared bearer token on `/app/*` routes.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod shopify;
pub mod state;
