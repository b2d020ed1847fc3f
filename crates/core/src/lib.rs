//! PageTest Core - Shared types library.
//!
//! This crate provides common types used across all PageTest components:
//! - `server` - Embedded-app backend (save + public lookup API)
//! - `snippet` - Storefront decision client
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no database
//! access, no HTTP clients. This keeps it lightweight and allows it to be
//! used anywhere, including the storefront-side snippet crate.
//!
//! # Modules
//!
//! - [`types`] - Shop domains, canonical item identifiers, catalog items
//! - [`selection`] - Selection sets and submission normalization

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod selection;
pub mod types;

pub use selection::*;
pub use types::*;
