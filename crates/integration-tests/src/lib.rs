//! Integration tests for PageTest.
//!
//! These tests exercise whole flows across crate boundaries: the sync
//! service over a store, and the snippet decision logic against the
//! selections that service persists. They run without a Postgres or a live
//! server - the in-memory store stands in for the database.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p pagetest-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `selection_flow` - save/lookup/install/uninstall flows
//! - `snippet_decision` - page classification and script activation
