//! Business services.

pub mod selections;

pub use selections::{SaveResult, SelectionSyncService};
