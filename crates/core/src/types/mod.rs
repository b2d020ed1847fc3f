//! Shared domain types.

mod domain;
mod item;

pub use domain::{DomainError, ShopDomain};
pub use item::{CatalogItem, InvalidSelectionType, ItemId, SelectionType};
