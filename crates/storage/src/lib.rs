//! Storage for generated surface layers.
//!
//! Provides the catalog index: a JSON document (`{"layers": [...]}`) listing
//! every layer produced so far, read by the dashboard to populate its
//! selectors.

pub mod catalog;
pub mod error;

pub use catalog::{Catalog, CatalogIndex};
pub use error::{StorageError, StorageResult};
