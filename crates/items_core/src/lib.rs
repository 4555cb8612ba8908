//! Core domain logic for the items service.
//! This crate owns the item invariants, the SQLite record store and the
//! bulk CSV import pipeline; transport adapters stay thin on top of it.

pub mod db;
pub mod error;
pub mod import;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use error::ErrorKind;
pub use import::{ImportError, ImportOptions, ImportReport, ImportResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::item::{Item, ItemDraft, ItemId, ItemValidationError};
pub use repo::item_repo::{ItemRepository, RepoError, RepoResult, SqliteItemRepository};
pub use service::item_service::ItemService;
pub use service::store::ItemStore;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
