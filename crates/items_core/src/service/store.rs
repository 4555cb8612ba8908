//! Explicit item store handle with scoped connection acquisition.
//!
//! # Responsibility
//! - Hold the database location for the lifetime of a process.
//! - Open one connection per operation and release it on every exit path.
//!
//! # Invariants
//! - No connection outlives the call that acquired it.
//! - The database is bootstrapped (file created, migrations applied) when the
//!   store is opened, so later failures are runtime store failures only.

use crate::db::{open_db, DbResult};
use crate::import::{import_upload, ImportOptions, ImportReport, ImportResult};
use crate::repo::item_repo::{RepoResult, SqliteItemRepository};
use crate::service::item_service::ItemService;
use log::info;
use rusqlite::Connection;
use std::path::{Path, PathBuf};

/// Cloneable handle to a file-backed item database.
#[derive(Debug, Clone)]
pub struct ItemStore {
    db_path: PathBuf,
}

impl ItemStore {
    /// Opens (creating if needed) the database at `db_path` and applies
    /// migrations once.
    pub fn open(db_path: impl Into<PathBuf>) -> DbResult<Self> {
        let db_path = db_path.into();
        drop(open_db(&db_path)?);
        info!(
            "event=store_open module=store status=ok path={}",
            db_path.display()
        );
        Ok(Self { db_path })
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Acquires a fresh, migrated connection owned by the caller.
    pub fn connect(&self) -> DbResult<Connection> {
        open_db(&self.db_path)
    }

    /// Runs `f` against a service bound to a per-call connection.
    ///
    /// The connection is dropped when this returns, whatever `f` returned.
    pub fn with_service<T>(
        &self,
        f: impl FnOnce(&ItemService<SqliteItemRepository<'_>>) -> RepoResult<T>,
    ) -> RepoResult<T> {
        let conn = self.connect()?;
        let repo = SqliteItemRepository::try_new(&conn)?;
        let service = ItemService::new(repo);
        f(&service)
    }

    /// Imports an upload through a per-call connection in one transaction.
    pub fn import(
        &self,
        file_name: &str,
        bytes: &[u8],
        options: &ImportOptions,
    ) -> ImportResult<ImportReport> {
        let mut conn = self.connect()?;
        import_upload(&mut conn, file_name, bytes, options)
    }
}
