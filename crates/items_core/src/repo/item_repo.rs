//! Item repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over the `items` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths only accept `ItemDraft`, so persisted rows are already
//!   trimmed and non-empty.
//! - Read paths reject invalid persisted rows instead of masking them.
//! - Each operation is a single SQL statement.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::item::{Item, ItemDraft, ItemId};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const ITEM_SELECT_SQL: &str = "SELECT
    item_id,
    name,
    description
FROM items";

const REQUIRED_COLUMNS: [&str; 3] = ["item_id", "name", "description"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for item persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// No row has the requested id.
    NotFound(ItemId),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Persisted state cannot be converted to a valid `Item`.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "item not found: {id}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "item repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "item repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "item repository requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted item data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound(_)
            | Self::UninitializedConnection { .. }
            | Self::MissingRequiredTable(_)
            | Self::MissingRequiredColumn { .. }
            | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for item CRUD operations.
pub trait ItemRepository {
    /// Persists one new row and returns the store-assigned id.
    fn create_item(&self, draft: &ItemDraft) -> RepoResult<ItemId>;
    /// Loads one item, failing with `NotFound` when absent.
    fn get_item(&self, id: ItemId) -> RepoResult<Item>;
    /// Lists every item ordered by ascending id.
    fn list_items(&self) -> RepoResult<Vec<Item>>;
    /// Overwrites `name` and `description` of an existing row.
    fn update_item(&self, id: ItemId, draft: &ItemDraft) -> RepoResult<()>;
    /// Removes an existing row.
    fn delete_item(&self, id: ItemId) -> RepoResult<()>;
    /// Returns the number of stored rows.
    fn count_items(&self) -> RepoResult<u64>;
}

/// SQLite-backed item repository.
pub struct SqliteItemRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteItemRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    ///
    /// Accepts a plain connection or a `Transaction` (via deref).
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_item_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl ItemRepository for SqliteItemRepository<'_> {
    fn create_item(&self, draft: &ItemDraft) -> RepoResult<ItemId> {
        self.conn.execute(
            "INSERT INTO items (name, description) VALUES (?1, ?2);",
            params![draft.name(), draft.description()],
        )?;

        Ok(ItemId(self.conn.last_insert_rowid()))
    }

    fn get_item(&self, id: ItemId) -> RepoResult<Item> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ITEM_SELECT_SQL} WHERE item_id = ?1;"))?;

        let mut rows = stmt.query([id.get()])?;
        match rows.next()? {
            Some(row) => parse_item_row(row),
            None => Err(RepoError::NotFound(id)),
        }
    }

    fn list_items(&self) -> RepoResult<Vec<Item>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ITEM_SELECT_SQL} ORDER BY item_id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut items = Vec::new();

        while let Some(row) = rows.next()? {
            items.push(parse_item_row(row)?);
        }

        Ok(items)
    }

    fn update_item(&self, id: ItemId, draft: &ItemDraft) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE items
             SET
                name = ?1,
                description = ?2
             WHERE item_id = ?3;",
            params![draft.name(), draft.description(), id.get()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn delete_item(&self, id: ItemId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM items WHERE item_id = ?1;", [id.get()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn count_items(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM items;", [], |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative row count `{count}`")))
    }
}

fn parse_item_row(row: &Row<'_>) -> RepoResult<Item> {
    let item = Item {
        item_id: ItemId(row.get("item_id")?),
        name: row.get("name")?,
        description: row.get("description")?,
    };
    item.validate().map_err(|err| {
        RepoError::InvalidData(format!("item {} violates invariant: {err}", item.item_id))
    })?;
    Ok(item)
}

fn ensure_item_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "items")? {
        return Err(RepoError::MissingRequiredTable("items"));
    }

    for column in REQUIRED_COLUMNS {
        if !table_has_column(conn, "items", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "items",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
