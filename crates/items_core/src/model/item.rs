//! Item domain model.
//!
//! # Responsibility
//! - Define the persisted `Item` read model and its store-assigned `ItemId`.
//! - Provide `ItemDraft`, the only accepted input shape for create/update.
//!
//! # Invariants
//! - An `ItemDraft` always holds trimmed, non-empty `name` and `description`.
//! - `item_id` is immutable once assigned.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned item identifier.
///
/// Values come from the `items.item_id` autoincrement column and are never
/// reused after deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub i64);

impl ItemId {
    pub fn get(self) -> i64 {
        self.0
    }
}

impl Display for ItemId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Persisted item as returned by read paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub item_id: ItemId,
    pub name: String,
    pub description: String,
}

/// Validation failures for item drafts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemValidationError {
    EmptyName,
    EmptyDescription,
}

impl ItemValidationError {
    /// Name of the offending field, as used in request bodies.
    pub fn field(self) -> &'static str {
        match self {
            Self::EmptyName => "name",
            Self::EmptyDescription => "description",
        }
    }
}

impl Display for ItemValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} must not be empty", self.field())
    }
}

impl Error for ItemValidationError {}

/// Validated `name`/`description` pair ready for persistence.
///
/// Fields are private so a draft can only be built through [`ItemDraft::new`],
/// which is why the store does not validate again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDraft {
    name: String,
    description: String,
}

impl ItemDraft {
    /// Trims both fields and rejects empty results.
    ///
    /// `name` is checked before `description`.
    pub fn new(name: &str, description: &str) -> Result<Self, ItemValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ItemValidationError::EmptyName);
        }
        let description = description.trim();
        if description.is_empty() {
            return Err(ItemValidationError::EmptyDescription);
        }

        Ok(Self {
            name: name.to_string(),
            description: description.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl Item {
    /// Checks the persisted-item invariant on data read back from storage.
    pub fn validate(&self) -> Result<(), ItemValidationError> {
        if self.name.trim().is_empty() {
            return Err(ItemValidationError::EmptyName);
        }
        if self.description.trim().is_empty() {
            return Err(ItemValidationError::EmptyDescription);
        }
        Ok(())
    }
}
