//! Item use-case service.
//!
//! # Responsibility
//! - Provide the five CRUD entry points for core callers.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Service APIs never bypass repository persistence contracts.
//! - Service layer remains storage-agnostic.

use crate::model::item::{Item, ItemDraft, ItemId};
use crate::repo::item_repo::{ItemRepository, RepoResult};

/// Use-case service wrapper for item CRUD operations.
pub struct ItemService<R: ItemRepository> {
    repo: R,
}

impl<R: ItemRepository> ItemService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Persists a new item and returns its store-assigned id.
    pub fn create_item(&self, draft: &ItemDraft) -> RepoResult<ItemId> {
        self.repo.create_item(draft)
    }

    /// Gets one item by id; `NotFound` when absent.
    pub fn get_item(&self, id: ItemId) -> RepoResult<Item> {
        self.repo.get_item(id)
    }

    /// Lists all items in creation order.
    pub fn list_items(&self) -> RepoResult<Vec<Item>> {
        self.repo.list_items()
    }

    /// Replaces `name` and `description` of an existing item.
    ///
    /// Returns repository-level not-found errors unchanged.
    pub fn update_item(&self, id: ItemId, draft: &ItemDraft) -> RepoResult<()> {
        self.repo.update_item(id, draft)
    }

    /// Deletes an existing item; a second delete reports `NotFound`.
    pub fn delete_item(&self, id: ItemId) -> RepoResult<()> {
        self.repo.delete_item(id)
    }

    pub fn count_items(&self) -> RepoResult<u64> {
        self.repo.count_items()
    }
}
