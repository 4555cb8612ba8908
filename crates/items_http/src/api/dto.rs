//! Request and response bodies, one explicit shape per operation.

use items_core::{ImportReport, Item, ItemId};
use serde::{Deserialize, Serialize};

/// Body of `POST /items`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateItemRequest {
    pub name: String,
    pub description: String,
}

/// Body of `PUT /items/{item_id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateItemRequest {
    pub name: String,
    pub description: String,
}

/// One stored item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemResponse {
    pub item_id: ItemId,
    pub name: String,
    pub description: String,
}

impl From<Item> for ItemResponse {
    fn from(item: Item) -> Self {
        Self {
            item_id: item.item_id,
            name: item.name,
            description: item.description,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedItemResponse {
    pub message: String,
    pub item_id: ItemId,
}

impl CreatedItemResponse {
    pub fn new(item_id: ItemId) -> Self {
        Self {
            message: "item created successfully".to_string(),
            item_id,
        }
    }
}

/// Success marker for update/delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportResponse {
    pub message: String,
    pub accepted_count: usize,
}

impl From<ImportReport> for ImportResponse {
    fn from(report: ImportReport) -> Self {
        Self {
            message: format!("{} items inserted successfully", report.accepted),
            accepted_count: report.accepted,
        }
    }
}

/// Body of `GET /`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WelcomeResponse {
    pub message: String,
    pub version: String,
}
