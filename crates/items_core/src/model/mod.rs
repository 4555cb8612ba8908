//! Domain model for the item store.
//!
//! # Responsibility
//! - Define the data structures shared by the store, the import pipeline and
//!   transport adapters.
//!
//! # Invariants
//! - Every persisted item has non-empty trimmed `name` and `description`.
//! - `ItemId` values are assigned by the store and never supplied by callers
//!   on create.

pub mod item;
