//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Own scoped connection acquisition for transport adapters.

pub mod item_service;
pub mod store;
