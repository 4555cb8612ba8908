//! HTTP transport adapter for the items service.
//!
//! Routes map one-to-one onto `items_core` operations; every store call runs
//! on the blocking pool with its own scoped connection.

pub mod api;
pub mod config;

pub use api::{build_router, AppState};
pub use config::{ConfigError, ServerConfig};
