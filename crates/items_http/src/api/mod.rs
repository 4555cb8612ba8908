//! Router and shared state.

pub mod dto;
pub mod error;
pub mod handlers;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use items_core::{ImportOptions, ItemStore};

pub use error::{ApiError, ApiErrorResponse};

/// State shared by every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: ItemStore,
    pub import_options: ImportOptions,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(store: ItemStore, import_options: ImportOptions, max_upload_bytes: usize) -> Self {
        Self {
            store,
            import_options,
            max_upload_bytes,
        }
    }
}

/// Builds the application router.
pub fn build_router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.max_upload_bytes);

    Router::new()
        .route("/", get(handlers::welcome))
        .route("/upload_csv", post(handlers::upload_csv))
        .route("/get/{item_id}", get(handlers::get_item))
        .route(
            "/items",
            get(handlers::list_items).post(handlers::create_item),
        )
        .route(
            "/items/{item_id}",
            get(handlers::get_item)
                .put(handlers::update_item)
                .delete(handlers::delete_item),
        )
        .layer(body_limit)
        .with_state(state)
}
