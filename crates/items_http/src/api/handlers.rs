//! Route handlers.
//!
//! Each handler validates its input, then runs exactly one core operation on
//! the blocking pool through [`run_store`].

use super::dto::{
    CreateItemRequest, CreatedItemResponse, ImportResponse, ItemResponse, MessageResponse,
    UpdateItemRequest, WelcomeResponse,
};
use super::error::{ApiErrorResponse, Classified};
use super::AppState;
use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Multipart, Path, State};
use axum::Json;
use items_core::{core_version, ItemDraft, ItemId, ItemStore};
use log::{error, info};

/// Multipart field carrying the uploaded file.
pub const UPLOAD_FIELD: &str = "file";

/// `GET /`
pub async fn welcome() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: "welcome to CRUD API".to_string(),
        version: core_version().to_string(),
    })
}

/// `POST /upload_csv`
pub async fn upload_csv(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ImportResponse>, ApiErrorResponse> {
    let mut multipart = multipart?;
    let mut upload = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await?;
        upload = Some((file_name, bytes));
        break;
    }

    let Some((file_name, bytes)) = upload else {
        return Err(ApiErrorResponse::bad_request(format!(
            "multipart field `{UPLOAD_FIELD}` is required"
        )));
    };

    let options = state.import_options.clone();
    let report = run_store(&state, "upload_csv", move |store| {
        store.import(&file_name, &bytes, &options)
    })
    .await?;

    info!(
        "event=http_request module=http op=upload_csv status=ok accepted={}",
        report.accepted
    );
    Ok(Json(report.into()))
}

/// `GET /get/{item_id}` and `GET /items/{item_id}`
pub async fn get_item(
    State(state): State<AppState>,
    item_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<ItemResponse>, ApiErrorResponse> {
    let Path(item_id) = item_id?;
    let id = ItemId(item_id);
    let item = run_store(&state, "get_item", move |store| {
        store.with_service(|service| service.get_item(id))
    })
    .await?;
    Ok(Json(item.into()))
}

/// `GET /items`
pub async fn list_items(
    State(state): State<AppState>,
) -> Result<Json<Vec<ItemResponse>>, ApiErrorResponse> {
    let items = run_store(&state, "list_items", |store| {
        store.with_service(|service| service.list_items())
    })
    .await?;
    Ok(Json(items.into_iter().map(ItemResponse::from).collect()))
}

/// `POST /items`
pub async fn create_item(
    State(state): State<AppState>,
    payload: Result<Json<CreateItemRequest>, JsonRejection>,
) -> Result<Json<CreatedItemResponse>, ApiErrorResponse> {
    let Json(request) = payload?;
    let draft = ItemDraft::new(&request.name, &request.description)?;

    let item_id = run_store(&state, "create_item", move |store| {
        store.with_service(|service| service.create_item(&draft))
    })
    .await?;

    info!(
        "event=http_request module=http op=create_item status=ok item_id={}",
        item_id
    );
    Ok(Json(CreatedItemResponse::new(item_id)))
}

/// `PUT /items/{item_id}`
pub async fn update_item(
    State(state): State<AppState>,
    item_id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateItemRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiErrorResponse> {
    let Path(item_id) = item_id?;
    let Json(request) = payload?;
    let draft = ItemDraft::new(&request.name, &request.description)?;
    let id = ItemId(item_id);

    run_store(&state, "update_item", move |store| {
        store.with_service(|service| service.update_item(id, &draft))
    })
    .await?;

    Ok(Json(MessageResponse::new("item updated successfully")))
}

/// `DELETE /items/{item_id}`
pub async fn delete_item(
    State(state): State<AppState>,
    item_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, ApiErrorResponse> {
    let Path(item_id) = item_id?;
    let id = ItemId(item_id);
    run_store(&state, "delete_item", move |store| {
        store.with_service(|service| service.delete_item(id))
    })
    .await?;

    Ok(Json(MessageResponse::new("item deleted successfully")))
}

/// Runs a synchronous store operation on the blocking pool.
///
/// The closure owns a clone of the store handle; any connection it opens is
/// released before the task finishes.
pub async fn run_store<T, E, F>(
    state: &AppState,
    op: &'static str,
    f: F,
) -> Result<T, ApiErrorResponse>
where
    F: FnOnce(&ItemStore) -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Classified + Send + 'static,
{
    let store = state.store.clone();
    let joined = tokio::task::spawn_blocking(move || f(&store)).await;

    match joined {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(ApiErrorResponse::from_core(op, err.kind(), &err)),
        Err(join_err) => {
            error!(
                "event=http_request module=http op={} status=error error_code=task_failed error={}",
                op, join_err
            );
            Err(ApiErrorResponse::internal_error())
        }
    }
}
