use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde::Serialize;

use crate::aggregate;
use crate::models::*;
use crate::store::{Backend, SessionId, StoreError};

type ApiResult<T> = Result<T, (StatusCode, String)>;

/// Confirmation text for mutations that have no record to return.
#[derive(Debug, Serialize)]
pub struct Notice {
    pub message: &'static str,
}

fn notice(message: &'static str) -> Json<Notice> {
    Json(Notice { message })
}

/// A record returned together with its confirmation text.
#[derive(Debug, Serialize)]
pub struct WithNotice<T> {
    pub message: &'static str,
    #[serde(flatten)]
    pub record: T,
}

fn with_notice<T>(message: &'static str, record: T) -> Json<WithNotice<T>> {
    Json(WithNotice { message, record })
}

fn open_todos_first(mut list: TodoList) -> TodoList {
    list.todos = aggregate::sort_todos(list.todos);
    list
}

// ============================================================
// Error Handling
// ============================================================

/// Map a store failure to a response.
///
/// Validation and not-found errors carry a message meant for the user.
/// Storage failures are logged in full server-side while the client only
/// sees a generic message.
fn store_error(e: StoreError) -> (StatusCode, String) {
    match e {
        StoreError::Validation(e) => {
            tracing::warn!("Validation error: {}", e);
            (StatusCode::BAD_REQUEST, e.to_string())
        }
        StoreError::ListNotFound(id) => {
            tracing::warn!("List {} not found", id);
            (
                StatusCode::NOT_FOUND,
                "The specified list was not found".to_string(),
            )
        }
        StoreError::TodoNotFound { list_id, todo_id } => {
            tracing::warn!("Todo {} not found on list {}", todo_id, list_id);
            (
                StatusCode::NOT_FOUND,
                "The specified todo was not found".to_string(),
            )
        }
        StoreError::Storage(e) => {
            tracing::error!("Internal error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        }
    }
}

// ============================================================
// Health
// ============================================================

pub async fn health(State(backend): State<Backend>) -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok", "storage": backend.mode_name() }))
}

// ============================================================
// Lists
// ============================================================

pub async fn list_lists(
    State(backend): State<Backend>,
    Extension(session): Extension<SessionId>,
) -> ApiResult<Json<Vec<ListSummary>>> {
    backend
        .with_store(session, |store| store.list_all())
        .map(aggregate::sort_lists)
        .map(Json)
        .map_err(store_error)
}

pub async fn get_list(
    State(backend): State<Backend>,
    Extension(session): Extension<SessionId>,
    Path(id): Path<i64>,
) -> ApiResult<Json<TodoList>> {
    backend
        .with_store(session, |store| store.get_list(id))
        .map(open_todos_first)
        .map(Json)
        .map_err(store_error)
}

pub async fn create_list(
    State(backend): State<Backend>,
    Extension(session): Extension<SessionId>,
    Json(input): Json<CreateListInput>,
) -> ApiResult<(StatusCode, Json<WithNotice<ListSummary>>)> {
    let name = input.name.trim();
    let list = backend
        .with_store(session, |store| store.add_list(name))
        .map_err(store_error)?;

    tracing::info!(list_id = list.id, "List created");
    Ok((
        StatusCode::CREATED,
        with_notice("The list has been created!", list),
    ))
}

pub async fn rename_list(
    State(backend): State<Backend>,
    Extension(session): Extension<SessionId>,
    Path(id): Path<i64>,
    Json(input): Json<UpdateListInput>,
) -> ApiResult<Json<WithNotice<TodoList>>> {
    let name = input.name.trim();
    backend
        .with_store(session, |store| {
            store.update_list_name(id, name)?;
            store.get_list(id)
        })
        .map(|list| with_notice("The list has been updated!", open_todos_first(list)))
        .map_err(store_error)
}

pub async fn delete_list(
    State(backend): State<Backend>,
    Extension(session): Extension<SessionId>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Notice>> {
    backend
        .with_store(session, |store| store.delete_list(id))
        .map_err(store_error)?;
    Ok(notice("The list has been deleted."))
}

pub async fn complete_all(
    State(backend): State<Backend>,
    Extension(session): Extension<SessionId>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Notice>> {
    backend
        .with_store(session, |store| store.complete_all_todos(id))
        .map_err(store_error)?;
    Ok(notice("All todo items have been completed!"))
}

// ============================================================
// Todos
// ============================================================

pub async fn create_todo(
    State(backend): State<Backend>,
    Extension(session): Extension<SessionId>,
    Path(list_id): Path<i64>,
    Json(input): Json<CreateTodoInput>,
) -> ApiResult<(StatusCode, Json<WithNotice<Todo>>)> {
    let text = input.name.trim();
    backend
        .with_store(session, |store| store.add_todo(list_id, text))
        .map(|todo| (StatusCode::CREATED, with_notice("The todo was added!", todo)))
        .map_err(store_error)
}

pub async fn toggle_todo(
    State(backend): State<Backend>,
    Extension(session): Extension<SessionId>,
    Path((list_id, todo_id)): Path<(i64, i64)>,
    Json(input): Json<ToggleTodoInput>,
) -> ApiResult<Json<Notice>> {
    backend
        .with_store(session, |store| {
            store.toggle_todo(list_id, todo_id, input.completed)
        })
        .map_err(store_error)?;
    Ok(notice("The todo item has been updated"))
}

pub async fn delete_todo(
    State(backend): State<Backend>,
    Extension(session): Extension<SessionId>,
    Path((list_id, todo_id)): Path<(i64, i64)>,
) -> ApiResult<Json<Notice>> {
    backend
        .with_store(session, |store| store.delete_todo(list_id, todo_id))
        .map_err(store_error)?;
    Ok(notice("The todo item has been deleted!"))
}
