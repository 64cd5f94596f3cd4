//! `/` と `/todo` 配下のハンドラ
//!
//! どのハンドラも状態を持たず、ストアとレンダラは `AppState` から受け取る。
//! ID の形式チェックはストア呼び出しより先に行う。

use axum::{
    body::Bytes,
    extract::{Path, State},
    response::Html,
    Json,
};
use chrono::{DateTime, Utc};
use domain::{NewTodo, TodoChanges, TodoId, TodoView};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ApiError;
use crate::AppState;

/// POST / PUT のリクエストボディ。`TodoView` と同じ形で読み、型が合わなければ 400
///
/// `id` と `create_at` は型だけ検査して値は使わない。`null` は未指定と同じ扱い。
/// 未知のフィールドは無視する。
#[derive(Debug, Default, Deserialize)]
pub struct TodoPayload {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
    #[serde(default, rename = "create_at")]
    pub created_at: Option<DateTime<Utc>>,
}

/// GET /todo レスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct TodoListResponse {
    pub data: Vec<TodoView>,
}

/// POST /todo レスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub message: String,
    #[serde(rename = "Todo ID")]
    pub todo_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: &str) -> Json<Self> {
        Json(Self {
            message: message.to_string(),
        })
    }
}

/// Content-Type に関係なくボディを JSON として読む
fn decode_payload(body: &Bytes) -> Result<TodoPayload, ApiError> {
    serde_json::from_slice(body).map_err(|_| ApiError::InvalidPayload)
}

pub async fn home(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    state.pages.home().map(Html)
}

pub async fn list_todos(State(state): State<AppState>) -> Result<Json<TodoListResponse>, ApiError> {
    let records = state
        .store
        .find_all()
        .await
        .map_err(ApiError::store("Failed to fetch todo"))?;

    let data = records.into_iter().map(TodoView::from).collect();
    Ok(Json(TodoListResponse { data }))
}

pub async fn create_todo(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<CreatedResponse>, ApiError> {
    let payload = decode_payload(&body)?;
    // completed は入力に関係なく false で作成する
    let todo = NewTodo::new(payload.title.unwrap_or_default())?;

    let id = state
        .store
        .insert(todo)
        .await
        .map_err(ApiError::store("Failed to save todo"))?;

    info!(todo_id = %id, "Todo created");
    Ok(Json(CreatedResponse {
        message: "Todo successfully saved".to_string(),
        todo_id: id.to_string(),
    }))
}

pub async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = TodoId::parse(&id)?;
    let payload = decode_payload(&body)?;
    let changes = TodoChanges::new(
        payload.title.unwrap_or_default(),
        payload.completed.unwrap_or(false),
    )?;

    let matched = state
        .store
        .update_by_id(&id, &changes)
        .await
        .map_err(ApiError::store("Failed to update todo"))?;

    if matched == 0 {
        return Err(ApiError::NotFound);
    }

    info!(todo_id = %id, completed = changes.completed, "Todo updated");
    Ok(MessageResponse::new("Successfully updated TODO"))
}

pub async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = TodoId::parse(&id)?;

    let deleted = state
        .store
        .delete_by_id(&id)
        .await
        .map_err(ApiError::store("Failed to delete TODO"))?;

    if deleted == 0 {
        return Err(ApiError::NotFound);
    }

    info!(todo_id = %id, "Todo deleted");
    Ok(MessageResponse::new("Successfully deleted TODO"))
}
