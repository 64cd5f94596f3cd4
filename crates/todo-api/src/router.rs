use axum::{
    routing::{get, put},
    Router,
};
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::handlers;
use crate::AppState;

/// リクエスト単位のタイムアウト
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// ルータを構築して返します。
pub fn app(state: AppState) -> Router {
    app_with_timeout(state, DEFAULT_REQUEST_TIMEOUT)
}

pub fn app_with_timeout(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/todo", get(handlers::list_todos).post(handlers::create_todo))
        .route("/todo/", get(handlers::list_todos).post(handlers::create_todo))
        .route(
            "/todo/:id",
            put(handlers::update_todo).delete(handlers::delete_todo),
        )
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
