//! Todo ドキュメントサービスの HTTP API（axum）
//!
//! `GET /` でホーム画面を返し、`/todo` 配下で一覧・作成・更新・削除を提供します。
//! ストアとレンダラは起動時に一度だけ作り、`AppState` としてルータに注入します。

pub mod error;
pub mod handlers;
pub mod pages;
pub mod router;
pub mod server;

use infrastructure::{DynamoTodoStore, InMemoryTodoStore, StoreError, TimeoutStore, TodoStore};
use shared::Config;
use std::sync::Arc;
use tracing::warn;

pub use error::ApiError;
pub use pages::Pages;
pub use router::{app, app_with_timeout};

/// アプリケーションの共有状態
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TodoStore>,
    pub pages: Arc<Pages>,
}

impl AppState {
    pub fn new(store: Arc<dyn TodoStore>) -> Result<Self, handlebars::TemplateError> {
        Ok(Self {
            store,
            pages: Arc::new(Pages::new()?),
        })
    }
}

/// 接続文字列に応じてストアを用意し、呼び出しごとの期限をかける
pub async fn connect_store(config: &Config) -> Result<Arc<dyn TodoStore>, StoreError> {
    if config.uses_memory_store() {
        warn!("Using in-memory store, data is lost on restart");
        return Ok(Arc::new(TimeoutStore::new(
            InMemoryTodoStore::new(),
            config.store_timeout,
        )));
    }

    let store = DynamoTodoStore::connect(config).await?;
    Ok(Arc::new(TimeoutStore::new(store, config.store_timeout)))
}
