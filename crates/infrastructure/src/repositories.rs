use async_trait::async_trait;
use domain::{NewTodo, TodoChanges, TodoId, TodoRecord};
use std::time::Duration;
use thiserror::Error;

/// ストア操作のエラー（接続・タイムアウト・書き込み・デコード）
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("store call timed out after {0:?}")]
    Timeout(Duration),

    #[error("DynamoDB error: {0}")]
    DynamoDb(String),

    #[error("Failed to decode document: {0}")]
    Decode(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Todo コレクションに対するストア操作
///
/// 実装はリクエストごとに並行に呼ばれるため `Send + Sync` であること。
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// コレクション内の全件を返す（順序保証なし）
    async fn find_all(&self) -> StoreResult<Vec<TodoRecord>>;

    /// 新しいIDを採番して保存し、そのIDを返す
    async fn insert(&self, todo: NewTodo) -> StoreResult<TodoId>;

    /// 削除件数を返す。存在しなければ 0
    async fn delete_by_id(&self, id: &TodoId) -> StoreResult<u64>;

    /// title / completed を更新し、一致した件数を返す。存在しなければ 0 で、新規作成はしない
    async fn update_by_id(&self, id: &TodoId, changes: &TodoChanges) -> StoreResult<u64>;
}
