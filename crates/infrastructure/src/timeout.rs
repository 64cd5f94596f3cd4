use async_trait::async_trait;
use domain::{NewTodo, TodoChanges, TodoId, TodoRecord};
use std::future::Future;
use std::time::Duration;
use tracing::warn;

use crate::{StoreError, StoreResult, TodoStore};

/// 各ストア呼び出しに個別の期限をかけるラッパー。期限切れはリトライせずエラーにする
pub struct TimeoutStore<S> {
    inner: S,
    limit: Duration,
}

impl<S: TodoStore> TimeoutStore<S> {
    pub fn new(inner: S, limit: Duration) -> Self {
        Self { inner, limit }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    async fn bounded<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = StoreResult<T>>,
    ) -> StoreResult<T> {
        match tokio::time::timeout(self.limit, call).await {
            Ok(result) => result,
            Err(_) => {
                warn!(operation, limit_ms = self.limit.as_millis() as u64, "Store call timed out");
                Err(StoreError::Timeout(self.limit))
            }
        }
    }
}

#[async_trait]
impl<S: TodoStore> TodoStore for TimeoutStore<S> {
    async fn find_all(&self) -> StoreResult<Vec<TodoRecord>> {
        self.bounded("find_all", self.inner.find_all()).await
    }

    async fn insert(&self, todo: NewTodo) -> StoreResult<TodoId> {
        self.bounded("insert", self.inner.insert(todo)).await
    }

    async fn delete_by_id(&self, id: &TodoId) -> StoreResult<u64> {
        self.bounded("delete_by_id", self.inner.delete_by_id(id)).await
    }

    async fn update_by_id(&self, id: &TodoId, changes: &TodoChanges) -> StoreResult<u64> {
        self.bounded("update_by_id", self.inner.update_by_id(id, changes))
            .await
    }
}
