use async_trait::async_trait;
use domain::{NewTodo, TodoChanges, TodoId, TodoRecord};
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::{StoreResult, TodoStore};

/// プロセス内で完結するストア（ローカル開発・テスト用）
#[derive(Default)]
pub struct InMemoryTodoStore {
    todos: RwLock<HashMap<TodoId, TodoRecord>>,
}

impl InMemoryTodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.todos.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.todos.read().await.is_empty()
    }

    pub async fn get(&self, id: &TodoId) -> Option<TodoRecord> {
        self.todos.read().await.get(id).cloned()
    }
}

#[async_trait]
impl TodoStore for InMemoryTodoStore {
    async fn find_all(&self) -> StoreResult<Vec<TodoRecord>> {
        Ok(self.todos.read().await.values().cloned().collect())
    }

    async fn insert(&self, todo: NewTodo) -> StoreResult<TodoId> {
        let mut todos = self.todos.write().await;
        let mut id = TodoId::new();
        while todos.contains_key(&id) {
            id = TodoId::new();
        }
        todos.insert(id, todo.into_record(id));
        Ok(id)
    }

    async fn delete_by_id(&self, id: &TodoId) -> StoreResult<u64> {
        Ok(self.todos.write().await.remove(id).map_or(0, |_| 1))
    }

    async fn update_by_id(&self, id: &TodoId, changes: &TodoChanges) -> StoreResult<u64> {
        match self.todos.write().await.get_mut(id) {
            Some(record) => {
                record.apply(changes);
                Ok(1)
            }
            None => Ok(0),
        }
    }
}
