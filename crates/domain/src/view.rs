//! 保存表現とAPIレスポンス表現の相互変換

use crate::errors::DomainError;
use crate::todo::{TodoId, TodoRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// APIで返すTodo（ワイヤ表現）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoView {
    pub id: String,
    pub title: String,
    pub completed: bool,
    #[serde(rename = "create_at")]
    pub created_at: DateTime<Utc>,
}

impl From<TodoRecord> for TodoView {
    fn from(record: TodoRecord) -> Self {
        Self {
            id: record.id.to_string(),
            title: record.title,
            completed: record.completed,
            created_at: record.created_at,
        }
    }
}

impl TryFrom<TodoView> for TodoRecord {
    type Error = DomainError;

    fn try_from(view: TodoView) -> Result<Self, Self::Error> {
        Ok(Self {
            id: TodoId::parse(&view.id)?,
            title: view.title,
            completed: view.completed,
            created_at: view.created_at,
        })
    }
}
