use crate::errors::{DomainError, DomainResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ulid::Ulid;

/// TodoのID（ULID）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(Ulid);

impl TodoId {
    /// 新しいIDを生成
    pub fn new() -> Self {
        Self(Ulid::new())
    }

    /// 文字列からIDを復元する。前後の空白は無視する
    pub fn parse(id: &str) -> DomainResult<Self> {
        let trimmed = id.trim();
        Ulid::from_string(trimmed)
            .map(Self)
            .map_err(|_| DomainError::InvalidTodoId(trimmed.to_string()))
    }
}

impl Default for TodoId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// ストア上のTodo（保存表現）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoRecord {
    pub id: TodoId,
    pub title: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// 新規作成するTodo。IDはストアが挿入時に採番する
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub title: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl NewTodo {
    /// タイトルを検証して未完了のTodoを作る
    pub fn new(title: String) -> DomainResult<Self> {
        validate_title(&title)?;
        Ok(Self {
            title,
            completed: false,
            created_at: Utc::now(),
        })
    }

    /// 採番されたIDを付けて保存表現にする
    pub fn into_record(self, id: TodoId) -> TodoRecord {
        TodoRecord {
            id,
            title: self.title,
            completed: self.completed,
            created_at: self.created_at,
        }
    }
}

/// 更新で変更できるフィールド（id と created_at は対象外）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoChanges {
    pub title: String,
    pub completed: bool,
}

impl TodoChanges {
    pub fn new(title: String, completed: bool) -> DomainResult<Self> {
        validate_title(&title)?;
        Ok(Self { title, completed })
    }
}

impl TodoRecord {
    /// 変更を適用する。id と created_at は変わらない
    pub fn apply(&mut self, changes: &TodoChanges) {
        self.title = changes.title.clone();
        self.completed = changes.completed;
    }
}

/// 空白のみのタイトルも空として扱う
pub fn validate_title(title: &str) -> DomainResult<()> {
    if title.trim().is_empty() {
        return Err(DomainError::Validation(
            "Title field is required".to_string(),
        ));
    }
    Ok(())
}
