use thiserror::Error;

/// 入力値の検証で発生するエラー（クライアント起因）
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Invalid TodoId: {0}")]
    InvalidTodoId(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

pub type DomainResult<T> = Result<T, DomainError>;
