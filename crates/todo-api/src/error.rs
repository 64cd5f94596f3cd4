use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::DomainError;
use infrastructure::StoreError;
use serde_json::json;
use thiserror::Error;

/// ハンドラ境界で JSON エンベロープに変換されるエラー
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid ID")]
    InvalidId,

    #[error("Invalid request payload")]
    InvalidPayload,

    #[error("{0}")]
    Validation(String),

    #[error("Todo not found")]
    NotFound,

    /// `message` は操作ごとの文言、詳細は `source` に入る
    #[error("{message}: {source}")]
    Store {
        message: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("Failed to render page: {0}")]
    Render(String),
}

impl ApiError {
    pub fn store(message: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |source| ApiError::Store { message, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidId | ApiError::InvalidPayload | ApiError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Store { .. } | ApiError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::InvalidTodoId(_) => ApiError::InvalidId,
            DomainError::Validation(message) => ApiError::Validation(message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::Store { message, source } => {
                tracing::error!(error = %source, "{message}");
                json!({ "message": message, "error": source.to_string() })
            }
            ApiError::Render(detail) => {
                tracing::error!(error = %detail, "Failed to render page");
                json!({ "message": "Failed to render page", "error": detail })
            }
            other => json!({ "message": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::InvalidId.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::InvalidPayload.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::Validation("Title field is required".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::store("Failed to fetch todo")(StoreError::Timeout(Duration::from_secs(5)))
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_domain_errors_map_to_bad_request() {
        let invalid: ApiError = DomainError::InvalidTodoId("x".into()).into();
        assert!(matches!(invalid, ApiError::InvalidId));

        let blank: ApiError = DomainError::Validation("Title field is required".into()).into();
        assert_eq!(blank.to_string(), "Title field is required");
    }
}
