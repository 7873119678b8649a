use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::ErrorResponse;
use crate::store::StoreError;
use crate::validation::ValidationErrors;

/// Every way a request can fail, mapped to a status code and `{message}` body.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Validation error")]
    Validation(#[from] ValidationErrors),

    #[error("{0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{0}")]
    NotFound(String),

    #[error("{message}")]
    Conflict { message: String, id: Option<i32> },

    /// `message` goes to the client, `detail` only to the logs.
    #[error("{message}: {detail}")]
    Internal { message: String, detail: String },
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn internal(message: impl Into<String>, detail: impl std::fmt::Display) -> Self {
        ApiError::Internal {
            message: message.into(),
            detail: detail.to_string(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, .. } => ApiError::NotFound(format!("{entity} not found")),
            StoreError::PathConflict { existing_id, .. } => ApiError::Conflict {
                message: "Another page is already using this path. Each page path must be unique."
                    .to_string(),
                id: Some(existing_id),
            },
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(format!("Invalid JSON body: {}", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    message: "Validation error".to_string(),
                    errors: Some(errors.errors),
                    id: None,
                },
            ),
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, ErrorResponse::new(message))
            }
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                ErrorResponse::new("Unauthorized: missing or invalid token"),
            ),
            ApiError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ErrorResponse::new("Invalid credentials"),
            ),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, ErrorResponse::new(message)),
            ApiError::Conflict { message, id } => (
                StatusCode::CONFLICT,
                ErrorResponse {
                    message,
                    errors: None,
                    id,
                },
            ),
            ApiError::Internal { message, detail } => {
                tracing::error!(error = %detail, "{}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorResponse::new(message))
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{FieldError, PathSegment};

    async fn body_json(err: ApiError) -> (StatusCode, serde_json::Value) {
        let res = err.into_response();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_validation_lists_fields() {
        let err = ApiError::from(ValidationErrors {
            errors: vec![FieldError {
                path: vec![PathSegment::Field("title".to_string())],
                message: "Required".to_string(),
            }],
        });
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Validation error");
        assert_eq!(body["errors"][0]["path"][0], "title");
        assert!(body.get("id").is_none());
    }

    #[tokio::test]
    async fn test_store_not_found_maps_to_404() {
        let err = ApiError::from(StoreError::NotFound {
            entity: "Blog post",
            id: 3,
        });
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Blog post not found");
    }

    #[tokio::test]
    async fn test_conflict_carries_id() {
        let err = ApiError::from(StoreError::PathConflict {
            page_path: "/about".to_string(),
            existing_id: 2,
        });
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["id"], 2);
    }

    #[tokio::test]
    async fn test_internal_hides_detail() {
        let err = ApiError::internal("Error exporting blog posts", "disk full at /var/exports");
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Error exporting blog posts");
        assert!(!body.to_string().contains("disk full"));
    }
}
