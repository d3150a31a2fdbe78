use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::editor::session::EditMode;
use crate::surface::NodeId;

/// Errors raised by the editing core.
///
/// A missing section or role during save and an empty rich-text field are not
/// errors: the reconciler skips the former and normalization falls back to an
/// empty run for the latter.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditorError {
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("No document loaded")]
    NoDocument,

    #[error("Cannot {action} while {state}")]
    InvalidTransition {
        state: EditMode,
        action: &'static str,
    },

    #[error("Unknown surface node {0}")]
    UnknownNode(NodeId),
}

/// HTTP-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<EditorError> for AppError {
    fn from(err: EditorError) -> Self {
        match err {
            EditorError::InvalidDocument(msg) => AppError::UnprocessableEntity(msg),
            other => AppError::Validation(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UnprocessableEntity(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "INVALID_DOCUMENT",
                msg.clone(),
            ),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_document_maps_to_422() {
        let response =
            AppError::from(EditorError::InvalidDocument("sections must be an array".into()))
                .into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_transition_error_message() {
        let err = EditorError::InvalidTransition {
            state: EditMode::Viewing,
            action: "save",
        };
        assert_eq!(err.to_string(), "Cannot save while viewing");
    }
}
