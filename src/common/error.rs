// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation failed")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Product not found")]
    ProductNotFound,

    #[error("No file uploaded")]
    NoFileUploaded,

    #[error("Error parsing CSV file: {0}")]
    CsvParse(String),

    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] axum::extract::rejection::JsonRejection),

    #[error("Upload error: {0}")]
    Upload(#[from] axum::extract::multipart::MultipartError),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    InternalServerError(#[from] anyhow::Error),
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::CsvParse(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Every field error is returned so the edit form can mark each input.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "One or more fields are invalid.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::ProductNotFound => (StatusCode::NOT_FOUND, "Product not found".to_string()),
            AppError::NoFileUploaded => (StatusCode::BAD_REQUEST, "No file uploaded".to_string()),
            AppError::CsvParse(ref detail) => {
                tracing::warn!("CSV import rejected: {}", detail);
                (StatusCode::BAD_REQUEST, "Error parsing CSV file".to_string())
            }
            // Malformed JSON is 400, a well-formed body of the wrong shape is 422.
            AppError::InvalidBody(ref e) => (e.status(), e.body_text()),
            AppError::Upload(ref e) => (e.status(), e.body_text()),

            // Database and internal errors become 500; the detail only goes to the log.
            ref e => {
                tracing::error!("Internal server error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred.".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
