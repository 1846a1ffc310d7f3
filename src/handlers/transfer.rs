// src/handlers/transfer.rs

use axum::{
    extract::{Multipart, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{common::error::AppError, config::AppState};

/// Multipart field that carries the uploaded CSV file.
pub const UPLOAD_FIELD: &str = "csvFile";

#[derive(Debug, Serialize, ToSchema)]
pub struct ImportResponse {
    #[schema(example = "Successfully imported 10 products")]
    pub message: String,
    pub imported: usize,
    pub skipped: usize,
}

// Only used to describe the multipart form in the OpenAPI document.
#[allow(dead_code)]
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportUpload {
    #[schema(value_type = String, format = Binary)]
    pub csv_file: Vec<u8>,
}

// --- CSV IMPORT ---
// POST /api/products/import
#[utoipa::path(
    post,
    path = "/api/products/import",
    tag = "Import/Export",
    request_body(content = ImportUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Rows inserted; unreadable rows skipped", body = ImportResponse),
        (status = 400, description = "No file uploaded or unreadable CSV header")
    )
)]
pub async fn import_products(
    State(app_state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    // Other form fields are ignored; the first `csvFile` part wins.
    let mut upload = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(UPLOAD_FIELD) {
            tracing::info!(file = field.file_name().unwrap_or("<unnamed>"), "CSV upload received");
            upload = Some(field.bytes().await?);
            break;
        }
    }
    let data = upload.ok_or(AppError::NoFileUploaded)?;

    let summary = app_state
        .product_service
        .import_csv(&app_state.db_pool, &data)
        .await?;

    Ok((
        StatusCode::OK,
        Json(ImportResponse {
            message: summary.message(),
            imported: summary.imported,
            skipped: summary.skipped,
        }),
    ))
}

// --- CSV EXPORT ---
// GET /api/products/export
#[utoipa::path(
    get,
    path = "/api/products/export",
    tag = "Import/Export",
    responses(
        (status = 200, description = "All products as CSV, ordered by name", content_type = "text/csv", body = String)
    )
)]
pub async fn export_products(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let csv = app_state
        .product_service
        .export_csv(&app_state.db_pool)
        .await?;

    // The attachment header makes the browser download instead of rendering it.
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"products.csv\""),
        ],
        csv,
    ))
}
