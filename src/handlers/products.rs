// src/handlers/products.rs

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::actor::Actor,
    models::{
        history::HistoryWithProduct,
        product::{MessageResponse, NewProduct, Product, ProductPage, ProductPayload, ProductQuery},
    },
};

// --- LIST PRODUCTS ---
// GET /api/products
#[utoipa::path(
    get,
    path = "/api/products",
    tag = "Products",
    params(ProductQuery),
    responses(
        (status = 200, description = "One page of products, newest first", body = ProductPage)
    )
)]
pub async fn list_products(
    State(app_state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = app_state
        .product_service
        .list_products(&app_state.db_pool, &query)
        .await?;

    // An out-of-range page is not an error: it just comes back with no products.

    Ok((StatusCode::OK, Json(page)))
}

// --- CATEGORIES ---
// Feeds the category dropdown of the search table.
// GET /api/products/categories
#[utoipa::path(
    get,
    path = "/api/products/categories",
    tag = "Products",
    responses(
        (status = 200, description = "Distinct category names, sorted", body = Vec<String>)
    )
)]
pub async fn get_categories(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let categories = app_state
        .product_service
        .categories(&app_state.db_pool)
        .await?;

    Ok((StatusCode::OK, Json(categories)))
}

// --- GET ONE ---
// GET /api/products/{id}
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    tag = "Products",
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 200, description = "The product", body = Product),
        (status = 404, description = "Product not found")
    )
)]
pub async fn get_product(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let product = app_state
        .product_service
        .get_product(&app_state.db_pool, id)
        .await?;

    Ok((StatusCode::OK, Json(product)))
}

// --- CREATE PRODUCT ---
// POST /api/products
#[utoipa::path(
    post,
    path = "/api/products",
    tag = "Products",
    request_body = ProductPayload,
    responses(
        (status = 201, description = "Product created; status derived from stock", body = Product),
        (status = 400, description = "Invalid payload or malformed JSON"),
        (status = 422, description = "Body does not match the product shape")
    )
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    payload: Result<Json<ProductPayload>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    // Body rejections go through AppError so the client always gets {"error": ...}.
    let Json(payload) = payload?;
    payload.validate()?;

    // `status` is never read from the body; NewProduct derives it from stock.
    let product = app_state
        .product_service
        .create_product(&app_state.db_pool, &NewProduct::from(payload))
        .await?;

    Ok((StatusCode::CREATED, Json(product)))
}

// --- UPDATE PRODUCT ---
// PUT /api/products/{id}
#[utoipa::path(
    put,
    path = "/api/products/{id}",
    tag = "Products",
    request_body = ProductPayload,
    params(
        ("id" = i64, Path, description = "Product id"),
        ("x-user-info" = Option<String>, Header, description = "Actor recorded on the history entry (default: System)")
    ),
    responses(
        (status = 200, description = "Updated product; a history entry is appended when stock changed", body = Product),
        (status = 400, description = "Invalid payload or malformed JSON"),
        (status = 404, description = "Product not found"),
        (status = 422, description = "Body does not match the product shape")
    )
)]
pub async fn update_product(
    State(app_state): State<AppState>,
    actor: Actor,
    Path(id): Path<i64>,
    payload: Result<Json<ProductPayload>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    // The history entry, if any, is written in the same transaction as the row.
    let product = app_state
        .product_service
        .update_product(&app_state.db_pool, id, &NewProduct::from(payload), &actor.0)
        .await?;

    Ok((StatusCode::OK, Json(product)))
}

// --- DELETE PRODUCT ---
// History rows stay behind; see HistoryRepository.
// DELETE /api/products/{id}
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    tag = "Products",
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product deleted", body = MessageResponse),
        (status = 404, description = "Product not found")
    )
)]
pub async fn delete_product(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .product_service
        .delete_product(&app_state.db_pool, id)
        .await?;

    Ok((
        StatusCode::OK,
        Json(MessageResponse {
            message: "Product deleted successfully".to_string(),
        }),
    ))
}

// --- HISTORY ---
// GET /api/products/{id}/history
#[utoipa::path(
    get,
    path = "/api/products/{id}/history",
    tag = "Products",
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 200, description = "Stock changes, newest first", body = Vec<HistoryWithProduct>)
    )
)]
pub async fn get_product_history(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let history = app_state
        .product_service
        .product_history(&app_state.db_pool, id)
        .await?;

    Ok((StatusCode::OK, Json(history)))
}
