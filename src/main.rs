//src/main.rs

use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::{AppState, Config};
use crate::docs::ApiDoc;

fn build_router(app_state: AppState) -> Router {
    let upload_limit = DefaultBodyLimit::max(app_state.config.max_upload_bytes);
    let static_dir = app_state.config.static_dir.clone();

    let product_routes = Router::new()
        .route("/"
               ,get(handlers::products::list_products)
               .post(handlers::products::create_product)
        )
        .route("/categories", get(handlers::products::get_categories))
        .route("/export", get(handlers::transfer::export_products))
        .route("/import", post(handlers::transfer::import_products).layer(upload_limit))
        .route("/{id}"
               ,get(handlers::products::get_product)
               .put(handlers::products::update_product)
               .delete(handlers::products::delete_product)
        )
        .route("/{id}/history", get(handlers::products::get_product_history));

    let mut app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/products", product_routes)
        .with_state(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // Serves the built single-page frontend, falling back to index.html for client routes.
    if let Some(dir) = static_dir {
        let index = dir.join("index.html");
        app = app.fallback_service(ServeDir::new(dir).fallback(ServeFile::new(index)));
    }

    app.layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Reads .env first so RUST_LOG from the file applies to the logger.
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn,tower_http=info")),
        )
        .with_target(false)
        .compact()
        .init();

    let app_state = AppState::new(config).await?;

    if app_state.config.seed_demo_data {
        let inserted = app_state
            .product_service
            .seed_demo_data(&app_state.db_pool)
            .await?;
        if inserted == 0 {
            tracing::info!("Products table already populated, demo data skipped");
        }
    }

    let listener = TcpListener::bind(&app_state.config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", app_state.config.bind_addr))?;
    tracing::info!("🚀 Server listening on {}", listener.local_addr()?);

    let pool = app_state.db_pool.clone();
    axum::serve(listener, build_router(app_state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    pool.close().await;
    Ok(())
}
