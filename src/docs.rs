// src/docs.rs

use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Inventory API",
        description = "Products, stock history and CSV import/export"
    ),
    paths(
        // --- Products ---
        handlers::products::list_products,
        handlers::products::get_categories,
        handlers::products::get_product,
        handlers::products::create_product,
        handlers::products::update_product,
        handlers::products::delete_product,
        handlers::products::get_product_history,

        // --- Import/Export ---
        handlers::transfer::import_products,
        handlers::transfer::export_products,
    ),
    components(
        schemas(
            models::product::Product,
            models::product::ProductStatus,
            models::product::ProductPayload,
            models::product::ProductPage,
            models::product::MessageResponse,
            models::history::InventoryHistoryEntry,
            models::history::HistoryWithProduct,
            handlers::transfer::ImportResponse,
            handlers::transfer::ImportUpload,
        )
    ),
    tags(
        (name = "Products", description = "Product catalog and stock history"),
        (name = "Import/Export", description = "CSV bulk import and export")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_is_documented() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();

        for expected in [
            "/api/products",
            "/api/products/categories",
            "/api/products/export",
            "/api/products/import",
            "/api/products/{id}",
            "/api/products/{id}/history",
        ] {
            assert!(paths.contains(&expected), "missing {expected}");
        }
    }
}
