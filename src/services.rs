pub mod csv_transfer;
pub mod product_service;
pub use product_service::ProductService;
