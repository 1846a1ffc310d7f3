// src/services/product_service.rs

use sqlx::{Acquire, Executor, Sqlite};

use crate::{
    common::error::AppError,
    db::{self, HistoryRepository, ProductRepository},
    models::{
        history::HistoryWithProduct,
        product::{NewProduct, Product, ProductPage, ProductQuery},
    },
    services::csv_transfer,
};

// Inserted on first start when the products table is empty.
const DEMO_PRODUCTS: [(&str, &str, &str, &str, i64); 10] = [
    ("Laptop", "pcs", "Electronics", "Dell", 25),
    ("Mouse", "pcs", "Accessories", "Logitech", 50),
    ("Keyboard", "pcs", "Accessories", "HP", 40),
    ("Office Chair", "pcs", "Furniture", "FeatherLite", 0),
    ("Projector", "pcs", "Electronics", "Epson", 10),
    ("Water Bottle", "pcs", "Stationery", "Milton", 60),
    ("White Board Marker", "box", "Stationery", "Camlin", 20),
    ("Printer", "pcs", "Electronics", "Canon", 5),
    ("Paper A4 Pack", "pack", "Stationery", "JK", 100),
    ("Headphones", "pcs", "Electronics", "Boat", 0),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
}

impl ImportSummary {
    pub fn message(&self) -> String {
        format!("Successfully imported {} products", self.imported)
    }
}

#[derive(Clone, Default)]
pub struct ProductService {
    product_repo: ProductRepository,
    history_repo: HistoryRepository,
}

impl ProductService {
    pub fn new(product_repo: ProductRepository, history_repo: HistoryRepository) -> Self {
        Self {
            product_repo,
            history_repo,
        }
    }

    // --- LIST ---
    pub async fn list_products<'a, A>(
        &self,
        executor: A,
        query: &ProductQuery,
    ) -> Result<ProductPage, AppError>
    where
        A: Acquire<'a, Database = Sqlite>,
    {
        let filter = query.filter();
        let pagination = query.pagination();

        // Same connection for both queries, and the count uses the listing's filter.
        let mut conn = executor.acquire().await?;

        let products = self
            .product_repo
            .list(&mut *conn, &filter, pagination.limit, pagination.offset())
            .await?;
        let total_count = self.product_repo.count(&mut *conn, &filter).await?;

        Ok(ProductPage {
            products,
            total_count,
            current_page: pagination.page,
            total_pages: pagination.total_pages(total_count),
            items_per_page: pagination.limit,
        })
    }

    // --- SINGLE ROW ---
    pub async fn get_product<'e, E>(&self, executor: E, id: i64) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        self.product_repo
            .find_by_id(executor, id)
            .await?
            .ok_or(AppError::ProductNotFound)
    }

    pub async fn create_product<'e, E>(
        &self,
        executor: E,
        product: &NewProduct,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let created = self.product_repo.insert(executor, product).await?;
        tracing::info!(product_id = created.id, stock = created.stock, "Product created");
        Ok(created)
    }

    // --- UPDATE ---
    // The row update and its history entry commit together or not at all.
    // The write lock is taken before the current stock is read, so concurrent
    // updates of the same product queue up and each one records the stock it replaced.
    pub async fn update_product<'a, A>(
        &self,
        executor: A,
        id: i64,
        changes: &NewProduct,
        actor: &str,
    ) -> Result<Product, AppError>
    where
        A: Acquire<'a, Database = Sqlite>,
    {
        let mut conn = executor.acquire().await?;
        let mut tx = db::begin_write(&mut *conn).await?;

        let current = self
            .product_repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or(AppError::ProductNotFound)?;

        let updated = self
            .product_repo
            .update(&mut *tx, id, changes)
            .await?
            .ok_or(AppError::ProductNotFound)?;

        if current.stock != updated.stock {
            let entry = self
                .history_repo
                .record(&mut *tx, id, current.stock, updated.stock, actor)
                .await?;
            tracing::info!(
                product_id = id,
                old = entry.old_quantity,
                new = entry.new_quantity,
                delta = entry.delta(),
                actor,
                "Stock changed"
            );
        }

        tx.commit().await?;
        Ok(updated)
    }

    // --- DELETE ---
    pub async fn delete_product<'e, E>(&self, executor: E, id: i64) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        if self.product_repo.delete(executor, id).await? == 0 {
            return Err(AppError::ProductNotFound);
        }
        tracing::info!(product_id = id, "Product deleted");
        Ok(())
    }

    pub async fn product_history<'e, E>(
        &self,
        executor: E,
        id: i64,
    ) -> Result<Vec<HistoryWithProduct>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        self.history_repo.list_for_product(executor, id).await
    }

    pub async fn categories<'e, E>(&self, executor: E) -> Result<Vec<String>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        self.product_repo.categories(executor).await
    }

    // --- CSV ---
    pub async fn import_csv<'a, A>(&self, executor: A, data: &[u8]) -> Result<ImportSummary, AppError>
    where
        A: Acquire<'a, Database = Sqlite>,
    {
        let parsed = csv_transfer::parse_products(data)?;

        // All rows or none.
        let mut conn = executor.acquire().await?;
        let mut tx = db::begin_write(&mut *conn).await?;
        for product in &parsed.products {
            self.product_repo.insert(&mut *tx, product).await?;
        }
        tx.commit().await?;

        let summary = ImportSummary {
            imported: parsed.products.len(),
            skipped: parsed.skipped,
        };
        tracing::info!(
            imported = summary.imported,
            skipped = summary.skipped,
            "CSV import finished"
        );
        Ok(summary)
    }

    pub async fn export_csv<'e, E>(&self, executor: E) -> Result<String, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let products = self.product_repo.list_for_export(executor).await?;
        csv_transfer::write_products(&products)
    }

    // --- SEED ---
    /// Inserts the demo catalog if the table is empty. Returns how many rows were added.
    pub async fn seed_demo_data<'a, A>(&self, executor: A) -> Result<usize, AppError>
    where
        A: Acquire<'a, Database = Sqlite>,
    {
        let mut conn = executor.acquire().await?;
        let mut tx = db::begin_write(&mut *conn).await?;

        if self.product_repo.count_all(&mut *tx).await? > 0 {
            return Ok(0);
        }

        for (name, unit, category, brand, stock) in DEMO_PRODUCTS {
            self.product_repo
                .insert(&mut *tx, &NewProduct::new(name, unit, category, brand, stock))
                .await?;
        }
        tx.commit().await?;

        tracing::info!("✅ Demo products inserted");
        Ok(DEMO_PRODUCTS.len())
    }
}
