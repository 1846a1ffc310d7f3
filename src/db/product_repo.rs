// src/db/product_repo.rs

use chrono::Utc;
use sqlx::{Executor, QueryBuilder, Sqlite};

use crate::{
    common::error::AppError,
    models::product::{NewProduct, Product, ProductFilter},
};

// Appends the WHERE clause shared by the listing and its count.
fn push_filter(builder: &mut QueryBuilder<'_, Sqlite>, filter: &ProductFilter) {
    builder.push(" WHERE 1=1");
    if let Some(search) = &filter.search {
        builder.push(" AND name LIKE ").push_bind(format!("%{search}%"));
    }
    if let Some(category) = &filter.category {
        builder.push(" AND category = ").push_bind(category.clone());
    }
}

#[derive(Clone, Default)]
pub struct ProductRepository;

impl ProductRepository {
    pub fn new() -> Self {
        Self
    }

    // ---
    // Reads
    // ---

    pub async fn list<'e, E>(
        &self,
        executor: E,
        filter: &ProductFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Product>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let mut builder = QueryBuilder::<Sqlite>::new("SELECT * FROM products");
        push_filter(&mut builder, filter);
        builder
            .push(" ORDER BY created_at DESC, id DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let products = builder
            .build_query_as::<Product>()
            .fetch_all(executor)
            .await?;
        Ok(products)
    }

    pub async fn count<'e, E>(&self, executor: E, filter: &ProductFilter) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let mut builder = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM products");
        push_filter(&mut builder, filter);

        let total = builder
            .build_query_scalar::<i64>()
            .fetch_one(executor)
            .await?;
        Ok(total)
    }

    pub async fn count_all<'e, E>(&self, executor: E) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products")
            .fetch_one(executor)
            .await?;
        Ok(total)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: i64) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = ?")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(product)
    }

    pub async fn list_for_export<'e, E>(&self, executor: E) -> Result<Vec<Product>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let products = sqlx::query_as::<_, Product>("SELECT * FROM products ORDER BY name ASC, id ASC")
            .fetch_all(executor)
            .await?;
        Ok(products)
    }

    pub async fn categories<'e, E>(&self, executor: E) -> Result<Vec<String>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let categories = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT category FROM products ORDER BY category ASC",
        )
        .fetch_all(executor)
        .await?;
        Ok(categories)
    }

    // ---
    // Writes
    // ---
    // Generic over `Executor` so they can run inside the caller's transaction.

    pub async fn insert<'e, E>(&self, executor: E, product: &NewProduct) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let now = Utc::now();
        let created = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, unit, category, brand, stock, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&product.name)
        .bind(&product.unit)
        .bind(&product.category)
        .bind(&product.brand)
        .bind(product.stock)
        .bind(product.status)
        .bind(now)
        .bind(now)
        .fetch_one(executor)
        .await?;
        Ok(created)
    }

    /// Overwrites every editable column. `None` when no row has this id.
    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: i64,
        product: &NewProduct,
    ) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let updated = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET name = ?, unit = ?, category = ?, brand = ?, stock = ?, status = ?, updated_at = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(&product.name)
        .bind(&product.unit)
        .bind(&product.category)
        .bind(&product.brand)
        .bind(product.stock)
        .bind(product.status)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(updated)
    }

    /// Returns the number of rows removed (0 or 1).
    pub async fn delete<'e, E>(&self, executor: E, id: i64) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
