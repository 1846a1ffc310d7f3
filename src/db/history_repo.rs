// src/db/history_repo.rs

use chrono::Utc;
use sqlx::{Executor, Sqlite};

use crate::{
    common::error::AppError,
    models::history::{HistoryWithProduct, InventoryHistoryEntry},
};

/// Append-only ledger of stock changes. Rows are never updated or deleted.
#[derive(Clone, Default)]
pub struct HistoryRepository;

impl HistoryRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn record<'e, E>(
        &self,
        executor: E,
        product_id: i64,
        old_quantity: i64,
        new_quantity: i64,
        user_info: &str,
    ) -> Result<InventoryHistoryEntry, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let entry = sqlx::query_as::<_, InventoryHistoryEntry>(
            r#"
            INSERT INTO inventory_history (product_id, old_quantity, new_quantity, change_date, user_info)
            VALUES (?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(product_id)
        .bind(old_quantity)
        .bind(new_quantity)
        .bind(Utc::now())
        .bind(user_info)
        .fetch_one(executor)
        .await?;
        Ok(entry)
    }

    /// Entries for one product, newest first. Unknown products yield an empty list.
    pub async fn list_for_product<'e, E>(
        &self,
        executor: E,
        product_id: i64,
    ) -> Result<Vec<HistoryWithProduct>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let entries = sqlx::query_as::<_, HistoryWithProduct>(
            r#"
            SELECT ih.*, p.name AS product_name
            FROM inventory_history ih
            JOIN products p ON ih.product_id = p.id
            WHERE ih.product_id = ?
            ORDER BY ih.change_date DESC, ih.id DESC
            "#,
        )
        .bind(product_id)
        .fetch_all(executor)
        .await?;
        Ok(entries)
    }
}
