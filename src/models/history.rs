// src/models/history.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

pub const DEFAULT_ACTOR: &str = "System";

// --- Inventory history (append-only) ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct InventoryHistoryEntry {
    pub id: i64,
    pub product_id: i64,
    #[schema(example = 25)]
    pub old_quantity: i64,
    #[schema(example = 20)]
    pub new_quantity: i64,
    pub change_date: DateTime<Utc>,
    #[schema(example = "System")]
    pub user_info: String,
}

/// History entry as listed for a product, with the product name joined in.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct HistoryWithProduct {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub entry: InventoryHistoryEntry,
    #[schema(example = "Laptop")]
    pub product_name: String,
}

impl InventoryHistoryEntry {
    pub fn delta(&self) -> i64 {
        self.new_quantity - self.old_quantity
    }
}
