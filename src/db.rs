pub mod history_repo;
pub use history_repo::HistoryRepository;
pub mod product_repo;
pub use product_repo::ProductRepository;

use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Connection, Sqlite, SqliteConnection, SqlitePool, Transaction,
};
use std::{str::FromStr, time::Duration};

/// Opens the SQLite pool and applies the embedded migrations.
pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<SqlitePool> {
    // The history table declares a foreign key to products that is not enforced,
    // so deleting a product leaves its history rows in place.
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(false);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(3))
        .connect_with(options)
        .await?;

    sqlx::migrate!().run(&pool).await?;

    Ok(pool)
}

/// Opens a transaction that holds the write lock from its first statement.
///
/// A plain `BEGIN` only takes a read lock until the first write. Two of those that
/// both read before writing cannot upgrade, and SQLite fails one of them with
/// `database is locked` instead of waiting on the busy timeout.
pub async fn begin_write(
    conn: &mut SqliteConnection,
) -> Result<Transaction<'_, Sqlite>, sqlx::Error> {
    conn.begin_with("BEGIN IMMEDIATE").await
}

#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    // One connection only: every connection to `sqlite::memory:` is its own database.
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(false);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .unwrap();
    sqlx::migrate!().run(&pool).await.unwrap();
    pool
}
