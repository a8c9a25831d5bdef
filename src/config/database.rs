//! Database configuration module for `ShawarmaLedger`.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust models.
//! Creation is idempotent (`IF NOT EXISTS`), which makes it safe to run on every start.

use crate::entities::{Expense, ExpenseAllocation, Order, OrderItem};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};
use tracing::{debug, info};

const DEFAULT_DATABASE_URL: &str = "sqlite://data/shawarma_ledger.sqlite?mode=rwc";

/// Gets the database URL from `DATABASE_URL` or returns the default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database named by [`get_database_url`].
///
/// When the default URL is used the `data/` directory is created first so `SQLite`
/// can create the file.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    if database_url == DEFAULT_DATABASE_URL {
        std::fs::create_dir_all("data")?;
    }
    debug!("Connecting to database at {}", database_url);

    Database::connect(&database_url).await.map_err(Into::into)
}

/// Creates all tables (orders, order items, expenses, expense allocations) if missing.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    create_table(db, Order).await?;
    create_table(db, OrderItem).await?;
    create_table(db, Expense).await?;
    create_table(db, ExpenseAllocation).await?;

    info!("Database tables are ready");
    Ok(())
}

async fn create_table<E>(db: &DatabaseConnection, entity: E) -> Result<()>
where
    E: EntityTrait,
{
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(builder.build(&statement)).await?;
    Ok(())
}
