//! Database configuration module.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust structs.
//! The one constraint the entity derive cannot express, the composite uniqueness of
//! a buyer's monthly commission record, is added as an explicit index.

use crate::entities::{
    CommissionRate, CommissionRecord, CommissionRecordColumn, Employee, Expense, PriceEntry,
    Purchase, Supplier, User,
};
use crate::errors::Result;
use sea_orm::{
    ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema, sea_query::Index,
};

const DEFAULT_DATABASE_URL: &str = "sqlite://data/scrap_ledger.sqlite?mode=rwc";

/// Gets the database URL from environment variable or returns default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database named by `DATABASE_URL`.
///
/// Falls back to a local `SQLite` file if no environment variable is set.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    tracing::debug!(url = %database_url, "connecting to database");
    Database::connect(&database_url).await.map_err(Into::into)
}

async fn create_table<E>(db: &DatabaseConnection, schema: &Schema, entity: E) -> Result<()>
where
    E: EntityTrait,
{
    let builder = db.get_database_backend();
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(builder.build(&statement)).await?;
    Ok(())
}

/// Creates all tables, parents before children, plus the monthly commission index.
///
/// Safe to run against an existing database: every statement is `IF NOT EXISTS`.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    create_table(db, &schema, User).await?;
    create_table(db, &schema, Supplier).await?;
    create_table(db, &schema, PriceEntry).await?;
    create_table(db, &schema, Purchase).await?;
    create_table(db, &schema, CommissionRate).await?;
    create_table(db, &schema, CommissionRecord).await?;
    create_table(db, &schema, Expense).await?;
    create_table(db, &schema, Employee).await?;

    let buyer_month_index = Index::create()
        .name("idx_commission_records_buyer_month")
        .table(CommissionRecord)
        .col(CommissionRecordColumn::BuyerId)
        .col(CommissionRecordColumn::ReferenceMonth)
        .unique()
        .if_not_exists()
        .to_owned();
    db.execute(builder.build(&buyer_month_index)).await?;

    Ok(())
}
