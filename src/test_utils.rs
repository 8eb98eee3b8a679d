//! Shared test utilities for the purchasing ledger.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test records with sensible defaults.

use crate::{
    auth::Actor,
    core::{
        catalog::{self, NewEntry},
        purchase::{self, PurchaseForm},
        supplier::{self, NewSupplier},
        user,
    },
    entities::{self, PaymentStatus, Role, commission_record},
    errors::Result,
};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates an active buyer whose e-mail is derived from `name`.
pub async fn create_test_buyer(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::user::Model> {
    let email = format!("{}@example.com", name.to_lowercase().replace(' ', "."));
    user::create_user(db, name, &email, Role::Buyer).await
}

/// Creates an active administrator.
pub async fn create_test_admin(db: &DatabaseConnection) -> Result<entities::user::Model> {
    user::create_user(db, "Admin", "admin@example.com", Role::Admin).await
}

/// Creates a supplier with only a name and a ceiling.
pub async fn create_test_supplier(
    db: &DatabaseConnection,
    name: &str,
    ceiling: f64,
) -> Result<entities::supplier::Model> {
    supplier::create_supplier(
        db,
        NewSupplier {
            legal_name: name.to_string(),
            price_ceiling: Some(ceiling),
            ..Default::default()
        },
        ceiling,
    )
    .await
}

/// Creates an active catalog entry priced per kg.
pub async fn create_test_entry(
    db: &DatabaseConnection,
    supplier_id: i64,
    name: &str,
    price: f64,
) -> Result<entities::price_entry::Model> {
    catalog::add_entry(
        db,
        NewEntry {
            supplier_id,
            name: name.to_string(),
            price_per_unit: price,
            ..Default::default()
        },
    )
    .await
}

/// Records a collected purchase of `quantity` from the entry's own supplier.
///
/// # Defaults
/// * `collection_mode`: collection
/// * `purchased_at`: now
pub async fn create_test_purchase(
    db: &DatabaseConnection,
    buyer: &entities::user::Model,
    entry_id: i64,
    quantity: f64,
) -> Result<entities::purchase::Model> {
    submit(db, buyer, entry_id, quantity, None).await
}

/// Same as [`create_test_purchase`] with a `YYYY-MM-DD` business date.
pub async fn create_test_purchase_on(
    db: &DatabaseConnection,
    buyer: &entities::user::Model,
    entry_id: i64,
    quantity: f64,
    date: &str,
) -> Result<entities::purchase::Model> {
    submit(db, buyer, entry_id, quantity, Some(date.to_string())).await
}

async fn submit(
    db: &DatabaseConnection,
    buyer: &entities::user::Model,
    entry_id: i64,
    quantity: f64,
    purchased_on: Option<String>,
) -> Result<entities::purchase::Model> {
    let entry = catalog::get_entry(db, entry_id).await?;
    let new = PurchaseForm {
        supplier_id: Some(entry.supplier_id),
        price_entry_id: Some(entry.id),
        quantity: Some(quantity),
        collection_mode: Some("collection".to_string()),
        purchased_on,
        ..Default::default()
    }
    .validate()?;
    purchase::create_purchase(db, &Actor::from(buyer), new).await
}

/// Inserts a pending commission record directly, bypassing the calculator.
pub async fn create_test_commission_record(
    db: &DatabaseConnection,
    buyer_id: i64,
    month: &str,
    total: f64,
    percentage: f64,
) -> Result<commission_record::Model> {
    let now = chrono::Utc::now();
    let record = commission_record::ActiveModel {
        buyer_id: Set(buyer_id),
        reference_month: Set(month.to_string()),
        percentage: Set(percentage),
        total_purchases: Set(total),
        commission_total: Set(total * percentage / 100.0),
        payment_status: Set(PaymentStatus::Pending),
        paid_at: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    Ok(record.insert(db).await?)
}
