//! Price catalog business logic
//!
//! Each supplier owns a list of priced entries. Entries are never deleted; they
//! are deactivated so that purchases referencing them by id stay resolvable.

use crate::{
    core::supplier::get_supplier,
    entities::{PriceEntry, price_entry},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};

/// Unit used when none is given.
pub const DEFAULT_UNIT: &str = "kg";

/// Input for a new catalog entry.
#[derive(Debug, Clone, Default)]
pub struct NewEntry {
    /// Supplier that will own the entry
    pub supplier_id: i64,
    /// Display name
    pub name: String,
    /// Price per unit of weight
    pub price_per_unit: f64,
    /// Unit of measure, `kg` when absent
    pub unit: Option<String>,
    /// Free-text description
    pub description: String,
    /// Optional barcode/QR value
    pub scan_code: Option<String>,
}

/// Editable fields of an existing entry.
#[derive(Debug, Clone, Default)]
pub struct EntryUpdate {
    /// Display name
    pub name: String,
    /// Price per unit of weight
    pub price_per_unit: f64,
    /// Free-text description
    pub description: String,
}

fn validate_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::validation("Catalog entry name cannot be empty"));
    }
    Ok(name.to_string())
}

fn validate_price(price: f64) -> Result<f64> {
    if !price.is_finite() || price <= 0.0 {
        return Err(Error::InvalidAmount { amount: price });
    }
    Ok(price)
}

/// Adds an entry to a supplier's catalog.
///
/// # Errors
/// Returns an error if:
/// - The name is empty or the price is not strictly positive
/// - The supplier doesn't exist
/// - The scan code is already used by another entry
pub async fn add_entry(db: &DatabaseConnection, new: NewEntry) -> Result<price_entry::Model> {
    let name = validate_name(&new.name)?;
    let price = validate_price(new.price_per_unit)?;
    let unit = new
        .unit
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| DEFAULT_UNIT.to_string());
    let scan_code = new
        .scan_code
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());

    get_supplier(db, new.supplier_id).await?;

    if let Some(code) = &scan_code {
        let taken = PriceEntry::find()
            .filter(price_entry::Column::ScanCode.eq(code.as_str()))
            .count(db)
            .await?;
        if taken > 0 {
            return Err(Error::conflict(format!("Scan code '{code}' is already in use")));
        }
    }

    let now = chrono::Utc::now();
    let entry = price_entry::ActiveModel {
        supplier_id: Set(new.supplier_id),
        name: Set(name),
        scan_code: Set(scan_code),
        price_per_unit: Set(price),
        unit: Set(unit),
        description: Set(new.description.trim().to_string()),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let entry = entry.insert(db).await?;
    tracing::info!(
        entry_id = entry.id,
        supplier_id = entry.supplier_id,
        price = entry.price_per_unit,
        "catalog entry added"
    );
    Ok(entry)
}

/// Finds an entry by id, active or not.
pub async fn get_entry<C>(db: &C, entry_id: i64) -> Result<price_entry::Model>
where
    C: ConnectionTrait,
{
    PriceEntry::find_by_id(entry_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Price entry", entry_id))
}

/// Lists a supplier's active entries by name.
pub async fn list_active_entries(
    db: &DatabaseConnection,
    supplier_id: i64,
) -> Result<Vec<price_entry::Model>> {
    PriceEntry::find()
        .filter(price_entry::Column::SupplierId.eq(supplier_id))
        .filter(price_entry::Column::IsActive.eq(true))
        .order_by_asc(price_entry::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Changes the name, price and description of an entry.
///
/// Past purchases keep the unit price they were recorded with.
pub async fn update_entry(
    db: &DatabaseConnection,
    entry_id: i64,
    update: EntryUpdate,
) -> Result<price_entry::Model> {
    let name = validate_name(&update.name)?;
    let price = validate_price(update.price_per_unit)?;

    let mut entry: price_entry::ActiveModel = get_entry(db, entry_id).await?.into();
    entry.name = Set(name);
    entry.price_per_unit = Set(price);
    entry.description = Set(update.description.trim().to_string());
    entry.updated_at = Set(chrono::Utc::now());

    let entry = entry.update(db).await?;
    tracing::info!(entry_id, price, "catalog entry updated");
    Ok(entry)
}

/// Soft-deletes an entry. Deactivating twice is harmless.
pub async fn deactivate_entry(db: &DatabaseConnection, entry_id: i64) -> Result<price_entry::Model> {
    let mut entry: price_entry::ActiveModel = get_entry(db, entry_id).await?.into();
    entry.is_active = Set(false);
    entry.updated_at = Set(chrono::Utc::now());

    let entry = entry.update(db).await?;
    tracing::info!(entry_id, "catalog entry deactivated");
    Ok(entry)
}

/// Copies every active entry of `source_id` into `destination_id`.
///
/// The copies are independent rows; scan codes are not copied. Either every
/// entry is copied or none is.
///
/// # Errors
/// Returns an error if:
/// - Source and destination are the same supplier
/// - Either supplier doesn't exist
/// - The source has no active entries
pub async fn copy_entries(
    db: &DatabaseConnection,
    source_id: i64,
    destination_id: i64,
) -> Result<Vec<price_entry::Model>> {
    if source_id == destination_id {
        return Err(Error::validation(
            "Source and destination supplier must differ",
        ));
    }

    let txn = db.begin().await?;

    get_supplier(&txn, source_id).await?;
    get_supplier(&txn, destination_id).await?;

    let sources = PriceEntry::find()
        .filter(price_entry::Column::SupplierId.eq(source_id))
        .filter(price_entry::Column::IsActive.eq(true))
        .order_by_asc(price_entry::Column::Id)
        .all(&txn)
        .await?;

    if sources.is_empty() {
        return Err(Error::validation("Source supplier has no active entries"));
    }

    let now = chrono::Utc::now();
    let mut copies = Vec::with_capacity(sources.len());
    for source in sources {
        let copy = price_entry::ActiveModel {
            supplier_id: Set(destination_id),
            name: Set(source.name),
            scan_code: Set(None),
            price_per_unit: Set(source.price_per_unit),
            unit: Set(source.unit),
            description: Set(source.description),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        copies.push(copy.insert(&txn).await?);
    }

    txn.commit().await?;

    tracing::info!(
        source_id,
        destination_id,
        copied = copies.len(),
        "catalog entries copied"
    );
    Ok(copies)
}

/// Identifies an active entry of `supplier_id` by its scan code.
///
/// # Errors
/// Returns [`Error::NotFound`] when no active entry of that supplier carries the code.
pub async fn find_by_scan_code(
    db: &DatabaseConnection,
    scan_code: &str,
    supplier_id: i64,
) -> Result<price_entry::Model> {
    let scan_code = scan_code.trim();
    PriceEntry::find()
        .filter(price_entry::Column::ScanCode.eq(scan_code))
        .filter(price_entry::Column::SupplierId.eq(supplier_id))
        .filter(price_entry::Column::IsActive.eq(true))
        .one(db)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "Price entry",
            id: format!("scan code '{scan_code}' for supplier {supplier_id}"),
        })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_add_entry_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let zero_price = NewEntry {
            supplier_id: 1,
            name: "Copper".to_string(),
            price_per_unit: 0.0,
            ..Default::default()
        };
        let result = add_entry(&db, zero_price).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidAmount { amount: _ }));

        let no_name = NewEntry {
            supplier_id: 1,
            name: "   ".to_string(),
            price_per_unit: 10.0,
            ..Default::default()
        };
        let result = add_entry(&db, no_name).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { message: _ }));

        Ok(())
    }

    #[tokio::test]
    async fn test_add_entry_defaults_unit() -> Result<()> {
        let db = setup_test_db().await?;
        let supplier = create_test_supplier(&db, "Sucata Sul", 1000.0).await?;

        let entry = add_entry(
            &db,
            NewEntry {
                supplier_id: supplier.id,
                name: " Copper wire ".to_string(),
                price_per_unit: 42.5,
                description: "Bare bright".to_string(),
                ..Default::default()
            },
        )
        .await?;

        assert_eq!(entry.name, "Copper wire");
        assert_eq!(entry.unit, "kg");
        assert_eq!(entry.price_per_unit, 42.5);
        assert!(entry.is_active);
        assert_eq!(entry.scan_code, None);

        Ok(())
    }

    #[tokio::test]
    async fn test_add_entry_unknown_supplier() -> Result<()> {
        let db = setup_test_db().await?;
        let result = add_entry(
            &db,
            NewEntry {
                supplier_id: 77,
                name: "Copper".to_string(),
                price_per_unit: 10.0,
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::NotFound { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_scan_code_conflicts() -> Result<()> {
        let db = setup_test_db().await?;
        let supplier = create_test_supplier(&db, "Sucata Sul", 1000.0).await?;
        let other = create_test_supplier(&db, "Metais Norte", 1000.0).await?;

        let new = NewEntry {
            supplier_id: supplier.id,
            name: "Copper".to_string(),
            price_per_unit: 10.0,
            scan_code: Some("789000111".to_string()),
            ..Default::default()
        };
        add_entry(&db, new.clone()).await?;

        let result = add_entry(
            &db,
            NewEntry {
                supplier_id: other.id,
                ..new
            },
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::Conflict { message: _ }));

        Ok(())
    }

    #[tokio::test]
    async fn test_deactivate_hides_from_listing() -> Result<()> {
        let db = setup_test_db().await?;
        let supplier = create_test_supplier(&db, "Sucata Sul", 1000.0).await?;
        let copper = create_test_entry(&db, supplier.id, "Copper", 40.0).await?;
        let brass = create_test_entry(&db, supplier.id, "Brass", 25.0).await?;

        deactivate_entry(&db, copper.id).await?;

        let active = list_active_entries(&db, supplier.id).await?;
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, brass.id);

        // Still resolvable by id
        let copper = get_entry(&db, copper.id).await?;
        assert!(!copper.is_active);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_entry() -> Result<()> {
        let db = setup_test_db().await?;
        let supplier = create_test_supplier(&db, "Sucata Sul", 1000.0).await?;
        let entry = create_test_entry(&db, supplier.id, "Copper", 40.0).await?;

        let updated = update_entry(
            &db,
            entry.id,
            EntryUpdate {
                name: "Copper #1".to_string(),
                price_per_unit: 45.0,
                description: "Clean".to_string(),
            },
        )
        .await?;
        assert_eq!(updated.name, "Copper #1");
        assert_eq!(updated.price_per_unit, 45.0);

        let result = update_entry(
            &db,
            entry.id,
            EntryUpdate {
                name: "Copper".to_string(),
                price_per_unit: -1.0,
                description: String::new(),
            },
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::InvalidAmount { amount: _ }));

        Ok(())
    }

    #[tokio::test]
    async fn test_copy_entries_is_independent() -> Result<()> {
        let db = setup_test_db().await?;
        let source = create_test_supplier(&db, "Sucata Sul", 1000.0).await?;
        let destination = create_test_supplier(&db, "Metais Norte", 1000.0).await?;
        let copper = create_test_entry(&db, source.id, "Copper", 40.0).await?;
        create_test_entry(&db, source.id, "Brass", 25.0).await?;
        let old = create_test_entry(&db, source.id, "Lead", 5.0).await?;
        deactivate_entry(&db, old.id).await?;

        let copies = copy_entries(&db, source.id, destination.id).await?;
        assert_eq!(copies.len(), 2);
        assert!(copies.iter().all(|c| c.supplier_id == destination.id));

        update_entry(
            &db,
            copper.id,
            EntryUpdate {
                name: "Copper".to_string(),
                price_per_unit: 99.0,
                description: String::new(),
            },
        )
        .await?;

        let copied = list_active_entries(&db, destination.id).await?;
        let copied_copper = copied.iter().find(|e| e.name == "Copper").unwrap();
        assert_eq!(copied_copper.price_per_unit, 40.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_copy_entries_errors() -> Result<()> {
        let db = setup_test_db().await?;
        let source = create_test_supplier(&db, "Sucata Sul", 1000.0).await?;
        let destination = create_test_supplier(&db, "Metais Norte", 1000.0).await?;

        let result = copy_entries(&db, source.id, source.id).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { message: _ }));

        let result = copy_entries(&db, source.id, destination.id).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { message: _ }));

        let result = copy_entries(&db, source.id, 999).await;
        assert!(matches!(result.unwrap_err(), Error::NotFound { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_find_by_scan_code() -> Result<()> {
        let db = setup_test_db().await?;
        let supplier = create_test_supplier(&db, "Sucata Sul", 1000.0).await?;
        let other = create_test_supplier(&db, "Metais Norte", 1000.0).await?;
        let entry = add_entry(
            &db,
            NewEntry {
                supplier_id: supplier.id,
                name: "Aluminium can".to_string(),
                price_per_unit: 6.0,
                scan_code: Some("ALU-001".to_string()),
                ..Default::default()
            },
        )
        .await?;

        let found = find_by_scan_code(&db, "ALU-001", supplier.id).await?;
        assert_eq!(found.id, entry.id);

        let wrong_supplier = find_by_scan_code(&db, "ALU-001", other.id).await;
        assert!(matches!(wrong_supplier.unwrap_err(), Error::NotFound { .. }));

        deactivate_entry(&db, entry.id).await?;
        let inactive = find_by_scan_code(&db, "ALU-001", supplier.id).await;
        assert!(matches!(inactive.unwrap_err(), Error::NotFound { .. }));

        Ok(())
    }
}
