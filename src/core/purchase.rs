//! Purchase pricing and approval engine
//!
//! Submission resolves the unit price, snapshots the supplier ceiling and the
//! buyer's commission rate, classifies the total and writes the purchase, all
//! inside one transaction. Edits recompute money fields from the snapshots but
//! never reclassify. Only a pending purchase can be decided.

use crate::{
    auth::Actor,
    core::{
        catalog::get_entry,
        commission::get_commission_percentage,
        pagination::{Page, PageRequest, fetch_page},
        pricing,
        supplier::get_supplier,
        user::get_user,
    },
    entities::{ApprovalStatus, CollectionMode, Purchase, purchase},
    errors::{Error, Result},
};
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};

/// Raw submission as it arrives at the boundary; every field may be missing.
#[derive(Debug, Clone, Default)]
pub struct PurchaseForm {
    /// Supplier id
    pub supplier_id: Option<i64>,
    /// Catalog entry id
    pub price_entry_id: Option<i64>,
    /// Quantity in units of weight
    pub quantity: Option<f64>,
    /// `collection` or `delivery`
    pub collection_mode: Option<String>,
    /// Free-text notes
    pub notes: Option<String>,
    /// Collection latitude
    pub latitude: Option<f64>,
    /// Collection longitude
    pub longitude: Option<f64>,
    /// Collection address
    pub collection_address: Option<String>,
    /// Business date as `YYYY-MM-DD`; today when absent
    pub purchased_on: Option<String>,
}

/// A submission that passed boundary validation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPurchase {
    /// Supplier id
    pub supplier_id: i64,
    /// Catalog entry id
    pub price_entry_id: i64,
    /// Quantity, strictly positive
    pub quantity: f64,
    /// Collection or delivery
    pub collection_mode: CollectionMode,
    /// Free-text notes
    pub notes: Option<String>,
    /// Collection latitude
    pub latitude: Option<f64>,
    /// Collection longitude
    pub longitude: Option<f64>,
    /// Collection address
    pub collection_address: Option<String>,
    /// Business date; submission time when absent
    pub purchased_at: Option<DateTime<Utc>>,
}

/// Fields that may change on an existing purchase. `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct PurchaseEdit {
    /// New quantity
    pub quantity: Option<f64>,
    /// New collection mode
    pub collection_mode: Option<CollectionMode>,
    /// New notes
    pub notes: Option<String>,
    /// New latitude
    pub latitude: Option<f64>,
    /// New longitude
    pub longitude: Option<f64>,
    /// New collection address
    pub collection_address: Option<String>,
}

/// Administrator decision on a pending purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Move to `approved`
    Approve,
    /// Move to `rejected`
    Reject,
}

impl Decision {
    const fn target(self) -> ApprovalStatus {
        match self {
            Self::Approve => ApprovalStatus::Approved,
            Self::Reject => ApprovalStatus::Rejected,
        }
    }
}

fn validate_quantity(quantity: f64) -> Result<f64> {
    if !quantity.is_finite() || quantity <= 0.0 {
        return Err(Error::InvalidAmount { amount: quantity });
    }
    Ok(quantity)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parses a `YYYY-MM-DD` business date into midnight UTC.
///
/// # Errors
/// Returns [`Error::Validation`] on malformed input.
pub fn parse_business_date(value: &str) -> Result<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|e| Error::validation(format!("Invalid date '{value}': {e}")))?;
    Ok(date.and_time(chrono::NaiveTime::MIN).and_utc())
}

impl PurchaseForm {
    /// Checks that every required field is present and well formed.
    ///
    /// # Errors
    /// Returns a validation error naming the first offending field.
    pub fn validate(self) -> Result<NewPurchase> {
        let supplier_id = self
            .supplier_id
            .ok_or_else(|| Error::validation("Supplier is required"))?;
        let price_entry_id = self
            .price_entry_id
            .ok_or_else(|| Error::validation("Price entry is required"))?;
        let quantity = self
            .quantity
            .ok_or_else(|| Error::validation("Quantity is required"))
            .and_then(validate_quantity)?;
        let collection_mode = self
            .collection_mode
            .ok_or_else(|| Error::validation("Collection mode is required"))?
            .parse::<CollectionMode>()?;
        let purchased_at = self
            .purchased_on
            .filter(|d| !d.trim().is_empty())
            .map(|d| parse_business_date(&d))
            .transpose()?;

        Ok(NewPurchase {
            supplier_id,
            price_entry_id,
            quantity,
            collection_mode,
            notes: non_blank(self.notes),
            latitude: self.latitude,
            longitude: self.longitude,
            collection_address: non_blank(self.collection_address),
            purchased_at,
        })
    }
}

/// Prices and records a purchase on behalf of `actor`.
///
/// The supplier ceiling and the buyer's commission percentage are read inside
/// the same transaction as the insert, so the stored snapshot matches what the
/// classification saw.
///
/// # Errors
/// Returns an error if:
/// - The supplier, price entry or buyer doesn't exist
/// - The price entry belongs to a different supplier
/// - The database write fails (nothing is persisted)
pub async fn create_purchase(
    db: &DatabaseConnection,
    actor: &Actor,
    new: NewPurchase,
) -> Result<purchase::Model> {
    let quantity = validate_quantity(new.quantity)?;

    let txn = db.begin().await?;

    let supplier = get_supplier(&txn, new.supplier_id).await?;
    // Deactivated entries still price a purchase; only listings filter them.
    let entry = get_entry(&txn, new.price_entry_id).await?;
    if entry.supplier_id != supplier.id {
        return Err(Error::validation(format!(
            "Price entry {} does not belong to supplier {}",
            entry.id, supplier.id
        )));
    }
    get_user(&txn, actor.id).await?;
    let percentage = get_commission_percentage(&txn, actor.id).await?;

    let pricing = pricing::price_purchase(
        quantity,
        entry.price_per_unit,
        supplier.price_ceiling,
        percentage,
    );

    let now = Utc::now();
    let purchase = purchase::ActiveModel {
        supplier_id: Set(supplier.id),
        price_entry_id: Set(entry.id),
        quantity: Set(quantity),
        unit_price: Set(entry.price_per_unit),
        total_value: Set(pricing.total_value),
        price_ceiling: Set(supplier.price_ceiling),
        price_status: Set(pricing.price_status),
        approval_status: Set(pricing.approval_status),
        collection_mode: Set(new.collection_mode),
        notes: Set(new.notes),
        buyer_id: Set(actor.id),
        latitude: Set(new.latitude),
        longitude: Set(new.longitude),
        collection_address: Set(new.collection_address),
        commission_percentage: Set(percentage),
        commission_amount: Set(pricing.commission_amount),
        decided_by: Set(None),
        decided_at: Set(None),
        purchased_at: Set(new.purchased_at.unwrap_or(now)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let purchase = purchase.insert(&txn).await?;

    txn.commit().await?;

    tracing::info!(
        purchase_id = purchase.id,
        supplier_id = purchase.supplier_id,
        buyer_id = purchase.buyer_id,
        total = purchase.total_value,
        ceiling = purchase.price_ceiling,
        price_status = %purchase.price_status,
        approval_status = %purchase.approval_status,
        "purchase recorded"
    );
    Ok(purchase)
}

/// Finds a purchase by id.
pub async fn get_purchase<C>(db: &C, purchase_id: i64) -> Result<purchase::Model>
where
    C: ConnectionTrait,
{
    Purchase::find_by_id(purchase_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Purchase", purchase_id))
}

/// Lists purchases newest first, one page at a time.
pub async fn list_purchases(
    db: &DatabaseConnection,
    request: PageRequest,
) -> Result<Page<purchase::Model>> {
    fetch_page(
        Purchase::find()
            .order_by_desc(purchase::Column::PurchasedAt)
            .order_by_desc(purchase::Column::Id),
        db,
        request,
    )
    .await
}

/// Applies an edit and recomputes total and commission from the snapshots.
///
/// `price_status` and `approval_status` are left exactly as they were, even when
/// the new total would classify differently.
pub async fn update_purchase(
    db: &DatabaseConnection,
    purchase_id: i64,
    edit: PurchaseEdit,
) -> Result<purchase::Model> {
    let quantity = edit.quantity.map(validate_quantity).transpose()?;

    let txn = db.begin().await?;
    let current = get_purchase(&txn, purchase_id).await?;

    let quantity = quantity.unwrap_or(current.quantity);
    let total = pricing::total_value(quantity, current.unit_price);
    let commission = pricing::commission_amount(total, current.commission_percentage);

    let mut purchase: purchase::ActiveModel = current.into();
    purchase.quantity = Set(quantity);
    purchase.total_value = Set(total);
    purchase.commission_amount = Set(commission);
    if let Some(mode) = edit.collection_mode {
        purchase.collection_mode = Set(mode);
    }
    if let Some(notes) = edit.notes {
        purchase.notes = Set(non_blank(Some(notes)));
    }
    if let Some(latitude) = edit.latitude {
        purchase.latitude = Set(Some(latitude));
    }
    if let Some(longitude) = edit.longitude {
        purchase.longitude = Set(Some(longitude));
    }
    if let Some(address) = edit.collection_address {
        purchase.collection_address = Set(non_blank(Some(address)));
    }
    purchase.updated_at = Set(Utc::now());

    let purchase = purchase.update(&txn).await?;
    txn.commit().await?;

    tracing::info!(purchase_id, total, "purchase updated");
    Ok(purchase)
}

/// Approves or rejects a pending purchase on behalf of `actor`.
///
/// # Errors
/// Returns [`Error::Conflict`] if the purchase was already approved or rejected.
pub async fn decide_purchase(
    db: &DatabaseConnection,
    actor: &Actor,
    purchase_id: i64,
    decision: Decision,
) -> Result<purchase::Model> {
    let txn = db.begin().await?;
    let current = get_purchase(&txn, purchase_id).await?;

    if current.approval_status.is_terminal() {
        tracing::warn!(
            purchase_id,
            status = %current.approval_status,
            "attempt to re-decide a purchase"
        );
        return Err(Error::conflict(format!(
            "Purchase {purchase_id} is already {}",
            current.approval_status
        )));
    }

    let now = Utc::now();
    let mut purchase: purchase::ActiveModel = current.into();
    purchase.approval_status = Set(decision.target());
    purchase.decided_by = Set(Some(actor.id));
    purchase.decided_at = Set(Some(now));
    purchase.updated_at = Set(now);

    let purchase = purchase.update(&txn).await?;
    txn.commit().await?;

    tracing::info!(
        purchase_id,
        decided_by = actor.id,
        status = %purchase.approval_status,
        "purchase decided"
    );
    Ok(purchase)
}

/// Deletes a purchase.
pub async fn delete_purchase(db: &DatabaseConnection, purchase_id: i64) -> Result<()> {
    let result = Purchase::delete_by_id(purchase_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::not_found("Purchase", purchase_id));
    }
    tracing::info!(purchase_id, "purchase deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::{
        core::{catalog::deactivate_entry, commission::set_rate},
        entities::{PriceStatus, Role},
        test_utils::*,
    };
    use chrono::Datelike;

    fn form(supplier_id: i64, entry_id: i64, quantity: f64) -> PurchaseForm {
        PurchaseForm {
            supplier_id: Some(supplier_id),
            price_entry_id: Some(entry_id),
            quantity: Some(quantity),
            collection_mode: Some("collection".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_form_validation() {
        let missing = PurchaseForm::default().validate();
        assert!(matches!(missing.unwrap_err(), Error::Validation { message: _ }));

        let zero = form(1, 1, 0.0).validate();
        assert!(matches!(zero.unwrap_err(), Error::InvalidAmount { amount: _ }));

        let negative = form(1, 1, -3.0).validate();
        assert!(matches!(negative.unwrap_err(), Error::InvalidAmount { amount: _ }));

        let bad_mode = PurchaseForm {
            collection_mode: Some("teleport".to_string()),
            ..form(1, 1, 2.0)
        }
        .validate();
        assert!(matches!(bad_mode.unwrap_err(), Error::Validation { message: _ }));

        let bad_date = PurchaseForm {
            purchased_on: Some("2024-13-40".to_string()),
            ..form(1, 1, 2.0)
        }
        .validate();
        assert!(matches!(bad_date.unwrap_err(), Error::Validation { message: _ }));

        let no_mode = PurchaseForm {
            collection_mode: None,
            ..form(1, 1, 2.0)
        }
        .validate();
        assert!(matches!(no_mode.unwrap_err(), Error::Validation { message: _ }));
    }

    #[test]
    fn test_form_validation_success() {
        let new = PurchaseForm {
            collection_mode: Some("Delivery".to_string()),
            notes: Some("  ".to_string()),
            purchased_on: Some("2024-03-15".to_string()),
            ..form(4, 9, 12.5)
        }
        .validate()
        .unwrap();

        assert_eq!(new.supplier_id, 4);
        assert_eq!(new.price_entry_id, 9);
        assert_eq!(new.quantity, 12.5);
        assert_eq!(new.collection_mode, CollectionMode::Delivery);
        assert_eq!(new.notes, None);
        let date = new.purchased_at.unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2024, 3, 15));
    }

    #[tokio::test]
    async fn test_scenario_below_ceiling() -> Result<()> {
        let db = setup_test_db().await?;
        let buyer = create_test_buyer(&db, "Bruno").await?;
        let supplier = create_test_supplier(&db, "Sucata Sul", 1000.0).await?;
        let entry = create_test_entry(&db, supplier.id, "Copper", 90.0).await?;

        let new = form(supplier.id, entry.id, 10.0).validate()?;
        let purchase = create_purchase(&db, &Actor::from(&buyer), new).await?;

        assert_eq!(purchase.total_value, 900.0);
        assert_eq!(purchase.price_ceiling, 1000.0);
        assert_eq!(purchase.price_status, PriceStatus::Below);
        assert_eq!(purchase.approval_status, ApprovalStatus::Approved);
        assert_eq!(purchase.buyer_id, buyer.id);

        Ok(())
    }

    #[tokio::test]
    async fn test_scenario_equal_ceiling() -> Result<()> {
        let db = setup_test_db().await?;
        let buyer = create_test_buyer(&db, "Bruno").await?;
        let supplier = create_test_supplier(&db, "Sucata Sul", 1000.0).await?;
        let entry = create_test_entry(&db, supplier.id, "Copper", 100.0).await?;

        let new = form(supplier.id, entry.id, 10.0).validate()?;
        let purchase = create_purchase(&db, &Actor::from(&buyer), new).await?;

        assert_eq!(purchase.total_value, 1000.0);
        assert_eq!(purchase.price_status, PriceStatus::Equal);
        assert_eq!(purchase.approval_status, ApprovalStatus::Approved);

        Ok(())
    }

    #[tokio::test]
    async fn test_scenario_above_ceiling_then_approved() -> Result<()> {
        let db = setup_test_db().await?;
        let buyer = create_test_buyer(&db, "Bruno").await?;
        let admin = create_test_admin(&db).await?;
        let supplier = create_test_supplier(&db, "Sucata Sul", 1000.0).await?;
        let entry = create_test_entry(&db, supplier.id, "Copper", 150.0).await?;

        let new = form(supplier.id, entry.id, 10.0).validate()?;
        let purchase = create_purchase(&db, &Actor::from(&buyer), new).await?;
        assert_eq!(purchase.total_value, 1500.0);
        assert_eq!(purchase.price_status, PriceStatus::Above);
        assert_eq!(purchase.approval_status, ApprovalStatus::Pending);

        let decided =
            decide_purchase(&db, &Actor::from(&admin), purchase.id, Decision::Approve).await?;
        assert_eq!(decided.approval_status, ApprovalStatus::Approved);
        assert_eq!(decided.total_value, 1500.0);
        assert_eq!(decided.price_status, PriceStatus::Above);
        assert_eq!(decided.decided_by, Some(admin.id));
        assert!(decided.decided_at.is_some());

        Ok(())
    }

    #[tokio::test]
    async fn test_decided_purchase_is_terminal() -> Result<()> {
        let db = setup_test_db().await?;
        let buyer = create_test_buyer(&db, "Bruno").await?;
        let admin = Actor::from(&create_test_admin(&db).await?);
        let supplier = create_test_supplier(&db, "Sucata Sul", 100.0).await?;
        let entry = create_test_entry(&db, supplier.id, "Copper", 150.0).await?;

        let pending = create_test_purchase(&db, &buyer, entry.id, 1.0).await?;
        decide_purchase(&db, &admin, pending.id, Decision::Reject).await?;

        let again = decide_purchase(&db, &admin, pending.id, Decision::Approve).await;
        assert!(matches!(again.unwrap_err(), Error::Conflict { message: _ }));
        assert_eq!(
            get_purchase(&db, pending.id).await?.approval_status,
            ApprovalStatus::Rejected
        );

        let auto = create_test_purchase(&db, &buyer, entry.id, 0.5).await?;
        assert_eq!(auto.approval_status, ApprovalStatus::Approved);
        let result = decide_purchase(&db, &admin, auto.id, Decision::Reject).await;
        assert!(matches!(result.unwrap_err(), Error::Conflict { message: _ }));

        let missing = decide_purchase(&db, &admin, 999, Decision::Approve).await;
        assert!(matches!(missing.unwrap_err(), Error::NotFound { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_commission_snapshot() -> Result<()> {
        let db = setup_test_db().await?;
        let buyer = create_test_buyer(&db, "Bruno").await?;
        let supplier = create_test_supplier(&db, "Sucata Sul", 5000.0).await?;
        let entry = create_test_entry(&db, supplier.id, "Copper", 100.0).await?;
        set_rate(&db, buyer.id, 5.0).await?;

        let purchase = create_test_purchase(&db, &buyer, entry.id, 20.0).await?;
        assert_eq!(purchase.total_value, 2000.0);
        assert_eq!(purchase.commission_percentage, 5.0);
        assert_eq!(purchase.commission_amount, 100.0);

        // Later rate changes leave the stored snapshot alone
        set_rate(&db, buyer.id, 10.0).await?;
        let stored = get_purchase(&db, purchase.id).await?;
        assert_eq!(stored.commission_percentage, 5.0);
        assert_eq!(stored.commission_amount, 100.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_buyer_without_rate_earns_nothing() -> Result<()> {
        let db = setup_test_db().await?;
        let buyer = create_test_buyer(&db, "Bruno").await?;
        let supplier = create_test_supplier(&db, "Sucata Sul", 5000.0).await?;
        let entry = create_test_entry(&db, supplier.id, "Copper", 100.0).await?;

        let purchase = create_test_purchase(&db, &buyer, entry.id, 20.0).await?;
        assert_eq!(purchase.commission_percentage, 0.0);
        assert_eq!(purchase.commission_amount, 0.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_edit_recomputes_but_never_reclassifies() -> Result<()> {
        let db = setup_test_db().await?;
        let buyer = create_test_buyer(&db, "Bruno").await?;
        set_rate(&db, buyer.id, 5.0).await?;
        let supplier = create_test_supplier(&db, "Sucata Sul", 1000.0).await?;
        let entry = create_test_entry(&db, supplier.id, "Copper", 90.0).await?;

        let purchase = create_test_purchase(&db, &buyer, entry.id, 10.0).await?;
        assert_eq!(purchase.approval_status, ApprovalStatus::Approved);

        let edited = update_purchase(
            &db,
            purchase.id,
            PurchaseEdit {
                quantity: Some(20.0),
                notes: Some("reweighed".to_string()),
                ..Default::default()
            },
        )
        .await?;

        assert_eq!(edited.total_value, 1800.0);
        assert_eq!(edited.commission_amount, 90.0);
        assert_eq!(edited.unit_price, 90.0);
        assert_eq!(edited.price_status, PriceStatus::Below);
        assert_eq!(edited.approval_status, ApprovalStatus::Approved);
        assert_eq!(edited.notes.as_deref(), Some("reweighed"));

        let result = update_purchase(
            &db,
            purchase.id,
            PurchaseEdit {
                quantity: Some(0.0),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::InvalidAmount { amount: _ }));

        Ok(())
    }

    #[tokio::test]
    async fn test_deactivated_entry_keeps_history_and_prices() -> Result<()> {
        let db = setup_test_db().await?;
        let buyer = create_test_buyer(&db, "Bruno").await?;
        let supplier = create_test_supplier(&db, "Sucata Sul", 1000.0).await?;
        let entry = create_test_entry(&db, supplier.id, "Copper", 40.0).await?;

        let before = create_test_purchase(&db, &buyer, entry.id, 2.0).await?;
        deactivate_entry(&db, entry.id).await?;

        let stored = get_purchase(&db, before.id).await?;
        assert_eq!(stored, before);

        let after = create_test_purchase(&db, &buyer, entry.id, 3.0).await?;
        assert_eq!(after.unit_price, 40.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_entry_must_belong_to_supplier() -> Result<()> {
        let db = setup_test_db().await?;
        let buyer = create_test_buyer(&db, "Bruno").await?;
        let supplier = create_test_supplier(&db, "Sucata Sul", 1000.0).await?;
        let other = create_test_supplier(&db, "Metais Norte", 1000.0).await?;
        let entry = create_test_entry(&db, other.id, "Copper", 40.0).await?;

        let new = form(supplier.id, entry.id, 1.0).validate()?;
        let result = create_purchase(&db, &Actor::from(&buyer), new).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { message: _ }));

        let new = form(999, entry.id, 1.0).validate()?;
        let result = create_purchase(&db, &Actor::from(&buyer), new).await;
        assert!(matches!(result.unwrap_err(), Error::NotFound { .. }));

        let new = form(supplier.id, 999, 1.0).validate()?;
        let result = create_purchase(&db, &Actor::from(&buyer), new).await;
        assert!(matches!(result.unwrap_err(), Error::NotFound { .. }));

        assert_eq!(Purchase::find().count(&db).await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_ceiling_change_does_not_touch_existing_purchases() -> Result<()> {
        let db = setup_test_db().await?;
        let buyer = create_test_buyer(&db, "Bruno").await?;
        let supplier = create_test_supplier(&db, "Sucata Sul", 1000.0).await?;
        let entry = create_test_entry(&db, supplier.id, "Copper", 150.0).await?;

        let pending = create_test_purchase(&db, &buyer, entry.id, 10.0).await?;
        crate::core::supplier::update_banking(
            &db,
            supplier.id,
            crate::core::supplier::BankingDetails::default(),
            5000.0,
        )
        .await?;

        let stored = get_purchase(&db, pending.id).await?;
        assert_eq!(stored.price_ceiling, 1000.0);
        assert_eq!(stored.approval_status, ApprovalStatus::Pending);

        let next = create_test_purchase(&db, &buyer, entry.id, 10.0).await?;
        assert_eq!(next.price_ceiling, 5000.0);
        assert_eq!(next.approval_status, ApprovalStatus::Approved);

        Ok(())
    }

    #[tokio::test]
    async fn test_list_and_delete() -> Result<()> {
        let db = setup_test_db().await?;
        let buyer = create_test_buyer(&db, "Bruno").await?;
        let supplier = create_test_supplier(&db, "Sucata Sul", 1000.0).await?;
        let entry = create_test_entry(&db, supplier.id, "Copper", 10.0).await?;

        let older = create_test_purchase_on(&db, &buyer, entry.id, 1.0, "2024-01-10").await?;
        let newer = create_test_purchase_on(&db, &buyer, entry.id, 1.0, "2024-02-10").await?;

        let page = list_purchases(&db, PageRequest::new(1, 10)?).await?;
        let ids: Vec<i64> = page.items.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![newer.id, older.id]);

        delete_purchase(&db, older.id).await?;
        let result = get_purchase(&db, older.id).await;
        assert!(matches!(result.unwrap_err(), Error::NotFound { .. }));

        let result = delete_purchase(&db, older.id).await;
        assert!(matches!(result.unwrap_err(), Error::NotFound { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_buyer_is_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        let supplier = create_test_supplier(&db, "Sucata Sul", 1000.0).await?;
        let entry = create_test_entry(&db, supplier.id, "Copper", 10.0).await?;

        let ghost = Actor::new(4242, Role::Buyer);
        let new = form(supplier.id, entry.id, 1.0).validate()?;
        let result = create_purchase(&db, &ghost, new).await;
        assert!(matches!(result.unwrap_err(), Error::NotFound { .. }));

        Ok(())
    }
}
