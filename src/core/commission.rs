//! Commission ledger
//!
//! Holds each buyer's current commission percentage and the monthly commission
//! records produced by [`crate::core::monthly`].

use crate::{
    core::{
        pagination::{Page, PageRequest, fetch_page},
        user::get_user,
    },
    entities::{CommissionRate, CommissionRecord, PaymentStatus, commission_rate, commission_record},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};

/// Reads a buyer's current percentage without creating anything.
///
/// A buyer without a rate earns 0%.
pub async fn get_commission_percentage<C>(db: &C, buyer_id: i64) -> Result<f64>
where
    C: ConnectionTrait,
{
    let rate = CommissionRate::find()
        .filter(commission_rate::Column::BuyerId.eq(buyer_id))
        .one(db)
        .await?;
    Ok(rate.map_or(0.0, |r| r.percentage))
}

/// Returns the buyer's rate row, creating it at 0% on first access.
pub async fn get_or_create_rate<C>(db: &C, buyer_id: i64) -> Result<commission_rate::Model>
where
    C: ConnectionTrait,
{
    if let Some(rate) = CommissionRate::find()
        .filter(commission_rate::Column::BuyerId.eq(buyer_id))
        .one(db)
        .await?
    {
        return Ok(rate);
    }

    get_user(db, buyer_id).await?;

    let rate = commission_rate::ActiveModel {
        buyer_id: Set(buyer_id),
        percentage: Set(0.0),
        updated_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    let rate = rate.insert(db).await?;
    tracing::debug!(buyer_id, "commission rate created at 0%");
    Ok(rate)
}

/// Sets a buyer's commission percentage.
///
/// Only purchases submitted afterwards use the new percentage.
///
/// # Errors
/// Returns an error if:
/// - The percentage is negative or not finite
/// - The buyer doesn't exist
pub async fn set_rate(
    db: &DatabaseConnection,
    buyer_id: i64,
    percentage: f64,
) -> Result<commission_rate::Model> {
    if !percentage.is_finite() || percentage < 0.0 {
        return Err(Error::InvalidAmount { amount: percentage });
    }

    let mut rate: commission_rate::ActiveModel = get_or_create_rate(db, buyer_id).await?.into();
    rate.percentage = Set(percentage);
    rate.updated_at = Set(chrono::Utc::now());

    let rate = rate.update(db).await?;
    tracing::info!(buyer_id, percentage, "commission rate updated");
    Ok(rate)
}

/// Finds a commission record by id.
pub async fn get_record<C>(db: &C, record_id: i64) -> Result<commission_record::Model>
where
    C: ConnectionTrait,
{
    CommissionRecord::find_by_id(record_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Commission record", record_id))
}

/// Finds the record of `buyer_id` for a `YYYY-MM` month, if calculated.
pub async fn find_record<C>(
    db: &C,
    buyer_id: i64,
    reference_month: &str,
) -> Result<Option<commission_record::Model>>
where
    C: ConnectionTrait,
{
    CommissionRecord::find()
        .filter(commission_record::Column::BuyerId.eq(buyer_id))
        .filter(commission_record::Column::ReferenceMonth.eq(reference_month))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists all records, latest month first.
pub async fn list_records(
    db: &DatabaseConnection,
    request: PageRequest,
) -> Result<Page<commission_record::Model>> {
    fetch_page(
        CommissionRecord::find()
            .order_by_desc(commission_record::Column::ReferenceMonth)
            .order_by_asc(commission_record::Column::BuyerId),
        db,
        request,
    )
    .await
}

/// Lists one buyer's records, latest month first.
pub async fn list_records_for_buyer(
    db: &DatabaseConnection,
    buyer_id: i64,
) -> Result<Vec<commission_record::Model>> {
    CommissionRecord::find()
        .filter(commission_record::Column::BuyerId.eq(buyer_id))
        .order_by_desc(commission_record::Column::ReferenceMonth)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Marks a record paid and stamps the payment time.
///
/// Marking an already paid record again is accepted and moves `paid_at` to now.
pub async fn mark_paid(
    db: &DatabaseConnection,
    record_id: i64,
) -> Result<commission_record::Model> {
    let record = get_record(db, record_id).await?;
    let previously_paid = record.payment_status == PaymentStatus::Paid;

    let now = chrono::Utc::now();
    let mut record: commission_record::ActiveModel = record.into();
    record.payment_status = Set(PaymentStatus::Paid);
    record.paid_at = Set(Some(now));
    record.updated_at = Set(now);

    let record = record.update(db).await?;
    if previously_paid {
        tracing::warn!(record_id, "commission record was already paid; payment time overwritten");
    } else {
        tracing::info!(
            record_id,
            buyer_id = record.buyer_id,
            month = %record.reference_month,
            amount = record.commission_total,
            "commission marked paid"
        );
    }
    Ok(record)
}
