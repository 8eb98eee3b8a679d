//! Monthly commission calculator
//!
//! Sums a buyer's approved purchases for one calendar month and writes the
//! result into that month's commission record, creating it on first run and
//! overwriting it on later runs. Records already marked paid are locked.

use crate::{
    auth::BUYER_ROLES,
    core::{
        commission::{find_record, get_commission_percentage},
        pricing::commission_amount,
        user::{get_user, list_active_users_with_roles},
    },
    entities::{ApprovalStatus, PaymentStatus, Purchase, commission_record, purchase},
    errors::{Error, Result},
};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use sea_orm::{Set, TransactionTrait, prelude::*};
use std::{fmt, fmt::Write, str::FromStr};

/// A calendar month, written `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReferenceMonth {
    year: i32,
    month: u32,
}

impl ReferenceMonth {
    /// Builds a month, rejecting anything outside 1..=12.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] for an impossible month.
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) || NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(Error::validation(format!(
                "Invalid reference month {year:04}-{month:02}"
            )));
        }
        Ok(Self { year, month })
    }

    /// The month containing `instant`.
    #[must_use]
    pub fn containing(instant: DateTime<Utc>) -> Self {
        Self {
            year: instant.year(),
            month: instant.month(),
        }
    }

    /// Calendar year
    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    /// Month number, 1 to 12
    #[must_use]
    pub const fn month(self) -> u32 {
        self.month
    }

    /// The following month.
    #[must_use]
    pub const fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Midnight UTC on the first day of the month.
    ///
    /// # Errors
    /// Only fails for years chrono cannot represent.
    pub fn start(self) -> Result<DateTime<Utc>> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .map(|d| d.and_time(chrono::NaiveTime::MIN).and_utc())
            .ok_or_else(|| Error::validation(format!("Invalid reference month {self}")))
    }

    /// Half-open `[start, next_start)` UTC range covering the month.
    pub fn bounds(self) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
        Ok((self.start()?, self.next().start()?))
    }
}

impl fmt::Display for ReferenceMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for ReferenceMonth {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let malformed = || Error::validation(format!("Reference month must be YYYY-MM, got '{s}'"));

        let (year, month) = s.trim().split_once('-').ok_or_else(malformed)?;
        let digits = |part: &str, len: usize| part.len() == len && part.bytes().all(|b| b.is_ascii_digit());
        if !digits(year, 4) || !digits(month, 2) {
            return Err(malformed());
        }
        let year = year.parse::<i32>().map_err(|_| malformed())?;
        let month = month.parse::<u32>().map_err(|_| malformed())?;
        Self::new(year, month)
    }
}

/// Sum of a buyer's approved purchase totals within `month`.
pub async fn approved_total_for_month<C>(db: &C, buyer_id: i64, month: ReferenceMonth) -> Result<f64>
where
    C: ConnectionTrait,
{
    let (start, end) = month.bounds()?;
    let purchases = Purchase::find()
        .filter(purchase::Column::BuyerId.eq(buyer_id))
        .filter(purchase::Column::ApprovalStatus.eq(ApprovalStatus::Approved))
        .filter(purchase::Column::PurchasedAt.gte(start))
        .filter(purchase::Column::PurchasedAt.lt(end))
        .all(db)
        .await?;

    Ok(purchases.iter().map(|p| p.total_value).sum())
}

/// Calculates (or recalculates) one buyer's commission for `month`.
///
/// Uses the buyer's percentage at the time of calculation. Running it twice
/// with no purchase changes in between yields identical totals.
///
/// # Errors
/// Returns an error if:
/// - The buyer doesn't exist
/// - The month's record is already paid ([`Error::Conflict`])
pub async fn calculate_monthly_commission(
    db: &DatabaseConnection,
    buyer_id: i64,
    month: ReferenceMonth,
) -> Result<commission_record::Model> {
    let reference_month = month.to_string();

    // Sum and upsert in one transaction
    let txn = db.begin().await?;

    get_user(&txn, buyer_id).await?;
    let existing = find_record(&txn, buyer_id, &reference_month).await?;
    if let Some(record) = &existing {
        if record.payment_status == PaymentStatus::Paid {
            return Err(Error::conflict(format!(
                "Commission for buyer {buyer_id} in {reference_month} is already paid"
            )));
        }
    }

    let total = approved_total_for_month(&txn, buyer_id, month).await?;
    let percentage = get_commission_percentage(&txn, buyer_id).await?;
    let commission = commission_amount(total, percentage);
    let now = Utc::now();

    let record = if let Some(record) = existing {
        let mut record: commission_record::ActiveModel = record.into();
        record.percentage = Set(percentage);
        record.total_purchases = Set(total);
        record.commission_total = Set(commission);
        record.updated_at = Set(now);
        record.update(&txn).await?
    } else {
        commission_record::ActiveModel {
            buyer_id: Set(buyer_id),
            reference_month: Set(reference_month.clone()),
            percentage: Set(percentage),
            total_purchases: Set(total),
            commission_total: Set(commission),
            payment_status: Set(PaymentStatus::Pending),
            paid_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?
    };

    txn.commit().await?;

    tracing::info!(
        buyer_id,
        month = %reference_month,
        total,
        percentage,
        commission,
        "monthly commission calculated"
    );
    Ok(record)
}

/// One buyer's line in a month run.
#[derive(Debug, Clone)]
pub struct BuyerCommission {
    /// Buyer's display name
    pub buyer_name: String,
    /// The calculated record
    pub record: commission_record::Model,
}

/// Outcome of calculating a month for every buyer.
#[derive(Debug, Clone)]
pub struct MonthlyCommissionRun {
    /// Month that was calculated
    pub month: ReferenceMonth,
    /// Buyers whose record was written
    pub calculated: Vec<BuyerCommission>,
    /// Buyers whose record was already paid and left untouched
    pub skipped_paid: Vec<String>,
}

impl MonthlyCommissionRun {
    /// Sum of commission owed across calculated buyers.
    #[must_use]
    pub fn total_commission(&self) -> f64 {
        self.calculated.iter().map(|c| c.record.commission_total).sum()
    }
}

/// Runs [`calculate_monthly_commission`] for every active buyer and admin.
///
/// Paid records are skipped with a warning instead of failing the run.
pub async fn calculate_all_buyers(
    db: &DatabaseConnection,
    month: ReferenceMonth,
) -> Result<MonthlyCommissionRun> {
    let buyers = list_active_users_with_roles(db, BUYER_ROLES).await?;

    let mut calculated = Vec::new();
    let mut skipped_paid = Vec::new();
    for buyer in buyers {
        match calculate_monthly_commission(db, buyer.id, month).await {
            Ok(record) => calculated.push(BuyerCommission {
                buyer_name: buyer.name,
                record,
            }),
            Err(Error::Conflict { message }) => {
                tracing::warn!(buyer_id = buyer.id, %month, "{message}");
                skipped_paid.push(buyer.name);
            }
            Err(e) => return Err(e),
        }
    }

    tracing::info!(
        %month,
        calculated = calculated.len(),
        skipped = skipped_paid.len(),
        "monthly commission run finished"
    );
    Ok(MonthlyCommissionRun {
        month,
        calculated,
        skipped_paid,
    })
}

/// Renders a month run as a human-readable summary.
pub fn format_commission_summary(run: &MonthlyCommissionRun) -> Result<String> {
    let mut out = String::new();

    writeln!(out, "Commission summary for {}", run.month)?;
    writeln!(out)?;

    if run.calculated.is_empty() {
        writeln!(out, "No buyers to calculate.")?;
    }
    for line in &run.calculated {
        writeln!(
            out,
            "{}: ${:.2} in approved purchases at {:.2}% = ${:.2} ({})",
            line.buyer_name,
            line.record.total_purchases,
            line.record.percentage,
            line.record.commission_total,
            line.record.payment_status
        )?;
    }

    if !run.skipped_paid.is_empty() {
        writeln!(out)?;
        writeln!(out, "Already paid, not recalculated: {}", run.skipped_paid.join(", "))?;
    }

    writeln!(out)?;
    write!(out, "Total commission: ${:.2}", run.total_commission())?;

    Ok(out)
}
