//! Report generation business logic.
//!
//! The query half of this module selects and aggregates purchases and
//! expenses. The render half turns finished rows into plain-text tables and
//! performs no business computation of its own.

use crate::{
    core::monthly::ReferenceMonth,
    entities::{
        ApprovalStatus, Expense, PaymentMethod, PriceEntry, Purchase, Supplier, expense,
        price_entry, purchase, supplier,
    },
    errors::{Error, Result},
};
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{QueryOrder, Select, prelude::*};
use std::{
    collections::{BTreeMap, HashMap},
    fmt::Write,
};

/// Purchase selection. Dates are whole days, both ends inclusive.
#[derive(Debug, Clone, Default)]
pub struct PurchaseFilter {
    /// First day included
    pub from: Option<NaiveDate>,
    /// Last day included
    pub to: Option<NaiveDate>,
    /// Only this supplier
    pub supplier_id: Option<i64>,
    /// Only this approval state
    pub approval_status: Option<ApprovalStatus>,
}

/// Expense selection. Dates are whole days, both ends inclusive.
#[derive(Debug, Clone, Default)]
pub struct ExpenseFilter {
    /// First day included
    pub from: Option<NaiveDate>,
    /// Last day included
    pub to: Option<NaiveDate>,
    /// Only this payment method
    pub payment_method: Option<PaymentMethod>,
    /// Smallest amount included
    pub min_amount: Option<f64>,
    /// Largest amount included
    pub max_amount: Option<f64>,
}

/// A purchase with the names a report prints next to it.
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseLine {
    /// The purchase row
    pub purchase: purchase::Model,
    /// Supplier legal name
    pub supplier_name: String,
    /// Catalog entry name, even if the entry was deactivated since
    pub item_name: String,
}

/// Purchase lines ready for export, with their grand total.
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseReport {
    /// Rows, newest first
    pub lines: Vec<PurchaseLine>,
    /// Sum of the rows' totals
    pub total: f64,
}

/// Expense rows ready for export, with their grand total.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseReport {
    /// Rows, newest first
    pub expenses: Vec<expense::Model>,
    /// Sum of the rows' amounts
    pub total: f64,
}

/// Purchases against expenses over a period.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodSummary {
    /// First day included
    pub from: NaiveDate,
    /// Last day included
    pub to: NaiveDate,
    /// Number of purchases
    pub purchase_count: usize,
    /// Sum of purchase totals
    pub purchase_total: f64,
    /// Number of expenses
    pub expense_count: usize,
    /// Sum of expense amounts
    pub expense_total: f64,
    /// `purchase_total - expense_total`
    pub balance: f64,
}

/// Purchases summed per calendar month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyTotal {
    /// Month as `YYYY-MM`
    pub month: String,
    /// Number of purchases
    pub count: usize,
    /// Sum of purchase totals
    pub total: f64,
}

fn midnight(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(chrono::NaiveTime::MIN).and_utc()
}

/// Converts inclusive whole days into a `[start, end)` instant range.
fn day_range(
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<(Option<DateTime<Utc>>, Option<DateTime<Utc>>)> {
    if let (Some(from), Some(to)) = (from, to) {
        if from > to {
            return Err(Error::validation(format!(
                "Start date {from} is after end date {to}"
            )));
        }
    }
    let start = from.map(midnight);
    let end = to
        .map(|d| {
            d.succ_opt()
                .map(midnight)
                .ok_or_else(|| Error::validation(format!("End date {d} is out of range")))
        })
        .transpose()?;
    Ok((start, end))
}

fn purchase_query(filter: &PurchaseFilter) -> Result<Select<Purchase>> {
    let (start, end) = day_range(filter.from, filter.to)?;

    let mut query = Purchase::find();
    if let Some(start) = start {
        query = query.filter(purchase::Column::PurchasedAt.gte(start));
    }
    if let Some(end) = end {
        query = query.filter(purchase::Column::PurchasedAt.lt(end));
    }
    if let Some(supplier_id) = filter.supplier_id {
        query = query.filter(purchase::Column::SupplierId.eq(supplier_id));
    }
    if let Some(status) = filter.approval_status {
        query = query.filter(purchase::Column::ApprovalStatus.eq(status));
    }
    Ok(query
        .order_by_desc(purchase::Column::PurchasedAt)
        .order_by_desc(purchase::Column::Id))
}

fn expense_query(filter: &ExpenseFilter) -> Result<Select<Expense>> {
    let (start, end) = day_range(filter.from, filter.to)?;

    let mut query = Expense::find();
    if let Some(start) = start {
        query = query.filter(expense::Column::SpentAt.gte(start));
    }
    if let Some(end) = end {
        query = query.filter(expense::Column::SpentAt.lt(end));
    }
    if let Some(method) = filter.payment_method {
        query = query.filter(expense::Column::PaymentMethod.eq(method));
    }
    if let Some(min) = filter.min_amount {
        query = query.filter(expense::Column::Amount.gte(min));
    }
    if let Some(max) = filter.max_amount {
        query = query.filter(expense::Column::Amount.lte(max));
    }
    Ok(query
        .order_by_desc(expense::Column::SpentAt)
        .order_by_desc(expense::Column::Id))
}

/// Purchases matching `filter`, newest first, with supplier and item names.
pub async fn filter_purchases(
    db: &DatabaseConnection,
    filter: &PurchaseFilter,
) -> Result<Vec<PurchaseLine>> {
    let purchases = purchase_query(filter)?.all(db).await?;

    let supplier_ids: Vec<i64> = purchases.iter().map(|p| p.supplier_id).collect();
    let entry_ids: Vec<i64> = purchases.iter().map(|p| p.price_entry_id).collect();

    let supplier_names: HashMap<i64, String> = Supplier::find()
        .filter(supplier::Column::Id.is_in(supplier_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|s| (s.id, s.legal_name))
        .collect();
    let item_names: HashMap<i64, String> = PriceEntry::find()
        .filter(price_entry::Column::Id.is_in(entry_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|e| (e.id, e.name))
        .collect();

    Ok(purchases
        .into_iter()
        .map(|purchase| PurchaseLine {
            supplier_name: supplier_names
                .get(&purchase.supplier_id)
                .cloned()
                .unwrap_or_else(|| format!("#{}", purchase.supplier_id)),
            item_name: item_names
                .get(&purchase.price_entry_id)
                .cloned()
                .unwrap_or_else(|| format!("#{}", purchase.price_entry_id)),
            purchase,
        })
        .collect())
}

/// Expenses matching `filter`, newest first.
pub async fn filter_expenses(
    db: &DatabaseConnection,
    filter: &ExpenseFilter,
) -> Result<Vec<expense::Model>> {
    expense_query(filter)?.all(db).await.map_err(Into::into)
}

/// Selects purchases for export and totals them.
pub async fn purchase_report(
    db: &DatabaseConnection,
    filter: &PurchaseFilter,
) -> Result<PurchaseReport> {
    let lines = filter_purchases(db, filter).await?;
    let total = lines.iter().map(|l| l.purchase.total_value).sum();
    Ok(PurchaseReport { lines, total })
}

/// Selects expenses for export and totals them.
pub async fn expense_report(db: &DatabaseConnection, filter: &ExpenseFilter) -> Result<ExpenseReport> {
    let expenses = filter_expenses(db, filter).await?;
    let total = expenses.iter().map(|e| e.amount).sum();
    Ok(ExpenseReport { expenses, total })
}

/// Totals purchases and expenses between two days, inclusive.
pub async fn period_summary(
    db: &DatabaseConnection,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<PeriodSummary> {
    let purchases = purchase_query(&PurchaseFilter {
        from: Some(from),
        to: Some(to),
        ..Default::default()
    })?
    .all(db)
    .await?;
    let expenses = expense_query(&ExpenseFilter {
        from: Some(from),
        to: Some(to),
        ..Default::default()
    })?
    .all(db)
    .await?;

    let purchase_total: f64 = purchases.iter().map(|p| p.total_value).sum();
    let expense_total: f64 = expenses.iter().map(|e| e.amount).sum();

    Ok(PeriodSummary {
        from,
        to,
        purchase_count: purchases.len(),
        purchase_total,
        expense_count: expenses.len(),
        expense_total,
        balance: purchase_total - expense_total,
    })
}

/// Purchase totals per month from `since` onwards, oldest month first.
pub async fn monthly_purchase_totals(
    db: &DatabaseConnection,
    since: ReferenceMonth,
) -> Result<Vec<MonthlyTotal>> {
    let purchases = Purchase::find()
        .filter(purchase::Column::PurchasedAt.gte(since.start()?))
        .all(db)
        .await?;

    let mut months: BTreeMap<ReferenceMonth, (usize, f64)> = BTreeMap::new();
    for purchase in &purchases {
        let bucket = months
            .entry(ReferenceMonth::containing(purchase.purchased_at))
            .or_insert((0, 0.0));
        bucket.0 += 1;
        bucket.1 += purchase.total_value;
    }

    Ok(months
        .into_iter()
        .map(|(month, (count, total))| MonthlyTotal {
            month: month.to_string(),
            count,
            total,
        })
        .collect())
}

/// Formats an amount with two decimals and a currency sign.
#[must_use]
pub fn format_money(amount: f64) -> String {
    if amount < 0.0 {
        format!("-${:.2}", amount.abs())
    } else {
        format!("${amount:.2}")
    }
}

/// Renders purchase lines as a text table with a TOTAL row.
pub fn render_purchase_report(report: &PurchaseReport) -> Result<String> {
    let mut out = String::new();
    writeln!(
        out,
        "{:<10} {:<24} {:<20} {:>10} {:>12} {:>14} {:<8}",
        "DATE", "SUPPLIER", "ITEM", "QTY", "UNIT PRICE", "TOTAL", "STATUS"
    )?;

    for line in &report.lines {
        let p = &line.purchase;
        writeln!(
            out,
            "{:<10} {:<24} {:<20} {:>10.2} {:>12} {:>14} {:<8}",
            p.purchased_at.format("%Y-%m-%d"),
            truncate(&line.supplier_name, 24),
            truncate(&line.item_name, 20),
            p.quantity,
            format_money(p.unit_price),
            format_money(p.total_value),
            p.approval_status
        )?;
    }

    write!(
        out,
        "{:<10} {:<24} {:<20} {:>10} {:>12} {:>14}",
        "TOTAL",
        format!("{} purchases", report.lines.len()),
        "",
        "",
        "",
        format_money(report.total)
    )?;
    Ok(out)
}

/// Renders expenses as a text table with a TOTAL row.
pub fn render_expense_report(report: &ExpenseReport) -> Result<String> {
    let mut out = String::new();
    writeln!(
        out,
        "{:<10} {:<24} {:<8} {:<28} {:>14}",
        "DATE", "PAYEE", "METHOD", "DESCRIPTION", "AMOUNT"
    )?;

    for e in &report.expenses {
        writeln!(
            out,
            "{:<10} {:<24} {:<8} {:<28} {:>14}",
            e.spent_at.format("%Y-%m-%d"),
            truncate(&e.payee_name, 24),
            e.payment_method.map_or("-", PaymentMethod::as_str),
            truncate(e.description.as_deref().unwrap_or(""), 28),
            format_money(e.amount)
        )?;
    }

    write!(
        out,
        "{:<10} {:<24} {:<8} {:<28} {:>14}",
        "TOTAL",
        format!("{} expenses", report.expenses.len()),
        "",
        "",
        format_money(report.total)
    )?;
    Ok(out)
}

/// Renders a period summary.
pub fn render_period_summary(summary: &PeriodSummary) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "Period {} to {}", summary.from, summary.to)?;
    writeln!(
        out,
        "Purchases: {} ({})",
        format_money(summary.purchase_total),
        summary.purchase_count
    )?;
    writeln!(
        out,
        "Expenses:  {} ({})",
        format_money(summary.expense_total),
        summary.expense_count
    )?;
    write!(out, "Balance:   {}", format_money(summary.balance))?;
    Ok(out)
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
