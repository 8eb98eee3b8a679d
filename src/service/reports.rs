//! Read-only reports.

use super::AppContext;
use crate::{
    auth::{Actor, READ_ROLES, authorize},
    core::{
        monthly::ReferenceMonth,
        report::{self, ExpenseFilter, MonthlyTotal, PeriodSummary, PurchaseFilter},
    },
    errors::Result,
};
use chrono::NaiveDate;

/// Renders the purchase report for `filter`.
pub async fn purchase_report(
    ctx: &AppContext,
    actor: &Actor,
    filter: &PurchaseFilter,
) -> Result<String> {
    authorize(actor, READ_ROLES, "view reports")?;
    let purchases = report::purchase_report(&ctx.database, filter).await?;
    report::render_purchase_report(&purchases)
}

/// Renders the expense report for `filter`.
pub async fn expense_report(
    ctx: &AppContext,
    actor: &Actor,
    filter: &ExpenseFilter,
) -> Result<String> {
    authorize(actor, READ_ROLES, "view reports")?;
    let expenses = report::expense_report(&ctx.database, filter).await?;
    report::render_expense_report(&expenses)
}

/// Purchases against expenses between two days.
pub async fn summary(
    ctx: &AppContext,
    actor: &Actor,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<PeriodSummary> {
    authorize(actor, READ_ROLES, "view reports")?;
    report::period_summary(&ctx.database, from, to).await
}

/// Monthly purchase totals since a `YYYY-MM` month.
pub async fn monthly_totals(
    ctx: &AppContext,
    actor: &Actor,
    since: &str,
) -> Result<Vec<MonthlyTotal>> {
    authorize(actor, READ_ROLES, "view reports")?;
    let since: ReferenceMonth = since.parse()?;
    report::monthly_purchase_totals(&ctx.database, since).await
}
