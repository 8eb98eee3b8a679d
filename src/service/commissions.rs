//! Commission rates, monthly runs and payouts.
//!
//! Everything here is administrator-only except reading one's own records.

use super::AppContext;
use crate::{
    auth::{ADMIN_ROLES, Actor, READ_ROLES, authorize},
    core::{
        commission,
        monthly::{self, MonthlyCommissionRun, ReferenceMonth},
        pagination::Page,
    },
    entities::{commission_rate, commission_record},
    errors::Result,
};

/// Sets a buyer's commission percentage.
pub async fn set_rate(
    ctx: &AppContext,
    actor: &Actor,
    buyer_id: i64,
    percentage: f64,
) -> Result<commission_rate::Model> {
    authorize(actor, ADMIN_ROLES, "set commission rates")?;
    commission::set_rate(&ctx.database, buyer_id, percentage).await
}

/// Reads a buyer's rate, creating it at 0% if it was never set.
pub async fn show_rate(
    ctx: &AppContext,
    actor: &Actor,
    buyer_id: i64,
) -> Result<commission_rate::Model> {
    authorize(actor, ADMIN_ROLES, "view commission rates")?;
    commission::get_or_create_rate(&ctx.database, buyer_id).await
}

/// Calculates one buyer's commission for a `YYYY-MM` month.
pub async fn calculate(
    ctx: &AppContext,
    actor: &Actor,
    buyer_id: i64,
    month: &str,
) -> Result<commission_record::Model> {
    authorize(actor, ADMIN_ROLES, "calculate commissions")?;
    let month: ReferenceMonth = month.parse()?;
    monthly::calculate_monthly_commission(&ctx.database, buyer_id, month).await
}

/// Calculates a `YYYY-MM` month for every active buyer.
pub async fn calculate_all(
    ctx: &AppContext,
    actor: &Actor,
    month: &str,
) -> Result<MonthlyCommissionRun> {
    authorize(actor, ADMIN_ROLES, "calculate commissions")?;
    let month: ReferenceMonth = month.parse()?;
    monthly::calculate_all_buyers(&ctx.database, month).await
}

/// Marks a commission record paid.
pub async fn mark_paid(
    ctx: &AppContext,
    actor: &Actor,
    record_id: i64,
) -> Result<commission_record::Model> {
    authorize(actor, ADMIN_ROLES, "mark commissions paid")?;
    commission::mark_paid(&ctx.database, record_id).await
}

/// Lists all commission records, latest month first.
pub async fn list_records(
    ctx: &AppContext,
    actor: &Actor,
    page: u64,
) -> Result<Page<commission_record::Model>> {
    authorize(actor, ADMIN_ROLES, "view commissions")?;
    commission::list_records(&ctx.database, ctx.page(page)?).await
}

/// Lists the acting user's own commission records.
pub async fn my_records(ctx: &AppContext, actor: &Actor) -> Result<Vec<commission_record::Model>> {
    authorize(actor, READ_ROLES, "view own commissions")?;
    commission::list_records_for_buyer(&ctx.database, actor.id).await
}
