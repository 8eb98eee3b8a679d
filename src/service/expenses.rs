//! Expense and employee records.
//!
//! Buyers record and remove expenses; employees are managed by administrators.

use super::AppContext;
use crate::{
    auth::{ADMIN_ROLES, Actor, BUYER_ROLES, READ_ROLES, authorize},
    core::{
        employee::{self, EmployeeDetails},
        expense::{self, ExpenseDetails},
        pagination::Page,
    },
    entities::{employee as employee_entity, expense as expense_entity},
    errors::Result,
};

/// Records an expense for the acting buyer.
pub async fn record_expense(
    ctx: &AppContext,
    actor: &Actor,
    details: ExpenseDetails,
) -> Result<expense_entity::Model> {
    authorize(actor, BUYER_ROLES, "record expenses")?;
    expense::create_expense(&ctx.database, actor, details).await
}

/// Replaces an expense's details.
pub async fn edit_expense(
    ctx: &AppContext,
    actor: &Actor,
    expense_id: i64,
    details: ExpenseDetails,
) -> Result<expense_entity::Model> {
    authorize(actor, BUYER_ROLES, "edit expenses")?;
    expense::update_expense(&ctx.database, expense_id, details).await
}

/// Deletes an expense.
pub async fn remove_expense(ctx: &AppContext, actor: &Actor, expense_id: i64) -> Result<()> {
    authorize(actor, BUYER_ROLES, "delete expenses")?;
    expense::delete_expense(&ctx.database, expense_id).await
}

/// Lists expenses newest first.
pub async fn list_expenses(
    ctx: &AppContext,
    actor: &Actor,
    page: u64,
) -> Result<Page<expense_entity::Model>> {
    authorize(actor, READ_ROLES, "view expenses")?;
    expense::list_expenses(&ctx.database, ctx.page(page)?).await
}

/// Registers an employee.
pub async fn register_employee(
    ctx: &AppContext,
    actor: &Actor,
    details: EmployeeDetails,
) -> Result<employee_entity::Model> {
    authorize(actor, ADMIN_ROLES, "manage employees")?;
    employee::create_employee(&ctx.database, details).await
}

/// Replaces an employee's details.
pub async fn edit_employee(
    ctx: &AppContext,
    actor: &Actor,
    employee_id: i64,
    details: EmployeeDetails,
) -> Result<employee_entity::Model> {
    authorize(actor, ADMIN_ROLES, "manage employees")?;
    employee::update_employee(&ctx.database, employee_id, details).await
}

/// Removes an employee.
pub async fn remove_employee(ctx: &AppContext, actor: &Actor, employee_id: i64) -> Result<()> {
    authorize(actor, ADMIN_ROLES, "manage employees")?;
    employee::delete_employee(&ctx.database, employee_id).await
}

/// Lists employees by name.
pub async fn list_employees(ctx: &AppContext, actor: &Actor) -> Result<Vec<employee_entity::Model>> {
    authorize(actor, READ_ROLES, "view employees")?;
    employee::list_employees(&ctx.database).await
}
