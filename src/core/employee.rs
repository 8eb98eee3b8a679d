//! Employee registry.

use crate::{
    core::documents,
    entities::{Employee, employee},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};

/// Fields of an employee record.
#[derive(Debug, Clone, Default)]
pub struct EmployeeDetails {
    /// Full name (required)
    pub name: String,
    /// CPF, punctuation allowed (required)
    pub cpf: String,
    /// Phone
    pub phone: Option<String>,
    /// Job title
    pub position: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl EmployeeDetails {
    /// Validates the record and returns `(name, cpf digits)`.
    fn validate(&self) -> Result<(String, String)> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(Error::validation("Employee name cannot be empty"));
        }
        if !documents::is_valid_cpf(&self.cpf) {
            return Err(Error::validation(format!("Invalid CPF '{}'", self.cpf)));
        }
        Ok((name.to_string(), documents::strip_document(&self.cpf)))
    }
}

async fn ensure_cpf_free(db: &DatabaseConnection, cpf: &str, except: Option<i64>) -> Result<()> {
    let mut query = Employee::find().filter(employee::Column::Cpf.eq(cpf));
    if let Some(id) = except {
        query = query.filter(employee::Column::Id.ne(id));
    }
    if query.count(db).await? > 0 {
        return Err(Error::conflict(format!(
            "CPF {} is already registered",
            documents::format_cpf(cpf)
        )));
    }
    Ok(())
}

/// Registers an employee.
pub async fn create_employee(
    db: &DatabaseConnection,
    details: EmployeeDetails,
) -> Result<employee::Model> {
    let (name, cpf) = details.validate()?;
    ensure_cpf_free(db, &cpf, None).await?;

    let now = chrono::Utc::now();
    let employee = employee::ActiveModel {
        name: Set(name),
        cpf: Set(cpf),
        phone: Set(non_blank(details.phone)),
        position: Set(non_blank(details.position)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let employee = employee.insert(db).await?;
    tracing::info!(employee_id = employee.id, "employee registered");
    Ok(employee)
}

/// Finds an employee by id.
pub async fn get_employee(db: &DatabaseConnection, employee_id: i64) -> Result<employee::Model> {
    Employee::find_by_id(employee_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Employee", employee_id))
}

/// Lists employees by name.
pub async fn list_employees(db: &DatabaseConnection) -> Result<Vec<employee::Model>> {
    Employee::find()
        .order_by_asc(employee::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Replaces an employee's details.
pub async fn update_employee(
    db: &DatabaseConnection,
    employee_id: i64,
    details: EmployeeDetails,
) -> Result<employee::Model> {
    let (name, cpf) = details.validate()?;
    let mut employee: employee::ActiveModel = get_employee(db, employee_id).await?.into();
    ensure_cpf_free(db, &cpf, Some(employee_id)).await?;

    employee.name = Set(name);
    employee.cpf = Set(cpf);
    employee.phone = Set(non_blank(details.phone));
    employee.position = Set(non_blank(details.position));
    employee.updated_at = Set(chrono::Utc::now());

    employee.update(db).await.map_err(Into::into)
}

/// Removes an employee.
pub async fn delete_employee(db: &DatabaseConnection, employee_id: i64) -> Result<()> {
    let result = Employee::delete_by_id(employee_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::not_found("Employee", employee_id));
    }
    tracing::info!(employee_id, "employee deleted");
    Ok(())
}
