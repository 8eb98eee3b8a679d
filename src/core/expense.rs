//! Expense business logic
//!
//! Operational spending recorded by buyers: who was paid, how, and how much.

use crate::{
    auth::Actor,
    core::{
        pagination::{Page, PageRequest, fetch_page},
        user::get_user,
    },
    entities::{Expense, PaymentMethod, PaymentTerms, expense},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{QueryOrder, Set, prelude::*};

/// Everything that describes an expense apart from who recorded it.
#[derive(Debug, Clone, Default)]
pub struct ExpenseDetails {
    /// Person or company paid (required)
    pub payee_name: String,
    /// Street
    pub street: Option<String>,
    /// Street number
    pub street_number: Option<String>,
    /// City
    pub city: Option<String>,
    /// Postal code
    pub postal_code: Option<String>,
    /// State
    pub state: Option<String>,
    /// Payee phone
    pub phone: Option<String>,
    /// Payee e-mail
    pub email: Option<String>,
    /// Payee bank
    pub bank_name: Option<String>,
    /// Payee branch
    pub bank_branch: Option<String>,
    /// Payee account
    pub bank_account: Option<String>,
    /// Payee instant-payment key
    pub pix_key: Option<String>,
    /// Cash or installments
    pub payment_terms: Option<PaymentTerms>,
    /// Cheque, pix, ted or boleto
    pub payment_method: Option<PaymentMethod>,
    /// What was paid for
    pub description: Option<String>,
    /// Amount paid, strictly positive
    pub amount: f64,
    /// Free-text notes
    pub notes: Option<String>,
    /// Path of a scanned receipt
    pub receipt_path: Option<String>,
    /// When the money was spent; now when absent
    pub spent_at: Option<DateTime<Utc>>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl ExpenseDetails {
    fn validate(&self) -> Result<()> {
        if self.payee_name.trim().is_empty() {
            return Err(Error::validation("Payee name cannot be empty"));
        }
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(Error::InvalidAmount {
                amount: self.amount,
            });
        }
        Ok(())
    }

    fn apply(self, model: &mut expense::ActiveModel) {
        model.payee_name = Set(self.payee_name.trim().to_string());
        model.street = Set(non_blank(self.street));
        model.street_number = Set(non_blank(self.street_number));
        model.city = Set(non_blank(self.city));
        model.postal_code = Set(non_blank(self.postal_code));
        model.state = Set(non_blank(self.state));
        model.phone = Set(non_blank(self.phone));
        model.email = Set(non_blank(self.email));
        model.bank_name = Set(non_blank(self.bank_name));
        model.bank_branch = Set(non_blank(self.bank_branch));
        model.bank_account = Set(non_blank(self.bank_account));
        model.pix_key = Set(non_blank(self.pix_key));
        model.payment_terms = Set(self.payment_terms);
        model.payment_method = Set(self.payment_method);
        model.description = Set(non_blank(self.description));
        model.amount = Set(self.amount);
        model.notes = Set(non_blank(self.notes));
        model.receipt_path = Set(non_blank(self.receipt_path));
        if let Some(spent_at) = self.spent_at {
            model.spent_at = Set(spent_at);
        }
    }
}

/// Records an expense on behalf of `actor`.
///
/// # Errors
/// Returns an error if:
/// - The payee name is empty
/// - The amount is not strictly positive
/// - The acting user doesn't exist
pub async fn create_expense(
    db: &DatabaseConnection,
    actor: &Actor,
    details: ExpenseDetails,
) -> Result<expense::Model> {
    details.validate()?;
    get_user(db, actor.id).await?;

    let now = Utc::now();
    let mut model = expense::ActiveModel {
        seller_id: Set(actor.id),
        spent_at: Set(now),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    details.apply(&mut model);

    let expense = model.insert(db).await?;
    tracing::info!(
        expense_id = expense.id,
        seller_id = expense.seller_id,
        amount = expense.amount,
        "expense recorded"
    );
    Ok(expense)
}

/// Finds an expense by id.
pub async fn get_expense<C>(db: &C, expense_id: i64) -> Result<expense::Model>
where
    C: ConnectionTrait,
{
    Expense::find_by_id(expense_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Expense", expense_id))
}

/// Lists expenses newest first, one page at a time.
pub async fn list_expenses(
    db: &DatabaseConnection,
    request: PageRequest,
) -> Result<Page<expense::Model>> {
    fetch_page(
        Expense::find()
            .order_by_desc(expense::Column::SpentAt)
            .order_by_desc(expense::Column::Id),
        db,
        request,
    )
    .await
}

/// Replaces every descriptive field of an expense. The recorder never changes.
pub async fn update_expense(
    db: &DatabaseConnection,
    expense_id: i64,
    details: ExpenseDetails,
) -> Result<expense::Model> {
    details.validate()?;

    let mut model: expense::ActiveModel = get_expense(db, expense_id).await?.into();
    details.apply(&mut model);
    model.updated_at = Set(Utc::now());

    let expense = model.update(db).await?;
    tracing::info!(expense_id, amount = expense.amount, "expense updated");
    Ok(expense)
}

/// Deletes an expense.
pub async fn delete_expense(db: &DatabaseConnection, expense_id: i64) -> Result<()> {
    let result = Expense::delete_by_id(expense_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::not_found("Expense", expense_id));
    }
    tracing::info!(expense_id, "expense deleted");
    Ok(())
}
