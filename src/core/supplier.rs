//! Supplier business logic - registration, contact and banking details, and the
//! price ceiling that drives automatic purchase approval.

use crate::{
    core::{
        documents,
        pagination::{Page, PageRequest, fetch_page},
    },
    entities::{PriceEntry, Purchase, Supplier, price_entry, purchase, supplier},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};

/// Input for registering a supplier.
#[derive(Debug, Clone, Default)]
pub struct NewSupplier {
    /// Registered business or personal name (required)
    pub legal_name: String,
    /// Company registration number, punctuation allowed
    pub cnpj: Option<String>,
    /// Personal taxpayer number, punctuation allowed
    pub cpf: Option<String>,
    /// Collection address
    pub collection_address: Option<String>,
    /// Invoice address
    pub billing_address: Option<String>,
    /// Contact phone
    pub phone: Option<String>,
    /// Contact e-mail
    pub email: Option<String>,
    /// Ceiling for automatic approval; the configured default when absent
    pub price_ceiling: Option<f64>,
}

/// Contact fields a buyer may edit.
#[derive(Debug, Clone, Default)]
pub struct SupplierContact {
    /// Registered business or personal name (required)
    pub legal_name: String,
    /// Contact phone
    pub phone: Option<String>,
    /// Contact e-mail
    pub email: Option<String>,
    /// Collection address
    pub collection_address: Option<String>,
    /// Invoice address
    pub billing_address: Option<String>,
}

/// Banking fields, editable by administrators only.
#[derive(Debug, Clone, Default)]
pub struct BankingDetails {
    /// Bank name
    pub bank_name: Option<String>,
    /// Bank branch
    pub bank_branch: Option<String>,
    /// Account number
    pub bank_account: Option<String>,
    /// `checking` or `savings`
    pub account_type: Option<String>,
    /// Instant-payment key
    pub pix_key: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn validate_ceiling(ceiling: f64) -> Result<f64> {
    if !ceiling.is_finite() || ceiling < 0.0 {
        return Err(Error::InvalidAmount { amount: ceiling });
    }
    Ok(ceiling)
}

fn validate_legal_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::validation("Supplier legal name cannot be empty"));
    }
    Ok(name.to_string())
}

/// Registers a supplier.
///
/// # Errors
/// Returns an error if:
/// - The legal name is empty
/// - A CNPJ or CPF is present but malformed, or already registered
/// - The ceiling is negative or not finite
pub async fn create_supplier(
    db: &DatabaseConnection,
    new: NewSupplier,
    default_ceiling: f64,
) -> Result<supplier::Model> {
    let legal_name = validate_legal_name(&new.legal_name)?;
    let price_ceiling = validate_ceiling(new.price_ceiling.unwrap_or(default_ceiling))?;

    let cnpj = non_blank(new.cnpj);
    if let Some(cnpj) = &cnpj {
        if !documents::is_valid_cnpj(cnpj) {
            return Err(Error::validation(format!("Invalid CNPJ '{cnpj}'")));
        }
    }
    let cnpj = cnpj.map(|c| documents::strip_document(&c));

    let cpf = non_blank(new.cpf);
    if let Some(cpf) = &cpf {
        if !documents::is_valid_cpf(cpf) {
            return Err(Error::validation(format!("Invalid CPF '{cpf}'")));
        }
    }
    let cpf = cpf.map(|c| documents::strip_document(&c));

    if let Some(cnpj) = &cnpj {
        let taken = Supplier::find()
            .filter(supplier::Column::Cnpj.eq(cnpj.as_str()))
            .count(db)
            .await?;
        if taken > 0 {
            return Err(Error::conflict(format!("CNPJ {cnpj} is already registered")));
        }
    }
    if let Some(cpf) = &cpf {
        let taken = Supplier::find()
            .filter(supplier::Column::Cpf.eq(cpf.as_str()))
            .count(db)
            .await?;
        if taken > 0 {
            return Err(Error::conflict(format!("CPF {cpf} is already registered")));
        }
    }

    let now = chrono::Utc::now();
    let supplier = supplier::ActiveModel {
        legal_name: Set(legal_name),
        cnpj: Set(cnpj),
        cpf: Set(cpf),
        collection_address: Set(non_blank(new.collection_address)),
        billing_address: Set(non_blank(new.billing_address)),
        phone: Set(non_blank(new.phone)),
        email: Set(non_blank(new.email)),
        bank_name: Set(None),
        bank_branch: Set(None),
        bank_account: Set(None),
        account_type: Set(None),
        pix_key: Set(None),
        price_ceiling: Set(price_ceiling),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let supplier = supplier.insert(db).await?;
    tracing::info!(
        supplier_id = supplier.id,
        ceiling = supplier.price_ceiling,
        "supplier created"
    );
    Ok(supplier)
}

/// Finds a supplier by id.
pub async fn get_supplier<C>(db: &C, supplier_id: i64) -> Result<supplier::Model>
where
    C: ConnectionTrait,
{
    Supplier::find_by_id(supplier_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Supplier", supplier_id))
}

/// Lists suppliers alphabetically, one page at a time.
pub async fn list_suppliers(
    db: &DatabaseConnection,
    request: PageRequest,
) -> Result<Page<supplier::Model>> {
    fetch_page(
        Supplier::find()
            .order_by_asc(supplier::Column::LegalName)
            .order_by_asc(supplier::Column::Id),
        db,
        request,
    )
    .await
}

/// Replaces a supplier's contact fields.
pub async fn update_supplier_contact(
    db: &DatabaseConnection,
    supplier_id: i64,
    contact: SupplierContact,
) -> Result<supplier::Model> {
    let legal_name = validate_legal_name(&contact.legal_name)?;

    let mut supplier: supplier::ActiveModel = get_supplier(db, supplier_id).await?.into();
    supplier.legal_name = Set(legal_name);
    supplier.phone = Set(non_blank(contact.phone));
    supplier.email = Set(non_blank(contact.email));
    supplier.collection_address = Set(non_blank(contact.collection_address));
    supplier.billing_address = Set(non_blank(contact.billing_address));
    supplier.updated_at = Set(chrono::Utc::now());

    supplier.update(db).await.map_err(Into::into)
}

/// Replaces a supplier's banking details and price ceiling.
///
/// A new ceiling only affects purchases submitted afterwards; existing purchases
/// keep the ceiling they were classified against.
pub async fn update_banking(
    db: &DatabaseConnection,
    supplier_id: i64,
    banking: BankingDetails,
    price_ceiling: f64,
) -> Result<supplier::Model> {
    let price_ceiling = validate_ceiling(price_ceiling)?;

    let mut supplier: supplier::ActiveModel = get_supplier(db, supplier_id).await?.into();
    supplier.bank_name = Set(non_blank(banking.bank_name));
    supplier.bank_branch = Set(non_blank(banking.bank_branch));
    supplier.bank_account = Set(non_blank(banking.bank_account));
    supplier.account_type = Set(non_blank(banking.account_type));
    supplier.pix_key = Set(non_blank(banking.pix_key));
    supplier.price_ceiling = Set(price_ceiling);
    supplier.updated_at = Set(chrono::Utc::now());

    let supplier = supplier.update(db).await?;
    tracing::info!(supplier_id, ceiling = price_ceiling, "supplier banking updated");
    Ok(supplier)
}

/// Deletes a supplier together with its catalog entries.
///
/// Purchases keep their commission and approval history, so a supplier that
/// still has any is refused with [`Error::Conflict`].
pub async fn delete_supplier(db: &DatabaseConnection, supplier_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let supplier = get_supplier(&txn, supplier_id).await?;

    let purchases = Purchase::find()
        .filter(purchase::Column::SupplierId.eq(supplier_id))
        .count(&txn)
        .await?;
    if purchases > 0 {
        return Err(Error::conflict(format!(
            "Supplier {} still has {purchases} purchase(s)",
            supplier.legal_name
        )));
    }

    let entries = PriceEntry::delete_many()
        .filter(price_entry::Column::SupplierId.eq(supplier_id))
        .exec(&txn)
        .await?;
    Supplier::delete_by_id(supplier_id).exec(&txn).await?;

    txn.commit().await?;

    tracing::info!(
        supplier_id,
        entries_removed = entries.rows_affected,
        "supplier deleted"
    );
    Ok(())
}
