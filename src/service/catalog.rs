//! Supplier and catalog maintenance.
//!
//! Buyers keep suppliers and price entries current. Banking details, which
//! also carry the approval ceiling, and catalog imports are administrator
//! operations.

use super::AppContext;
use crate::{
    auth::{ADMIN_ROLES, Actor, BUYER_ROLES, READ_ROLES, authorize},
    core::{
        catalog::{self, EntryUpdate, NewEntry},
        pagination::Page,
        supplier::{self, BankingDetails, NewSupplier, SupplierContact},
    },
    entities::{price_entry, supplier as supplier_entity},
    errors::Result,
};

/// Registers a supplier, falling back to the configured default ceiling.
pub async fn register_supplier(
    ctx: &AppContext,
    actor: &Actor,
    new: NewSupplier,
) -> Result<supplier_entity::Model> {
    authorize(actor, BUYER_ROLES, "register suppliers")?;
    supplier::create_supplier(
        &ctx.database,
        new,
        ctx.settings.purchasing.default_price_ceiling,
    )
    .await
}

/// Updates a supplier's contact details.
pub async fn edit_supplier_contact(
    ctx: &AppContext,
    actor: &Actor,
    supplier_id: i64,
    contact: SupplierContact,
) -> Result<supplier_entity::Model> {
    authorize(actor, BUYER_ROLES, "edit suppliers")?;
    supplier::update_supplier_contact(&ctx.database, supplier_id, contact).await
}

/// Updates banking details and the price ceiling.
pub async fn edit_supplier_banking(
    ctx: &AppContext,
    actor: &Actor,
    supplier_id: i64,
    banking: BankingDetails,
    price_ceiling: f64,
) -> Result<supplier_entity::Model> {
    authorize(actor, ADMIN_ROLES, "edit supplier banking")?;
    supplier::update_banking(&ctx.database, supplier_id, banking, price_ceiling).await
}

/// Deletes a supplier without purchases, along with its catalog.
pub async fn remove_supplier(ctx: &AppContext, actor: &Actor, supplier_id: i64) -> Result<()> {
    authorize(actor, BUYER_ROLES, "delete suppliers")?;
    supplier::delete_supplier(&ctx.database, supplier_id).await
}

/// Lists suppliers alphabetically.
pub async fn list_suppliers(
    ctx: &AppContext,
    actor: &Actor,
    page: u64,
) -> Result<Page<supplier_entity::Model>> {
    authorize(actor, READ_ROLES, "view suppliers")?;
    supplier::list_suppliers(&ctx.database, ctx.page(page)?).await
}

/// Adds a catalog entry.
pub async fn add_entry(
    ctx: &AppContext,
    actor: &Actor,
    new: NewEntry,
) -> Result<price_entry::Model> {
    authorize(actor, BUYER_ROLES, "edit catalogs")?;
    catalog::add_entry(&ctx.database, new).await
}

/// Changes name, price and description of a catalog entry.
pub async fn edit_entry(
    ctx: &AppContext,
    actor: &Actor,
    entry_id: i64,
    update: EntryUpdate,
) -> Result<price_entry::Model> {
    authorize(actor, BUYER_ROLES, "edit catalogs")?;
    catalog::update_entry(&ctx.database, entry_id, update).await
}

/// Deactivates a catalog entry.
pub async fn deactivate_entry(
    ctx: &AppContext,
    actor: &Actor,
    entry_id: i64,
) -> Result<price_entry::Model> {
    authorize(actor, BUYER_ROLES, "edit catalogs")?;
    catalog::deactivate_entry(&ctx.database, entry_id).await
}

/// Copies one supplier's active catalog into another's.
pub async fn copy_catalog(
    ctx: &AppContext,
    actor: &Actor,
    source_id: i64,
    destination_id: i64,
) -> Result<Vec<price_entry::Model>> {
    authorize(actor, ADMIN_ROLES, "copy catalogs")?;
    catalog::copy_entries(&ctx.database, source_id, destination_id).await
}

/// Lists a supplier's active entries.
pub async fn list_entries(
    ctx: &AppContext,
    actor: &Actor,
    supplier_id: i64,
) -> Result<Vec<price_entry::Model>> {
    authorize(actor, READ_ROLES, "view catalogs")?;
    catalog::list_active_entries(&ctx.database, supplier_id).await
}

/// Resolves a scanned code to an active entry of the supplier.
pub async fn scan_entry(
    ctx: &AppContext,
    actor: &Actor,
    scan_code: &str,
    supplier_id: i64,
) -> Result<price_entry::Model> {
    authorize(actor, BUYER_ROLES, "scan catalog entries")?;
    catalog::find_by_scan_code(&ctx.database, scan_code, supplier_id).await
}
