//! Purchase submission, editing and administrator decisions.

use super::AppContext;
use crate::{
    auth::{ADMIN_ROLES, Actor, BUYER_ROLES, READ_ROLES, authorize},
    core::{
        pagination::Page,
        purchase::{self, Decision, PurchaseEdit, PurchaseForm},
    },
    entities::purchase as purchase_entity,
    errors::Result,
};

/// Validates a submission and records it for the acting buyer.
pub async fn submit_purchase(
    ctx: &AppContext,
    actor: &Actor,
    form: PurchaseForm,
) -> Result<purchase_entity::Model> {
    authorize(actor, BUYER_ROLES, "create purchases")?;
    let new = form.validate()?;
    purchase::create_purchase(&ctx.database, actor, new).await
}

/// Edits quantity or collection details of a purchase.
pub async fn edit_purchase(
    ctx: &AppContext,
    actor: &Actor,
    purchase_id: i64,
    edit: PurchaseEdit,
) -> Result<purchase_entity::Model> {
    authorize(actor, BUYER_ROLES, "edit purchases")?;
    purchase::update_purchase(&ctx.database, purchase_id, edit).await
}

/// Approves a pending purchase.
pub async fn approve_purchase(
    ctx: &AppContext,
    actor: &Actor,
    purchase_id: i64,
) -> Result<purchase_entity::Model> {
    authorize(actor, ADMIN_ROLES, "approve purchases")?;
    purchase::decide_purchase(&ctx.database, actor, purchase_id, Decision::Approve).await
}

/// Rejects a pending purchase.
pub async fn reject_purchase(
    ctx: &AppContext,
    actor: &Actor,
    purchase_id: i64,
) -> Result<purchase_entity::Model> {
    authorize(actor, ADMIN_ROLES, "reject purchases")?;
    purchase::decide_purchase(&ctx.database, actor, purchase_id, Decision::Reject).await
}

/// Deletes a purchase.
pub async fn remove_purchase(ctx: &AppContext, actor: &Actor, purchase_id: i64) -> Result<()> {
    authorize(actor, BUYER_ROLES, "delete purchases")?;
    purchase::delete_purchase(&ctx.database, purchase_id).await
}

/// Reads one purchase.
pub async fn show_purchase(
    ctx: &AppContext,
    actor: &Actor,
    purchase_id: i64,
) -> Result<purchase_entity::Model> {
    authorize(actor, READ_ROLES, "view purchases")?;
    purchase::get_purchase(&ctx.database, purchase_id).await
}

/// Lists purchases newest first using the configured page size.
pub async fn list_purchases(
    ctx: &AppContext,
    actor: &Actor,
    page: u64,
) -> Result<Page<purchase_entity::Model>> {
    authorize(actor, READ_ROLES, "view purchases")?;
    purchase::list_purchases(&ctx.database, ctx.page(page)?).await
}
