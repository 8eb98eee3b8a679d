//! Account administration.
//!
//! Administrator-only. Deleting is refused for the acting account and for
//! anyone with recorded history; such accounts are deactivated instead.

use super::AppContext;
use crate::{
    auth::{ADMIN_ROLES, Actor, authorize},
    core::{
        pagination::Page,
        user::{self, UserUpdate},
    },
    entities::{Role, user as user_entity},
    errors::Result,
};

/// Creates an account with a unique e-mail.
pub async fn register_user(
    ctx: &AppContext,
    actor: &Actor,
    name: &str,
    email: &str,
    role: Role,
) -> Result<user_entity::Model> {
    authorize(actor, ADMIN_ROLES, "manage users")?;
    user::create_user(&ctx.database, name, email, role).await
}

/// Changes name, role and activation of an account.
pub async fn edit_user(
    ctx: &AppContext,
    actor: &Actor,
    user_id: i64,
    update: UserUpdate,
) -> Result<user_entity::Model> {
    authorize(actor, ADMIN_ROLES, "manage users")?;
    user::update_user(&ctx.database, user_id, update).await
}

/// Enables or disables an account.
pub async fn set_active(
    ctx: &AppContext,
    actor: &Actor,
    user_id: i64,
    active: bool,
) -> Result<user_entity::Model> {
    authorize(actor, ADMIN_ROLES, "manage users")?;
    user::set_user_active(&ctx.database, user_id, active).await
}

/// Deletes an account other than the actor's own.
pub async fn remove_user(ctx: &AppContext, actor: &Actor, user_id: i64) -> Result<()> {
    authorize(actor, ADMIN_ROLES, "manage users")?;
    user::delete_user(&ctx.database, actor.id, user_id).await
}

/// Lists accounts by name.
pub async fn list_users(
    ctx: &AppContext,
    actor: &Actor,
    page: u64,
) -> Result<Page<user_entity::Model>> {
    authorize(actor, ADMIN_ROLES, "manage users")?;
    user::list_users(&ctx.database, ctx.page(page)?).await
}
