//! User business logic - accounts, roles and the seeded administrator.

use crate::{
    core::pagination::{Page, PageRequest, fetch_page},
    entities::{
        CommissionRate, CommissionRecord, Expense, Purchase, Role, User, commission_rate,
        commission_record, expense, purchase, user,
    },
    errors::{Error, Result},
};
use sea_orm::{Condition, QueryOrder, Set, TransactionTrait, prelude::*};

/// Fields an administrator may change on an account.
#[derive(Debug, Clone)]
pub struct UserUpdate {
    /// Display name (required)
    pub name: String,
    /// Access role
    pub role: Role,
    /// Whether the account may sign in
    pub is_active: bool,
}

/// Creates a user after validating name and e-mail.
///
/// # Errors
/// Returns an error if:
/// - The name is empty or whitespace-only
/// - The e-mail does not look like an address
/// - Another user already uses the e-mail
pub async fn create_user<C>(db: &C, name: &str, email: &str, role: Role) -> Result<user::Model>
where
    C: ConnectionTrait,
{
    let name = name.trim();
    let email = email.trim().to_lowercase();

    if name.is_empty() {
        return Err(Error::validation("User name cannot be empty"));
    }
    if !email.contains('@') {
        return Err(Error::validation(format!("Invalid e-mail address '{email}'")));
    }

    if get_user_by_email(db, &email).await?.is_some() {
        return Err(Error::conflict(format!("E-mail {email} is already registered")));
    }

    let user = user::ActiveModel {
        name: Set(name.to_string()),
        email: Set(email),
        role: Set(role),
        is_active: Set(true),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let user = user.insert(db).await?;
    tracing::info!(user_id = user.id, role = %user.role, "user created");
    Ok(user)
}

/// Finds a user by id.
pub async fn get_user<C>(db: &C, user_id: i64) -> Result<user::Model>
where
    C: ConnectionTrait,
{
    User::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("User", user_id))
}

/// Finds a user by e-mail, returning None if nobody uses it.
pub async fn get_user_by_email<C>(db: &C, email: &str) -> Result<Option<user::Model>>
where
    C: ConnectionTrait,
{
    User::find()
        .filter(user::Column::Email.eq(email.trim().to_lowercase()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists active users holding any of `roles`, ordered by name.
pub async fn list_active_users_with_roles<C>(db: &C, roles: &[Role]) -> Result<Vec<user::Model>>
where
    C: ConnectionTrait,
{
    User::find()
        .filter(user::Column::IsActive.eq(true))
        .filter(user::Column::Role.is_in(roles.iter().copied()))
        .order_by_asc(user::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Enables or disables a user account.
pub async fn set_user_active(db: &DatabaseConnection, user_id: i64, active: bool) -> Result<user::Model> {
    let mut user: user::ActiveModel = get_user(db, user_id).await?.into();
    user.is_active = Set(active);
    let user = user.update(db).await?;
    tracing::info!(user_id, active, "user activation changed");
    Ok(user)
}

/// Lists all users by name, paginated.
pub async fn list_users(db: &DatabaseConnection, request: PageRequest) -> Result<Page<user::Model>> {
    fetch_page(
        User::find()
            .order_by_asc(user::Column::Name)
            .order_by_asc(user::Column::Id),
        db,
        request,
    )
    .await
}

/// Replaces a user's name, role and activation flag.
///
/// The e-mail is the account's identity and never changes.
pub async fn update_user(db: &DatabaseConnection, user_id: i64, update: UserUpdate) -> Result<user::Model> {
    let name = update.name.trim();
    if name.is_empty() {
        return Err(Error::validation("User name cannot be empty"));
    }

    let mut user: user::ActiveModel = get_user(db, user_id).await?.into();
    user.name = Set(name.to_string());
    user.role = Set(update.role);
    user.is_active = Set(update.is_active);
    let user = user.update(db).await?;

    tracing::info!(user_id, role = %user.role, active = user.is_active, "user updated");
    Ok(user)
}

/// Deletes a user on behalf of `acting_user_id`.
///
/// # Errors
/// Returns an error if:
/// - The user doesn't exist
/// - The user is the one acting ([`Error::Conflict`])
/// - Purchases, expenses or commission records still reference the user
///   ([`Error::Conflict`]); deactivate the account instead
pub async fn delete_user(db: &DatabaseConnection, acting_user_id: i64, user_id: i64) -> Result<()> {
    if acting_user_id == user_id {
        return Err(Error::conflict("You cannot delete your own account"));
    }

    let txn = db.begin().await?;

    let user = get_user(&txn, user_id).await?;

    let purchases = Purchase::find()
        .filter(
            Condition::any()
                .add(purchase::Column::BuyerId.eq(user_id))
                .add(purchase::Column::DecidedBy.eq(user_id)),
        )
        .count(&txn)
        .await?;
    let expenses = Expense::find()
        .filter(expense::Column::SellerId.eq(user_id))
        .count(&txn)
        .await?;
    let records = CommissionRecord::find()
        .filter(commission_record::Column::BuyerId.eq(user_id))
        .count(&txn)
        .await?;
    if purchases + expenses + records > 0 {
        return Err(Error::conflict(format!(
            "User {} has history and can only be deactivated",
            user.email
        )));
    }

    CommissionRate::delete_many()
        .filter(commission_rate::Column::BuyerId.eq(user_id))
        .exec(&txn)
        .await?;
    User::delete_by_id(user_id).exec(&txn).await?;

    txn.commit().await?;

    tracing::info!(user_id, acting_user_id, "user deleted");
    Ok(())
}

/// Makes sure the configured administrator exists, creating it on first run.
///
/// Returns the administrator either way.
pub async fn ensure_admin(db: &DatabaseConnection, name: &str, email: &str) -> Result<user::Model> {
    if let Some(existing) = get_user_by_email(db, email).await? {
        if existing.role != Role::Admin {
            return Err(Error::conflict(format!(
                "{email} exists but is not an administrator"
            )));
        }
        return Ok(existing);
    }

    let admin = create_user(db, name, email, Role::Admin).await?;
    tracing::info!(user_id = admin.id, email, "administrator seeded");
    Ok(admin)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_create_user_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let result = create_user(&db, "  ", "a@example.com", Role::Buyer).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { message: _ }));

        let result = create_user(&db, "Ana", "not-an-email", Role::Buyer).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { message: _ }));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_user_integration() -> Result<()> {
        let db = setup_test_db().await?;

        let user = create_user(&db, " Ana ", "Ana@Example.com", Role::Buyer).await?;
        assert_eq!(user.name, "Ana");
        assert_eq!(user.email, "ana@example.com");
        assert_eq!(user.role, Role::Buyer);
        assert!(user.is_active);

        let found = get_user(&db, user.id).await?;
        assert_eq!(found, user);

        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() -> Result<()> {
        let db = setup_test_db().await?;
        create_user(&db, "Ana", "ana@example.com", Role::Buyer).await?;

        let result = create_user(&db, "Other Ana", "ANA@example.com", Role::Viewer).await;
        assert!(matches!(result.unwrap_err(), Error::Conflict { message: _ }));

        Ok(())
    }

    #[tokio::test]
    async fn test_get_user_not_found() -> Result<()> {
        let db = setup_test_db().await?;
        let result = get_user(&db, 999).await;
        assert!(matches!(result.unwrap_err(), Error::NotFound { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_ensure_admin_is_idempotent() -> Result<()> {
        let db = setup_test_db().await?;

        let first = ensure_admin(&db, "Administrator", "admin@example.com").await?;
        let second = ensure_admin(&db, "Administrator", "admin@example.com").await?;
        assert_eq!(first.id, second.id);
        assert_eq!(first.role, Role::Admin);

        let count = User::find().count(&db).await?;
        assert_eq!(count, 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_list_active_users_with_roles() -> Result<()> {
        let db = setup_test_db().await?;
        let buyer = create_test_buyer(&db, "Bruno").await?;
        let admin = create_user(&db, "Alice", "alice@example.com", Role::Admin).await?;
        create_user(&db, "Vera", "vera@example.com", Role::Viewer).await?;
        let inactive = create_test_buyer(&db, "Carla").await?;
        set_user_active(&db, inactive.id, false).await?;

        let users = list_active_users_with_roles(&db, &[Role::Buyer, Role::Admin]).await?;
        let ids: Vec<i64> = users.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![admin.id, buyer.id]);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_user_changes_role_and_activation() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_buyer(&db, "Bruno").await?;

        let updated = update_user(
            &db,
            user.id,
            UserUpdate {
                name: " Bruno Silva ".to_string(),
                role: Role::Viewer,
                is_active: false,
            },
        )
        .await?;
        assert_eq!(updated.name, "Bruno Silva");
        assert_eq!(updated.role, Role::Viewer);
        assert!(!updated.is_active);
        assert_eq!(updated.email, user.email);

        let blank = UserUpdate {
            name: "  ".to_string(),
            role: Role::Buyer,
            is_active: true,
        };
        let result = update_user(&db, user.id, blank.clone()).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { message: _ }));

        let result = update_user(&db, 999, UserUpdate { name: "X".to_string(), ..blank }).await;
        assert!(matches!(result.unwrap_err(), Error::NotFound { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_user_guards() -> Result<()> {
        let db = setup_test_db().await?;
        let admin = create_test_admin(&db).await?;
        let idle = create_test_buyer(&db, "Carla").await?;
        crate::core::commission::set_rate(&db, idle.id, 3.0).await?;
        let busy = create_test_buyer(&db, "Bruno").await?;
        let supplier = create_test_supplier(&db, "Sucata Sul", 1000.0).await?;
        let entry = create_test_entry(&db, supplier.id, "Copper", 10.0).await?;
        create_test_purchase(&db, &busy, entry.id, 1.0).await?;

        let result = delete_user(&db, admin.id, admin.id).await;
        assert!(matches!(result.unwrap_err(), Error::Conflict { message: _ }));

        let result = delete_user(&db, admin.id, busy.id).await;
        assert!(matches!(result.unwrap_err(), Error::Conflict { message: _ }));

        delete_user(&db, admin.id, idle.id).await?;
        let result = get_user(&db, idle.id).await;
        assert!(matches!(result.unwrap_err(), Error::NotFound { .. }));
        assert_eq!(CommissionRate::find().count(&db).await?, 0);

        let page = list_users(&db, PageRequest::new(1, 10)?).await?;
        let names: Vec<&str> = page.items.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["Admin", "Bruno"]);

        Ok(())
    }
}
