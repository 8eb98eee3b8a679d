//! Authorization gate.
//!
//! Callers identify themselves with an explicit [`Actor`] value that is passed into
//! every operation. The boundary layer calls [`authorize`] with the set of roles an
//! operation admits before anything reaches the core.

use crate::{
    entities::{Role, user},
    errors::{Error, Result},
};

/// Roles allowed to record purchases, expenses and maintain catalogs.
pub const BUYER_ROLES: &[Role] = &[Role::Buyer, Role::Admin];

/// Roles allowed to decide purchases and manage commissions.
pub const ADMIN_ROLES: &[Role] = &[Role::Admin];

/// Roles allowed to read listings and reports.
pub const READ_ROLES: &[Role] = &[Role::Admin, Role::Buyer, Role::Viewer];

/// The authenticated principal performing an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    /// User id of the principal
    pub id: i64,
    /// Role of the principal
    pub role: Role,
    /// Whether the account is enabled
    pub is_active: bool,
}

impl Actor {
    /// Builds an active principal. Mostly useful in tests and the CLI.
    #[must_use]
    pub const fn new(id: i64, role: Role) -> Self {
        Self {
            id,
            role,
            is_active: true,
        }
    }
}

impl From<&user::Model> for Actor {
    fn from(user: &user::Model) -> Self {
        Self {
            id: user.id,
            role: user.role,
            is_active: user.is_active,
        }
    }
}

/// Checks that `actor` holds one of `required` roles.
///
/// `action` only feeds the error message.
///
/// # Errors
/// Returns [`Error::PermissionDenied`] when the role is not admitted or the
/// account is inactive.
pub fn authorize(actor: &Actor, required: &[Role], action: &str) -> Result<()> {
    if actor.is_active && required.contains(&actor.role) {
        return Ok(());
    }

    tracing::warn!(
        actor_id = actor.id,
        role = %actor.role,
        active = actor.is_active,
        action,
        "authorization denied"
    );
    Err(Error::PermissionDenied {
        role: actor.role.to_string(),
        action: action.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    #[test]
    fn test_buyer_operations_admit_buyer_and_admin() {
        assert!(authorize(&Actor::new(1, Role::Buyer), BUYER_ROLES, "create purchases").is_ok());
        assert!(authorize(&Actor::new(2, Role::Admin), BUYER_ROLES, "create purchases").is_ok());

        let denied = authorize(&Actor::new(3, Role::Viewer), BUYER_ROLES, "create purchases");
        assert_eq!(denied.map_err(|e| e.kind()), Err(ErrorKind::PermissionDenied));
    }

    #[test]
    fn test_admin_operations_admit_only_admin() {
        assert!(authorize(&Actor::new(1, Role::Admin), ADMIN_ROLES, "approve purchases").is_ok());

        for role in [Role::Buyer, Role::Viewer] {
            let denied = authorize(&Actor::new(1, role), ADMIN_ROLES, "approve purchases");
            assert_eq!(denied.map_err(|e| e.status_code()), Err(403));
        }
    }

    #[test]
    fn test_inactive_actor_is_denied() {
        let actor = Actor {
            id: 1,
            role: Role::Admin,
            is_active: false,
        };
        assert!(authorize(&actor, ADMIN_ROLES, "approve purchases").is_err());
    }

    #[test]
    fn test_denial_message_names_role_and_action() {
        let err = authorize(&Actor::new(9, Role::Viewer), ADMIN_ROLES, "mark commissions paid")
            .err()
            .map(|e| e.to_string());
        assert_eq!(
            err.as_deref(),
            Some("Permission denied: role 'viewer' cannot mark commissions paid")
        );
    }
}
