//! User entity - Represents a person who can act in the system.
//!
//! Every user carries a role that decides which operations the authorization
//! gate lets through. Buyers additionally own a commission rate and the
//! purchases they record.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of a user, stored as a short lowercase string.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access, including approvals and commission management
    #[sea_orm(string_value = "admin")]
    Admin,
    /// Records purchases and expenses, maintains catalogs
    #[sea_orm(string_value = "buyer")]
    Buyer,
    /// Read-only access
    #[sea_orm(string_value = "viewer")]
    Viewer,
}

impl Role {
    /// Lowercase name as stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Buyer => "buyer",
            Self::Viewer => "viewer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the user
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name
    pub name: String,
    /// Login e-mail, unique across users
    #[sea_orm(unique)]
    pub email: String,
    /// Role granted to this user
    pub role: Role,
    /// Inactive users are refused by the authorization gate
    pub is_active: bool,
    /// When the user was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between User and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One buyer records many purchases
    #[sea_orm(has_many = "super::purchase::Entity")]
    Purchases,
    /// One buyer has many monthly commission records
    #[sea_orm(has_many = "super::commission_record::Entity")]
    CommissionRecords,
}

impl Related<super::purchase::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Purchases.def()
    }
}

impl Related<super::commission_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CommissionRecords.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
