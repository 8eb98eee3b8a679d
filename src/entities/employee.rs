//! Employee entity - Yard staff registry.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Employee database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Full name
    pub name: String,
    /// Personal taxpayer number (CPF), digits only
    #[sea_orm(unique)]
    pub cpf: String,
    /// Contact phone
    pub phone: Option<String>,
    /// Job title
    pub position: Option<String>,
    /// When the employee was registered
    pub created_at: DateTimeUtc,
    /// When the employee was last modified
    pub updated_at: DateTimeUtc,
}

/// `Employee` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
