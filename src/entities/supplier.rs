//! Supplier entity - Represents a party that sells material to the yard.
//!
//! Each supplier owns a price catalog and a price ceiling: purchases whose total
//! stays at or below the ceiling are approved automatically.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Supplier database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "suppliers")]
pub struct Model {
    /// Unique identifier for the supplier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Registered business or personal name
    pub legal_name: String,
    /// Company registration number (CNPJ), digits only
    #[sea_orm(unique)]
    pub cnpj: Option<String>,
    /// Personal taxpayer number (CPF), digits only
    #[sea_orm(unique)]
    pub cpf: Option<String>,
    /// Where material is collected
    pub collection_address: Option<String>,
    /// Address printed on invoices
    pub billing_address: Option<String>,
    /// Contact phone
    pub phone: Option<String>,
    /// Contact e-mail
    pub email: Option<String>,
    /// Bank name
    pub bank_name: Option<String>,
    /// Bank branch
    pub bank_branch: Option<String>,
    /// Bank account number
    pub bank_account: Option<String>,
    /// Bank account type (`checking` or `savings`)
    pub account_type: Option<String>,
    /// Instant-payment key
    pub pix_key: Option<String>,
    /// Maximum purchase total eligible for automatic approval
    pub price_ceiling: f64,
    /// When the supplier was created
    pub created_at: DateTimeUtc,
    /// When the supplier was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Supplier and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One supplier owns many catalog entries
    #[sea_orm(has_many = "super::price_entry::Entity")]
    PriceEntries,
    /// One supplier has many purchases
    #[sea_orm(has_many = "super::purchase::Entity")]
    Purchases,
}

impl Related<super::price_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PriceEntries.def()
    }
}

impl Related<super::purchase::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Purchases.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
