//! Commission rate entity - A buyer's current commission percentage.
//!
//! There is at most one row per buyer. A buyer without a row earns 0%.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Commission rate database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "commission_rates")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Buyer this rate applies to
    #[sea_orm(unique)]
    pub buyer_id: i64,
    /// Commission in percent (e.g., `5.0` for 5%), never negative
    pub percentage: f64,
    /// When the rate was last changed
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between CommissionRate and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each rate belongs to one buyer
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::BuyerId",
        to = "super::user::Column::Id"
    )]
    Buyer,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Buyer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
