//! Commission record entity - A buyer's commission for one calendar month.
//!
//! Unique per `(buyer_id, reference_month)`. Payment moves `pending -> paid`
//! only; a paid record is locked against recalculation.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Payment state of a monthly commission.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Calculated but not yet paid out
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Paid out to the buyer
    #[sea_orm(string_value = "paid")]
    Paid,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
        })
    }
}

/// Monthly commission database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "commission_records")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Buyer the commission is owed to
    pub buyer_id: i64,
    /// Month in `YYYY-MM` form
    pub reference_month: String,
    /// Rate in percent used for this calculation
    pub percentage: f64,
    /// Sum of approved purchase totals for the month
    pub total_purchases: f64,
    /// `total_purchases * percentage / 100`
    pub commission_total: f64,
    /// Whether the commission has been paid out
    pub payment_status: PaymentStatus,
    /// When the commission was last marked paid
    pub paid_at: Option<DateTimeUtc>,
    /// When the record was created
    pub created_at: DateTimeUtc,
    /// When the record was last recalculated or paid
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between CommissionRecord and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each record belongs to one buyer
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
