//! Purchase entity - The central transactional record of material bought.
//!
//! A purchase freezes everything it was priced with: the unit price, the
//! supplier's ceiling and the buyer's commission rate are copied onto the row
//! at submission time and never re-read. The catalog entry is referenced by
//! id only, so deactivating it never touches purchase history.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Where the total landed relative to the supplier's ceiling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum PriceStatus {
    /// Total strictly below the ceiling
    #[sea_orm(string_value = "below")]
    Below,
    /// Total exactly equal to the ceiling
    #[sea_orm(string_value = "equal")]
    Equal,
    /// Total strictly above the ceiling
    #[sea_orm(string_value = "above")]
    Above,
}

impl PriceStatus {
    /// Lowercase name as stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Below => "below",
            Self::Equal => "equal",
            Self::Above => "above",
        }
    }
}

impl fmt::Display for PriceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Approval state machine: `pending` may move to `approved` or `rejected`,
/// both of which are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    /// Waiting for an administrator decision
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Approved automatically or by an administrator
    #[sea_orm(string_value = "approved")]
    Approved,
    /// Rejected by an administrator
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

impl ApprovalStatus {
    /// Lowercase name as stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Whether no further transition is allowed.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApprovalStatus {
    type Err = crate::errors::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(crate::errors::Error::validation(format!(
                "unknown approval status '{other}'"
            ))),
        }
    }
}

/// Whether the yard collects the material or the supplier delivers it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum CollectionMode {
    /// Picked up at the supplier's address
    #[sea_orm(string_value = "collection")]
    Collection,
    /// Dropped off by the supplier
    #[sea_orm(string_value = "delivery")]
    Delivery,
}

impl CollectionMode {
    /// Lowercase name as stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Collection => "collection",
            Self::Delivery => "delivery",
        }
    }
}

impl fmt::Display for CollectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CollectionMode {
    type Err = crate::errors::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "collection" => Ok(Self::Collection),
            "delivery" => Ok(Self::Delivery),
            other => Err(crate::errors::Error::validation(format!(
                "unknown collection mode '{other}'"
            ))),
        }
    }
}

/// Purchase database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "purchases")]
pub struct Model {
    /// Unique identifier for the purchase
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Supplier the material was bought from
    pub supplier_id: i64,
    /// Catalog entry used for pricing (weak reference)
    pub price_entry_id: i64,
    /// Quantity in units of weight
    pub quantity: f64,
    /// Price per unit copied from the catalog at submission
    pub unit_price: f64,
    /// `quantity * unit_price`
    pub total_value: f64,
    /// Supplier ceiling copied at submission
    pub price_ceiling: f64,
    /// Classification of the total against the ceiling at submission
    pub price_status: PriceStatus,
    /// Current approval state
    pub approval_status: ApprovalStatus,
    /// Collection or delivery
    pub collection_mode: CollectionMode,
    /// Free-text notes
    pub notes: Option<String>,
    /// User who recorded the purchase
    pub buyer_id: i64,
    /// Collection latitude
    pub latitude: Option<f64>,
    /// Collection longitude
    pub longitude: Option<f64>,
    /// Collection address as typed by the buyer
    pub collection_address: Option<String>,
    /// Buyer's commission rate copied at submission, in percent
    pub commission_percentage: f64,
    /// `total_value * commission_percentage / 100`
    pub commission_amount: f64,
    /// Administrator who approved or rejected a pending purchase
    pub decided_by: Option<i64>,
    /// When the administrator decision was taken
    pub decided_at: Option<DateTimeUtc>,
    /// Business date of the purchase, used for monthly aggregation
    pub purchased_at: DateTimeUtc,
    /// When the row was created
    pub created_at: DateTimeUtc,
    /// When the row was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Purchase and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each purchase belongs to one supplier
    #[sea_orm(
        belongs_to = "super::supplier::Entity",
        from = "Column::SupplierId",
        to = "super::supplier::Column::Id"
    )]
    Supplier,
    /// Each purchase was recorded by one buyer
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::BuyerId",
        to = "super::user::Column::Id"
    )]
    Buyer,
}

impl Related<super::supplier::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Supplier.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Buyer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
