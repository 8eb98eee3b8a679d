//! Price entry entity - One priced item in a supplier's catalog.
//!
//! Entries are priced per unit weight and are deactivated rather than deleted,
//! so purchases that reference them by id stay readable.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Catalog entry database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "price_entries")]
pub struct Model {
    /// Unique identifier for the entry
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Supplier owning this entry
    pub supplier_id: i64,
    /// Display name of the item (e.g., "Copper wire")
    pub name: String,
    /// Optional barcode/QR value, unique across the catalog
    #[sea_orm(unique)]
    pub scan_code: Option<String>,
    /// Price per unit of weight, always positive
    pub price_per_unit: f64,
    /// Unit of measure (defaults to `kg`)
    pub unit: String,
    /// Free-text description
    pub description: String,
    /// Soft delete flag - inactive entries are hidden from listings and scans
    pub is_active: bool,
    /// When the entry was created
    pub created_at: DateTimeUtc,
    /// When the entry was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between PriceEntry and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each entry belongs to one supplier
    #[sea_orm(
        belongs_to = "super::supplier::Entity",
        from = "Column::SupplierId",
        to = "super::supplier::Column::Id"
    )]
    Supplier,
}

impl Related<super::supplier::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Supplier.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
