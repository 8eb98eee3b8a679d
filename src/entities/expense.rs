//! Expense entity - Operational spending recorded by a buyer.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// How an expense was paid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Paper cheque
    #[sea_orm(string_value = "cheque")]
    Cheque,
    /// Instant payment
    #[sea_orm(string_value = "pix")]
    Pix,
    /// Bank wire
    #[sea_orm(string_value = "ted")]
    Ted,
    /// Payment slip
    #[sea_orm(string_value = "boleto")]
    Boleto,
}

impl PaymentMethod {
    /// Lowercase name as stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cheque => "cheque",
            Self::Pix => "pix",
            Self::Ted => "ted",
            Self::Boleto => "boleto",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = crate::errors::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cheque" => Ok(Self::Cheque),
            "pix" => Ok(Self::Pix),
            "ted" => Ok(Self::Ted),
            "boleto" => Ok(Self::Boleto),
            other => Err(crate::errors::Error::validation(format!(
                "unknown payment method '{other}'"
            ))),
        }
    }
}

/// Whether an expense is paid at once or in installments.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum PaymentTerms {
    /// Single payment
    #[sea_orm(string_value = "cash")]
    Cash,
    /// Split into installments
    #[sea_orm(string_value = "installments")]
    Installments,
}

/// Expense database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Who was paid
    pub payee_name: String,
    /// Street
    pub street: Option<String>,
    /// Street number
    pub street_number: Option<String>,
    /// City
    pub city: Option<String>,
    /// Postal code
    pub postal_code: Option<String>,
    /// Two-letter state code
    pub state: Option<String>,
    /// Payee phone
    pub phone: Option<String>,
    /// Payee e-mail
    pub email: Option<String>,
    /// User who recorded the expense
    pub seller_id: i64,
    /// Payee bank name
    pub bank_name: Option<String>,
    /// Payee bank branch
    pub bank_branch: Option<String>,
    /// Payee bank account
    pub bank_account: Option<String>,
    /// Payee instant-payment key
    pub pix_key: Option<String>,
    /// Cash or installments
    pub payment_terms: Option<PaymentTerms>,
    /// Payment instrument
    pub payment_method: Option<PaymentMethod>,
    /// What the money was spent on
    pub description: Option<String>,
    /// Amount spent, always positive
    pub amount: f64,
    /// Free-text notes
    pub notes: Option<String>,
    /// Stored path of the uploaded receipt
    pub receipt_path: Option<String>,
    /// Business date of the expense
    pub spent_at: DateTimeUtc,
    /// When the row was created
    pub created_at: DateTimeUtc,
    /// When the row was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Expense and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each expense was recorded by one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::SellerId",
        to = "super::user::Column::Id"
    )]
    Seller,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Seller.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
