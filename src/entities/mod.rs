//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod commission_rate;
pub mod commission_record;
pub mod employee;
pub mod expense;
pub mod price_entry;
pub mod purchase;
pub mod supplier;
pub mod user;

// Re-export specific types to avoid conflicts
pub use commission_rate::{
    Column as CommissionRateColumn, Entity as CommissionRate, Model as CommissionRateModel,
};
pub use commission_record::{
    Column as CommissionRecordColumn, Entity as CommissionRecord, Model as CommissionRecordModel,
    PaymentStatus,
};
pub use employee::{Column as EmployeeColumn, Entity as Employee, Model as EmployeeModel};
pub use expense::{
    Column as ExpenseColumn, Entity as Expense, Model as ExpenseModel, PaymentMethod,
    PaymentTerms,
};
pub use price_entry::{Column as PriceEntryColumn, Entity as PriceEntry, Model as PriceEntryModel};
pub use purchase::{
    ApprovalStatus, CollectionMode, Column as PurchaseColumn, Entity as Purchase,
    Model as PurchaseModel, PriceStatus,
};
pub use supplier::{Column as SupplierColumn, Entity as Supplier, Model as SupplierModel};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel, Role};
