//! Service layer - the authorization boundary in front of the core.
//!
//! Every function here takes the shared [`AppContext`] and the acting
//! [`Actor`](crate::auth::Actor), checks the actor's role with
//! [`authorize`](crate::auth::authorize), validates raw input and only then
//! calls into [`crate::core`]. Any front end (CLI, HTTP, chat bot) goes through
//! this layer.

/// Supplier and catalog maintenance
pub mod catalog;
/// Commission rates, monthly runs and payments
pub mod commissions;
/// Expense and employee records
pub mod expenses;
/// Purchase submission and administrator decisions
pub mod purchases;
/// Read-only reports
pub mod reports;
/// Account administration
pub mod users;

use crate::{config::settings::Settings, core::pagination::PageRequest, errors::Result};
use sea_orm::DatabaseConnection;

/// Shared state available to every service call.
pub struct AppContext {
    /// Database connection for all database operations
    pub database: DatabaseConnection,
    /// Settings loaded at startup
    pub settings: Settings,
}

impl AppContext {
    /// Creates a new `AppContext` from an open connection and loaded settings.
    #[must_use]
    pub const fn new(database: DatabaseConnection, settings: Settings) -> Self {
        Self { database, settings }
    }

    /// A request for `page` using the configured page size.
    pub fn page(&self, page: u64) -> Result<PageRequest> {
        PageRequest::new(page, self.settings.pagination.per_page)
    }
}
