//! Unified error type for the purchasing ledger.
//!
//! Every failure maps onto one of five kinds (validation, not found, permission,
//! conflict, persistence) so the boundary layer can translate it into a status
//! signal without inspecting messages.

use thiserror::Error;

/// Coarse classification of an [`Error`], mirroring the status a caller reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or malformed input, rejected before any mutation
    Validation,
    /// A referenced record does not exist
    NotFound,
    /// The acting principal's role is insufficient
    PermissionDenied,
    /// The operation is not allowed in the record's current state
    Conflict,
    /// The storage layer failed
    Persistence,
}

/// All errors produced by the library.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be loaded or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description
        message: String,
    },

    /// A required field is missing or malformed
    #[error("Invalid input: {message}")]
    Validation {
        /// Human-readable description
        message: String,
    },

    /// A monetary amount, price or quantity is out of range
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected value
        amount: f64,
    },

    /// A referenced record does not exist
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of record that was looked up
        entity: &'static str,
        /// Identifier used for the lookup
        id: String,
    },

    /// The acting principal may not perform the operation
    #[error("Permission denied: role '{role}' cannot {action}")]
    PermissionDenied {
        /// Role of the acting principal
        role: String,
        /// Operation that was attempted
        action: String,
    },

    /// The record is in a state that forbids the operation
    #[error("Conflict: {message}")]
    Conflict {
        /// Human-readable description
        message: String,
    },

    /// The database rejected an operation
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Filesystem access failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Writing a report into a buffer failed
    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),
}

impl Error {
    /// Shorthand for a [`Error::Validation`] with the given message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Shorthand for a [`Error::NotFound`] keyed by a numeric id.
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Shorthand for a [`Error::Conflict`] with the given message.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Classifies this error for the boundary layer.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } | Self::InvalidAmount { .. } => ErrorKind::Validation,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::Config { .. } | Self::Database(_) | Self::Io(_) | Self::Fmt(_) => {
                ErrorKind::Persistence
            }
        }
    }

    /// HTTP-equivalent status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::Validation => 400,
            ErrorKind::PermissionDenied => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict => 409,
            ErrorKind::Persistence => 500,
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
