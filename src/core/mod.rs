//! Core business logic, independent of any front end.
//!
//! Every function here takes a database connection and plain Rust values and
//! returns a [`crate::errors::Result`]. Authorization happens before these
//! functions are called; see [`crate::service`].

pub mod catalog;
pub mod commission;
pub mod documents;
pub mod employee;
pub mod expense;
pub mod monthly;
pub mod pagination;
pub mod pricing;
pub mod purchase;
pub mod report;
pub mod supplier;
pub mod user;
