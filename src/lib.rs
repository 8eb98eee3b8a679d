//! `scrap_ledger` - purchasing, approval and commission engine for a scrap yard
//!
//! Buyers record material bought from suppliers at catalog prices. Each purchase
//! is classified against the supplier's price ceiling and either approved on the
//! spot or queued for an administrator. Approved purchases feed a monthly
//! commission ledger per buyer, and reports summarize purchases and expenses.

#![deny(
    unsafe_code,
    unsafe_op_in_unsafe_fn,
    unreachable_code,
    unreachable_patterns,
    unused_must_use,
    rustdoc::broken_intra_doc_links,
    rustdoc::private_intra_doc_links,
)]
#![warn(
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    // Money is f64; comparisons go through `partial_cmp`
    clippy::float_cmp,
    clippy::float_cmp_const,
    clippy::lossy_float_literal,
    clippy::inefficient_to_string,
    clippy::large_types_passed_by_value,
    clippy::needless_pass_by_value,
    clippy::unnecessary_wraps,
    clippy::clone_on_ref_ptr,
    clippy::dbg_macro,
    clippy::exit,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,
    clippy::cognitive_complexity,
    clippy::large_enum_variant,
    clippy::match_same_arms,
    clippy::too_many_lines,
    clippy::enum_glob_use,
    clippy::inconsistent_struct_constructor,
    clippy::must_use_candidate,
    clippy::redundant_closure_for_method_calls,
    clippy::semicolon_if_nothing_returned,
    clippy::wildcard_imports,
    future_incompatible,
    rust_2018_idioms,
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
)]

/// Roles, principals and the authorization gate
pub mod auth;
/// Configuration management for database and application settings
pub mod config;
/// Core business logic - pricing, approval, catalogs, commissions and reporting
pub mod core;
/// SeaORM entity definitions for database tables
pub mod entities;
/// Unified error types and result handling
pub mod errors;
/// Authorization boundary used by front ends
pub mod service;

#[cfg(test)]
pub mod test_utils;
