//! Pricing rules shared by purchase submission and editing.
//!
//! These are pure functions over `f64`. Totals are compared against the ceiling
//! exactly, with no epsilon, so a total that lands on the ceiling bit-for-bit is
//! `equal` and anything a rounding step above it is `above`.

use crate::entities::{ApprovalStatus, PriceStatus};
use std::cmp::Ordering;

/// Total value of a line: `quantity * unit_price`.
#[must_use]
pub fn total_value(quantity: f64, unit_price: f64) -> f64 {
    quantity * unit_price
}

/// Classifies a total against a supplier ceiling.
///
/// Every pair lands in exactly one bucket. An unordered pair (NaN on either
/// side) is treated as `above` so it always waits for a human.
#[must_use]
pub fn classify(total: f64, ceiling: f64) -> PriceStatus {
    match total.partial_cmp(&ceiling) {
        Some(Ordering::Less) => PriceStatus::Below,
        Some(Ordering::Equal) => PriceStatus::Equal,
        Some(Ordering::Greater) | None => PriceStatus::Above,
    }
}

/// Approval state a freshly classified purchase starts in.
#[must_use]
pub const fn initial_approval(status: PriceStatus) -> ApprovalStatus {
    match status {
        PriceStatus::Below | PriceStatus::Equal => ApprovalStatus::Approved,
        PriceStatus::Above => ApprovalStatus::Pending,
    }
}

/// Commission owed on `total` at `percentage` percent.
#[must_use]
pub fn commission_amount(total: f64, percentage: f64) -> f64 {
    total * percentage / 100.0
}

/// Everything the engine derives from the inputs of a purchase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pricing {
    /// `quantity * unit_price`
    pub total_value: f64,
    /// Classification against the ceiling
    pub price_status: PriceStatus,
    /// Initial approval state
    pub approval_status: ApprovalStatus,
    /// `total_value * percentage / 100`
    pub commission_amount: f64,
}

/// Runs the full pricing pipeline for a new purchase.
#[must_use]
pub fn price_purchase(quantity: f64, unit_price: f64, ceiling: f64, percentage: f64) -> Pricing {
    let total = total_value(quantity, unit_price);
    let price_status = classify(total, ceiling);
    Pricing {
        total_value: total,
        price_status,
        approval_status: initial_approval(price_status),
        commission_amount: commission_amount(total, percentage),
    }
}
