//! Two-source comparison engine.
//!
//! Two independent modes share the `ship|date` correlation key but
//! produce different shapes: [`compare_with_bounce_back`] pairs API
//! sailings against external CSV rows (cross-product overlaps),
//! [`compare_users`] correlates two accounts' offer sets
//! (prefix-equivalent offer codes plus per-key sailing matches). Three
//! distinct notions of "same" coexist on purpose:
//! exact canonical-ship equality here in Mode A, five-character code
//! prefixes in Mode B, and the filter engine's substring matching; they
//! are not interchangeable.

mod bounce_back;
mod users;

pub use bounce_back::{
    ApiOfferRef, BounceBackComparison, BounceBackOfferRef, BounceBackStats, DateRange, Overlap,
    compare_with_bounce_back,
};
pub use users::{
    MatchingSailing, OfferRef, UserComparison, UserComparisonStats, compare_users,
};

/// Returns `a` unless it is empty, in which case `b`.
fn first_non_empty(a: String, b: String) -> String {
    if a.is_empty() { b } else { a }
}
