//! Burst deduplication.
//!
//! The overlay may deliver the same alert several times in quick succession.
//! A candidate is dropped when it repeats the donor name and amount of the
//! most recently persisted donation within [`DUPLICATE_WINDOW_SECS`].
//!
//! Only the single last entry is consulted. A repeat separated by another
//! distinct donation is kept.

use super::entity::Donation;

/// Window within which a repeated (name, amount) pair counts as a duplicate
pub const DUPLICATE_WINDOW_SECS: i64 = 60;

/// Whether `candidate` repeats `last` within the duplicate window
pub fn is_burst_duplicate(last: Option<&Donation>, candidate: &Donation) -> bool {
    let Some(last) = last else {
        return false;
    };

    let elapsed = candidate.timestamp - last.timestamp;
    last.donor_name == candidate.donor_name
        && last.amount == candidate.amount
        && elapsed.num_seconds() < DUPLICATE_WINDOW_SECS
}
