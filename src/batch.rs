//! Order-preserving partitioning of the record sequence into bounded batches.
//!
//! Batching exists solely to bound any single persistence call's payload; it
//! carries no business rule.

use crate::model::TripRecord;

/// Default maximum records per persistence call.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Partition `trips` into consecutive groups of at most `size` records,
/// preserving input order within and across batches. The final batch may be
/// smaller than `size` and is still emitted.
pub fn into_batches(trips: Vec<TripRecord>, size: usize) -> Vec<Vec<TripRecord>> {
    assert!(size > 0, "batch size must be at least 1");
    let mut batches = Vec::with_capacity(trips.len().div_ceil(size));
    let mut current = Vec::with_capacity(size.min(trips.len()));
    for trip in trips {
        current.push(trip);
        if current.len() == size {
            batches.push(std::mem::replace(&mut current, Vec::with_capacity(size)));
        }
    }
    if !current.is_empty() {
        batches.push(current);
    }
    batches
}
