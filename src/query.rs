//! Read-side filter specification, pagination, and aggregate statistics.
//!
//! Filters are an explicit struct consumed by [`TripFilter::matches`] rather
//! than a dynamically chained query builder; a storage backend applies the
//! same specification however its query language requires.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{StoreAndFwdFlag, TripRecord};

/// Filter specification over stored trips. Every field is optional; an empty
/// filter matches everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TripFilter {
    /// Lower bound on pickup time (inclusive).
    pub start_date: Option<DateTime<Utc>>,
    /// Upper bound on dropoff time (inclusive).
    pub end_date: Option<DateTime<Utc>>,
    pub duration_min: Option<i64>,
    pub duration_max: Option<i64>,
    pub distance_min_km: Option<f64>,
    pub distance_max_km: Option<f64>,
    pub vendor_id: Option<i64>,
    /// `None` means "all"; `Some` narrows to one flag value.
    pub store_and_fwd_flag: Option<StoreAndFwdFlag>,
}

impl TripFilter {
    pub fn matches(&self, trip: &TripRecord) -> bool {
        if let Some(start) = self.start_date {
            if trip.pickup_datetime < start {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if trip.dropoff_datetime > end {
                return false;
            }
        }
        if let Some(min) = self.duration_min {
            if trip.trip_duration < min {
                return false;
            }
        }
        if let Some(max) = self.duration_max {
            if trip.trip_duration > max {
                return false;
            }
        }
        if let Some(min) = self.distance_min_km {
            if trip.trip_distance_km < min {
                return false;
            }
        }
        if let Some(max) = self.distance_max_km {
            if trip.trip_distance_km > max {
                return false;
            }
        }
        if let Some(vendor) = self.vendor_id {
            if trip.vendor_id != vendor {
                return false;
            }
        }
        if let Some(flag) = self.store_and_fwd_flag {
            if trip.store_and_fwd_flag != flag {
                return false;
            }
        }
        true
    }
}

/// 1-based page request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: usize,
    pub limit: usize,
}

impl PageRequest {
    pub fn new(page: usize, limit: usize) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
        }
    }

    /// Limit with the >= 1 invariant enforced. The fields are public and the
    /// type deserializes, so consumers clamp rather than trust construction.
    pub fn clamped_limit(&self) -> usize {
        self.limit.max(1)
    }

    /// Zero-based offset of the first item on this page.
    pub fn offset(&self) -> usize {
        (self.page.max(1) - 1) * self.clamped_limit()
    }
}

/// One page of trips matching a filter, ordered by pickup time ascending.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripPage {
    pub items: Vec<TripRecord>,
    pub total: usize,
    pub page: usize,
    pub limit: usize,
    pub total_pages: usize,
}

/// Aggregate statistics over a filtered trip set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripStats {
    pub total_trips: usize,
    pub avg_duration_seconds: f64,
    pub avg_distance_km: f64,
    pub avg_speed_kmh: f64,
    pub suspicious_trips: usize,
}

/// Compute statistics over an already-filtered trip set. An empty set yields
/// all-zero statistics.
pub fn trip_stats(trips: &[TripRecord]) -> TripStats {
    let total_trips = trips.len();
    if total_trips == 0 {
        return TripStats {
            total_trips: 0,
            avg_duration_seconds: 0.0,
            avg_distance_km: 0.0,
            avg_speed_kmh: 0.0,
            suspicious_trips: 0,
        };
    }
    let mut sum_duration = 0.0;
    let mut sum_distance = 0.0;
    let mut suspicious_trips = 0usize;
    for trip in trips {
        sum_duration += trip.trip_duration as f64;
        sum_distance += trip.trip_distance_km;
        if trip.suspicious_trip {
            suspicious_trips += 1;
        }
    }
    let avg_duration_seconds = sum_duration / total_trips as f64;
    let avg_distance_km = sum_distance / total_trips as f64;
    // Guard against a zero average duration: fall back to a one-hour divisor.
    let hours = avg_duration_seconds / 3600.0;
    let avg_speed_kmh = avg_distance_km / if hours == 0.0 { 1.0 } else { hours };
    TripStats {
        total_trips,
        avg_duration_seconds,
        avg_distance_km,
        avg_speed_kmh,
        suspicious_trips,
    }
}
