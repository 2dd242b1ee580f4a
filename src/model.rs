//! Core data types: trip records, vendor records, coordinates.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A geographic point as (longitude, latitude) in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
}

/// Store-and-forward flag. Exactly the literal `Y` maps to `Y`; every other
/// value, malformed ones included, maps to `N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreAndFwdFlag {
    Y,
    N,
}

impl StoreAndFwdFlag {
    pub fn from_field(field: &str) -> Self {
        if field == "Y" {
            Self::Y
        } else {
            Self::N
        }
    }
}

/// One persisted trip. `id` is the upsert key.
///
/// `suspicious_trip` and `trip_distance_km` are derived fields, not part of
/// the wire format; see [`crate::derive`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRecord {
    pub id: i64,
    pub vendor_id: i64,
    pub pickup_datetime: DateTime<Utc>,
    pub dropoff_datetime: DateTime<Utc>,
    pub passenger_count: u32,
    pub pickup_coordinates: GeoPoint,
    pub dropoff_coordinates: GeoPoint,
    pub store_and_fwd_flag: StoreAndFwdFlag,
    /// Declared trip duration in seconds, as read from the source file.
    pub trip_duration: i64,
    pub suspicious_trip: bool,
    pub trip_distance_km: f64,
}

/// One vendor. Vendors have no existence independent of ingested trips: a
/// vendor record exists because its id appeared on at least one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorRecord {
    pub id: i64,
    pub name: String,
}

impl VendorRecord {
    /// Display name is derived deterministically from the id.
    pub fn for_id(id: i64) -> Self {
        Self {
            id,
            name: format!("Vendor {id}"),
        }
    }
}

/// Build one vendor record per distinct id, in ascending id order.
pub fn vendor_records(ids: &BTreeSet<i64>) -> Vec<VendorRecord> {
    ids.iter().map(|&id| VendorRecord::for_id(id)).collect()
}
