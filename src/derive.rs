//! Derived-field computation: duration consistency and trip distance.
//!
//! This step is pure and infallible; every candidate the parser accepted
//! passes through unchanged apart from the derived fields.

use chrono::{DateTime, Utc};

use crate::model::{GeoPoint, TripRecord};

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Wall-clock difference in whole seconds, fractional part truncated.
pub fn actual_duration_seconds(pickup: DateTime<Utc>, dropoff: DateTime<Utc>) -> i64 {
    (dropoff - pickup).num_seconds()
}

/// Haversine great-circle distance between two points, in kilometers.
pub fn distance_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let (lat1, lon1) = (a.latitude.to_radians(), a.longitude.to_radians());
    let (lat2, lon2) = (b.latitude.to_radians(), b.longitude.to_radians());
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let sin_dlat = (dlat * 0.5).sin();
    let sin_dlon = (dlon * 0.5).sin();
    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon;
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

/// Fill in the derived fields of one trip.
///
/// A trip is suspicious iff its declared duration differs from the difference
/// of its recorded pickup and dropoff instants.
pub fn derive_trip(mut trip: TripRecord) -> TripRecord {
    let actual = actual_duration_seconds(trip.pickup_datetime, trip.dropoff_datetime);
    trip.suspicious_trip = trip.trip_duration != actual;
    trip.trip_distance_km = distance_km(trip.pickup_coordinates, trip.dropoff_coordinates);
    trip
}

/// Derive fields for every trip, preserving order.
pub fn derive_trips(trips: Vec<TripRecord>) -> Vec<TripRecord> {
    trips.into_iter().map(derive_trip).collect()
}
