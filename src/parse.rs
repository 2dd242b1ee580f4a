//! Tolerant row parser for the trip CSV wire format.
//!
//! Field order: id, vendor_id, pickup_datetime, dropoff_datetime,
//! passenger_count, pickup_longitude, pickup_latitude, dropoff_longitude,
//! dropoff_latitude, store_and_fwd_flag, trip_duration.
//!
//! Known limitation inherited from the source format: fields are split on the
//! raw delimiter with no quoting or escaping, so a field containing a comma is
//! not handled. Fixing this would change which rows are accepted.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDateTime, Utc};
use memchr::memchr_iter;

use crate::model::{GeoPoint, StoreAndFwdFlag, TripRecord};

/// Number of positional fields a row must provide. Extra trailing fields are
/// ignored.
pub const FIELD_COUNT: usize = 11;

const DELIMITER: char = ',';
const LINE_BREAK: u8 = b'\n';

/// Result of one forward pass over an uploaded buffer.
///
/// `vendor_ids` is populated independently of full-row validity: any line with
/// a parsable vendor-id field registers its vendor, even when the rest of the
/// row is incomplete. The skip counters feed logging only.
#[derive(Debug, Default)]
pub struct ParsedRows {
    pub trips: Vec<TripRecord>,
    pub vendor_ids: BTreeSet<i64>,
    pub lines_seen: usize,
    pub lines_skipped: usize,
}

/// Parse a raw upload buffer into trip candidates plus the distinct vendor set.
///
/// The first line is treated as the header and discarded. Lines that are
/// incomplete, non-UTF-8, or fail any typed-field parse are dropped silently;
/// nothing propagates out of this function.
pub fn parse_rows(data: &[u8]) -> ParsedRows {
    let mut trips = Vec::new();
    let mut vendor_ids = BTreeSet::new();
    let mut lines_seen = 0usize;
    let mut header_done = false;

    let mut process = |raw: &[u8]| {
        if !header_done {
            header_done = true;
            return;
        }
        lines_seen += 1;
        // Tolerate CRLF input by trimming one trailing carriage return.
        let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
        if let Ok(line) = std::str::from_utf8(raw) {
            if let Some(trip) = parse_line(line, &mut vendor_ids) {
                trips.push(trip);
            }
        }
    };

    let mut cursor = 0usize;
    for nl in memchr_iter(LINE_BREAK, data) {
        process(&data[cursor..nl]);
        cursor = nl + 1;
    }
    if cursor < data.len() {
        process(&data[cursor..]);
    }

    let lines_skipped = lines_seen - trips.len();
    ParsedRows {
        trips,
        vendor_ids,
        lines_seen,
        lines_skipped,
    }
}

/// Parse one body line. Returns `None` for any incomplete or malformed row.
fn parse_line(line: &str, vendor_ids: &mut BTreeSet<i64>) -> Option<TripRecord> {
    let mut fields = [""; FIELD_COUNT];
    let mut split = line.split(DELIMITER);
    for slot in fields.iter_mut() {
        *slot = split.next().unwrap_or("");
    }
    let [id, vendor_id, pickup, dropoff, passengers, pickup_lon, pickup_lat, dropoff_lon, dropoff_lat, flag, duration] =
        fields;

    // Vendor discovery happens before the completeness check so that partial
    // rows still register their vendor.
    if !vendor_id.is_empty() {
        if let Ok(v) = vendor_id.parse::<i64>() {
            vendor_ids.insert(v);
        }
    }

    if fields.iter().any(|f| f.is_empty()) {
        return None;
    }

    Some(TripRecord {
        // The id field carries a two-character source prefix (e.g. "id12345")
        // that must be stripped before integer parsing. Fragile convention
        // inherited from the wire format; kept deliberately.
        id: id.get(2..)?.parse().ok()?,
        vendor_id: vendor_id.parse().ok()?,
        pickup_datetime: parse_instant(pickup)?,
        dropoff_datetime: parse_instant(dropoff)?,
        passenger_count: passengers.parse().ok()?,
        pickup_coordinates: GeoPoint {
            longitude: parse_coord(pickup_lon)?,
            latitude: parse_coord(pickup_lat)?,
        },
        dropoff_coordinates: GeoPoint {
            longitude: parse_coord(dropoff_lon)?,
            latitude: parse_coord(dropoff_lat)?,
        },
        store_and_fwd_flag: StoreAndFwdFlag::from_field(flag),
        trip_duration: duration.parse().ok()?,
        // Derived fields are filled in by the derivation step.
        suspicious_trip: false,
        trip_distance_km: 0.0,
    })
}

/// Timestamps arrive either as RFC 3339 or as the source's naive
/// `YYYY-MM-DD HH:MM:SS` form, which is interpreted as UTC. The derivation
/// step subtracts the instants produced here, so the comparison with the
/// declared duration is self-consistent.
fn parse_instant(field: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(field) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(field, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

fn parse_coord(field: &str) -> Option<f64> {
    field.parse::<f64>().ok().filter(|v| v.is_finite())
}
