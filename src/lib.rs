//! Bulk trip-record ingestion pipeline.
//!
//! - Parse an uploaded delimited buffer into trip candidates, dropping
//!   malformed rows silently while still registering their vendor ids.
//! - Derive per-trip fields: duration-consistency (`suspicious_trip`) and
//!   great-circle distance.
//! - Upsert vendors, then trips in bounded batches, through an injected
//!   [`TripStore`]; batch failures are aggregated rather than fail-fast.
//! - Read side: filtered/paginated listing and aggregate statistics.
//!
//! Data shape:
//! - `IngestSummary { total_trips, total_vendors }` on success
//! - `IngestError` naming the failing stage otherwise
#![cfg_attr(docsrs, feature(doc_cfg))]
//
pub mod batch;
pub mod derive;
pub mod model;
pub mod parse;
pub mod query;
pub mod store;

mod ingest;

pub use crate::batch::{into_batches, DEFAULT_BATCH_SIZE};
pub use crate::ingest::Ingestor;
pub use crate::model::{vendor_records, GeoPoint, StoreAndFwdFlag, TripRecord, VendorRecord};
pub use crate::parse::{parse_rows, ParsedRows};
pub use crate::query::{trip_stats, PageRequest, TripFilter, TripPage, TripStats};
pub use crate::store::{MemoryStore, StoreError, TripStore};

use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;

/// An upload as handed over by the transport layer: the raw bytes plus the
/// original filename, kept only for logging and error reporting.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Bytes,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

/// Post-ingest totals reported on success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestSummary {
    pub total_trips: u64,
    pub total_vendors: u64,
}

/// One failed trip-batch upsert inside an otherwise-continuing run.
#[derive(Debug, Clone, Error)]
#[error("batch {batch_index} ({rows} rows): {error}")]
pub struct BatchFailure {
    pub batch_index: usize,
    pub rows: usize,
    #[source]
    pub error: StoreError,
}

/// Failure of one ingestion run, naming the stage that failed.
///
/// `BatchUpserts` wraps the complete list of per-batch failures collected
/// after every batch was attempted, not just the first.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("vendor upsert failed: {0}")]
    VendorUpsert(#[source] StoreError),
    #[error("{} trip batch upsert(s) failed", .0.len())]
    BatchUpserts(Vec<BatchFailure>),
    #[error("trip count query failed: {0}")]
    CountTrips(#[source] StoreError),
    #[error("vendor count query failed: {0}")]
    CountVendors(#[source] StoreError),
}

pub type IngestResult<T> = std::result::Result<T, IngestError>;
