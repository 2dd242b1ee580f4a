//! End-to-end ingestion orchestration: parse, derive, batch, upsert, count.

use log::{debug, info, warn};

use crate::batch::{into_batches, DEFAULT_BATCH_SIZE};
use crate::derive::derive_trips;
use crate::model::vendor_records;
use crate::parse::parse_rows;
use crate::store::TripStore;
use crate::{BatchFailure, IngestError, IngestResult, IngestSummary, UploadedFile};

/// Drives one ingestion run per uploaded file against an injected store.
///
/// Construct once at startup with a process-scoped store handle (`&S` or
/// `Arc<S>` both implement [`TripStore`]) and reuse across calls.
pub struct Ingestor<S> {
    store: S,
    batch_size: usize,
}

impl<S: TripStore> Ingestor<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Override the per-call payload bound. Panics if `size` is zero.
    pub fn with_batch_size(mut self, size: usize) -> Self {
        assert!(size > 0, "batch size must be at least 1");
        self.batch_size = size;
        self
    }

    /// Ingest one uploaded file.
    ///
    /// Vendor upsert is a hard gate: if it fails, no trip batch is attempted.
    /// Trip batches are independent partitions of the same logical write, so
    /// each is attempted even when an earlier one failed; every batch failure
    /// is collected and returned as one aggregated error. On success the
    /// summary reports the store's post-ingest totals, and a failing count
    /// query fails the whole call since the summary could not be honest.
    pub async fn ingest(&self, file: &UploadedFile) -> IngestResult<IngestSummary> {
        info!("ingesting {} ({} bytes)", file.name, file.bytes.len());
        let parsed = parse_rows(&file.bytes);
        debug!(
            "{}: accepted {} of {} lines ({} skipped), {} distinct vendors",
            file.name,
            parsed.trips.len(),
            parsed.lines_seen,
            parsed.lines_skipped,
            parsed.vendor_ids.len()
        );
        let trips = derive_trips(parsed.trips);
        let batches = into_batches(trips, self.batch_size);

        let vendors = vendor_records(&parsed.vendor_ids);
        self.store
            .upsert_vendors(&vendors)
            .await
            .map_err(IngestError::VendorUpsert)?;

        // Batches run sequentially, which also gives deterministic failure
        // ordering in the aggregated error.
        let mut failures = Vec::new();
        for (index, batch) in batches.iter().enumerate() {
            match self.store.upsert_trip_batch(batch).await {
                Ok(()) => debug!("batch {index}: upserted {} trips", batch.len()),
                Err(error) => {
                    warn!("batch {index} failed ({} rows): {error}", batch.len());
                    failures.push(BatchFailure {
                        batch_index: index,
                        rows: batch.len(),
                        error,
                    });
                }
            }
        }
        if !failures.is_empty() {
            return Err(IngestError::BatchUpserts(failures));
        }

        let total_trips = self
            .store
            .count_trips()
            .await
            .map_err(IngestError::CountTrips)?;
        let total_vendors = self
            .store
            .count_vendors()
            .await
            .map_err(IngestError::CountVendors)?;
        info!(
            "ingested {}: {total_trips} trips, {total_vendors} vendors total",
            file.name
        );
        Ok(IngestSummary {
            total_trips,
            total_vendors,
        })
    }
}
