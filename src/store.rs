//! Persistence gateway: the storage contract the pipeline writes through,
//! plus an in-memory implementation used by tests, demos, and the CLI.

use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::RwLock;

use crate::model::{TripRecord, VendorRecord};
use crate::query::{PageRequest, TripFilter, TripPage};

/// Opaque backend failure. Carries the backend's own message; the pipeline
/// attaches the failing stage when it wraps one of these.
#[derive(Debug, Clone, Error)]
#[error("storage backend error: {0}")]
pub struct StoreError(pub String);

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Storage contract consumed by the ingestion pipeline and the read side.
///
/// Upserts are insert-or-replace keyed by the record's `id`; repeated
/// application with the same key never duplicates a row. No ordering across
/// keys within one call is required. Retry policy, if any, lives behind this
/// trait, never in the pipeline.
#[allow(async_fn_in_trait)]
pub trait TripStore {
    async fn upsert_vendors(&self, vendors: &[VendorRecord]) -> Result<(), StoreError>;
    async fn upsert_trip_batch(&self, trips: &[TripRecord]) -> Result<(), StoreError>;
    async fn count_trips(&self) -> Result<u64, StoreError>;
    async fn count_vendors(&self) -> Result<u64, StoreError>;
    /// One page of matching trips, ordered by pickup time ascending.
    async fn list_trips(
        &self,
        page: &PageRequest,
        filter: &TripFilter,
    ) -> Result<TripPage, StoreError>;
    /// Trips matching `filter`, for statistics and map views. Statistics pass
    /// `None`; map views pass a cap (the read side uses 20,000) so one call
    /// cannot produce an unbounded payload.
    async fn trips_matching(
        &self,
        filter: &TripFilter,
        limit: Option<usize>,
    ) -> Result<Vec<TripRecord>, StoreError>;
    /// All known vendor ids, ascending.
    async fn vendor_ids(&self) -> Result<Vec<i64>, StoreError>;
}

impl<T: TripStore + Sync> TripStore for &T {
    async fn upsert_vendors(&self, vendors: &[VendorRecord]) -> Result<(), StoreError> {
        (**self).upsert_vendors(vendors).await
    }
    async fn upsert_trip_batch(&self, trips: &[TripRecord]) -> Result<(), StoreError> {
        (**self).upsert_trip_batch(trips).await
    }
    async fn count_trips(&self) -> Result<u64, StoreError> {
        (**self).count_trips().await
    }
    async fn count_vendors(&self) -> Result<u64, StoreError> {
        (**self).count_vendors().await
    }
    async fn list_trips(
        &self,
        page: &PageRequest,
        filter: &TripFilter,
    ) -> Result<TripPage, StoreError> {
        (**self).list_trips(page, filter).await
    }
    async fn trips_matching(
        &self,
        filter: &TripFilter,
        limit: Option<usize>,
    ) -> Result<Vec<TripRecord>, StoreError> {
        (**self).trips_matching(filter, limit).await
    }
    async fn vendor_ids(&self) -> Result<Vec<i64>, StoreError> {
        (**self).vendor_ids().await
    }
}

impl<T: TripStore + Sync + Send> TripStore for Arc<T> {
    async fn upsert_vendors(&self, vendors: &[VendorRecord]) -> Result<(), StoreError> {
        (**self).upsert_vendors(vendors).await
    }
    async fn upsert_trip_batch(&self, trips: &[TripRecord]) -> Result<(), StoreError> {
        (**self).upsert_trip_batch(trips).await
    }
    async fn count_trips(&self) -> Result<u64, StoreError> {
        (**self).count_trips().await
    }
    async fn count_vendors(&self) -> Result<u64, StoreError> {
        (**self).count_vendors().await
    }
    async fn list_trips(
        &self,
        page: &PageRequest,
        filter: &TripFilter,
    ) -> Result<TripPage, StoreError> {
        (**self).list_trips(page, filter).await
    }
    async fn trips_matching(
        &self,
        filter: &TripFilter,
        limit: Option<usize>,
    ) -> Result<Vec<TripRecord>, StoreError> {
        (**self).trips_matching(filter, limit).await
    }
    async fn vendor_ids(&self) -> Result<Vec<i64>, StoreError> {
        (**self).vendor_ids().await
    }
}

#[derive(Debug, Default)]
struct Tables {
    trips: BTreeMap<i64, TripRecord>,
    vendors: BTreeMap<i64, VendorRecord>,
}

/// In-memory store keyed the same way a backing database would be. Intended
/// for tests, demos, and the CLI; construct once and share by reference or
/// `Arc`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sorted snapshot of trips matching `filter`.
    async fn matching(&self, filter: &TripFilter) -> Vec<TripRecord> {
        let tables = self.tables.read().await;
        let mut trips: Vec<TripRecord> = tables
            .trips
            .values()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect();
        trips.sort_by_key(|t| (t.pickup_datetime, t.id));
        trips
    }
}

impl TripStore for MemoryStore {
    async fn upsert_vendors(&self, vendors: &[VendorRecord]) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        for vendor in vendors {
            tables.vendors.insert(vendor.id, vendor.clone());
        }
        Ok(())
    }

    async fn upsert_trip_batch(&self, trips: &[TripRecord]) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        for trip in trips {
            tables.trips.insert(trip.id, trip.clone());
        }
        Ok(())
    }

    async fn count_trips(&self) -> Result<u64, StoreError> {
        Ok(self.tables.read().await.trips.len() as u64)
    }

    async fn count_vendors(&self) -> Result<u64, StoreError> {
        Ok(self.tables.read().await.vendors.len() as u64)
    }

    async fn list_trips(
        &self,
        page: &PageRequest,
        filter: &TripFilter,
    ) -> Result<TripPage, StoreError> {
        let matching = self.matching(filter).await;
        let total = matching.len();
        let limit = page.clamped_limit();
        let items: Vec<TripRecord> = matching
            .into_iter()
            .skip(page.offset())
            .take(limit)
            .collect();
        Ok(TripPage {
            items,
            total,
            page: page.page,
            limit: page.limit,
            total_pages: total.div_ceil(limit),
        })
    }

    async fn trips_matching(
        &self,
        filter: &TripFilter,
        limit: Option<usize>,
    ) -> Result<Vec<TripRecord>, StoreError> {
        let mut trips = self.matching(filter).await;
        if let Some(cap) = limit {
            trips.truncate(cap);
        }
        Ok(trips)
    }

    async fn vendor_ids(&self) -> Result<Vec<i64>, StoreError> {
        Ok(self.tables.read().await.vendors.keys().copied().collect())
    }
}
