use std::{fs::File, io::Write};
use trip_ingest::{Ingestor, MemoryStore, TripFilter, TripStore, UploadedFile};

const HEADER: &str = "id,vendor_id,pickup_datetime,dropoff_datetime,passenger_count,\
pickup_longitude,pickup_latitude,dropoff_longitude,dropoff_latitude,\
store_and_fwd_flag,trip_duration";

#[tokio::test]
async fn ingests_file_from_disk_and_reingest_is_idempotent() -> anyhow::Result<()> {
    // Create a file the way an upload would arrive on disk
    let dir = tempfile::tempdir()?;
    let csv_path = dir.path().join("trips.csv");
    let mut f = File::create(&csv_path)?;
    writeln!(f, "{HEADER}")?;
    for i in 0..2_500 {
        writeln!(
            f,
            "id{:07},{},2016-01-01T10:00:00Z,2016-01-01T10:20:00Z,1,\
             -73.980000,40.750000,-73.960000,40.770000,N,1200",
            i,
            1 + i % 3,
        )?;
    }
    drop(f);

    let bytes = tokio::fs::read(&csv_path).await?;
    let store = MemoryStore::new();
    let ingestor = Ingestor::new(&store).with_batch_size(1000);

    let summary = ingestor
        .ingest(&UploadedFile::new("trips.csv", bytes.clone()))
        .await?;
    assert_eq!(summary.total_trips, 2_500);
    assert_eq!(summary.total_vendors, 3);

    // Upsert-by-id: ingesting the same file again changes nothing
    let summary = ingestor
        .ingest(&UploadedFile::new("trips.csv", bytes))
        .await?;
    assert_eq!(summary.total_trips, 2_500);
    assert_eq!(summary.total_vendors, 3);

    let trips = store.trips_matching(&TripFilter::default(), None).await?;
    assert_eq!(trips.len(), 2_500);
    assert!(trips.iter().all(|t| !t.suspicious_trip));
    Ok(())
}
