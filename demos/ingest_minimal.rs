use trip_ingest::{Ingestor, MemoryStore, PageRequest, TripFilter, TripStore, UploadedFile};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let csv = "id,vendor_id,pickup_datetime,dropoff_datetime,passenger_count,\
pickup_longitude,pickup_latitude,dropoff_longitude,dropoff_latitude,\
store_and_fwd_flag,trip_duration\n\
id0000001,1,2016-03-14 17:24:55,2016-03-14 17:32:30,1,-73.982155,40.767937,-73.964630,40.765602,N,455\n\
id0000002,2,2016-03-14 18:00:00,2016-03-14 18:10:00,2,-73.980415,40.738564,-73.999481,40.731152,N,999\n";

    let store = MemoryStore::new();
    let ingestor = Ingestor::new(&store);
    let summary = ingestor
        .ingest(&UploadedFile::new("sample.csv", csv))
        .await?;
    println!("trips={} vendors={}", summary.total_trips, summary.total_vendors);

    let page = store
        .list_trips(&PageRequest::new(1, 10), &TripFilter::default())
        .await?;
    for trip in &page.items {
        println!(
            "trip {}: {:.2} km, suspicious={}",
            trip.id, trip.trip_distance_km, trip.suspicious_trip
        );
    }
    Ok(())
}
