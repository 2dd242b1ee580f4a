use clap::{Arg, Command};
use std::path::PathBuf;
use std::time::Instant;
use trip_ingest::{Ingestor, MemoryStore, TripFilter, TripStore, UploadedFile, DEFAULT_BATCH_SIZE};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let matches = Command::new("ingest")
        .arg(
            Arg::new("path")
                .long("path")
                .value_parser(clap::value_parser!(PathBuf))
                .required(true),
        )
        .arg(
            Arg::new("batch_size")
                .long("batch-size")
                .value_parser(clap::value_parser!(usize))
                .default_value("1000"),
        )
        .arg(
            Arg::new("stats")
                .long("stats")
                .help("Also print aggregate statistics over the ingested trips")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let path = matches.get_one::<PathBuf>("path").unwrap();
    let batch_size = *matches
        .get_one::<usize>("batch_size")
        .unwrap_or(&DEFAULT_BATCH_SIZE);

    let bytes = tokio::fs::read(path).await?;
    let name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string();
    let file = UploadedFile::new(name, bytes);

    let store = MemoryStore::new();
    let ingestor = Ingestor::new(&store).with_batch_size(batch_size);

    let start = Instant::now();
    let summary = ingestor.ingest(&file).await?;
    let elapsed = start.elapsed().as_secs_f64();
    let rps = (summary.total_trips as f64) / elapsed.max(f64::EPSILON);

    println!("{}", serde_json::to_string(&summary)?);
    println!(
        "source={} elapsed={:.1}s rows/sec={:.0}",
        path.display(),
        elapsed,
        rps
    );

    if matches.get_flag("stats") {
        let trips = store.trips_matching(&TripFilter::default(), None).await?;
        let stats = trip_ingest::trip_stats(&trips);
        println!("{}", serde_json::to_string(&stats)?);
    }
    Ok(())
}
