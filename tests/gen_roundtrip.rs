use std::process::Command;
use trip_ingest::{derive::derive_trips, parse_rows};

#[test]
fn generator_output_round_trips_through_the_parser() {
    let output = Command::new(env!("CARGO_BIN_EXE_gen"))
        .args([
            "--rows",
            "100",
            "--with-header",
            "--suspicious-every",
            "10",
            "--malformed-every",
            "25",
        ])
        .output()
        .expect("run gen");
    assert!(output.status.success());

    let parsed = parse_rows(&output.stdout);
    assert_eq!(parsed.lines_seen, 100);
    // Rows 0, 25, 50 and 75 carry an empty passenger_count and are dropped
    assert_eq!(parsed.trips.len(), 96);
    assert_eq!(parsed.lines_skipped, 4);
    // Dropped rows still register their vendors
    assert_eq!(
        parsed.vendor_ids.iter().copied().collect::<Vec<_>>(),
        vec![1, 2]
    );

    // Every 10th row declares a skewed duration; rows 0 and 50 of those were
    // dropped by the malformed knob, leaving 8 suspicious trips
    let trips = derive_trips(parsed.trips);
    let suspicious = trips.iter().filter(|t| t.suspicious_trip).count();
    assert_eq!(suspicious, 8);
}
