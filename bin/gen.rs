use chrono::NaiveDate;
use clap::{Arg, ArgAction, Command};
use std::io::{self, Write};

fn main() -> anyhow::Result<()> {
    let matches = Command::new("gen")
        .arg(
            Arg::new("rows")
                .long("rows")
                .value_parser(clap::value_parser!(u64))
                .required(true),
        )
        .arg(
            Arg::new("with_header")
                .long("with-header")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("suspicious_every")
                .long("suspicious-every")
                .help("Every Nth row declares a duration that disagrees with its timestamps")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("malformed_every")
                .long("malformed-every")
                .help("Every Nth row is emitted with an empty passenger_count field")
                .value_parser(clap::value_parser!(u64)),
        )
        .get_matches();

    let rows: u64 = *matches.get_one("rows").unwrap();
    let with_header = matches.get_flag("with_header");
    let suspicious_every = matches.get_one::<u64>("suspicious_every").copied();
    let malformed_every = matches.get_one::<u64>("malformed_every").copied();

    let mut out = io::BufWriter::new(io::stdout().lock());

    if with_header {
        writeln!(
            &mut out,
            "id,vendor_id,pickup_datetime,dropoff_datetime,passenger_count,\
             pickup_longitude,pickup_latitude,dropoff_longitude,dropoff_latitude,\
             store_and_fwd_flag,trip_duration"
        )?;
    }

    let base = NaiveDate::from_ymd_opt(2016, 3, 14)
        .unwrap()
        .and_hms_opt(17, 24, 55)
        .unwrap();

    // Deterministic data in the shape of the real feed.
    for i in 0..rows {
        let pickup = base + chrono::Duration::seconds(i as i64);
        let actual = 300 + (i % 1800) as i64;
        let dropoff = pickup + chrono::Duration::seconds(actual);
        let declared = match suspicious_every {
            Some(n) if n > 0 && i % n == 0 => actual + 37,
            _ => actual,
        };
        let passengers = if matches!(malformed_every, Some(n) if n > 0 && i % n == 0) {
            String::new()
        } else {
            (1 + i % 4).to_string()
        };
        let flag = if i % 5 == 0 { "Y" } else { "N" };
        writeln!(
            &mut out,
            "id{:07},{},{},{},{},{:.6},{:.6},{:.6},{:.6},{},{}",
            i,
            1 + i % 2,
            pickup.format("%Y-%m-%d %H:%M:%S"),
            dropoff.format("%Y-%m-%d %H:%M:%S"),
            passengers,
            -73.98 + (i % 100) as f64 * 1e-4,
            40.75 + (i % 100) as f64 * 1e-4,
            -73.96 + (i % 100) as f64 * 1e-4,
            40.77 + (i % 100) as f64 * 1e-4,
            flag,
            declared,
        )?;
        if i % 10_000 == 0 {
            out.flush()?;
        } // keep buffers moving on huge runs
    }

    out.flush()?;
    Ok(())
}
