//! Test and benchmark utilities.
//!
//! This module is only available when the `testutil` feature is enabled.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{Duration, NaiveDateTime};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tempfile::TempDir;

use crate::core::schema::parse_timestamp;

pub const RIDES_HEADER: &str = "VendorID,tpep_pickup_datetime,tpep_dropoff_datetime,\
passenger_count,trip_distance,RatecodeID,store_and_fwd_flag,PULocationID,DOLocationID,\
payment_type,fare_amount,extra,mta_tax,tip_amount,tolls_amount,improvement_surcharge,\
total_amount,congestion_surcharge";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a `yyyy-MM-dd HH:mm:ss` literal. Panics on malformed input.
pub fn ts(raw: &str) -> NaiveDateTime {
    parse_timestamp(raw).unwrap_or_else(|| panic!("bad timestamp literal '{raw}'"))
}

/// The columns of a ride the average distance query looks at. Other columns
/// are written with fixed values.
#[derive(Debug, Clone, PartialEq)]
pub struct Ride {
    pub pickup: NaiveDateTime,
    pub dropoff: NaiveDateTime,
    pub passenger_count: Option<i8>,
    pub trip_distance: Option<f64>,
}

impl Ride {
    pub fn new(pickup: &str, dropoff: &str, passenger_count: i8, trip_distance: f64) -> Self {
        Self {
            pickup: ts(pickup),
            dropoff: ts(dropoff),
            passenger_count: Some(passenger_count),
            trip_distance: Some(trip_distance),
        }
    }

    pub fn to_csv_line(&self) -> String {
        let count = self.passenger_count.map(|c| c.to_string()).unwrap_or_default();
        let distance = self.trip_distance.map(|d| d.to_string()).unwrap_or_default();
        format!(
            "1,{},{},{},{},1,N,151,239,1,7,0.5,0.5,1.65,0,0.3,9.95,2.5",
            self.pickup.format(TIMESTAMP_FORMAT),
            self.dropoff.format(TIMESTAMP_FORMAT),
            count,
            distance
        )
    }
}

/// Deterministic rides spread over `days` days from `start`. Days ascend
/// through the output while times within a day are shuffled, the way real
/// trip logs are appended. About one ride in twenty misses its passenger
/// count or distance.
pub fn generate_rides(count: usize, days: i64, start: NaiveDateTime, seed: u64) -> Vec<Ride> {
    let mut rng = StdRng::seed_from_u64(seed);
    let days = days.max(1);
    (0..count)
        .map(|i| {
            let day = i as i64 * days / count.max(1) as i64;
            let pickup = start + Duration::days(day) + Duration::seconds(rng.gen_range(0..86_400));
            let dropoff = pickup + Duration::seconds(rng.gen_range(60..7_200));
            let passenger_count = (rng.gen_range(0..20) != 0).then(|| rng.gen_range(0..=6));
            let trip_distance =
                (rng.gen_range(0..20) != 0).then(|| rng.gen_range(0..3_000) as f64 / 100.0);
            Ride {
                pickup,
                dropoff,
                passenger_count,
                trip_distance,
            }
        })
        .collect()
}

pub fn write_csv(path: &Path, header: &str, lines: &[String]) -> std::io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "{header}")?;
    for line in lines {
        writeln!(out, "{line}")?;
    }
    out.flush()
}

pub fn write_rides(path: &Path, rides: &[Ride]) -> std::io::Result<()> {
    let lines: Vec<String> = rides.iter().map(Ride::to_csv_line).collect();
    write_csv(path, RIDES_HEADER, &lines)
}

/// Write `files` ride files named `rides-N.csv` into a fresh temp dir.
pub fn rides_dir(files: &[Vec<Ride>]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (i, rides) in files.iter().enumerate() {
        write_rides(&dir.path().join(format!("rides-{i}.csv")), rides).unwrap();
    }
    dir
}

/// Brute force answer of the average distance query.
pub fn expected_averages(
    rides: &[Ride],
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> HashMap<i32, f64> {
    let mut sums: HashMap<i32, (f64, u64)> = HashMap::new();
    for ride in rides {
        let within = |t: NaiveDateTime| start <= t && t <= end;
        if !within(ride.pickup) || !within(ride.dropoff) {
            continue;
        }
        if let (Some(count), Some(distance)) = (ride.passenger_count, ride.trip_distance) {
            let entry = sums.entry(count as i32).or_default();
            entry.0 += distance;
            entry.1 += 1;
        }
    }
    sums.into_iter()
        .map(|(count, (sum, n))| (count, sum / n as f64))
        .collect()
}

/// Compare two query answers allowing for summation order differences.
pub fn assert_averages_eq(actual: &HashMap<i32, f64>, expected: &HashMap<i32, f64>) {
    let mut actual_keys: Vec<_> = actual.keys().copied().collect();
    let mut expected_keys: Vec<_> = expected.keys().copied().collect();
    actual_keys.sort();
    expected_keys.sort();
    assert_eq!(actual_keys, expected_keys);
    for (key, value) in expected {
        let got = actual[key];
        assert!(
            (got - value).abs() <= 1e-9 * value.abs().max(1.0),
            "average for {key}: got {got}, expected {value}"
        );
    }
}
