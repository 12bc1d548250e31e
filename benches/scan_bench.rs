use std::hint::black_box;
use std::time::Duration;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

use ridescan::conf::{IndexConfig, TableConfig};
use ridescan::table::RidesTable;
use ridescan::testutil::{generate_rides, rides_dir, ts};

const NUM_FILES: usize = 4;
const RIDES_PER_FILE: usize = 250_000;
const DAYS_PER_FILE: i64 = 30;
const RNG_SEED: u64 = 42;

fn table_config(indexes: IndexConfig) -> TableConfig {
    TableConfig {
        split_size_mb: 8,
        indexes,
        ..TableConfig::default()
    }
}

fn bench_average_distances(c: &mut Criterion) {
    let files: Vec<_> = (0..NUM_FILES)
        .map(|i| {
            let offset = chrono::Duration::days(DAYS_PER_FILE * i as i64);
            let start = ts("2020-01-01 00:00:00") + offset;
            generate_rides(RIDES_PER_FILE, DAYS_PER_FILE, start, RNG_SEED + i as u64)
        })
        .collect();
    let dir = rides_dir(&files);

    let no_indexes = IndexConfig {
        min_max: false,
        bucket: false,
        not_null: false,
    };
    let indexed = RidesTable::open(dir.path(), table_config(IndexConfig::default())).unwrap();
    let full_scan = RidesTable::open(dir.path(), table_config(no_indexes)).unwrap();
    let tables = [("indexed", indexed), ("full_scan", full_scan)];

    let mut group = c.benchmark_group("average_distances");
    group.throughput(Throughput::Elements((NUM_FILES * RIDES_PER_FILE) as u64));
    group.measurement_time(Duration::from_secs(10));
    group.sample_size(20);

    for (range_name, start, end) in [
        ("one_day", "2020-01-15 00:00:00", "2020-01-15 23:59:59"),
        ("one_month", "2020-02-01 00:00:00", "2020-02-29 23:59:59"),
        ("everything", "2019-01-01 00:00:00", "2021-01-01 00:00:00"),
    ] {
        let (start, end) = (ts(start), ts(end));
        for (table_name, table) in &tables {
            group.bench_with_input(
                BenchmarkId::new(*table_name, range_name),
                &(start, end),
                |b, &(start, end)| {
                    b.iter(|| black_box(table.average_distances(start, end).unwrap()));
                },
            );
        }
    }
    group.finish();
}

fn bench_open(c: &mut Criterion) {
    let start = ts("2020-01-01 00:00:00");
    let files = vec![generate_rides(RIDES_PER_FILE, DAYS_PER_FILE, start, RNG_SEED)];
    let dir = rides_dir(&files);

    let mut group = c.benchmark_group("open");
    group.throughput(Throughput::Elements(RIDES_PER_FILE as u64));
    group.sample_size(10);
    for split_size_mb in [0u64, 4] {
        group.bench_with_input(
            BenchmarkId::new("split_mb", split_size_mb),
            &split_size_mb,
            |b, &split_size_mb| {
                b.iter(|| {
                    let config = TableConfig {
                        split_size_mb,
                        ..TableConfig::default()
                    };
                    black_box(RidesTable::open(dir.path(), config).unwrap())
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_average_distances, bench_open);
criterion_main!(benches);
