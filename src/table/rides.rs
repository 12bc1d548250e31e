use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::time::Instant;

use chrono::NaiveDateTime;
use log::{debug, info};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::conf::{IndexConfig, TableConfig};
use crate::core::{ScanError, Schema, Value};
use crate::index::{BucketIndex, ColumnIndex, MinMaxIndex, NotNullIndex, by_day};
use crate::io::discover_files;
use crate::query::{AggregationOperator, DoubleAvg, Groups, Interval, QueryPredicate, merge_groups};
use crate::storage::{SegmentOptions, StorageFile};

use super::schema::{DROPOFF, PASSENGER_COUNT, PICKUP, TRIP_DISTANCE, rides_schema};

const CSV_EXTENSION: &str = "csv";

fn build_pool(threads: usize, name: &'static str) -> Result<ThreadPool, ScanError> {
    ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(move |i| format!("{name}-{i}"))
        .build()
        .map_err(|e| ScanError::ConfigError(format!("building {name} pool: {e}")))
}

/// Fresh, empty indexes for one segment.
fn prepare_indexes(config: &IndexConfig) -> Vec<Box<dyn ColumnIndex>> {
    let mut indexes: Vec<Box<dyn ColumnIndex>> = Vec::new();
    if config.min_max {
        indexes.push(Box::new(MinMaxIndex::new(PICKUP)));
        indexes.push(Box::new(MinMaxIndex::new(DROPOFF)));
    }
    if config.bucket {
        indexes.push(Box::new(BucketIndex::new(PICKUP, by_day())));
        indexes.push(Box::new(BucketIndex::new(DROPOFF, by_day())));
    }
    if config.not_null {
        indexes.push(Box::new(NotNullIndex::new(PASSENGER_COUNT)));
        indexes.push(Box::new(NotNullIndex::new(TRIP_DISTANCE)));
    }
    indexes
}

/// Column names used by `recheck`, `group_by` and `value`, without repeats.
fn required_columns<'a>(
    recheck: &'a QueryPredicate,
    group_by: &'a str,
    value: &'a str,
) -> Vec<&'a str> {
    let mut names: Vec<&str> = Vec::new();
    let referenced = recheck
        .between()
        .iter()
        .map(|b| b.column.as_str())
        .chain(recheck.not_equal().iter().map(|n| n.column.as_str()))
        .chain([group_by, value]);
    for name in referenced {
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

/// A directory of taxi ride CSV files, indexed once and queried in parallel.
pub struct RidesTable {
    schema: Schema,
    segments: Vec<StorageFile>,
    query_pool: ThreadPool,
}

impl RidesTable {
    /// Discover every CSV file below `data_dir` and build the indexes of all
    /// their segments on a pool of `config.init_threads` threads.
    pub fn open(data_dir: &Path, config: TableConfig) -> Result<Self, ScanError> {
        config.validate()?;
        if !config.indexes.min_max {
            info!("Min-max index disabled");
        }
        if !config.indexes.not_null {
            info!("Not-null index disabled");
        }
        if !config.indexes.bucket {
            info!("Bucket index disabled");
        }

        let schema = rides_schema()?;
        let files = discover_files(data_dir, CSV_EXTENSION)?;
        let options = SegmentOptions::from(&config);
        let started = Instant::now();

        let init_pool = build_pool(config.init_threads, "init")?;
        let per_file = init_pool.install(|| {
            files
                .par_iter()
                .map(|path| {
                    StorageFile::open_segments(path, &schema, &options, || {
                        prepare_indexes(&config.indexes)
                    })
                })
                .collect::<Result<Vec<_>, ScanError>>()
        })?;
        let segments: Vec<StorageFile> = per_file.into_iter().flatten().collect();

        info!(
            "Indexed {} files as {} segments in {:?}",
            files.len(),
            segments.len(),
            started.elapsed()
        );

        Ok(Self {
            schema,
            segments,
            query_pool: build_pool(config.query_threads, "query")?,
        })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Segments sorted by file path, then start offset.
    pub fn segments(&self) -> &[StorageFile] {
        &self.segments
    }

    pub fn rows_count(&self) -> u64 {
        self.segments.iter().map(StorageFile::rows_count).sum()
    }

    fn aggregate_segment(
        segment: &StorageFile,
        required: &[&str],
        scan: &QueryPredicate,
        recheck: &QueryPredicate,
        group_by: &str,
        value: &str,
    ) -> Result<Groups<DoubleAvg>, ScanError> {
        let mut reader = segment.open_reader(required, scan)?;
        let matches = recheck.bind(reader.schema())?;
        let missing = |name: &str| ScanError::SchemaError(format!("column '{}' not read", name));
        let key_pos = reader.schema().index_of(group_by).ok_or_else(|| missing(group_by))?;
        let value_pos = reader.schema().index_of(value).ok_or_else(|| missing(value))?;

        let mut groups = Groups::new();
        for row in &mut reader {
            let row = row?;
            if !matches.matches(&row) {
                continue;
            }
            let (Some(key), Some(v)) = (row.get(key_pos), row.get(value_pos).and_then(Value::as_f64))
            else {
                continue;
            };
            groups
                .entry(key.clone())
                .or_insert_with(DoubleAvg::default)
                .add(v);
        }
        reader.log_stats();
        Ok(groups)
    }

    /// Average of `value` per distinct `group_by` value over rows matching
    /// `recheck`. `scan` is handed to the indexes to skip segments and byte
    /// ranges and must not be stricter than `recheck`.
    pub fn grouped_average(
        &self,
        scan: &QueryPredicate,
        recheck: &QueryPredicate,
        group_by: &str,
        value: &str,
    ) -> Result<BTreeMap<Value, f64>, ScanError> {
        let required = required_columns(recheck, group_by, value);
        let started = Instant::now();
        let groups = self.query_pool.install(|| {
            self.segments
                .par_iter()
                .map(|segment| {
                    Self::aggregate_segment(segment, &required, scan, recheck, group_by, value)
                })
                .try_reduce(Groups::new, |left, right| Ok(merge_groups(left, right)))
        })?;
        debug!(
            "Aggregated {} groups over {} segments in {:?}",
            groups.len(),
            self.segments.len(),
            started.elapsed()
        );
        Ok(groups
            .into_iter()
            .map(|(key, avg)| (key, avg.result()))
            .collect())
    }

    /// Average trip distance per passenger count of rides which both started
    /// and ended within `[start, end]`.
    pub fn average_distances(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<HashMap<i32, f64>, ScanError> {
        let (start, end) = (Value::Timestamp(start), Value::Timestamp(end));
        // dropoff never precedes pickup, so dropoff alone can carry the upper bound
        let scan = QueryPredicate::new()
            .with_between(PICKUP, Interval::at_least(start.clone()))
            .with_between(DROPOFF, Interval::closed(start.clone(), end.clone()))
            .with_not_null(PASSENGER_COUNT)
            .with_not_null(TRIP_DISTANCE);
        let recheck = QueryPredicate::new()
            .with_between(PICKUP, Interval::closed(start.clone(), end.clone()))
            .with_between(DROPOFF, Interval::closed(start, end))
            .with_not_null(PASSENGER_COUNT)
            .with_not_null(TRIP_DISTANCE);

        let averages = self.grouped_average(&scan, &recheck, PASSENGER_COUNT, TRIP_DISTANCE)?;
        averages
            .into_iter()
            .map(|(count, avg)| {
                count
                    .as_i64()
                    .and_then(|c| i32::try_from(c).ok())
                    .map(|c| (c, avg))
                    .ok_or_else(|| {
                        ScanError::SchemaError(format!("passenger count {} is not an integer", count))
                    })
            })
            .collect()
    }
}
