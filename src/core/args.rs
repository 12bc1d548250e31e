use std::path::PathBuf;

use chrono::NaiveDateTime;
use clap::Parser;
use log::kv::{ToValue, Value};

use crate::conf::TableConfig;
use crate::core::schema::parse_timestamp;

fn parse_datetime(raw: &str) -> Result<NaiveDateTime, String> {
    parse_timestamp(raw.trim())
        .ok_or_else(|| format!("'{raw}' does not match 'yyyy-MM-dd HH:mm:ss'"))
}

#[derive(Parser, Debug, PartialEq)]
#[command(version, about = "Average trip distance per passenger count over CSV ride files")]
pub struct CliArgs {
    /// TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Folder with CSV files
    #[arg(short = 'f', long)]
    pub data_dir: PathBuf,

    /// Start of the queried time range
    #[arg(short = 'b', long, value_parser = parse_datetime)]
    pub from: NaiveDateTime,

    /// End of the queried time range
    #[arg(short = 'u', long, value_parser = parse_datetime)]
    pub until: NaiveDateTime,

    /// Thread pool size used to initialize the storage
    #[arg(short = 'i', long)]
    pub init_threads: Option<usize>,

    /// Thread pool size used to query the storage
    #[arg(short = 'q', long)]
    pub query_threads: Option<usize>,

    /// Rows between two entries of the sparse indexes
    #[arg(short = 's', long)]
    pub index_step: Option<usize>,

    /// Logically split CSV files larger than this many MB (0 disables)
    #[arg(long)]
    pub split_size: Option<u64>,

    #[arg(long)]
    pub no_min_max_index: bool,

    #[arg(long)]
    pub no_bucket_index: bool,

    #[arg(long)]
    pub no_not_null_index: bool,
}

impl CliArgs {
    /// Command line flags take precedence over the config file.
    pub fn apply(&self, table: &mut TableConfig) {
        if let Some(threads) = self.init_threads {
            table.init_threads = threads;
        }
        if let Some(threads) = self.query_threads {
            table.query_threads = threads;
        }
        if let Some(step) = self.index_step {
            table.index_step = step;
        }
        if let Some(split) = self.split_size {
            table.split_size_mb = split;
        }
        if self.no_min_max_index {
            table.indexes.min_max = false;
        }
        if self.no_bucket_index {
            table.indexes.bucket = false;
        }
        if self.no_not_null_index {
            table.indexes.not_null = false;
        }
    }
}

impl ToValue for CliArgs {
    fn to_value(&self) -> Value<'_> {
        Value::from_debug(self)
    }
}
