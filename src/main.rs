use std::time::Instant;

use clap::Parser;
use log::info;

use ridescan::conf::Config;
use ridescan::core::{CliArgs, setup_logging};
use ridescan::table::RidesTable;

fn main() -> anyhow::Result<()> {
    setup_logging();
    let args = CliArgs::parse();
    info!(args = args; "Ridescan started.");

    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    args.apply(&mut config.table);

    let started = Instant::now();
    let table = RidesTable::open(&args.data_dir, config.table)?;
    let init_time = started.elapsed();

    let started = Instant::now();
    let averages = table.average_distances(args.from, args.until)?;
    let query_time = started.elapsed();

    let mut averages: Vec<(i32, f64)> = averages.into_iter().collect();
    averages.sort_by_key(|(count, _)| *count);

    println!("Init time: {} ms", init_time.as_millis());
    println!("Query time: {} ms", query_time.as_millis());
    println!("Rows: {}", table.rows_count());
    for (count, avg) in averages {
        println!("{count}: {avg}");
    }
    Ok(())
}
