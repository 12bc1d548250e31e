mod config;
mod table;

pub use config::Config;
pub use table::{IndexConfig, TableConfig};
