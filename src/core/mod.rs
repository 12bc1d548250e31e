mod args;
mod error;
mod logger;
pub mod schema;
pub mod value;

pub use args::CliArgs;
pub use error::ScanError;
pub use logger::setup_logging;
pub use schema::{Column, DataType, Schema};
pub use value::Value;
