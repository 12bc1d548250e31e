//! Indexed segments of CSV files and the readers scanning them.

mod file;
mod offsets;
mod reader;
mod row;

pub use file::{SegmentOptions, StorageFile};
pub use reader::RowReader;
pub use row::Row;
