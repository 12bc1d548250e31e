mod discovery;
mod records;

pub use discovery::discover_files;
pub use records::{RecordSource, read_header};
