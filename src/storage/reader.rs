use std::path::Path;

use log::debug;

use crate::core::{ScanError, Schema};
use crate::io::RecordSource;

use super::Row;
use super::offsets::{skips_header, within_scan};

/// Prefix a parse or schema failure with the file and byte offset of the row.
pub(crate) fn at_row(err: ScanError, path: &Path, offset: u64) -> ScanError {
    match err {
        ScanError::ParseError(msg) => {
            ScanError::ParseError(format!("{} at byte {}: {}", path.display(), offset, msg))
        }
        other => other,
    }
}

struct Scan {
    source: RecordSource,
    positions: Vec<usize>,
    last_row_offset: u64,
}

impl Scan {
    fn next_row(&mut self, schema: &Schema) -> Result<Option<Row>, ScanError> {
        if !self.source.next_record()? || !within_scan(self.source.offset(), self.last_row_offset) {
            return Ok(None);
        }
        let mut row = Row::new(self.positions.len());
        for (out, (column, &pos)) in schema.columns().iter().zip(&self.positions).enumerate() {
            let value = self
                .source
                .field(pos)
                .and_then(|raw| column.parse(raw))
                .map_err(|e| at_row(e, self.source.path(), self.source.offset()))?;
            row.set(out, value);
        }
        Ok(Some(row))
    }
}

/// Projected rows of one segment, read sequentially between two row offsets.
///
/// The underlying file is closed as soon as the scan ends, fails, or the
/// reader is dropped.
pub struct RowReader {
    schema: Schema,
    scan: Option<Scan>,
    label: String,
    rows_read: u64,
    total_rows: u64,
}

impl RowReader {
    /// A reader yielding nothing, without touching the file.
    pub fn empty(schema: Schema) -> Self {
        Self {
            schema,
            scan: None,
            label: String::new(),
            rows_read: 0,
            total_rows: 0,
        }
    }

    /// Scan rows starting at `first_row_offset` up to and including the row
    /// starting at `last_row_offset`. `positions` map `schema` columns to
    /// fields of the file.
    pub(crate) fn open(
        path: &Path,
        label: String,
        schema: Schema,
        positions: Vec<usize>,
        first_row_offset: u64,
        last_row_offset: u64,
        total_rows: u64,
    ) -> Result<Self, ScanError> {
        let mut source = RecordSource::open(path, first_row_offset)?;
        if skips_header(first_row_offset) {
            source.next_record()?;
        }
        Ok(Self {
            schema,
            scan: Some(Scan {
                source,
                positions,
                last_row_offset,
            }),
            label,
            rows_read: 0,
            total_rows,
        })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn rows_read(&self) -> u64 {
        self.rows_read
    }

    pub fn total_rows(&self) -> u64 {
        self.total_rows
    }

    pub fn is_finished(&self) -> bool {
        self.scan.is_none()
    }

    pub fn log_stats(&self) {
        if !self.label.is_empty() {
            debug!(
                "{}: {} rows read/total rows={}",
                self.label, self.rows_read, self.total_rows
            );
        }
    }
}

impl Iterator for RowReader {
    type Item = Result<Row, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        let scan = self.scan.as_mut()?;
        match scan.next_row(&self.schema) {
            Ok(Some(row)) => {
                self.rows_read += 1;
                Some(Ok(row))
            }
            Ok(None) => {
                self.scan = None;
                None
            }
            Err(e) => {
                self.scan = None;
                Some(Err(e))
            }
        }
    }
}
