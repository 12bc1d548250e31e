use crate::core::ScanError;
use crate::query::Interval;

use super::RowRange;
use super::sparse::{Located, SparseIndex};

/// Byte offsets of row starts bounding a scan. `start: None` is the segment
/// start, `end: None` its last row. `end` is the start of the last row to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: Option<u64>,
    pub end: Option<u64>,
}

impl ByteRange {
    pub fn whole() -> Self {
        Self {
            start: None,
            end: None,
        }
    }
}

/// Sparse row id to byte offset map. Row ids ascend with offsets, so the
/// located byte range always covers the requested rows.
pub struct RowOffsetLocator {
    offsets: SparseIndex<u64>,
}

impl RowOffsetLocator {
    pub fn new(step: usize) -> Result<Self, ScanError> {
        Ok(Self {
            offsets: SparseIndex::new("row_id", step)?,
        })
    }

    pub fn add_entry(&mut self, row_id: u64, offset: u64) {
        self.offsets.record(offset, &row_id);
    }

    pub fn sample_count(&self) -> usize {
        self.offsets.sample_count()
    }

    /// Byte range covering every row of `rows`, or `None` when no ingested
    /// row falls inside it.
    pub fn closest_offsets(&self, rows: &RowRange) -> Option<ByteRange> {
        let interval = match *rows {
            RowRange::Empty => return None,
            RowRange::Rows {
                first,
                last: Some(last),
            } => Interval::closed(first, last),
            RowRange::Rows { first, last: None } => Interval::at_least(first),
        };
        match self.offsets.locate(&interval) {
            Located::Unknown => Some(ByteRange::whole()),
            Located::Nothing => None,
            Located::Span { first, last } => Some(ByteRange {
                start: first,
                end: last,
            }),
        }
    }
}
