use std::fs::File;
use std::io::{Seek, SeekFrom};
use std::path::{Path, PathBuf};

use csv::{ByteRecord, Reader, ReaderBuilder};

use crate::core::ScanError;

const BUFFER_CAPACITY: usize = 64 * 1024;

/// Comma separated records read from a byte offset of a file.
///
/// Offsets reported by [`RecordSource::offset`] are absolute in the file,
/// line numbers are 1-based and relative to the offset the source was opened at.
pub struct RecordSource {
    path: PathBuf,
    base: u64,
    reader: Reader<File>,
    record: ByteRecord,
}

impl RecordSource {
    /// Open `path` positioned at `offset`, which should be the start of a record.
    pub fn open(path: &Path, offset: u64) -> Result<Self, ScanError> {
        let mut file = File::open(path).map_err(|e| {
            ScanError::IoError(format!("opening {}: {}", path.display(), e))
        })?;
        if offset > 0 {
            file.seek(SeekFrom::Start(offset)).map_err(|e| {
                ScanError::IoError(format!("seeking {} to {}: {}", path.display(), offset, e))
            })?;
        }
        let reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .buffer_capacity(BUFFER_CAPACITY)
            .from_reader(file);
        Ok(Self {
            path: path.to_path_buf(),
            base: offset,
            reader,
            record: ByteRecord::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Advance to the next record. Returns `false` at end of input.
    pub fn next_record(&mut self) -> Result<bool, ScanError> {
        self.reader.read_byte_record(&mut self.record).map_err(|e| {
            let err = ScanError::from(e);
            match err {
                ScanError::CsvError(msg) => {
                    ScanError::CsvError(format!("reading {}: {}", self.path.display(), msg))
                }
                other => other,
            }
        })
    }

    /// Absolute byte offset where the current record starts.
    pub fn offset(&self) -> u64 {
        self.base + self.record.position().map_or(0, |p| p.byte())
    }

    /// Line number of the current record, counted from the opening offset.
    pub fn line(&self) -> u64 {
        self.record.position().map_or(0, |p| p.line())
    }

    pub fn len(&self) -> usize {
        self.record.len()
    }

    pub fn is_empty(&self) -> bool {
        self.record.is_empty()
    }

    /// Field `index` of the current record. Missing trailing fields read as empty.
    pub fn field(&self, index: usize) -> Result<&str, ScanError> {
        let raw = self.record.get(index).unwrap_or_default();
        std::str::from_utf8(raw).map_err(|e| {
            ScanError::ParseError(format!(
                "{}: field {} on line {} is not valid UTF-8: {}",
                self.path.display(),
                index,
                self.line(),
                e
            ))
        })
    }
}

/// Column names from the first record of `path`, or `None` for an empty file.
pub fn read_header(path: &Path) -> Result<Option<Vec<String>>, ScanError> {
    let mut source = RecordSource::open(path, 0)?;
    if !source.next_record()? {
        return Ok(None);
    }
    let names = (0..source.len())
        .map(|i| source.field(i).map(|name| name.trim().to_string()))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Some(names))
}
