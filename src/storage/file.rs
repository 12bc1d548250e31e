use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::conf::TableConfig;
use crate::core::{Column, ScanError, Schema};
use crate::index::{ColumnIndex, ColumnIndexes, RowOffsetLocator};
use crate::io::{RecordSource, read_header};
use crate::query::QueryPredicate;

use super::offsets::{has_more, reached_split, row_id, segment_end, skips_header};
use super::reader::{RowReader, at_row};

/// How a file is cut into segments and how densely row offsets are sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentOptions {
    pub index_step: usize,
    /// Bytes per segment, `None` to keep the file whole.
    pub split_size: Option<u64>,
}

impl From<&TableConfig> for SegmentOptions {
    fn from(config: &TableConfig) -> Self {
        Self {
            index_step: config.index_step,
            split_size: config.split_size_bytes(),
        }
    }
}

fn file_size(path: &Path) -> Result<u64, ScanError> {
    fs::metadata(path)
        .map(|m| m.len())
        .map_err(|e| ScanError::IoError(format!("reading metadata for {}: {}", path.display(), e)))
}

/// One indexed segment of a CSV file: the whole file or a contiguous run of
/// its rows. Immutable once built.
pub struct StorageFile {
    path: PathBuf,
    schema: Schema,
    indexes: ColumnIndexes,
    locator: RowOffsetLocator,
    rows_count: u64,
    start_offset: u64,
    end_offset: u64,
    last_row_offset: u64,
}

impl StorageFile {
    /// Build the segment starting at `start_at`, which must be the file head
    /// or the start of a row. Every row is fed to `indexes` once.
    pub fn open(
        path: &Path,
        expected: &Schema,
        options: &SegmentOptions,
        indexes: Vec<Box<dyn ColumnIndex>>,
        start_at: u64,
    ) -> Result<Self, ScanError> {
        let schema = match read_header(path)? {
            Some(header) => expected.align(&header).map_err(|e| match e {
                ScanError::SchemaError(msg) => {
                    ScanError::SchemaError(format!("{}: {}", path.display(), msg))
                }
                other => other,
            })?,
            None => expected.clone(),
        };

        let mut indexed: Vec<(usize, Column)> = indexes
            .iter()
            .map(|index| {
                schema
                    .index_of(index.column())
                    .map(|pos| (pos, schema.columns()[pos].clone()))
                    .ok_or_else(|| {
                        ScanError::SchemaError(format!(
                            "{}: indexed column '{}' not in file",
                            path.display(),
                            index.column()
                        ))
                    })
            })
            .collect::<Result<_, _>>()?;
        indexed.sort_by_key(|(pos, _)| *pos);
        indexed.dedup_by_key(|(pos, _)| *pos);

        let mut segment = Self {
            path: path.to_path_buf(),
            schema,
            indexes: ColumnIndexes::new(indexes),
            locator: RowOffsetLocator::new(options.index_step)?,
            rows_count: 0,
            start_offset: start_at,
            end_offset: start_at,
            last_row_offset: start_at,
        };
        segment.populate(&indexed, options.split_size)?;
        debug!(
            "{}: {} rows, {} offset samples",
            segment.describe(),
            segment.rows_count,
            segment.locator.sample_count()
        );
        Ok(segment)
    }

    fn populate(
        &mut self,
        indexed: &[(usize, Column)],
        split_size: Option<u64>,
    ) -> Result<(), ScanError> {
        let size = file_size(&self.path)?;
        if size == 0 {
            self.end_offset = 0;
            return Ok(());
        }

        let at_head = skips_header(self.start_offset);
        let mut source = RecordSource::open(&self.path, self.start_offset)?;
        if at_head {
            source.next_record()?;
        }

        let mut next_row_offset = None;
        while source.next_record()? {
            let offset = source.offset();
            let row = row_id(source.line(), at_head);
            self.locator.add_entry(row, offset);
            for (pos, column) in indexed {
                let value = source
                    .field(*pos)
                    .and_then(|raw| column.parse(raw))
                    .map_err(|e| at_row(e, &self.path, offset))?;
                self.indexes.add_entry(&column.name, row, value.as_ref());
            }
            self.rows_count += 1;
            self.last_row_offset = offset;

            if reached_split(offset, self.start_offset, split_size) {
                if source.next_record()? {
                    next_row_offset = Some(source.offset());
                }
                break;
            }
        }
        self.end_offset = segment_end(next_row_offset, size);
        Ok(())
    }

    /// Cut the whole file into consecutive segments, each with fresh indexes
    /// from `make_indexes`.
    pub fn open_segments<F>(
        path: &Path,
        expected: &Schema,
        options: &SegmentOptions,
        make_indexes: F,
    ) -> Result<Vec<StorageFile>, ScanError>
    where
        F: Fn() -> Vec<Box<dyn ColumnIndex>>,
    {
        let size = file_size(path)?;
        let mut segments = Vec::new();
        let mut start_at = 0;
        loop {
            let segment = StorageFile::open(path, expected, options, make_indexes(), start_at)?;
            let end = segment.end_offset();
            segments.push(segment);
            if !has_more(end, size) || end <= start_at {
                break;
            }
            start_at = end;
        }
        Ok(segments)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn rows_count(&self) -> u64 {
        self.rows_count
    }

    pub fn start_offset(&self) -> u64 {
        self.start_offset
    }

    /// Exclusive.
    pub fn end_offset(&self) -> u64 {
        self.end_offset
    }

    pub fn last_row_offset(&self) -> u64 {
        self.last_row_offset
    }

    pub fn indexes(&self) -> &ColumnIndexes {
        &self.indexes
    }

    fn describe(&self) -> String {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string());
        format!("{}({}:{})", name, self.start_offset, self.end_offset)
    }

    /// Reader over the rows which may satisfy `predicate`, projected onto
    /// `required` columns. Rows are not filtered: callers recheck them.
    pub fn open_reader<S: AsRef<str>>(
        &self,
        required: &[S],
        predicate: &QueryPredicate,
    ) -> Result<RowReader, ScanError> {
        let (schema, positions) = self.schema.project(required).map_err(|e| match e {
            ScanError::SchemaError(msg) => {
                ScanError::SchemaError(format!("{}: {}", self.path.display(), msg))
            }
            other => other,
        })?;

        if self.rows_count == 0 {
            debug!("{}: skipped because empty", self.describe());
            return Ok(RowReader::empty(schema));
        }
        let rows = self.indexes.evaluate(predicate);
        let Some(offsets) = self.locator.closest_offsets(&rows) else {
            debug!("{}: skipped using indexes", self.describe());
            return Ok(RowReader::empty(schema));
        };

        RowReader::open(
            &self.path,
            self.describe(),
            schema,
            positions,
            offsets.start.unwrap_or(self.start_offset),
            offsets.end.unwrap_or(self.last_row_offset),
            self.rows_count,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DataType, Value};
    use crate::index::{MinMaxIndex, NotNullIndex, SparseIndex};
    use crate::query::Interval;
    use crate::storage::Row;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn schema() -> Schema {
        Schema::new(vec![
            Column::new("id", DataType::Int64),
            Column::new("score", DataType::Float64),
        ])
        .unwrap()
    }

    fn csv_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    /// `rows` rows with ascending ids, every 3rd score blank.
    fn numbered(rows: i64) -> String {
        let mut out = String::from("id,score\n");
        for id in 0..rows {
            if id % 3 == 0 {
                out.push_str(&format!("{id},\n"));
            } else {
                out.push_str(&format!("{id},{}.5\n", id))
            }
        }
        out
    }

    fn options(step: usize, split: Option<u64>) -> SegmentOptions {
        SegmentOptions {
            index_step: step,
            split_size: split,
        }
    }

    fn indexes() -> Vec<Box<dyn ColumnIndex>> {
        vec![
            Box::new(MinMaxIndex::new("id")),
            Box::new(SparseIndex::<Value>::new("id", 4).unwrap()),
            Box::new(NotNullIndex::new("score")),
        ]
    }

    fn ids(reader: RowReader) -> Vec<i64> {
        reader
            .map(|row| row.unwrap())
            .filter_map(|row: Row| row.get(0).and_then(Value::as_i64))
            .collect()
    }

    #[test]
    fn test_whole_file() {
        let content = numbered(100);
        let file = csv_file(&content);
        let segment =
            StorageFile::open(file.path(), &schema(), &options(8, None), indexes(), 0).unwrap();
        assert_eq!(segment.rows_count(), 100);
        assert_eq!(segment.start_offset(), 0);
        assert_eq!(segment.end_offset(), content.len() as u64);
        assert_eq!(
            segment.last_row_offset(),
            content.rfind("99,").unwrap() as u64
        );

        let reader = segment.open_reader(&["id"], &QueryPredicate::new()).unwrap();
        assert_eq!(ids(reader), (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn test_reader_encloses_matches() {
        let file = csv_file(&numbered(1000));
        let segment =
            StorageFile::open(file.path(), &schema(), &options(16, None), indexes(), 0).unwrap();
        let predicate = QueryPredicate::new()
            .with_between("id", Interval::closed(Value::Int64(300), Value::Int64(420)))
            .with_not_null("score");
        let mut reader = segment.open_reader(&["id", "score"], &predicate).unwrap();
        let read: Vec<i64> = (&mut reader)
            .map(|row| row.unwrap())
            .filter_map(|row| row.get(0).and_then(Value::as_i64))
            .collect();
        for id in 300..=420 {
            assert!(read.contains(&id), "missing {id}");
        }
        assert!(reader.rows_read() < 1000);
        assert_eq!(reader.total_rows(), 1000);
    }

    #[test]
    fn test_pruned_by_indexes() {
        let file = csv_file(&numbered(50));
        let segment =
            StorageFile::open(file.path(), &schema(), &options(4, None), indexes(), 0).unwrap();
        let predicate = QueryPredicate::new()
            .with_between("id", Interval::at_least(Value::Int64(50)));
        let mut reader = segment.open_reader(&["id"], &predicate).unwrap();
        assert!(reader.next().is_none());
        assert_eq!(reader.rows_read(), 0);
    }

    #[test]
    fn test_segments_cover_file() {
        let content = numbered(500);
        let file = csv_file(&content);
        let segments = StorageFile::open_segments(
            file.path(),
            &schema(),
            &options(4, Some(512)),
            indexes,
        )
        .unwrap();
        assert!(segments.len() > 1);
        assert_eq!(segments[0].start_offset(), 0);
        for pair in segments.windows(2) {
            assert_eq!(pair[0].end_offset(), pair[1].start_offset());
        }
        assert_eq!(
            segments.last().unwrap().end_offset(),
            content.len() as u64
        );
        assert_eq!(
            segments.iter().map(StorageFile::rows_count).sum::<u64>(),
            500
        );

        let mut all = Vec::new();
        for segment in &segments {
            all.extend(ids(segment.open_reader(&["id"], &QueryPredicate::new()).unwrap()));
        }
        assert_eq!(all, (0..500).collect::<Vec<_>>());
    }

    #[test]
    fn test_split_segments_use_local_row_ids() {
        let file = csv_file(&numbered(300));
        let segments = StorageFile::open_segments(
            file.path(),
            &schema(),
            &options(1, Some(256)),
            indexes,
        )
        .unwrap();
        for segment in &segments {
            let predicate = QueryPredicate::new().with_between(
                "id",
                Interval::closed(Value::Int64(150), Value::Int64(160)),
            );
            let read = ids(segment.open_reader(&["id"], &predicate).unwrap());
            let everything = segment.open_reader(&["id"], &QueryPredicate::new()).unwrap();
            let expected: Vec<i64> = ids(everything)
                .into_iter()
                .filter(|id| (150..=160).contains(id))
                .collect();
            for id in expected {
                assert!(read.contains(&id), "missing {id}");
            }
        }
    }

    #[test]
    fn test_header_order_follows_file() {
        let file = csv_file("score,id\n1.5,7\n,8\n");
        let segment =
            StorageFile::open(file.path(), &schema(), &options(8, None), indexes(), 0).unwrap();
        assert_eq!(segment.schema().column_at(0).unwrap().name, "score");
        let reader = segment.open_reader(&["id"], &QueryPredicate::new()).unwrap();
        assert_eq!(ids(reader), vec![7, 8]);
    }

    #[test]
    fn test_unknown_header_column() {
        let file = csv_file("id,score,extra\n1,2.0,x\n");
        let err = StorageFile::open(file.path(), &schema(), &options(8, None), indexes(), 0)
            .err()
            .unwrap();
        assert!(matches!(err, ScanError::SchemaError(_)));
    }

    #[test]
    fn test_indexed_column_missing_from_file() {
        let file = csv_file("score\n2.0\n");
        let err = StorageFile::open(file.path(), &schema(), &options(8, None), indexes(), 0)
            .err()
            .unwrap();
        assert!(matches!(err, ScanError::SchemaError(_)));
    }

    #[test]
    fn test_required_column_missing() {
        let file = csv_file("id\n1\n");
        let segment =
            StorageFile::open(file.path(), &schema(), &options(8, None), Vec::new(), 0).unwrap();
        let err = segment
            .open_reader(&["score"], &QueryPredicate::new())
            .err()
            .unwrap();
        assert!(matches!(err, ScanError::SchemaError(_)));
    }

    #[test]
    fn test_unparsable_indexed_value() {
        let file = csv_file("id,score\n1,1.0\nnope,2.0\n");
        let err = StorageFile::open(file.path(), &schema(), &options(8, None), indexes(), 0)
            .err()
            .unwrap();
        assert!(matches!(err, ScanError::ParseError(_)));
    }

    #[test]
    fn test_empty_and_header_only_files() {
        for content in ["", "id,score\n"] {
            let file = csv_file(content);
            let segments = StorageFile::open_segments(
                file.path(),
                &schema(),
                &options(8, Some(1)),
                indexes,
            )
            .unwrap();
            assert_eq!(segments.len(), 1);
            assert_eq!(segments[0].rows_count(), 0);
            assert_eq!(segments[0].end_offset(), content.len() as u64);
            let mut reader = segments[0]
                .open_reader(&["id"], &QueryPredicate::new())
                .unwrap();
            assert!(reader.next().is_none());
        }
    }

    #[test]
    fn test_zero_step_rejected() {
        let file = csv_file("id,score\n1,1.0\n");
        let err = StorageFile::open(file.path(), &schema(), &options(0, None), indexes(), 0)
            .err()
            .unwrap();
        assert!(matches!(err, ScanError::ConfigError(_)));
    }
}
