//! Row id and byte offset arithmetic of segments.

/// Zero-based row id of the record on 1-based `line`, counted from the
/// segment start. A segment at the file head starts with the header line.
pub fn row_id(line: u64, at_file_head: bool) -> u64 {
    line.saturating_sub(if at_file_head { 2 } else { 1 })
}

/// Whether a segment built from `start_at` is complete once it holds the row
/// starting at `row_offset`.
pub fn reached_split(row_offset: u64, start_at: u64, split_size: Option<u64>) -> bool {
    split_size.is_some_and(|size| row_offset >= start_at.saturating_add(size))
}

/// Exclusive end offset of a segment: the start of the first row it does
/// not hold, or the file size.
pub fn segment_end(next_row_offset: Option<u64>, file_size: u64) -> u64 {
    next_row_offset.unwrap_or(file_size)
}

/// Whether a segment ending at `end` leaves part of the file unread.
pub fn has_more(end: u64, file_size: u64) -> bool {
    end < file_size
}

/// A scan positioned at the file head has to skip the header record.
pub fn skips_header(scan_start: u64) -> bool {
    scan_start == 0
}

/// Whether a row starting at `row_offset` is still within a scan ending
/// with the row at `last_row_offset`.
pub fn within_scan(row_offset: u64, last_row_offset: u64) -> bool {
    row_offset <= last_row_offset
}
