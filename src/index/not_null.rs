use crate::core::Value;

use super::{ColumnIndex, Priority, RowRange};

/// Tracks where non-null values of a column live. Useful for columns whose
/// leading or trailing rows are blank.
pub struct NotNullIndex {
    column: String,
    min_row: Option<u64>,
    max_row: Option<u64>,
    last_null: Option<u64>,
}

impl NotNullIndex {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            min_row: None,
            max_row: None,
            last_null: None,
        }
    }
}

impl ColumnIndex for NotNullIndex {
    fn column(&self) -> &str {
        &self.column
    }

    fn priority(&self) -> Priority {
        Priority::Low
    }

    fn add_entry(&mut self, row_id: u64, value: Option<&Value>) {
        match value {
            Some(_) => {
                self.min_row = Some(self.min_row.map_or(row_id, |min| min.min(row_id)));
                self.max_row = Some(self.max_row.map_or(row_id, |max| max.max(row_id)));
            }
            None => self.last_null = Some(row_id),
        }
    }

    fn evaluate_not_equal(&self, value: Option<&Value>) -> RowRange {
        if value.is_some() {
            return RowRange::all();
        }
        match (self.min_row, self.max_row, self.last_null) {
            (Some(min), Some(max), _) => RowRange::closed(min, max),
            // only nulls so far, later rows of the segment were never seen
            (_, _, Some(last_null)) => RowRange::at_least(last_null + 1),
            _ => RowRange::all(),
        }
    }
}
