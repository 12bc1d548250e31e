use crate::core::Value;
use crate::query::Interval;

use super::{ColumnIndex, Priority, RowRange};

/// Smallest and largest value of a column. Can only prune a whole segment.
pub struct MinMaxIndex {
    column: String,
    min: Option<Value>,
    max: Option<Value>,
}

impl MinMaxIndex {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            min: None,
            max: None,
        }
    }
}

impl ColumnIndex for MinMaxIndex {
    fn column(&self) -> &str {
        &self.column
    }

    fn priority(&self) -> Priority {
        Priority::High
    }

    fn add_entry(&mut self, _row_id: u64, value: Option<&Value>) {
        let Some(value) = value else {
            return;
        };
        if self.min.as_ref().is_none_or(|min| value < min) {
            self.min = Some(value.clone());
        }
        if self.max.as_ref().is_none_or(|max| value > max) {
            self.max = Some(value.clone());
        }
    }

    fn evaluate_between(&self, interval: &Interval<Value>) -> RowRange {
        match (&self.min, &self.max) {
            (Some(min), Some(max)) if !interval.intersects(min, max) => RowRange::Empty,
            _ => RowRange::all(),
        }
    }
}
