use ahash::AHashMap;
use log::debug;

use crate::core::Value;
use crate::query::{Interval, QueryPredicate};

use super::{ColumnIndex, Priority, RowRange};

enum Check<'a> {
    Between(&'a Interval<Value>),
    NotEqual(Option<&'a Value>),
}

/// Every index of a segment, grouped by column.
pub struct ColumnIndexes {
    by_column: AHashMap<String, Vec<Box<dyn ColumnIndex>>>,
}

impl ColumnIndexes {
    pub fn new(indexes: Vec<Box<dyn ColumnIndex>>) -> Self {
        let mut by_column: AHashMap<String, Vec<Box<dyn ColumnIndex>>> = AHashMap::new();
        for index in indexes {
            by_column
                .entry(index.column().to_string())
                .or_default()
                .push(index);
        }
        for group in by_column.values_mut() {
            group.sort_by_key(|index| index.priority());
        }
        Self { by_column }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.by_column.is_empty()
    }

    pub fn len(&self) -> usize {
        self.by_column.values().map(Vec::len).sum()
    }

    /// Feed one row's value of `column` to every index on it.
    pub fn add_entry(&mut self, column: &str, row_id: u64, value: Option<&Value>) {
        if let Some(group) = self.by_column.get_mut(column) {
            for index in group {
                index.add_entry(row_id, value);
            }
        }
    }

    fn on_column(&self, column: &str) -> &[Box<dyn ColumnIndex>] {
        self.by_column.get(column).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Rows which may satisfy every condition of `predicate`.
    pub fn evaluate(&self, predicate: &QueryPredicate) -> RowRange {
        let mut checks: Vec<(Priority, &dyn ColumnIndex, Check)> = Vec::new();
        for between in predicate.between() {
            for index in self.on_column(&between.column) {
                checks.push((index.priority(), &**index, Check::Between(&between.interval)));
            }
        }
        for not_equal in predicate.not_equal() {
            for index in self.on_column(&not_equal.column) {
                checks.push((
                    index.priority(),
                    &**index,
                    Check::NotEqual(not_equal.value.as_ref()),
                ));
            }
        }
        checks.sort_by_key(|(priority, _, _)| *priority);

        let mut range = RowRange::all();
        for (_, index, check) in checks {
            let answer = match check {
                Check::Between(interval) => index.evaluate_between(interval),
                Check::NotEqual(value) => index.evaluate_not_equal(value),
            };
            range = range.intersect(&answer);
            if range.is_empty() {
                debug!("rows of column '{}' exclude the segment", index.column());
                break;
            }
        }
        range
    }
}
