use std::collections::BTreeMap;
use std::ops::Bound;

use crate::core::{ScanError, Value};
use crate::query::Interval;

use super::{ColumnIndex, Priority, RowRange};

/// First and last position sampled for one value.
#[derive(Debug, Clone, Copy)]
struct Sample {
    first: u64,
    last: u64,
}

/// Outcome of a sparse lookup, in sampled positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Located {
    /// Nothing was sampled, every position may match.
    Unknown,
    /// No position can match.
    Nothing,
    /// `None` on a side means "from the first" / "up to the last" position.
    Span { first: Option<u64>, last: Option<u64> },
}

/// Samples one `(value, position)` pair every `step` entries of a column
/// whose values ascend with the position. Lookups return a position span
/// enclosing every matching entry; out-of-order values make it approximate.
pub struct SparseIndex<T> {
    column: String,
    step: usize,
    left_to_skip: usize,
    samples: BTreeMap<T, Sample>,
    min_seen: Option<T>,
    max_seen: Option<T>,
}

impl<T: Ord + Clone> SparseIndex<T> {
    pub fn new(column: impl Into<String>, step: usize) -> Result<Self, ScanError> {
        if step == 0 {
            return Err(ScanError::ConfigError(
                "sparse index step should be > 0".to_string(),
            ));
        }
        Ok(Self {
            column: column.into(),
            step,
            left_to_skip: 0,
            samples: BTreeMap::new(),
            min_seen: None,
            max_seen: None,
        })
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    pub(crate) fn record(&mut self, position: u64, value: &T) {
        if self.min_seen.as_ref().is_none_or(|min| value < min) {
            self.min_seen = Some(value.clone());
        }
        if self.max_seen.as_ref().is_none_or(|max| value > max) {
            self.max_seen = Some(value.clone());
        }

        if self.left_to_skip > 0 {
            self.left_to_skip -= 1;
            return;
        }
        self.left_to_skip = self.step - 1;
        self.samples
            .entry(value.clone())
            .and_modify(|s| s.last = position)
            .or_insert(Sample {
                first: position,
                last: position,
            });
    }

    pub(crate) fn locate(&self, interval: &Interval<T>) -> Located {
        let (Some(min), Some(max)) = (&self.min_seen, &self.max_seen) else {
            return Located::Unknown;
        };
        if !interval.intersects(min, max) {
            return Located::Nothing;
        }

        // Last sampled entry known to sort before every match.
        let first = match interval.lower() {
            Bound::Unbounded => None,
            Bound::Included(l) => self.samples.range(..l).next_back(),
            Bound::Excluded(l) => self.samples.range(..=l).next_back(),
        }
        .map(|(_, s)| s.last);

        // First sampled entry known to sort after every match.
        let last = match interval.upper() {
            Bound::Unbounded => None,
            Bound::Included(u) => self
                .samples
                .range((Bound::Excluded(u), Bound::Unbounded))
                .next(),
            Bound::Excluded(u) => self.samples.range(u..).next(),
        }
        .map(|(_, s)| s.first);

        match (first, last) {
            (Some(a), Some(b)) if a > b => Located::Span {
                first: Some(b),
                last: Some(a),
            },
            _ => Located::Span { first, last },
        }
    }
}

impl ColumnIndex for SparseIndex<Value> {
    fn column(&self) -> &str {
        &self.column
    }

    fn priority(&self) -> Priority {
        Priority::Low
    }

    fn add_entry(&mut self, row_id: u64, value: Option<&Value>) {
        if let Some(value) = value {
            self.record(row_id, value);
        }
    }

    fn evaluate_between(&self, interval: &Interval<Value>) -> RowRange {
        match self.locate(interval) {
            Located::Unknown => RowRange::all(),
            Located::Nothing => RowRange::Empty,
            Located::Span { first, last } => {
                let first = first.unwrap_or(0);
                match last {
                    Some(last) => RowRange::closed(first, last),
                    None => RowRange::at_least(first),
                }
            }
        }
    }
}
