use std::collections::BTreeMap;
use std::ops::Bound;

use crate::core::Value;
use crate::query::Interval;

use super::{ColumnIndex, Priority, RowRange};

/// Maps a value to its bucket key. Must be monotone: `a <= b` implies
/// `bucket(a) <= bucket(b)`.
pub type BucketFn = Box<dyn Fn(&Value) -> Value + Send + Sync>;

/// Buckets timestamps by calendar day. Other values are their own bucket.
pub fn by_day() -> BucketFn {
    Box::new(|value| match value {
        Value::Timestamp(ts) => Value::Timestamp(ts.date().and_time(chrono::NaiveTime::default())),
        other => other.clone(),
    })
}

#[derive(Debug, Clone, Copy)]
struct RowSpan {
    first: u64,
    last: u64,
}

/// Row span of each bucket, for columns that are ordered only within coarse
/// buckets, e.g. ride timestamps appended day by day but shuffled within a
/// day. A min/max index is useless there once a segment spans many days.
pub struct BucketIndex {
    column: String,
    bucket_of: BucketFn,
    buckets: BTreeMap<Value, RowSpan>,
}

impl BucketIndex {
    pub fn new(column: impl Into<String>, bucket_of: BucketFn) -> Self {
        Self {
            column: column.into(),
            bucket_of,
            buckets: BTreeMap::new(),
        }
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    fn bucket_bound(&self, bound: Bound<&Value>) -> Bound<Value> {
        // The bucket of an excluded endpoint may still hold values past it.
        match bound {
            Bound::Unbounded => Bound::Unbounded,
            Bound::Included(v) | Bound::Excluded(v) => Bound::Included((self.bucket_of)(v)),
        }
    }
}

impl ColumnIndex for BucketIndex {
    fn column(&self) -> &str {
        &self.column
    }

    fn priority(&self) -> Priority {
        Priority::Low
    }

    fn add_entry(&mut self, row_id: u64, value: Option<&Value>) {
        let Some(value) = value else {
            return;
        };
        let span = self.buckets.entry((self.bucket_of)(value)).or_insert(RowSpan {
            first: row_id,
            last: row_id,
        });
        span.first = span.first.min(row_id);
        span.last = span.last.max(row_id);
    }

    fn evaluate_between(&self, interval: &Interval<Value>) -> RowRange {
        let lower = self.bucket_bound(interval.lower());
        let upper = self.bucket_bound(interval.upper());
        if matches!(lower, Bound::Unbounded) && matches!(upper, Bound::Unbounded) {
            if self.buckets.is_empty() {
                return RowRange::all();
            }
        } else if let (Bound::Included(l), Bound::Included(u)) = (&lower, &upper) {
            if l > u {
                return RowRange::Empty;
            }
        }

        self.buckets
            .range((lower, upper))
            .map(|(_, span)| *span)
            .reduce(|a, b| RowSpan {
                first: a.first.min(b.first),
                last: a.last.max(b.last),
            })
            .map_or(RowRange::Empty, |span| RowRange::closed(span.first, span.last))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn ts(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> Value {
        Value::Timestamp(
            NaiveDate::from_ymd_opt(year, month, day)
                .unwrap()
                .and_hms_opt(hour, minute, 0)
                .unwrap(),
        )
    }

    fn by_month() -> BucketFn {
        Box::new(|value| match value {
            Value::Timestamp(t) => ts(t.year(), t.month(), 1, 0, 0),
            other => other.clone(),
        })
    }

    #[test]
    fn test_sorted_buckets() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let mut index = BucketIndex::new("col", by_month());
            let m1 = rng.gen_range(1..=12);
            let m2 = rng.gen_range(1..=12);
            let (lo, hi) = (m1.min(m2), m1.max(m2));

            let mut min: Option<Value> = None;
            let mut max: Option<Value> = None;
            let mut row = 0u64;
            let mut expected = RowRange::Empty;
            // 12 monthly buckets in order, 30 shuffled values each
            for month in 1..=12u32 {
                if (lo..=hi).contains(&month) {
                    let span = RowRange::closed(row, row + 29);
                    expected = match expected {
                        RowRange::Empty => span,
                        RowRange::Rows { first, .. } => RowRange::closed(first, row + 29),
                    };
                }
                for _ in 0..30 {
                    let value = ts(
                        2020,
                        month,
                        rng.gen_range(1..29),
                        rng.gen_range(0..24),
                        rng.gen_range(0..60),
                    );
                    index.add_entry(row, Some(&value));
                    if min.as_ref().is_none_or(|m| &value < m) {
                        min = Some(value.clone());
                    }
                    if max.as_ref().is_none_or(|m| &value > m) {
                        max = Some(value.clone());
                    }
                    row += 1;
                }
            }
            let (min, max) = (min.unwrap(), max.unwrap());
            let max_row = row - 1;

            assert_eq!(
                index.evaluate_between(&Interval::closed(min.clone(), max.clone())),
                RowRange::closed(0, max_row)
            );
            assert!(
                index
                    .evaluate_between(&Interval::at_least(min.clone()))
                    .encloses(&RowRange::closed(0, max_row))
            );
            assert!(
                index
                    .evaluate_between(&Interval::at_most(max.clone()))
                    .encloses(&RowRange::closed(0, max_row))
            );
            assert_eq!(
                index.evaluate_between(&Interval::closed(ts(2020, lo, 1, 0, 0), ts(2020, hi, 1, 0, 0))),
                expected
            );
        }
    }

    #[test]
    fn test_unsorted_buckets_enclose_extremes() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut index = BucketIndex::new("col", by_month());
        let mut values = Vec::new();
        for row in 0..1000u64 {
            let value = ts(
                2020,
                rng.gen_range(1..13),
                rng.gen_range(1..29),
                rng.gen_range(0..24),
                rng.gen_range(0..60),
            );
            index.add_entry(row, Some(&value));
            values.push(value);
        }
        let a = ts(2020, 3, 10, 0, 0);
        let b = ts(2020, 7, 2, 12, 0);
        let interval = Interval::closed(a, b);
        let range = index.evaluate_between(&interval);
        for (row, value) in values.iter().enumerate() {
            if interval.contains(value) {
                assert!(range.contains(row as u64), "row {row} not enclosed");
            }
        }
    }

    #[test]
    fn test_outside_range() {
        let mut index = BucketIndex::new("col", by_day());
        let start: NaiveDateTime = NaiveDate::from_ymd_opt(2021, 5, 10)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let mut end = start;
        for i in 0..100u64 {
            index.add_entry(i, Some(&Value::Timestamp(end)));
            end += Duration::days(1);
        }
        let before = Value::Timestamp(start - Duration::days(1));
        let start = Value::Timestamp(start);
        let after = Value::Timestamp(end + Duration::days(1));

        assert!(index.evaluate_between(&Interval::at_most(before.clone())).is_empty());
        assert!(index
            .evaluate_between(&Interval::closed(before.clone(), before.clone()))
            .is_empty());
        assert!(index.evaluate_between(&Interval::at_least(after.clone())).is_empty());
        assert!(index.evaluate_between(&Interval::closed(after.clone(), before)).is_empty());
        assert_eq!(
            index.evaluate_between(&Interval::at_most(start)),
            RowRange::closed(0, 0)
        );
    }

    #[test]
    fn test_day_buckets() {
        let mut index = BucketIndex::new("col", by_day());
        index.add_entry(0, Some(&ts(2020, 1, 1, 23, 0)));
        index.add_entry(1, Some(&ts(2020, 1, 1, 1, 0)));
        index.add_entry(2, None);
        index.add_entry(3, Some(&ts(2020, 1, 2, 5, 0)));
        index.add_entry(4, Some(&ts(2020, 1, 3, 5, 0)));
        assert_eq!(index.bucket_count(), 3);

        // excluded endpoint still selects its own day
        assert_eq!(
            index.evaluate_between(&Interval::open(ts(2020, 1, 1, 12, 0), ts(2020, 1, 2, 0, 0))),
            RowRange::closed(0, 3)
        );
        assert_eq!(
            index.evaluate_between(&Interval::greater_than(ts(2020, 1, 2, 6, 0))),
            RowRange::closed(3, 4)
        );
        assert_eq!(
            index.evaluate_between(&Interval::all()),
            RowRange::closed(0, 4)
        );
    }

    #[test]
    fn test_empty_index() {
        let index = BucketIndex::new("col", by_day());
        assert!(index.evaluate_between(&Interval::all()).is_all());
        assert!(index
            .evaluate_between(&Interval::at_least(ts(2020, 1, 1, 0, 0)))
            .is_empty());
    }
}
