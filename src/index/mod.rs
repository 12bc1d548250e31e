//! Approximate column indexes.
//!
//! Every index is fed once, in row order, while a storage segment is built.
//! Afterwards it answers which row ids *may* satisfy a condition. Answers
//! are supersets of the true matches, so intersecting them is always safe.

mod bucket;
mod composite;
mod locator;
mod minmax;
mod not_null;
mod range;
mod sparse;

pub use bucket::{BucketFn, BucketIndex, by_day};
pub use composite::ColumnIndexes;
pub use locator::{ByteRange, RowOffsetLocator};
pub use minmax::MinMaxIndex;
pub use not_null::NotNullIndex;
pub use range::RowRange;
pub use sparse::SparseIndex;

use crate::core::Value;
use crate::query::Interval;

/// Evaluation order of an index. `High` indexes are cheap and are asked
/// first so that an empty answer stops evaluation early.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Priority {
    High,
    Low,
}

pub trait ColumnIndex: Send + Sync {
    /// Name of the indexed column.
    fn column(&self) -> &str;

    fn priority(&self) -> Priority;

    /// Record the value of the indexed column for `row_id`. Row ids arrive in
    /// increasing order.
    fn add_entry(&mut self, row_id: u64, value: Option<&Value>);

    /// Rows which may hold a value inside `interval`.
    fn evaluate_between(&self, _interval: &Interval<Value>) -> RowRange {
        RowRange::all()
    }

    /// Rows which may hold a value different from `value`; `None` asks for
    /// non-null rows.
    fn evaluate_not_equal(&self, _value: Option<&Value>) -> RowRange {
        RowRange::all()
    }
}
