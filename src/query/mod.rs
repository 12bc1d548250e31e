pub mod aggregation;
mod interval;
mod predicate;

pub use aggregation::{AggregationOperator, DoubleAvg, FloatAvg, Groups, merge_groups};
pub use interval::Interval;
pub use predicate::{Between, BoundPredicate, NotEqual, QueryPredicate};
