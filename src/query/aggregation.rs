use std::collections::BTreeMap;

use crate::core::Value;

/// Associative and commutative accumulator. Partial results built on
/// different threads can be merged in any order.
pub trait AggregationOperator: Sized {
    type Input;
    type Output;

    fn add(&mut self, value: Self::Input);

    fn merge(self, other: Self) -> Self;

    fn result(&self) -> Self::Output;
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DoubleAvg {
    sum: f64,
    count: u64,
}

impl DoubleAvg {
    pub fn count(&self) -> u64 {
        self.count
    }
}

impl AggregationOperator for DoubleAvg {
    type Input = f64;
    type Output = f64;

    fn add(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn merge(self, other: Self) -> Self {
        Self {
            sum: self.sum + other.sum,
            count: self.count + other.count,
        }
    }

    fn result(&self) -> f64 {
        self.sum / self.count as f64
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FloatAvg {
    sum: f32,
    count: u64,
}

impl AggregationOperator for FloatAvg {
    type Input = f32;
    type Output = f32;

    fn add(&mut self, value: f32) {
        self.sum += value;
        self.count += 1;
    }

    fn merge(self, other: Self) -> Self {
        Self {
            sum: self.sum + other.sum,
            count: self.count + other.count,
        }
    }

    fn result(&self) -> f32 {
        self.sum / self.count as f32
    }
}

/// Per-group accumulators keyed by the grouping column value.
pub type Groups<A> = BTreeMap<Value, A>;

/// Fold `right` into `left`, merging accumulators of shared keys.
pub fn merge_groups<A: AggregationOperator>(mut left: Groups<A>, right: Groups<A>) -> Groups<A> {
    for (key, agg) in right {
        let merged = match left.remove(&key) {
            Some(existing) => existing.merge(agg),
            None => agg,
        };
        left.insert(key, merged);
    }
    left
}
