use crate::core::{ScanError, Schema, Value};
use crate::query::Interval;
use crate::storage::Row;

#[derive(Debug, Clone, PartialEq)]
pub struct Between {
    pub column: String,
    pub interval: Interval<Value>,
}

/// `value: None` means "column is not null".
#[derive(Debug, Clone, PartialEq)]
pub struct NotEqual {
    pub column: String,
    pub value: Option<Value>,
}

/// Conjunction of column conditions. An empty predicate matches every row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryPredicate {
    between: Vec<Between>,
    not_equal: Vec<NotEqual>,
}

impl QueryPredicate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_between(mut self, column: impl Into<String>, interval: Interval<Value>) -> Self {
        self.between.push(Between {
            column: column.into(),
            interval,
        });
        self
    }

    pub fn with_not_equal(mut self, column: impl Into<String>, value: Option<Value>) -> Self {
        self.not_equal.push(NotEqual {
            column: column.into(),
            value,
        });
        self
    }

    pub fn with_not_null(self, column: impl Into<String>) -> Self {
        self.with_not_equal(column, None)
    }

    pub fn between(&self) -> &[Between] {
        &self.between
    }

    pub fn not_equal(&self) -> &[NotEqual] {
        &self.not_equal
    }

    pub fn is_match_all(&self) -> bool {
        self.between.is_empty() && self.not_equal.is_empty()
    }

    /// Resolve every condition's column against `schema` once, so rows can be
    /// checked positionally.
    pub fn bind(&self, schema: &Schema) -> Result<BoundPredicate, ScanError> {
        let position = |column: &str| {
            schema.index_of(column).ok_or_else(|| {
                ScanError::SchemaError(format!("predicate column '{}' not found", column))
            })
        };
        let between = self
            .between
            .iter()
            .map(|b| Ok((position(&b.column)?, b.interval.clone())))
            .collect::<Result<Vec<_>, ScanError>>()?;
        let not_equal = self
            .not_equal
            .iter()
            .map(|n| Ok((position(&n.column)?, n.value.clone())))
            .collect::<Result<Vec<_>, ScanError>>()?;
        Ok(BoundPredicate { between, not_equal })
    }
}

#[derive(Debug, Clone)]
pub struct BoundPredicate {
    between: Vec<(usize, Interval<Value>)>,
    not_equal: Vec<(usize, Option<Value>)>,
}

impl BoundPredicate {
    pub fn matches(&self, row: &Row) -> bool {
        let between = self.between.iter().all(|(pos, interval)| {
            row.get(*pos)
                .is_some_and(|value| interval.contains(value))
        });
        between
            && self.not_equal.iter().all(|(pos, excluded)| match (row.get(*pos), excluded) {
                (None, _) => false,
                (Some(_), None) => true,
                (Some(value), Some(excluded)) => value != excluded,
            })
    }
}
