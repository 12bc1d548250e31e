use crate::core::Value;

/// Field values positionally aligned to the schema of the reader that
/// produced the row.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    values: Vec<Option<Value>>,
}

impl Row {
    pub fn new(width: usize) -> Self {
        Self {
            values: vec![None; width],
        }
    }

    pub fn from_values(values: Vec<Option<Value>>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, pos: usize) -> Option<&Value> {
        self.values.get(pos).and_then(|v| v.as_ref())
    }

    pub fn set(&mut self, pos: usize, value: Option<Value>) {
        self.values[pos] = value;
    }
}
