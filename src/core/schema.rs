use ahash::AHashMap;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::core::ScanError;
use crate::core::value::Value;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Int8,
    Int16,
    Int64,
    Float32,
    Float64,
    Utf8,
    Timestamp,
}

impl DataType {
    /// Parse a raw field. Empty or whitespace-only input is null.
    pub fn parse(&self, raw: &str) -> Result<Option<Value>, ScanError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        let value = match self {
            DataType::Int8 => trimmed.parse::<i8>().map(Value::Int8).map_err(|e| e.to_string()),
            DataType::Int16 => trimmed
                .parse::<i16>()
                .map(Value::Int16)
                .map_err(|e| e.to_string()),
            DataType::Int64 => trimmed
                .parse::<i64>()
                .map(Value::Int64)
                .map_err(|e| e.to_string()),
            DataType::Float32 => trimmed
                .parse::<f32>()
                .map(Value::Float32)
                .map_err(|e| e.to_string()),
            DataType::Float64 => trimmed
                .parse::<f64>()
                .map(Value::Float64)
                .map_err(|e| e.to_string()),
            DataType::Utf8 => Ok(Value::Utf8(trimmed.to_string())),
            DataType::Timestamp => parse_timestamp(trimmed)
                .map(Value::Timestamp)
                .ok_or_else(|| "expected 'yyyy-MM-dd HH:mm:ss'".to_string()),
        };
        value
            .map(Some)
            .map_err(|reason| ScanError::ParseError(format!("'{raw}' as {self:?}: {reason}")))
    }
}

fn parse_digits(part: &str) -> Option<u32> {
    if part.is_empty() || part.len() > 9 {
        return None;
    }
    let mut acc = 0u32;
    for b in part.bytes() {
        if !b.is_ascii_digit() {
            return None;
        }
        acc = acc * 10 + (b - b'0') as u32;
    }
    Some(acc)
}

/// Parse `yyyy-MM-dd HH:mm:ss` by splitting on the separators and reading
/// digit runs directly. Single-digit time components are accepted.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let (date, time) = raw.split_once(' ')?;
    let mut date_parts = date.splitn(3, '-');
    let year = parse_digits(date_parts.next()?)?;
    let month = parse_digits(date_parts.next()?)?;
    let day = parse_digits(date_parts.next()?)?;
    let mut time_parts = time.splitn(3, ':');
    let hour = parse_digits(time_parts.next()?)?;
    let minute = parse_digits(time_parts.next()?)?;
    let second = parse_digits(time_parts.next()?)?;
    NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month, day)?.and_hms_opt(hour, minute, second)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Column {
    pub name: String,
    pub dtype: DataType,
}

impl Column {
    pub fn new(name: impl Into<String>, dtype: DataType) -> Self {
        Self {
            name: name.into(),
            dtype,
        }
    }

    pub fn parse(&self, raw: &str) -> Result<Option<Value>, ScanError> {
        self.dtype.parse(raw).map_err(|e| match e {
            ScanError::ParseError(msg) => {
                ScanError::ParseError(format!("column '{}': {}", self.name, msg))
            }
            other => other,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    columns: Vec<Column>,
    positions: AHashMap<String, usize>,
}

impl Schema {
    pub fn new(columns: Vec<Column>) -> Result<Self, ScanError> {
        let mut positions = AHashMap::with_capacity(columns.len());
        for (pos, column) in columns.iter().enumerate() {
            if positions.insert(column.name.clone(), pos).is_some() {
                return Err(ScanError::SchemaError(format!(
                    "duplicate column '{}'",
                    column.name
                )));
            }
        }
        Ok(Self { columns, positions })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column_at(&self, pos: usize) -> Option<&Column> {
        self.columns.get(pos)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.index_of(name).map(|pos| &self.columns[pos])
    }

    /// Reorder this schema to follow a file header. Every header name must be
    /// declared here; declared columns missing from the header are dropped.
    pub fn align<S: AsRef<str>>(&self, header: &[S]) -> Result<Schema, ScanError> {
        let columns = header
            .iter()
            .map(|name| {
                let name = name.as_ref().trim();
                self.column(name).cloned().ok_or_else(|| {
                    ScanError::SchemaError(format!("unknown column '{}' in header", name))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Schema::new(columns)
    }

    /// Sub-schema for `names` plus the position of each name in this schema.
    pub fn project<S: AsRef<str>>(&self, names: &[S]) -> Result<(Schema, Vec<usize>), ScanError> {
        let positions = names
            .iter()
            .map(|name| {
                self.index_of(name.as_ref()).ok_or_else(|| {
                    ScanError::SchemaError(format!("column '{}' not found", name.as_ref()))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let columns = positions.iter().map(|&p| self.columns[p].clone()).collect();
        Ok((Schema::new(columns)?, positions))
    }
}
