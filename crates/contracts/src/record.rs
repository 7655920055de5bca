//! Record / Batch - Record Source output
//!
//! A record is one dataset row, a batch is the bounded set of rows of a run.

use bytes::Bytes;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Scalar cell value
///
/// Serialized untagged, so JSON sees plain strings, numbers and `null`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Empty cell
    #[default]
    Null,
    /// Signed integer cell
    Integer(i64),
    /// Finite floating point cell
    Float(f64),
    /// Anything else
    Text(String),
}

impl FieldValue {
    /// Infer a value from a raw CSV cell
    ///
    /// Empty -> `Null`. A cell becomes `Integer` / `Float` only when the
    /// number prints back to exactly the same text, so display, keys and
    /// JSON never disagree with the source; everything else stays `Text`.
    pub fn parse(cell: &str) -> Self {
        let trimmed = cell.trim();
        if trimmed.is_empty() {
            return Self::Null;
        }
        if let Ok(i) = trimmed.parse::<i64>() {
            if i.to_string() == trimmed {
                return Self::Integer(i);
            }
        }
        match trimmed.parse::<f64>() {
            Ok(f) if f.is_finite() && f.to_string() == trimmed => Self::Float(f),
            _ => Self::Text(cell.to_string()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

/// One dataset row
///
/// Field order follows the CSV header order and is preserved through
/// serialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: IndexMap<String, FieldValue>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field insertion, used while a row is being assembled
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Look up a field
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate fields in column order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Field names in column order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Compact JSON text encoding (wire format of the queue and store sinks)
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Compact JSON as an owned payload buffer
    pub fn to_json_bytes(&self) -> Result<Bytes, serde_json::Error> {
        serde_json::to_vec(self).map(Bytes::from)
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Default maximum number of records in a batch
pub const DEFAULT_MAX_ROWS: usize = 100;

/// Bounded, ordered sequence of records
///
/// Materialized once per run and consumed by exactly one sink.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch {
    records: Vec<Record>,
}

impl Batch {
    /// Create a batch from records, keeping their order
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in source order
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Field names shared by the batch (taken from the first record)
    pub fn field_names(&self) -> Vec<&str> {
        self.records
            .first()
            .map(|r| r.field_names().collect())
            .unwrap_or_default()
    }
}

impl<'a> IntoIterator for &'a Batch {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl FromIterator<Record> for Batch {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
