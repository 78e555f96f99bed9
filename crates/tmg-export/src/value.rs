//! Row values exchanged between the row sources, the transactional writer,
//! and the flat exports.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::NaiveDateTime;

/// A single cell value, one variant per semantic column category.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// SQL NULL.
    Null,

    /// Character data (bounded or unbounded).
    Text(String),

    /// 32-bit integer. Also carries Numeric column values, which the legacy
    /// source stores as whole numbers.
    Integer(i32),

    /// Boolean/logical value.
    Boolean(bool),

    /// Date or date-time without timezone.
    Date(NaiveDateTime),

    /// Binary blob (exhibit images, audio, video, thumbnails).
    Binary(Vec<u8>),
}

impl Value {
    /// Check if this value is NULL.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Render the value as a flat text field for CSV output.
    ///
    /// Binary data is base64-encoded; NULL renders as the empty string.
    #[must_use]
    pub fn to_field(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Text(s) => s.clone(),
            Value::Integer(i) => i.to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::Date(d) => d.to_string(),
            Value::Binary(b) => BASE64.encode(b),
        }
    }

    /// Convert the value to its JSON representation.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Text(s) => serde_json::Value::String(s.clone()),
            Value::Integer(i) => serde_json::Value::from(*i),
            Value::Boolean(b) => serde_json::Value::Bool(*b),
            Value::Date(d) => serde_json::Value::String(d.to_string()),
            Value::Binary(b) => serde_json::Value::String(BASE64.encode(b)),
        }
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::Date(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Binary(v)
    }
}

/// An in-memory result set for one table, in resolved column order.
#[derive(Debug, Clone, Default)]
pub struct Rowset {
    /// Column names, matching the resolved column order of the table.
    pub columns: Vec<String>,

    /// Row values, one inner vector per row, positionally aligned with
    /// `columns`.
    pub rows: Vec<Vec<Value>>,
}

impl Rowset {
    /// Create an empty rowset with the given column names.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row. The row length must match the column count.
    pub fn push_row(&mut self, row: Vec<Value>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    /// Get the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the rowset has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
