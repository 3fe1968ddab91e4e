// Cell scalar values

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::{Serialize, Serializer};

/// A single cell's scalar content, in its native type.
///
/// Date and time variants keep their `chrono` types in memory; they only
/// become ISO-8601 text when serialized.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    /// Error literal such as `#DIV/0!`
    Error(String),
    DateTime(NaiveDateTime),
    Date(NaiveDate),
    Time(NaiveTime),
    Duration(TimeDelta),
}

impl CellValue {
    /// Absent or empty text.
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

// Largest integer an f64 represents exactly.
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Empty => serializer.serialize_none(),
            CellValue::Text(s) | CellValue::Error(s) => serializer.serialize_str(s),
            CellValue::Number(n) => {
                // Whole numbers stay integers so `7` round-trips as `7`, not `7.0`
                if n.is_finite() && n.fract() == 0.0 && n.abs() < MAX_EXACT_INT {
                    serializer.serialize_i64(*n as i64)
                } else {
                    serializer.serialize_f64(*n)
                }
            }
            CellValue::Bool(b) => serializer.serialize_bool(*b),
            CellValue::DateTime(dt) => {
                serializer.collect_str(&dt.format("%Y-%m-%dT%H:%M:%S%.f"))
            }
            CellValue::Date(d) => serializer.collect_str(&d.format("%Y-%m-%d")),
            CellValue::Time(t) => serializer.collect_str(&t.format("%H:%M:%S%.f")),
            CellValue::Duration(d) => serializer.collect_str(d),
        }
    }
}
