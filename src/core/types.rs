use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Opaque identifier the dataset service hands out on upload
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatasetId(String);

impl DatasetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One entry of the inferred column schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub dtype: String,
}

impl ColumnInfo {
    pub fn new(name: impl Into<String>, dtype: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dtype: dtype.into(),
        }
    }

    /// Selector label, e.g. `price (float64)`
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.dtype)
    }
}

/// Successful upload response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub dataset_id: DatasetId,
    #[serde(default)]
    pub schema: Vec<ColumnInfo>,
}

/// A scalar table cell.
///
/// Rows arrive as untyped JSON objects, so each value is classified on read
/// rather than checked against the schema.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    /// Arrays and objects, shown as compact JSON
    Nested(Value),
}

impl From<&Value> for CellValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Integer(i),
                None => n
                    .as_f64()
                    .map(Self::Float)
                    .unwrap_or_else(|| Self::Nested(value.clone())),
            },
            Value::String(s) => Self::Text(s.clone()),
            Value::Array(_) | Value::Object(_) => Self::Nested(value.clone()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => write!(f, "{s}"),
            Self::Nested(v) => write!(f, "{v}"),
        }
    }
}

/// One table record keyed by column name, in the order the service sent it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(Map<String, Value>);

impl Row {
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn cell(&self, column: &str) -> Option<CellValue> {
        self.0.get(column).map(CellValue::from)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Summary statistics for one column. The shape is owned by the service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnStats(Map<String, Value>);

impl ColumnStats {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Two-space indented JSON, keys in service order
    pub fn to_pretty(&self) -> String {
        serde_json::to_string_pretty(&self.0).unwrap_or_else(|_| format!("{:?}", self.0))
    }
}

/// Bucketed value distribution for one column
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub counts: Vec<u64>,
    /// Bucket edges; `counts.len() + 1` values when the service sends them
    #[serde(default)]
    pub bins: Option<Vec<f64>>,
}

impl Histogram {
    pub fn max_count(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// Value range covered by the buckets, if edges were sent
    pub fn range(&self) -> Option<(f64, f64)> {
        let bins = self.bins.as_ref()?;
        Some((*bins.first()?, *bins.last()?))
    }
}

/// Either the payload or the `{ "error": ... }` body the service uses for
/// every failure it reports itself.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceReply<T> {
    Success(T),
    Failed(String),
}

impl<T: serde::de::DeserializeOwned> ServiceReply<T> {
    /// Classify a decoded response body. An object carrying a string `error`
    /// field is a failure; anything else must decode as `T`.
    pub fn from_value(body: Value) -> Result<Self, serde_json::Error> {
        if let Some(message) = error_message(&body) {
            return Ok(Self::Failed(message));
        }
        serde_json::from_value(body).map(Self::Success)
    }
}

impl<T> ServiceReply<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

pub(crate) fn error_message(body: &Value) -> Option<String> {
    body.as_object()?
        .get("error")?
        .as_str()
        .map(str::to_string)
}
