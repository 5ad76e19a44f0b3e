use std::borrow::Cow;
use std::fmt::Write as _;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use uuid::Uuid;

use crate::generate::format::FormatError;

/// A raw value handed back by a producer, before it is formatted into a
/// template.
///
/// The `String` variant uses `Cow<'static, str>` so that producers drawing
/// from static lookup tables can return `&'static str` borrows without
/// allocating.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(Cow<'static, str>),
    Timestamp(NaiveDateTime),
    Date(NaiveDate),
    Time(NaiveTime),
    Uuid(Uuid),
}

/// A value that knows how to render itself for a format specifier.
///
/// Implemented by the temporal values, which read the specifier as a chrono
/// strftime pattern (`%Y-%m-%d`, `%H:%M`, ...). Values without this capability
/// fall back to printf-style formatting.
pub trait SelfFormat {
    fn format_with(&self, spec: &str) -> Result<String, FormatError>;
}

impl SelfFormat for NaiveDateTime {
    fn format_with(&self, spec: &str) -> Result<String, FormatError> {
        strftime(spec, self.format(spec))
    }
}

impl SelfFormat for NaiveDate {
    fn format_with(&self, spec: &str) -> Result<String, FormatError> {
        strftime(spec, self.format(spec))
    }
}

impl SelfFormat for NaiveTime {
    fn format_with(&self, spec: &str) -> Result<String, FormatError> {
        strftime(spec, self.format(spec))
    }
}

// chrono reports bad strftime items as a fmt::Error at render time; calling
// `to_string()` on it would panic.
fn strftime(spec: &str, delayed: impl std::fmt::Display) -> Result<String, FormatError> {
    let mut out = String::new();
    write!(out, "{}", delayed).map_err(|_| FormatError::InvalidStrftime {
        spec: spec.to_string(),
    })?;
    Ok(out)
}

impl Value {
    /// The self-formatting capability of this value, if it has one.
    pub fn as_self_format(&self) -> Option<&dyn SelfFormat> {
        match self {
            Value::Timestamp(ts) => Some(ts as &dyn SelfFormat),
            Value::Date(d) => Some(d as &dyn SelfFormat),
            Value::Time(t) => Some(t as &dyn SelfFormat),
            _ => None,
        }
    }

    /// Short type name used in format error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Timestamp(_) => "timestamp",
            Value::Date(_) => "date",
            Value::Time(_) => "time",
            Value::Uuid(_) => "uuid",
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(fl) => write!(f, "{}", fl),
            Value::String(s) => write!(f, "{}", s),
            Value::Timestamp(ts) => write!(f, "{}", ts.format("%Y-%m-%d %H:%M:%S")),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::Time(t) => write!(f, "{}", t.format("%H:%M:%S")),
            Value::Uuid(u) => write!(f, "{}", u),
        }
    }
}

impl From<&'static str> for Value {
    fn from(s: &'static str) -> Self {
        Value::String(Cow::Borrowed(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(Cow::Owned(s))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}
