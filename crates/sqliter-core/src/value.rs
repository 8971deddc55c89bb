//! Dynamic SQL values.

use serde::Serialize;

use crate::error::{Error, TypeError};

/// A dynamically-typed SQL value.
///
/// Used for parameter binding, for result fetching, and as the captured
/// value of a field descriptor. Serializes untagged (`7`, `"x"`, `null`),
/// which is how bind arguments are rendered in error context.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// NULL value
    Null,

    /// Boolean value
    Bool(bool),

    /// 8-bit signed integer
    TinyInt(i8),

    /// 16-bit signed integer
    SmallInt(i16),

    /// 32-bit signed integer
    Int(i32),

    /// 64-bit signed integer
    BigInt(i64),

    /// 32-bit floating point
    Float(f32),

    /// 64-bit floating point
    Double(f64),

    /// Text string
    Text(String),

    /// Binary data
    Bytes(Vec<u8>),
}

impl Value {
    /// Check if this value is NULL.
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get the type name of this value.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "NULL",
            Value::Bool(_) => "BOOLEAN",
            Value::TinyInt(_) => "TINYINT",
            Value::SmallInt(_) => "SMALLINT",
            Value::Int(_) => "INTEGER",
            Value::BigInt(_) => "BIGINT",
            Value::Float(_) => "REAL",
            Value::Double(_) => "DOUBLE",
            Value::Text(_) => "TEXT",
            Value::Bytes(_) => "BLOB",
        }
    }

    /// Try to convert this value to a bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            Value::TinyInt(v) => Some(*v != 0),
            Value::SmallInt(v) => Some(*v != 0),
            Value::Int(v) => Some(*v != 0),
            Value::BigInt(v) => Some(*v != 0),
            _ => None,
        }
    }

    /// Try to convert this value to an i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::TinyInt(v) => Some(i64::from(*v)),
            Value::SmallInt(v) => Some(i64::from(*v)),
            Value::Int(v) => Some(i64::from(*v)),
            Value::BigInt(v) => Some(*v),
            Value::Bool(v) => Some(if *v { 1 } else { 0 }),
            _ => None,
        }
    }

    /// Try to convert this value to an f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(f64::from(*v)),
            Value::Double(v) => Some(*v),
            Value::TinyInt(v) => Some(f64::from(*v)),
            Value::SmallInt(v) => Some(f64::from(*v)),
            Value::Int(v) => Some(f64::from(*v)),
            Value::BigInt(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Try to get this value as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get this value as a byte slice.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            Value::Text(s) => Some(s.as_bytes()),
            _ => None,
        }
    }

    /// Render this value as an inline SQL literal.
    ///
    /// Text is single-quoted with embedded quotes doubled, numbers are bare,
    /// booleans become `1`/`0` and blobs use `X'..'` hex notation. SQL has no
    /// literal for NaN or infinity, so those render as `NULL`.
    ///
    /// ```
    /// use sqliter_core::Value;
    ///
    /// assert_eq!(Value::BigInt(1).to_sql_literal(), "1");
    /// assert_eq!(Value::from("it's").to_sql_literal(), "'it''s'");
    /// ```
    pub fn to_sql_literal(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Bool(b) => if *b { "1" } else { "0" }.to_string(),
            Value::TinyInt(v) => v.to_string(),
            Value::SmallInt(v) => v.to_string(),
            Value::Int(v) => v.to_string(),
            Value::BigInt(v) => v.to_string(),
            Value::Float(v) if v.is_finite() => v.to_string(),
            Value::Double(v) if v.is_finite() => v.to_string(),
            Value::Float(_) | Value::Double(_) => "NULL".to_string(),
            Value::Text(s) => format!("'{}'", s.replace('\'', "''")),
            Value::Bytes(b) => {
                let hex: String = b.iter().map(|byte| format!("{byte:02X}")).collect();
                format!("X'{hex}'")
            }
        }
    }

    /// Convert a `u64` to `Value`, clamping to `i64::MAX` if it overflows.
    ///
    /// SQLite integers are signed 64-bit. A warning is logged when clamping occurs.
    ///
    /// ```
    /// use sqliter_core::Value;
    ///
    /// assert_eq!(Value::from_u64_clamped(42), Value::BigInt(42));
    /// assert_eq!(Value::from_u64_clamped(u64::MAX), Value::BigInt(i64::MAX));
    /// ```
    #[must_use]
    pub fn from_u64_clamped(v: u64) -> Self {
        if let Ok(signed) = i64::try_from(v) {
            Value::BigInt(signed)
        } else {
            tracing::warn!(
                value = v,
                clamped_to = i64::MAX,
                "u64 value exceeds i64::MAX; clamping to i64::MAX"
            );
            Value::BigInt(i64::MAX)
        }
    }
}

// Conversion implementations
impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i8> for Value {
    fn from(v: i8) -> Self {
        Value::TinyInt(v)
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Value::SmallInt(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::BigInt(v)
    }
}

impl From<u8> for Value {
    fn from(v: u8) -> Self {
        Value::SmallInt(i16::from(v))
    }
}

impl From<u16> for Value {
    fn from(v: u16) -> Self {
        Value::Int(i32::from(v))
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::BigInt(i64::from(v))
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
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

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Bytes(v.to_vec())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

/// Convert a `u64` to `Value`, returning an error if the value exceeds `i64::MAX`.
///
/// Use `Value::from_u64_clamped()` for silent clamping instead.
impl TryFrom<u64> for Value {
    type Error = Error;

    fn try_from(v: u64) -> Result<Self, Self::Error> {
        i64::try_from(v).map(Value::BigInt).map_err(|_| {
            Error::Type(TypeError {
                expected: "u64 <= i64::MAX",
                actual: format!("u64 value {} exceeds i64::MAX ({})", v, i64::MAX),
                column: None,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_integers() {
        assert_eq!(Value::from(42i8), Value::TinyInt(42));
        assert_eq!(Value::from(42i16), Value::SmallInt(42));
        assert_eq!(Value::from(42i32), Value::Int(42));
        assert_eq!(Value::from(42i64), Value::BigInt(42));
        assert_eq!(Value::from(200u8), Value::SmallInt(200));
        assert_eq!(Value::from(u32::MAX), Value::BigInt(i64::from(u32::MAX)));
    }

    #[test]
    fn test_from_option() {
        assert_eq!(Value::from(Some(3i32)), Value::Int(3));
        assert_eq!(Value::from(None::<String>), Value::Null);
    }

    #[test]
    fn test_try_from_u64() {
        assert_eq!(Value::try_from(5u64).unwrap(), Value::BigInt(5));
        let err = Value::try_from(u64::MAX).unwrap_err();
        assert!(err.to_string().contains("exceeds i64::MAX"));
    }

    #[test]
    fn test_as_conversions() {
        assert_eq!(Value::Int(7).as_i64(), Some(7));
        assert_eq!(Value::Bool(true).as_i64(), Some(1));
        assert_eq!(Value::Text("a".into()).as_i64(), None);
        assert_eq!(Value::Float(1.5).as_f64(), Some(1.5));
        assert_eq!(Value::BigInt(0).as_bool(), Some(false));
        assert_eq!(Value::Text("hi".into()).as_str(), Some("hi"));
        assert_eq!(Value::Null.as_str(), None);
    }

    #[test]
    fn test_sql_literals() {
        assert_eq!(Value::Null.to_sql_literal(), "NULL");
        assert_eq!(Value::Bool(true).to_sql_literal(), "1");
        assert_eq!(Value::Int(-4).to_sql_literal(), "-4");
        assert_eq!(Value::Double(2.5).to_sql_literal(), "2.5");
        assert_eq!(Value::Text("foo".into()).to_sql_literal(), "'foo'");
        assert_eq!(Value::Text("o'clock".into()).to_sql_literal(), "'o''clock'");
        assert_eq!(Value::Bytes(vec![0xde, 0xad]).to_sql_literal(), "X'DEAD'");
    }

    #[test]
    fn test_non_finite_floats_render_as_null() {
        assert_eq!(Value::Double(f64::NAN).to_sql_literal(), "NULL");
        assert_eq!(Value::Double(f64::INFINITY).to_sql_literal(), "NULL");
        assert_eq!(Value::Float(f32::NEG_INFINITY).to_sql_literal(), "NULL");
        assert_eq!(Value::Float(1.5).to_sql_literal(), "1.5");
    }

    #[test]
    fn test_type_name() {
        assert_eq!(Value::Null.type_name(), "NULL");
        assert_eq!(Value::BigInt(1).type_name(), "BIGINT");
        assert_eq!(Value::Text(String::new()).type_name(), "TEXT");
    }

    #[test]
    fn test_untagged_serialization() {
        let args = vec![Value::BigInt(1), Value::Text("foo".into()), Value::Null];
        assert_eq!(serde_json::to_string(&args).unwrap(), r#"[1,"foo",null]"#);
    }
}
