//! SQL column categories and the Rust-to-SQL type mapping.

use crate::value::Value;

/// Column category of a persisted field.
///
/// SQLite uses type affinity, so every integer width collapses to `INTEGER`
/// and every float width to `REAL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlType {
    Boolean,
    Integer,
    Real,
    Text,
    /// No column type exists for this field.
    Unsupported,
}

impl SqlType {
    /// Get the SQL type name used in `CREATE TABLE`.
    ///
    /// Returns `None` for [`SqlType::Unsupported`].
    #[must_use]
    pub const fn sql_name(&self) -> Option<&'static str> {
        match self {
            SqlType::Boolean => Some("BOOLEAN"),
            SqlType::Integer => Some("INTEGER"),
            SqlType::Real => Some("REAL"),
            SqlType::Text => Some("TEXT"),
            SqlType::Unsupported => None,
        }
    }
}

/// Trait for Rust types that can be stored in a record column.
///
/// Implemented for `bool`, every integer width, `f32`/`f64`, `String` and
/// `char`, each of which also decodes through `FromValue`. `Option<T>` and
/// `Box<T>` resolve through `T`. A field whose type has no implementation
/// does not compile under `#[derive(Record)]`.
pub trait TypeInfo {
    /// The column category for this Rust type.
    const SQL_TYPE: SqlType;

    /// Copy the current value out for binding.
    fn to_value(&self) -> Value;
}

macro_rules! type_info {
    ($sql:expr => $($ty:ty),*) => {
        $(
            impl TypeInfo for $ty {
                const SQL_TYPE: SqlType = $sql;

                fn to_value(&self) -> Value {
                    Value::from(*self)
                }
            }
        )*
    };
}

type_info!(SqlType::Boolean => bool);
type_info!(SqlType::Integer => i8, i16, i32, i64, u8, u16, u32);
type_info!(SqlType::Real => f32, f64);

impl TypeInfo for u64 {
    const SQL_TYPE: SqlType = SqlType::Integer;

    fn to_value(&self) -> Value {
        Value::from_u64_clamped(*self)
    }
}

impl TypeInfo for usize {
    const SQL_TYPE: SqlType = SqlType::Integer;

    fn to_value(&self) -> Value {
        Value::from_u64_clamped(*self as u64)
    }
}

impl TypeInfo for isize {
    const SQL_TYPE: SqlType = SqlType::Integer;

    fn to_value(&self) -> Value {
        Value::BigInt(*self as i64)
    }
}

impl TypeInfo for String {
    const SQL_TYPE: SqlType = SqlType::Text;

    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }
}

impl TypeInfo for char {
    const SQL_TYPE: SqlType = SqlType::Text;

    fn to_value(&self) -> Value {
        Value::Text(self.to_string())
    }
}

impl<T: TypeInfo> TypeInfo for Option<T> {
    const SQL_TYPE: SqlType = T::SQL_TYPE;

    fn to_value(&self) -> Value {
        self.as_ref().map_or(Value::Null, TypeInfo::to_value)
    }
}

impl<T: TypeInfo> TypeInfo for Box<T> {
    const SQL_TYPE: SqlType = T::SQL_TYPE;

    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}
