//! Core types and traits for sqliter.
//!
//! - `Record` trait mapping a struct onto one table
//! - `FieldInfo`, `ColumnFlags` and `SqlType` column metadata
//! - `decompose` turning a record into ordered field descriptors
//! - `Connection` trait for the storage engine
//! - `Value`/`Row` for parameters and results

pub mod connection;
pub mod error;
pub mod field;
pub mod introspect;
pub mod record;
pub mod row;
pub mod types;
pub mod validate;
pub mod value;

pub use connection::{Connection, ExecResult};
pub use error::{
    AmbiguousUpsertTarget, ConnectionError, ConnectionErrorKind, Error, MissingKeyError,
    NotFoundError, QueryError, QueryErrorKind, Result, TypeError, UnsupportedTypeError,
    render_args,
};
pub use field::{ColumnFlags, FieldInfo, UnknownAttribute};
pub use introspect::{Decomposed, FieldDescriptor, decompose, decompose_type};
pub use record::Record;
pub use row::{ColumnInfo, FromValue, Row};
pub use types::{SqlType, TypeInfo};
pub use value::Value;
