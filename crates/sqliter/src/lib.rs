//! sqliter - map Rust structs onto SQLite tables.
//!
//! A struct derives [`Record`]; annotated fields become columns of a table
//! named after the struct (lower-cased). A [`Sqliter`] handle then creates
//! that table and its indexes, and inserts, reads, updates, upserts and
//! deletes rows, with reads sharing the handle and writes taking it
//! exclusively.
//!
//! # Quick Start
//!
//! ```ignore
//! use sqliter::prelude::*;
//!
//! #[derive(Record, Debug, Default)]
//! struct KeyValue {
//!     #[sqliter(column = "_key", unique)]
//!     key: String,
//!     #[sqliter(column = "value")]
//!     value: String,
//!     #[sqliter(column = "updated_at", index)]
//!     updated_at: i64,
//! }
//!
//! let db = Sqliter::open_memory()?;
//! db.create_table::<KeyValue>()?;
//!
//! let kv = KeyValue { key: "foo".into(), value: "bar".into(), updated_at: 1 };
//! db.upsert(&kv, "_key = ?", &[Value::from("foo")])?;
//!
//! let mut out = KeyValue::default();
//! db.read_one(&mut out, "_key = ?", &[Value::from("foo")])?;
//! ```
//!
//! The derive expands to paths under `sqliter_core`, so crates deriving
//! `Record` depend on `sqliter-core` alongside this crate.

pub mod store;

pub use store::{Sqliter, Upserted};

pub use sqliter_core::{
    ColumnFlags, Connection, Decomposed, Error, ExecResult, FieldDescriptor, FieldInfo, FromValue,
    Record, Result, Row, SqlType, TypeInfo, Value, decompose, decompose_type,
};

pub use sqliter_macros::Record;

pub use sqliter_query::{
    CountBuilder, CreateTable, DeleteBuilder, InsertBuilder, SelectBuilder, UpdateBuilder, Where,
};

pub use sqliter_sqlite::{IN_MEMORY, OpenFlags, SqliteConfig, SqliteConnection};

/// Get the version of the linked SQLite library.
pub fn sqlite_version() -> &'static str {
    sqliter_sqlite::sqlite_version()
}

/// Get the numeric version of the linked SQLite library.
pub fn sqlite_version_number() -> i32 {
    sqliter_sqlite::sqlite_version_number()
}

/// Prelude module for convenient imports.
///
/// ```ignore
/// use sqliter::prelude::*;
/// ```
pub mod prelude {
    pub use crate::store::{Sqliter, Upserted};
    pub use sqliter_core::{Connection, Error, ExecResult, Record, Result, Row, Value};
    pub use sqliter_macros::Record;
    pub use sqliter_sqlite::{IN_MEMORY, SqliteConfig};
}
