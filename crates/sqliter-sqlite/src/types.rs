//! Value encoding and decoding between Rust and SQLite.
//!
//! SQLite has five storage classes (INTEGER, REAL, TEXT, BLOB, NULL). Booleans
//! travel as 0/1 integers; every integer width binds through INTEGER.

use crate::ffi;
use sqliter_core::Value;
use std::ffi::{CStr, c_int};

/// Bind a Value to a prepared statement parameter.
///
/// # Safety
/// - `stmt` must be a valid, non-null prepared statement handle
/// - `index` is 1-based; out-of-range indexes return `SQLITE_RANGE`
#[allow(clippy::cast_possible_truncation)]
pub unsafe fn bind_value(stmt: *mut ffi::sqlite3_stmt, index: c_int, value: &Value) -> c_int {
    // SAFETY: caller guarantees `stmt` is live; text and blob buffers are
    // copied by SQLite because of SQLITE_TRANSIENT.
    unsafe {
        match value {
            Value::Null => ffi::sqlite3_bind_null(stmt, index),

            Value::Bool(b) => ffi::sqlite3_bind_int(stmt, index, c_int::from(*b)),

            Value::TinyInt(v) => ffi::sqlite3_bind_int(stmt, index, i32::from(*v)),

            Value::SmallInt(v) => ffi::sqlite3_bind_int(stmt, index, i32::from(*v)),

            Value::Int(v) => ffi::sqlite3_bind_int(stmt, index, *v),

            Value::BigInt(v) => ffi::sqlite3_bind_int64(stmt, index, *v),

            Value::Float(v) => ffi::sqlite3_bind_double(stmt, index, f64::from(*v)),

            Value::Double(v) => ffi::sqlite3_bind_double(stmt, index, *v),

            Value::Text(s) => {
                let bytes = s.as_bytes();
                ffi::sqlite3_bind_text(
                    stmt,
                    index,
                    bytes.as_ptr().cast(),
                    bytes.len() as c_int,
                    ffi::SQLITE_TRANSIENT(),
                )
            }

            Value::Bytes(b) => ffi::sqlite3_bind_blob(
                stmt,
                index,
                b.as_ptr().cast(),
                b.len() as c_int,
                ffi::SQLITE_TRANSIENT(),
            ),
        }
    }
}

/// Read a column value from a result row.
///
/// Integers that fit in 32 bits come back as `Value::Int`, wider ones as
/// `Value::BigInt`; the row decoders widen or narrow as the field requires.
///
/// # Safety
/// - `stmt` must be a valid statement positioned on a row (after `SQLITE_ROW`)
/// - `index` must be a valid 0-based column index
#[allow(clippy::cast_sign_loss)]
pub unsafe fn read_column(stmt: *mut ffi::sqlite3_stmt, index: c_int) -> Value {
    // SAFETY: caller guarantees `stmt` is positioned on a row
    unsafe {
        match ffi::sqlite3_column_type(stmt, index) {
            ffi::SQLITE_INTEGER => {
                let v = ffi::sqlite3_column_int64(stmt, index);
                i32::try_from(v).map_or(Value::BigInt(v), Value::Int)
            }

            ffi::SQLITE_FLOAT => Value::Double(ffi::sqlite3_column_double(stmt, index)),

            ffi::SQLITE_TEXT => {
                let ptr = ffi::sqlite3_column_text(stmt, index);
                if ptr.is_null() {
                    Value::Null
                } else {
                    let len = ffi::sqlite3_column_bytes(stmt, index) as usize;
                    let bytes = std::slice::from_raw_parts(ptr.cast::<u8>(), len);
                    Value::Text(String::from_utf8_lossy(bytes).into_owned())
                }
            }

            ffi::SQLITE_BLOB => {
                let ptr = ffi::sqlite3_column_blob(stmt, index);
                let len = ffi::sqlite3_column_bytes(stmt, index) as usize;
                if ptr.is_null() || len == 0 {
                    Value::Bytes(Vec::new())
                } else {
                    let bytes = std::slice::from_raw_parts(ptr.cast::<u8>(), len);
                    Value::Bytes(bytes.to_vec())
                }
            }

            _ => Value::Null,
        }
    }
}

/// Get the name of a result column.
///
/// # Safety
/// - `stmt` must be a valid prepared statement
/// - `index` must be a valid 0-based column index
pub unsafe fn column_name(stmt: *mut ffi::sqlite3_stmt, index: c_int) -> Option<String> {
    // SAFETY: the returned pointer is valid until the statement is finalized;
    // it is copied out immediately.
    unsafe {
        let ptr = ffi::sqlite3_column_name(stmt, index);
        if ptr.is_null() {
            None
        } else {
            Some(CStr::from_ptr(ptr).to_string_lossy().into_owned())
        }
    }
}
