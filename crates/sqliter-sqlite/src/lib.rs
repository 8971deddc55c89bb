//! SQLite driver for sqliter.
//!
//! `SqliteConnection` implements `sqliter_core::Connection` over the bundled
//! libsqlite3 from `libsqlite3-sys`.
//!
//! # Example
//!
//! ```rust,ignore
//! use sqliter_sqlite::{SqliteConfig, SqliteConnection};
//! use sqliter_core::Connection;
//!
//! let conn = SqliteConnection::open(&SqliteConfig::file("app.db").busy_timeout(1000))?;
//! conn.execute("CREATE TABLE IF NOT EXISTS kv (k TEXT UNIQUE, v TEXT);", &[])?;
//! ```

// FFI bindings require unsafe code
#![allow(unsafe_code)]

pub mod connection;
pub mod ffi;
pub mod types;

pub use connection::{IN_MEMORY, OpenFlags, SqliteConfig, SqliteConnection};

/// Get the SQLite library version string.
pub fn sqlite_version() -> &'static str {
    ffi::version()
}

/// Get the SQLite library version number.
pub fn sqlite_version_number() -> i32 {
    ffi::version_number()
}
