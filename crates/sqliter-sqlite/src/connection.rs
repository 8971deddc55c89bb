//! SQLite connection implementation.
//!
//! A safe wrapper around the SQLite C API implementing the `Connection` trait
//! from sqliter-core. The raw handle sits behind a mutex; callers that need
//! reader/writer gating layer their own lock on top.

// Allow casts in FFI code where we need to match C types exactly
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::result_large_err)] // Error type is defined in sqliter-core
#![allow(clippy::borrow_as_ptr)] // FFI requires raw pointers

use crate::ffi;
use crate::types;
use sqliter_core::{
    ColumnInfo, Connection, Error, ExecResult, Row, Value,
    error::{ConnectionError, ConnectionErrorKind, QueryError, QueryErrorKind},
};
use std::ffi::{CStr, CString, c_char, c_int};
use std::ptr;
use std::sync::{Arc, Mutex, MutexGuard};

/// Path that opens a private in-memory database.
pub const IN_MEMORY: &str = ":memory:";

/// Configuration for opening SQLite connections.
#[derive(Debug, Clone)]
pub struct SqliteConfig {
    /// Path to the database file, or ":memory:" for an in-memory database.
    pub path: String,
    /// Open flags (read-only, read-write, create, etc.)
    pub flags: OpenFlags,
    /// Busy timeout in milliseconds. Zero leaves the engine default.
    pub busy_timeout_ms: u32,
}

/// Flags controlling how the database is opened.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenFlags {
    /// Open for reading only.
    pub read_only: bool,
    /// Open for reading and writing.
    pub read_write: bool,
    /// Create the database if it doesn't exist.
    pub create: bool,
    /// Enable URI filename interpretation.
    pub uri: bool,
    /// Multi-thread mode.
    pub no_mutex: bool,
    /// Serialized mode.
    pub full_mutex: bool,
}

impl OpenFlags {
    /// Create flags for read-only access.
    pub fn read_only() -> Self {
        Self {
            read_only: true,
            ..Default::default()
        }
    }

    /// Create flags for read-write access (database must exist).
    pub fn read_write() -> Self {
        Self {
            read_write: true,
            ..Default::default()
        }
    }

    /// Create flags for read-write access with creation if needed.
    pub fn create_read_write() -> Self {
        Self {
            read_write: true,
            create: true,
            ..Default::default()
        }
    }

    fn to_sqlite_flags(self) -> c_int {
        let mut flags = 0;

        if self.read_only {
            flags |= ffi::SQLITE_OPEN_READONLY;
        }
        if self.read_write {
            flags |= ffi::SQLITE_OPEN_READWRITE;
        }
        if self.create {
            flags |= ffi::SQLITE_OPEN_CREATE;
        }
        if self.uri {
            flags |= ffi::SQLITE_OPEN_URI;
        }
        if self.no_mutex {
            flags |= ffi::SQLITE_OPEN_NOMUTEX;
        }
        if self.full_mutex {
            flags |= ffi::SQLITE_OPEN_FULLMUTEX;
        }

        // Default to read-write if no mode specified
        if flags & (ffi::SQLITE_OPEN_READONLY | ffi::SQLITE_OPEN_READWRITE) == 0 {
            flags |= ffi::SQLITE_OPEN_READWRITE | ffi::SQLITE_OPEN_CREATE;
        }

        flags
    }
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            path: IN_MEMORY.to_string(),
            flags: OpenFlags::create_read_write(),
            busy_timeout_ms: 5000,
        }
    }
}

impl SqliteConfig {
    /// Create a new config for a file-based database.
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Create a new config for an in-memory database.
    pub fn memory() -> Self {
        Self::default()
    }

    /// Set open flags.
    pub fn flags(mut self, flags: OpenFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Set busy timeout.
    pub fn busy_timeout(mut self, ms: u32) -> Self {
        self.busy_timeout_ms = ms;
        self
    }
}

/// Handle state. A null `db` means the connection was closed.
struct SqliteInner {
    db: *mut ffi::sqlite3,
}

// SAFETY: the handle is only touched while the owning Mutex is held.
unsafe impl Send for SqliteInner {}

/// A connection to a SQLite database.
pub struct SqliteConnection {
    inner: Mutex<SqliteInner>,
    path: String,
}

// SAFETY: every access to the raw handle goes through the Mutex
unsafe impl Send for SqliteConnection {}
unsafe impl Sync for SqliteConnection {}

impl SqliteConnection {
    /// Open a new SQLite connection with the given configuration.
    pub fn open(config: &SqliteConfig) -> Result<Self, Error> {
        let c_path = CString::new(config.path.as_str()).map_err(|_| {
            Error::Connection(ConnectionError {
                kind: ConnectionErrorKind::InvalidPath,
                path: config.path.clone(),
                message: "Invalid path: contains null byte".to_string(),
            })
        })?;

        let mut db: *mut ffi::sqlite3 = ptr::null_mut();
        let flags = config.flags.to_sqlite_flags();

        // SAFETY: We pass valid pointers and check the return value
        let rc = unsafe { ffi::sqlite3_open_v2(c_path.as_ptr(), &mut db, flags, ptr::null()) };

        if rc != ffi::SQLITE_OK {
            let msg = if db.is_null() {
                ffi::error_string(rc).to_string()
            } else {
                // SAFETY: db is valid even on failure and must still be closed
                unsafe {
                    let msg = errmsg(db);
                    ffi::sqlite3_close(db);
                    msg
                }
            };

            tracing::warn!(path = %config.path, code = rc, "failed to open sqlite database");
            return Err(Error::Connection(ConnectionError {
                kind: ConnectionErrorKind::Connect,
                path: config.path.clone(),
                message: format!("Failed to open database: {}", msg),
            }));
        }

        if config.busy_timeout_ms > 0 {
            let ms = c_int::try_from(config.busy_timeout_ms).unwrap_or(c_int::MAX);
            // SAFETY: db is valid
            unsafe {
                ffi::sqlite3_busy_timeout(db, ms);
            }
        }

        tracing::debug!(
            path = %config.path,
            busy_timeout_ms = config.busy_timeout_ms,
            "opened sqlite database"
        );

        Ok(Self {
            inner: Mutex::new(SqliteInner { db }),
            path: config.path.clone(),
        })
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self, Error> {
        Self::open(&SqliteConfig::memory())
    }

    /// Open a file-based database, creating it if needed.
    pub fn open_file(path: impl Into<String>) -> Result<Self, Error> {
        Self::open(&SqliteConfig::file(path))
    }

    /// Get the database path.
    pub fn path(&self) -> &str {
        &self.path
    }

    fn lock(&self) -> MutexGuard<'_, SqliteInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Lock the handle, failing if it was closed.
    fn live(&self) -> Result<MutexGuard<'_, SqliteInner>, Error> {
        let inner = self.lock();
        if inner.db.is_null() {
            return Err(Error::Connection(ConnectionError {
                kind: ConnectionErrorKind::Closed,
                path: self.path.clone(),
                message: "connection is closed".to_string(),
            }));
        }
        Ok(inner)
    }

    /// Prepare and execute a query, returning all rows.
    ///
    /// Only the first statement of `sql` runs; use `execute` for scripts.
    fn query_sync(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, Error> {
        let inner = self.live()?;
        let stmt = Statement::prepare(inner.db, sql)?;
        stmt.bind_all(params)?;

        // SAFETY: stmt is valid
        let col_count = unsafe { ffi::sqlite3_column_count(stmt.raw) };
        let mut col_names = Vec::with_capacity(col_count as usize);
        for i in 0..col_count {
            // SAFETY: i is within the column count
            let name =
                unsafe { types::column_name(stmt.raw, i) }.unwrap_or_else(|| format!("col{}", i));
            col_names.push(name);
        }
        let columns = Arc::new(ColumnInfo::new(col_names));

        let mut rows = Vec::new();
        while stmt.step()? {
            let mut values = Vec::with_capacity(col_count as usize);
            for i in 0..col_count {
                // SAFETY: stmt is valid, we just got SQLITE_ROW
                values.push(unsafe { types::read_column(stmt.raw, i) });
            }
            rows.push(Row::with_columns(Arc::clone(&columns), values));
        }

        tracing::debug!(sql, params = params.len(), rows = rows.len(), "sqlite query");
        Ok(rows)
    }

    /// Run every statement in `sql` to completion, in order.
    ///
    /// Parameters are handed out left to right, each statement taking as
    /// many as it has placeholders. Statements before a failing one stay
    /// applied. The change count is the difference in `total_changes`, so DDL
    /// reports zero instead of the count left over from earlier DML.
    fn execute_sync(&self, sql: &str, params: &[Value]) -> Result<ExecResult, Error> {
        let inner = self.live()?;
        let c_sql = CString::new(sql).map_err(|_| nul_in_sql(sql))?;
        let end = c_sql.as_bytes().len();

        // SAFETY: db is valid
        let before = unsafe { ffi::sqlite3_total_changes(inner.db) };

        let mut offset = 0;
        let mut remaining = params;
        let mut statements = 0_usize;
        while offset < end {
            let (stmt, next) = Statement::prepare_at(inner.db, sql, &c_sql, offset)?;
            if next <= offset {
                break;
            }
            offset = next;
            if stmt.raw.is_null() {
                continue;
            }

            // The last statement takes everything left so extras fail at bind time.
            let last = c_sql
                .as_bytes()
                .get(offset..)
                .unwrap_or_default()
                .iter()
                .all(|b| b.is_ascii_whitespace() || *b == b';');
            let take = if last {
                remaining.len()
            } else {
                stmt.parameter_count().min(remaining.len())
            };
            let (now, later) = remaining.split_at(take);
            stmt.bind_all(now)?;
            remaining = later;
            while stmt.step()? {}
            statements += 1;
        }

        if !remaining.is_empty() {
            return Err(Error::Query(QueryError {
                kind: QueryErrorKind::Bind,
                sql: Some(sql.to_string()),
                message: format!(
                    "{} of {} parameters have no placeholder",
                    remaining.len(),
                    params.len()
                ),
                detail: None,
            }));
        }

        // SAFETY: db is valid and still locked
        let (after, last_insert_id) = unsafe {
            (
                ffi::sqlite3_total_changes(inner.db),
                ffi::sqlite3_last_insert_rowid(inner.db),
            )
        };
        let rows_affected = u64::try_from(i64::from(after) - i64::from(before)).unwrap_or(0);

        tracing::debug!(
            sql,
            params = params.len(),
            statements,
            rows_affected,
            "sqlite execute"
        );
        Ok(ExecResult {
            rows_affected,
            last_insert_id,
        })
    }

    fn close_sync(&mut self) -> Result<(), Error> {
        let inner = self.inner.get_mut().unwrap_or_else(|e| e.into_inner());
        if inner.db.is_null() {
            return Ok(());
        }

        // SAFETY: db is valid; statements are always finalized before return
        let rc = unsafe { ffi::sqlite3_close(inner.db) };
        if rc != ffi::SQLITE_OK {
            return Err(Error::Connection(ConnectionError {
                kind: ConnectionErrorKind::Connect,
                path: self.path.clone(),
                message: format!("Failed to close database: {}", ffi::error_string(rc)),
            }));
        }

        inner.db = ptr::null_mut();
        tracing::debug!(path = %self.path, "closed sqlite database");
        Ok(())
    }
}

impl Connection for SqliteConnection {
    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, Error> {
        self.query_sync(sql, params)
    }

    fn execute(&self, sql: &str, params: &[Value]) -> Result<ExecResult, Error> {
        self.execute_sync(sql, params)
    }

    fn close(&mut self) -> Result<(), Error> {
        self.close_sync()
    }
}

impl Drop for SqliteConnection {
    fn drop(&mut self) {
        if let Err(e) = self.close_sync() {
            tracing::warn!(path = %self.path, error = %e, "error closing sqlite database");
        }
    }
}

/// A prepared statement, finalized on drop.
struct Statement<'db> {
    raw: *mut ffi::sqlite3_stmt,
    db: *mut ffi::sqlite3,
    sql: &'db str,
}

impl<'db> Statement<'db> {
    /// Prepare the first statement of `sql`.
    fn prepare(db: *mut ffi::sqlite3, sql: &'db str) -> Result<Self, Error> {
        let c_sql = CString::new(sql).map_err(|_| nul_in_sql(sql))?;
        let (stmt, _) = Self::prepare_at(db, sql, &c_sql, 0)?;
        Ok(stmt)
    }

    /// Prepare the statement starting at byte `offset` of `c_sql`.
    ///
    /// Returns the statement and the byte offset where the unparsed tail
    /// begins. SQLite copies the text, so `c_sql` may be dropped afterwards.
    fn prepare_at(
        db: *mut ffi::sqlite3,
        sql: &'db str,
        c_sql: &CStr,
        offset: usize,
    ) -> Result<(Self, usize), Error> {
        let bytes = c_sql.to_bytes();
        let len = bytes.len().saturating_sub(offset);
        let base = c_sql.as_ptr();
        let mut raw: *mut ffi::sqlite3_stmt = ptr::null_mut();
        let mut tail: *const c_char = ptr::null();

        // SAFETY: offset <= len(c_sql), so start points into the same buffer
        let rc = unsafe {
            let start = base.add(offset.min(bytes.len()));
            ffi::sqlite3_prepare_v2(db, start, len as c_int, &mut raw, &mut tail)
        };

        if rc != ffi::SQLITE_OK {
            return Err(prepare_error(db, sql));
        }

        let next = if tail.is_null() {
            bytes.len()
        } else {
            // SAFETY: SQLite sets the tail inside the buffer it was given
            let consumed = unsafe { tail.offset_from(base) };
            usize::try_from(consumed).unwrap_or(bytes.len())
        };

        Ok((Self { raw, db, sql }, next))
    }

    fn parameter_count(&self) -> usize {
        // SAFETY: a null statement reports zero parameters
        let count = unsafe { ffi::sqlite3_bind_parameter_count(self.raw) };
        usize::try_from(count).unwrap_or(0)
    }

    fn bind_all(&self, params: &[Value]) -> Result<(), Error> {
        for (i, param) in params.iter().enumerate() {
            let index = c_int::try_from(i + 1).unwrap_or(c_int::MAX);
            // SAFETY: raw is a live statement, index is 1-based
            let rc = unsafe { types::bind_value(self.raw, index, param) };
            if rc != ffi::SQLITE_OK {
                return Err(bind_error(self.db, self.sql, i + 1, rc));
            }
        }
        Ok(())
    }

    /// Advance one row. `Ok(true)` means a row is available.
    fn step(&self) -> Result<bool, Error> {
        // Blank or comment-only SQL prepares to a null handle.
        if self.raw.is_null() {
            return Ok(false);
        }
        // SAFETY: raw is a live statement
        let rc = unsafe { ffi::sqlite3_step(self.raw) };
        match rc {
            ffi::SQLITE_ROW => Ok(true),
            ffi::SQLITE_DONE => Ok(false),
            _ => Err(step_error(self.db, self.sql)),
        }
    }
}

impl Drop for Statement<'_> {
    fn drop(&mut self) {
        // SAFETY: finalizing a null statement is a no-op
        unsafe { ffi::sqlite3_finalize(self.raw) };
    }
}

// Helper functions

/// # Safety
/// `db` must be a valid handle.
unsafe fn errmsg(db: *mut ffi::sqlite3) -> String {
    // SAFETY: sqlite3_errmsg always returns a valid string for a valid handle
    unsafe {
        let ptr = ffi::sqlite3_errmsg(db);
        CStr::from_ptr(ptr).to_string_lossy().into_owned()
    }
}

fn nul_in_sql(sql: &str) -> Error {
    Error::Query(QueryError {
        kind: QueryErrorKind::Syntax,
        sql: Some(sql.to_string()),
        message: "SQL contains null byte".to_string(),
        detail: None,
    })
}

fn prepare_error(db: *mut ffi::sqlite3, sql: &str) -> Error {
    // SAFETY: db is valid
    let (msg, code) = unsafe { (errmsg(db), ffi::sqlite3_errcode(db)) };

    // A generic error at prepare time is a parse or schema problem.
    let kind = match code & 0xff {
        ffi::SQLITE_ERROR => QueryErrorKind::Syntax,
        _ => error_code_to_kind(code),
    };

    Error::Query(QueryError {
        kind,
        sql: Some(sql.to_string()),
        message: msg,
        detail: None,
    })
}

fn bind_error(db: *mut ffi::sqlite3, sql: &str, param_index: usize, rc: c_int) -> Error {
    // SAFETY: db is valid
    let msg = unsafe { errmsg(db) };

    Error::Query(QueryError {
        kind: QueryErrorKind::Bind,
        sql: Some(sql.to_string()),
        message: format!(
            "Failed to bind parameter {}: {} ({})",
            param_index,
            msg,
            ffi::error_string(rc)
        ),
        detail: None,
    })
}

fn step_error(db: *mut ffi::sqlite3, sql: &str) -> Error {
    // SAFETY: db is valid
    let (msg, code) = unsafe { (errmsg(db), ffi::sqlite3_errcode(db)) };

    Error::Query(QueryError {
        kind: error_code_to_kind(code),
        sql: Some(sql.to_string()),
        message: msg,
        detail: None,
    })
}

fn error_code_to_kind(code: c_int) -> QueryErrorKind {
    // Extended codes carry the primary code in the low byte.
    match code & 0xff {
        ffi::SQLITE_CONSTRAINT => QueryErrorKind::Constraint,
        ffi::SQLITE_BUSY | ffi::SQLITE_LOCKED => QueryErrorKind::Busy,
        ffi::SQLITE_PERM | ffi::SQLITE_AUTH | ffi::SQLITE_READONLY => QueryErrorKind::Permission,
        ffi::SQLITE_NOTFOUND => QueryErrorKind::NotFound,
        ffi::SQLITE_TOOBIG => QueryErrorKind::DataTruncation,
        ffi::SQLITE_INTERRUPT => QueryErrorKind::Cancelled,
        ffi::SQLITE_RANGE => QueryErrorKind::Bind,
        _ => QueryErrorKind::Database,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conn_with_table() -> SqliteConnection {
        let conn = SqliteConnection::open_memory().unwrap();
        conn.execute(
            "CREATE TABLE test (id INTEGER PRIMARY KEY, name TEXT UNIQUE)",
            &[],
        )
        .unwrap();
        conn
    }

    fn count(conn: &SqliteConnection) -> i64 {
        let rows = conn.query("SELECT COUNT(*) FROM test", &[]).unwrap();
        rows[0].get_as::<i64>(0).unwrap()
    }

    #[test]
    fn test_open_memory() {
        let conn = SqliteConnection::open_memory().unwrap();
        assert_eq!(conn.path(), IN_MEMORY);
        assert_eq!(conn.query("SELECT 1", &[]).unwrap().len(), 1);
    }

    #[test]
    fn test_execute_runs_every_statement() {
        let conn = conn_with_table();
        let result = conn
            .execute(
                "INSERT INTO test (name) VALUES ('Alice'); INSERT INTO test (name) VALUES ('Bob');",
                &[],
            )
            .unwrap();
        assert_eq!(result.rows_affected, 2);
        assert_eq!(result.last_insert_id, 2);
        assert_eq!(count(&conn), 2);
    }

    #[test]
    fn test_execute_spreads_params_over_statements() {
        let conn = conn_with_table();
        let result = conn
            .execute(
                "INSERT INTO test (name) VALUES (?);\n-- second\nINSERT INTO test (id, name) VALUES (?, ?)",
                &[Value::from("a"), Value::Int(10), Value::from("b")],
            )
            .unwrap();
        assert_eq!(result.rows_affected, 2);

        let rows = conn
            .query("SELECT id, name FROM test ORDER BY id", &[])
            .unwrap();
        assert_eq!(rows[0].get_named::<String>("name").unwrap(), "a");
        assert_eq!(rows[1].get_named::<i64>("id").unwrap(), 10);
        assert_eq!(rows[1].get_named::<String>("name").unwrap(), "b");
    }

    #[test]
    fn test_execute_stops_at_failing_statement() {
        let conn = conn_with_table();
        let err = conn
            .execute(
                "INSERT INTO test (name) VALUES ('kept'); INSRT INTO test VALUES (1); INSERT INTO test (name) VALUES ('never')",
                &[],
            )
            .unwrap_err();
        assert!(matches!(&err, Error::Query(q) if q.kind == QueryErrorKind::Syntax));
        assert_eq!(count(&conn), 1);
    }

    #[test]
    fn test_execute_rejects_unused_params_after_trailing_comment() {
        let conn = conn_with_table();
        let err = conn
            .execute(
                "INSERT INTO test (name) VALUES ('x'); -- done",
                &[Value::Int(1)],
            )
            .unwrap_err();
        assert!(matches!(err, Error::Query(q) if q.kind == QueryErrorKind::Bind));
    }

    #[test]
    fn test_query_rows_and_columns() {
        let conn = conn_with_table();
        conn.execute("INSERT INTO test (name) VALUES ('Alice'), ('Bob')", &[])
            .unwrap();

        let rows = conn.query("SELECT * FROM test ORDER BY id", &[]).unwrap();
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].get_named::<i32>("id").unwrap(), 1);
        assert_eq!(rows[0].get_named::<String>("name").unwrap(), "Alice");
        assert_eq!(rows[1].get_named::<i32>("id").unwrap(), 2);
        assert_eq!(rows[1].get_named::<String>("name").unwrap(), "Bob");
    }

    #[test]
    fn test_parameterized_execute_reports_rowid_and_changes() {
        let conn = conn_with_table();

        let first = conn
            .execute(
                "INSERT INTO test (name) VALUES (?)",
                &[Value::Text("Alice".to_string())],
            )
            .unwrap();
        assert_eq!(first.rows_affected, 1);
        assert_eq!(first.last_insert_id, 1);

        let second = conn
            .execute("INSERT INTO test (name) VALUES (?)", &[Value::from("Bob")])
            .unwrap();
        assert_eq!(second.last_insert_id, 2);

        let updated = conn
            .execute("UPDATE test SET name = name || '!'", &[])
            .unwrap();
        assert_eq!(updated.rows_affected, 2);
    }

    #[test]
    fn test_ddl_reports_no_changes() {
        let conn = conn_with_table();
        conn.execute("INSERT INTO test (name) VALUES ('x')", &[])
            .unwrap();
        let ddl = conn
            .execute("CREATE INDEX IF NOT EXISTS test_name_idx ON test (name)", &[])
            .unwrap();
        assert_eq!(ddl.rows_affected, 0);
    }

    #[test]
    fn test_null_handling() {
        let conn = conn_with_table();
        conn.execute("INSERT INTO test (name) VALUES (?)", &[Value::Null])
            .unwrap();

        let rows = conn.query("SELECT * FROM test", &[]).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get_named::<Option<String>>("name").unwrap(), None);
    }

    #[test]
    #[allow(clippy::approx_constant)]
    fn test_type_conversions() {
        let conn = SqliteConnection::open_memory().unwrap();
        conn.execute(
            "CREATE TABLE types (
                b BOOLEAN,
                i INTEGER,
                big INTEGER,
                f REAL,
                t TEXT,
                bl BLOB
            )",
            &[],
        )
        .unwrap();

        conn.execute(
            "INSERT INTO types VALUES (?, ?, ?, ?, ?, ?)",
            &[
                Value::Bool(true),
                Value::SmallInt(42),
                Value::BigInt(i64::MAX),
                Value::Double(3.14),
                Value::Text("it's".to_string()),
                Value::Bytes(vec![1, 2, 3]),
            ],
        )
        .unwrap();

        let rows = conn.query("SELECT * FROM types", &[]).unwrap();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];

        // SQLite stores booleans as integers
        assert_eq!(row.get_by_name("b"), Some(&Value::Int(1)));
        assert!(row.get_named::<bool>("b").unwrap());
        assert_eq!(row.get_named::<i16>("i").unwrap(), 42);
        assert_eq!(row.get_by_name("big"), Some(&Value::BigInt(i64::MAX)));

        let f: f64 = row.get_named("f").unwrap();
        assert!((f - 3.14).abs() < 0.001);

        assert_eq!(row.get_named::<String>("t").unwrap(), "it's");
        assert_eq!(row.get_named::<Vec<u8>>("bl").unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_blank_statement_is_a_no_op() {
        let conn = conn_with_table();
        assert!(conn.query("  ", &[]).unwrap().is_empty());
        assert_eq!(conn.execute("-- nothing", &[]).unwrap().rows_affected, 0);
    }

    #[test]
    fn test_error_kinds() {
        let conn = conn_with_table();

        let err = conn.query("SELEC nope", &[]).unwrap_err();
        assert!(matches!(&err, Error::Query(q) if q.kind == QueryErrorKind::Syntax));
        assert_eq!(err.sql(), Some("SELEC nope"));

        conn.execute("INSERT INTO test (name) VALUES ('dup')", &[])
            .unwrap();
        let err = conn
            .execute("INSERT INTO test (name) VALUES ('dup')", &[])
            .unwrap_err();
        assert!(err.is_constraint_violation());

        let err = conn
            .execute("INSERT INTO test (name) VALUES (?)", &[Value::Int(1), Value::Int(2)])
            .unwrap_err();
        assert!(matches!(err, Error::Query(q) if q.kind == QueryErrorKind::Bind));

        let err = conn.query("SELECT 'a\0b'", &[]).unwrap_err();
        assert!(matches!(err, Error::Query(q) if q.kind == QueryErrorKind::Syntax));
    }

    #[test]
    fn test_close_then_use_fails() {
        let mut conn = conn_with_table();
        conn.close().unwrap();
        // closing twice is a no-op
        conn.close().unwrap();

        let err = conn.query("SELECT 1", &[]).unwrap_err();
        assert!(matches!(err, Error::Connection(c) if c.kind == ConnectionErrorKind::Closed));
    }

    #[test]
    fn test_invalid_path() {
        let Err(err) = SqliteConnection::open_file("bad\0path") else {
            panic!("expected an error");
        };
        assert!(
            matches!(err, Error::Connection(c) if c.kind == ConnectionErrorKind::InvalidPath)
        );
    }

    #[test]
    fn test_open_flags() {
        let tmp = std::env::temp_dir().join(format!("sqliter_flags_{}.db", std::process::id()));
        let _ = std::fs::remove_file(&tmp);
        let path = tmp.to_string_lossy().to_string();

        let config = SqliteConfig::file(path.clone()).flags(OpenFlags::create_read_write());
        let conn = SqliteConnection::open(&config).unwrap();
        conn.execute("CREATE TABLE test (id INTEGER)", &[]).unwrap();
        drop(conn);

        let config = SqliteConfig::file(path.clone())
            .flags(OpenFlags::read_only())
            .busy_timeout(100);
        let conn = SqliteConnection::open(&config).unwrap();

        // Reading should work
        let rows = conn.query("SELECT * FROM test", &[]).unwrap();
        assert_eq!(rows.len(), 0);

        // Writing should fail
        let err = conn.execute("INSERT INTO test VALUES (1)", &[]).unwrap_err();
        assert!(matches!(err, Error::Query(q) if q.kind == QueryErrorKind::Permission));

        drop(conn);
        let _ = std::fs::remove_file(&tmp);

        // Missing file without create fails
        let config = SqliteConfig::file(path).flags(OpenFlags::read_write());
        assert!(SqliteConnection::open(&config).is_err());
    }
}
