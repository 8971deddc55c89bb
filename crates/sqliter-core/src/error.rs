//! Error types for sqliter operations.

use std::fmt;

use crate::value::Value;

/// The primary error type for all sqliter operations.
#[derive(Debug)]
pub enum Error {
    /// Opening the database failed
    Connection(ConnectionError),
    /// Statement preparation, binding or execution failed in the engine
    Query(QueryError),
    /// A result column could not be decoded into the requested Rust type
    Type(TypeError),
    /// A record type cannot be decomposed into a table
    UnsupportedType(UnsupportedTypeError),
    /// A single-row read matched nothing
    NotFound(NotFoundError),
    /// An upsert predicate matched more than one row
    AmbiguousUpsertTarget(AmbiguousUpsertTarget),
    /// An UPDATE has no key column and no caller predicate to pin it
    MissingKey(MissingKeyError),
}

#[derive(Debug)]
pub struct ConnectionError {
    pub kind: ConnectionErrorKind,
    pub path: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionErrorKind {
    /// The engine refused to open the file
    Connect,
    /// The path cannot be handed to the engine (interior NUL)
    InvalidPath,
    /// The handle was already closed
    Closed,
}

#[derive(Debug)]
pub struct QueryError {
    pub kind: QueryErrorKind,
    pub sql: Option<String>,
    pub message: String,
    /// Caller context (table, WHERE fragment, arguments) for read failures.
    pub detail: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryErrorKind {
    /// Syntax error in SQL, or SQL text the engine cannot accept
    Syntax,
    /// Constraint violation (unique, not null, primary key)
    Constraint,
    /// Table or column not found
    NotFound,
    /// Permission denied or read-only database
    Permission,
    /// Value too large for the engine
    DataTruncation,
    /// Database busy or locked
    Busy,
    /// Parameter binding failed (count or index mismatch)
    Bind,
    /// Interrupted by the engine
    Cancelled,
    /// Other database error
    Database,
}

#[derive(Debug)]
pub struct TypeError {
    pub expected: &'static str,
    pub actual: String,
    pub column: Option<String>,
}

#[derive(Debug)]
pub struct UnsupportedTypeError {
    /// Rust type that was offered as a record.
    pub type_name: &'static str,
    pub reason: String,
}

#[derive(Debug)]
pub struct NotFoundError {
    pub table: &'static str,
    pub where_clause: String,
    pub args: Vec<Value>,
}

#[derive(Debug)]
pub struct AmbiguousUpsertTarget {
    pub table: &'static str,
    pub where_clause: String,
    pub count: i64,
}

#[derive(Debug)]
pub struct MissingKeyError {
    pub table: &'static str,
}

impl Error {
    /// Build an `UnsupportedType` error for the given Rust type.
    pub fn unsupported<T: ?Sized>(reason: impl Into<String>) -> Self {
        Error::UnsupportedType(UnsupportedTypeError {
            type_name: std::any::type_name::<T>(),
            reason: reason.into(),
        })
    }

    /// Is this a "no matching row" error from a single-row read?
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    /// Is this a constraint violation reported by the engine?
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, Error::Query(q) if q.kind == QueryErrorKind::Constraint)
    }

    /// Get the SQL that caused this error, if available
    pub fn sql(&self) -> Option<&str> {
        match self {
            Error::Query(q) => q.sql.as_deref(),
            _ => None,
        }
    }

    /// Attach caller context to an engine error; other variants pass through.
    pub fn with_detail(self, detail: impl Into<String>) -> Self {
        match self {
            Error::Query(mut q) => {
                q.detail = Some(detail.into());
                Error::Query(q)
            }
            other => other,
        }
    }
}

/// Render bind arguments the way they appear in error messages.
pub fn render_args(args: &[Value]) -> String {
    serde_json::to_string(args).unwrap_or_else(|_| format!("{} argument(s)", args.len()))
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Connection(e) => write!(f, "Connection error: {}", e),
            Error::Query(e) => write!(f, "Query error: {}", e),
            Error::Type(e) => write!(f, "Type error: {}", e),
            Error::UnsupportedType(e) => write!(f, "Unsupported type: {}", e),
            Error::NotFound(e) => write!(f, "Not found: {}", e),
            Error::AmbiguousUpsertTarget(e) => write!(f, "Upsert refused: {}", e),
            Error::MissingKey(e) => write!(f, "Update refused: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl fmt::Display for ConnectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.path)
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(detail) = &self.detail {
            write!(f, " [{}]", detail)?;
        }
        if let Some(sql) = &self.sql {
            write!(f, " in `{}`", sql)?;
        }
        Ok(())
    }
}

impl fmt::Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(col) = &self.column {
            write!(
                f,
                "expected {} for column '{}', found {}",
                self.expected, col, self.actual
            )
        } else {
            write!(f, "expected {}, found {}", self.expected, self.actual)
        }
    }
}

impl fmt::Display for UnsupportedTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type `{}` {}", self.type_name, self.reason)
    }
}

impl fmt::Display for NotFoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "no {} row where '{}' with args {}",
            self.table,
            self.where_clause,
            render_args(&self.args)
        )
    }
}

impl fmt::Display for AmbiguousUpsertTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} existing {} rows match '{}'",
            self.count, self.table, self.where_clause
        )
    }
}

impl fmt::Display for MissingKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} has no primary key or unique column and no WHERE fragment was given",
            self.table
        )
    }
}

impl From<ConnectionError> for Error {
    fn from(err: ConnectionError) -> Self {
        Error::Connection(err)
    }
}

impl From<QueryError> for Error {
    fn from(err: QueryError) -> Self {
        Error::Query(err)
    }
}

impl From<TypeError> for Error {
    fn from(err: TypeError) -> Self {
        Error::Type(err)
    }
}

impl From<UnsupportedTypeError> for Error {
    fn from(err: UnsupportedTypeError) -> Self {
        Error::UnsupportedType(err)
    }
}

impl From<NotFoundError> for Error {
    fn from(err: NotFoundError) -> Self {
        Error::NotFound(err)
    }
}

impl From<AmbiguousUpsertTarget> for Error {
    fn from(err: AmbiguousUpsertTarget) -> Self {
        Error::AmbiguousUpsertTarget(err)
    }
}

/// Result type alias for sqliter operations.
pub type Result<T> = std::result::Result<T, Error>;
