//! Database connection trait.

use crate::Result;
use crate::row::Row;
use crate::value::Value;

/// Outcome of a mutating statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExecResult {
    /// Rows changed by the statement.
    pub rows_affected: u64,
    /// Rowid of the most recent successful insert on this connection.
    pub last_insert_id: i64,
}

/// A synchronous database connection.
///
/// Statements use `?` placeholders; `params` bind positionally.
///
/// # Example
///
/// ```rust,ignore
/// let rows = conn.query("SELECT db_a, db_b FROM teststruct WHERE db_a > ?", &[Value::Int(0)])?;
/// let done = conn.execute("DELETE FROM teststruct", &[])?;
/// println!("removed {}", done.rows_affected);
/// ```
#[allow(clippy::result_large_err)]
pub trait Connection: Send + Sync {
    /// Execute a query and return all rows.
    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>>;

    /// Execute a query and return the first row, if any.
    fn query_one(&self, sql: &str, params: &[Value]) -> Result<Option<Row>> {
        Ok(self.query(sql, params)?.into_iter().next())
    }

    /// Execute one or more statements (INSERT, UPDATE, DELETE, DDL).
    fn execute(&self, sql: &str, params: &[Value]) -> Result<ExecResult>;

    /// Release the underlying handle. Later calls fail.
    fn close(&mut self) -> Result<()>;
}
