//! CREATE TABLE and CREATE INDEX statement builder.

use sqliter_core::error::UnsupportedTypeError;
use sqliter_core::{Decomposed, Error, Result};

/// Builder for `CREATE TABLE IF NOT EXISTS` and the companion index statements.
///
/// Both are idempotent; running them against an existing schema is a no-op.
#[derive(Debug)]
pub struct CreateTable<'a> {
    record: &'a Decomposed,
}

impl<'a> CreateTable<'a> {
    /// Create a new CREATE TABLE builder for the decomposed record.
    pub fn new(record: &'a Decomposed) -> Self {
        Self { record }
    }

    /// Build the CREATE TABLE SQL.
    ///
    /// Fails with `UnsupportedType` if any column has no SQL type.
    #[allow(clippy::result_large_err)]
    pub fn build(&self) -> Result<String> {
        let columns = self
            .record
            .fields
            .iter()
            .map(|field| {
                let sql_type = field.sql_type.sql_name().ok_or_else(|| {
                    Error::UnsupportedType(UnsupportedTypeError {
                        type_name: field.rust_type,
                        reason: format!(
                            "has no SQL column type (column `{}` of `{}`)",
                            field.key, self.record.table
                        ),
                    })
                })?;
                Ok(match field.flags.column_clause() {
                    Some(clause) => format!("{} {} {}", field.key, sql_type, clause),
                    None => format!("{} {}", field.key, sql_type),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(format!(
            "CREATE TABLE IF NOT EXISTS {} ({});",
            self.record.table,
            columns.join(", ")
        ))
    }

    /// Build one `CREATE INDEX IF NOT EXISTS` per indexed column, in field order.
    pub fn indexes(&self) -> Vec<String> {
        let table = self.record.table;
        self.record
            .fields
            .iter()
            .filter(|f| f.is_indexed())
            .map(|f| {
                format!(
                    "CREATE INDEX IF NOT EXISTS {table}_{col}_idx ON {table} ({col});",
                    col = f.key
                )
            })
            .collect()
    }
}
