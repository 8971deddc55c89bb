//! Statement builders for INSERT, UPDATE, SELECT, DELETE and COUNT.
//!
//! Every builder returns the SQL text and its positional bind values.

use crate::clause::Where;
use sqliter_core::{Decomposed, Error, FieldDescriptor, MissingKeyError, Result, Value};

/// INSERT statement builder.
///
/// Primary key columns are left out so the engine assigns them.
#[derive(Debug)]
pub struct InsertBuilder<'a> {
    record: &'a Decomposed,
}

impl<'a> InsertBuilder<'a> {
    /// Create a new INSERT builder for a decomposed record.
    pub fn new(record: &'a Decomposed) -> Self {
        Self { record }
    }

    /// Build the INSERT SQL and parameters.
    pub fn build(&self) -> (String, Vec<Value>) {
        let fields: Vec<_> = self
            .record
            .fields
            .iter()
            .filter(|f| !f.is_primary_key())
            .collect();

        let columns: Vec<_> = fields.iter().map(|f| f.key).collect();
        let placeholders = vec!["?"; fields.len()];
        let params = fields.iter().map(|f| f.value.clone()).collect();

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({});",
            self.record.table,
            columns.join(", "),
            placeholders.join(", ")
        );
        (sql, params)
    }
}

/// UPDATE statement builder.
///
/// The key column is the last field flagged primary key or unique; its current
/// value is written into the WHERE clause as a literal. Every key-eligible
/// column is left out of SET. A caller fragment narrows the target further.
#[derive(Debug)]
pub struct UpdateBuilder<'a> {
    record: &'a Decomposed,
    filter: Where<'a>,
    by_filter: bool,
}

impl<'a> UpdateBuilder<'a> {
    /// Create a new UPDATE builder for a decomposed record.
    pub fn new(record: &'a Decomposed) -> Self {
        Self {
            record,
            filter: Where::default(),
            by_filter: false,
        }
    }

    /// Narrow the update with a caller fragment and its arguments.
    pub fn filter(mut self, filter: Where<'a>) -> Self {
        self.filter = filter;
        self
    }

    /// Target exactly the rows the filter selects, leaving the key literal
    /// out of the WHERE clause.
    ///
    /// Key columns still stay out of SET. A blank filter targets every row.
    pub fn matched_by_filter(mut self) -> Self {
        self.by_filter = true;
        self
    }

    /// The column the update is keyed on, if any.
    pub fn key(&self) -> Option<&'a FieldDescriptor> {
        self.record.fields.iter().rev().find(|f| is_key_eligible(f))
    }

    /// Build the UPDATE SQL and parameters.
    ///
    /// Parameters are the SET values in column order, then the caller's
    /// arguments. Fails with `MissingKey` when there is neither a key column
    /// nor a fragment, since the statement would rewrite every row.
    #[allow(clippy::result_large_err)]
    pub fn build(&self) -> Result<(String, Vec<Value>)> {
        let set_fields: Vec<_> = self
            .record
            .fields
            .iter()
            .filter(|f| !is_key_eligible(f))
            .collect();

        let assignments: Vec<_> = set_fields.iter().map(|f| format!("{} = ?", f.key)).collect();
        let mut params: Vec<Value> = set_fields.iter().map(|f| f.value.clone()).collect();

        let mut sql = format!(
            "UPDATE {} SET {}",
            self.record.table,
            assignments.join(", ")
        );

        match (self.key(), self.filter.fragment()) {
            _ if self.by_filter => self.filter.push_to(&mut sql),
            (Some(key), Some(fragment)) => {
                sql.push_str(&format!(
                    " WHERE {} = {} AND ({})",
                    key.key,
                    key.value.to_sql_literal(),
                    fragment
                ));
            }
            (Some(key), None) => {
                sql.push_str(&format!(" WHERE {} = {}", key.key, key.value.to_sql_literal()));
            }
            (None, Some(_)) => {
                tracing::debug!(
                    table = self.record.table,
                    "no key column; update is narrowed by the caller fragment only"
                );
                self.filter.push_to(&mut sql);
            }
            (None, None) => {
                return Err(Error::MissingKey(MissingKeyError {
                    table: self.record.table,
                }));
            }
        }
        sql.push(';');

        params.extend_from_slice(self.filter.args());
        Ok((sql, params))
    }
}

fn is_key_eligible(field: &FieldDescriptor) -> bool {
    field.is_primary_key() || field.is_unique()
}

/// SELECT statement builder over every persisted column.
#[derive(Debug)]
pub struct SelectBuilder<'a> {
    record: &'a Decomposed,
    filter: Where<'a>,
}

impl<'a> SelectBuilder<'a> {
    /// Create a new SELECT builder for a decomposed record (or record type).
    pub fn new(record: &'a Decomposed) -> Self {
        Self {
            record,
            filter: Where::default(),
        }
    }

    /// Add a WHERE fragment. Ordering and limits ride along inside it.
    pub fn filter(mut self, filter: Where<'a>) -> Self {
        self.filter = filter;
        self
    }

    /// Build the SELECT SQL and parameters.
    pub fn build(&self) -> (String, Vec<Value>) {
        let columns: Vec<_> = self.record.columns().collect();
        let mut sql = format!("SELECT {} FROM {}", columns.join(","), self.record.table);
        self.filter.push_to(&mut sql);
        sql.push(';');
        (sql, self.filter.args().to_vec())
    }
}

/// DELETE statement builder.
#[derive(Debug)]
pub struct DeleteBuilder<'a> {
    table: &'a str,
    filter: Where<'a>,
}

impl<'a> DeleteBuilder<'a> {
    /// Create a new DELETE builder for a table.
    pub fn new(table: &'a str) -> Self {
        Self {
            table,
            filter: Where::default(),
        }
    }

    /// Add a WHERE fragment. Without one every row is deleted.
    pub fn filter(mut self, filter: Where<'a>) -> Self {
        self.filter = filter;
        self
    }

    /// Build the DELETE SQL and parameters.
    pub fn build(&self) -> (String, Vec<Value>) {
        let mut sql = format!("DELETE FROM {}", self.table);
        self.filter.push_to(&mut sql);
        sql.push(';');
        (sql, self.filter.args().to_vec())
    }
}

/// `SELECT COUNT(1)` builder, used to decide between insert and update.
#[derive(Debug)]
pub struct CountBuilder<'a> {
    table: &'a str,
    filter: Where<'a>,
}

impl<'a> CountBuilder<'a> {
    /// Create a new COUNT builder for a table.
    pub fn new(table: &'a str) -> Self {
        Self {
            table,
            filter: Where::default(),
        }
    }

    pub fn filter(mut self, filter: Where<'a>) -> Self {
        self.filter = filter;
        self
    }

    /// Build the COUNT SQL and parameters.
    pub fn build(&self) -> (String, Vec<Value>) {
        let mut sql = format!("SELECT COUNT(1) FROM {}", self.table);
        self.filter.push_to(&mut sql);
        sql.push(';');
        (sql, self.filter.args().to_vec())
    }
}
