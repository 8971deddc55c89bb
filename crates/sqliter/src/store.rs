//! The `Sqliter` handle: record operations over one lock-gated connection.
//!
//! Schema and write operations (create, insert, update, delete, raw execute)
//! hold the write side of the lock for the whole statement sequence. Reads and
//! counts share the read side. A poisoned lock is recovered: the connection
//! carries no invariant that a panicking caller could have broken halfway.

#![allow(clippy::result_large_err)] // Error type is defined in sqliter-core

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use sqliter_core::{
    AmbiguousUpsertTarget, Connection, Error, ExecResult, NotFoundError, Record, Result, Value,
    decompose, decompose_type, render_args,
};
use sqliter_query::{
    CountBuilder, CreateTable, DeleteBuilder, InsertBuilder, SelectBuilder, UpdateBuilder, Where,
};
use sqliter_sqlite::{IN_MEMORY, SqliteConfig, SqliteConnection};

/// What an upsert did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upserted {
    /// No row matched; a new one was inserted with this rowid.
    Inserted { id: i64 },
    /// Exactly one row matched and was updated.
    Updated { rows: u64 },
}

impl Upserted {
    /// The generated rowid when the upsert inserted.
    pub fn id(&self) -> Option<i64> {
        match self {
            Upserted::Inserted { id } => Some(*id),
            Upserted::Updated { .. } => None,
        }
    }
}

/// A database handle mapping `Record` types onto tables.
///
/// WHERE fragments are raw SQL with `?` placeholders, bound positionally from
/// `args`. An empty or whitespace fragment matches every row.
///
/// # Example
///
/// ```rust,ignore
/// let db = Sqliter::open("app.db")?;
/// db.create_table::<TestStruct>()?;
/// let id = db.insert(&TestStruct { a: 0, b: "b".into(), ..Default::default() })?;
/// let rows: Vec<TestStruct> = db.find_many("db_a > ?", &[Value::Int(0)])?;
/// ```
pub struct Sqliter<C: Connection = SqliteConnection> {
    conn: RwLock<C>,
}

impl Sqliter<SqliteConnection> {
    /// Path that opens a private in-memory database.
    pub const IN_MEMORY: &'static str = IN_MEMORY;

    /// Open (creating if needed) the database at `path`.
    pub fn open(path: impl Into<String>) -> Result<Self> {
        Self::open_with(&SqliteConfig::file(path))
    }

    /// Open a private in-memory database.
    pub fn open_memory() -> Result<Self> {
        Self::open_with(&SqliteConfig::memory())
    }

    /// Open with explicit flags and busy timeout.
    pub fn open_with(config: &SqliteConfig) -> Result<Self> {
        Ok(Self::new(SqliteConnection::open(config)?))
    }
}

impl<C: Connection> Sqliter<C> {
    /// Wrap an already open connection.
    pub fn new(conn: C) -> Self {
        Self {
            conn: RwLock::new(conn),
        }
    }

    /// Unwrap the connection.
    pub fn into_inner(self) -> C {
        self.conn.into_inner().unwrap_or_else(|e| e.into_inner())
    }

    fn read(&self) -> RwLockReadGuard<'_, C> {
        self.conn.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, C> {
        self.conn.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Close the connection once in-flight operations finish.
    ///
    /// Later operations fail with a connection error.
    pub fn close(&self) -> Result<()> {
        self.write().close()
    }

    /// Create the table for `R` and one index per indexed column.
    ///
    /// Statements run in order under one write lock and stop at the first
    /// failure; statements that already ran are not undone.
    #[tracing::instrument(level = "debug", skip_all, fields(table = R::TABLE_NAME))]
    pub fn create_table<R: Record>(&self) -> Result<()> {
        let record = decompose_type::<R>()?;
        let create = CreateTable::new(&record);
        let table = create.build()?;
        let indexes = create.indexes();

        let conn = self.write();
        conn.execute(&table, &[])?;
        for index in &indexes {
            conn.execute(index, &[])?;
        }
        tracing::debug!(indexes = indexes.len(), "table ready");
        Ok(())
    }

    /// Insert `record`, leaving primary key columns to the engine.
    ///
    /// Returns the new rowid.
    #[tracing::instrument(level = "debug", skip_all, fields(table = R::TABLE_NAME))]
    pub fn insert<R: Record>(&self, record: &R) -> Result<i64> {
        let record = decompose(record)?;
        let (sql, params) = InsertBuilder::new(&record).build();
        let done = self.write().execute(&sql, &params)?;
        Ok(done.last_insert_id)
    }

    /// Update the row identified by the record's key column.
    ///
    /// `fragment` narrows the target; with no key column it alone selects the
    /// rows. Returns the number of rows changed.
    #[tracing::instrument(level = "debug", skip_all, fields(table = R::TABLE_NAME, fragment = fragment))]
    pub fn update<R: Record>(&self, record: &R, fragment: &str, args: &[Value]) -> Result<u64> {
        let record = decompose(record)?;
        let (sql, params) = UpdateBuilder::new(&record)
            .filter(Where::new(fragment, args))
            .build()?;
        let done = self.write().execute(&sql, &params)?;
        Ok(done.rows_affected)
    }

    /// Insert `record` if `fragment` matches no row, update it if exactly one
    /// matches, refuse otherwise.
    ///
    /// The update targets the row the fragment counted, not the record's key
    /// literal, so records whose key the engine assigned still match. The
    /// count and the write take the lock separately, so a concurrent writer
    /// can change the outcome in between.
    #[tracing::instrument(level = "debug", skip_all, fields(table = R::TABLE_NAME, fragment = fragment))]
    pub fn upsert<R: Record>(
        &self,
        record: &R,
        fragment: &str,
        args: &[Value],
    ) -> Result<Upserted> {
        match self.count::<R>(fragment, args)? {
            0 => Ok(Upserted::Inserted {
                id: self.insert(record)?,
            }),
            1 => {
                let record = decompose(record)?;
                let (sql, params) = UpdateBuilder::new(&record)
                    .filter(Where::new(fragment, args))
                    .matched_by_filter()
                    .build()?;
                let rows = self.write().execute(&sql, &params)?.rows_affected;
                Ok(Upserted::Updated { rows })
            }
            count => {
                tracing::warn!(count, "upsert target is ambiguous");
                Err(Error::AmbiguousUpsertTarget(AmbiguousUpsertTarget {
                    table: R::TABLE_NAME,
                    where_clause: fragment.to_string(),
                    count,
                }))
            }
        }
    }

    /// Delete rows of `R`'s table matching `fragment`.
    pub fn delete<R: Record>(&self, fragment: &str, args: &[Value]) -> Result<u64> {
        self.delete_from(R::TABLE_NAME, fragment, args)
    }

    /// Delete rows of `table` matching `fragment`.
    ///
    /// The table name is spliced in verbatim.
    #[tracing::instrument(level = "debug", skip(self, args))]
    pub fn delete_from(&self, table: &str, fragment: &str, args: &[Value]) -> Result<u64> {
        let (sql, params) = DeleteBuilder::new(table)
            .filter(Where::new(fragment, args))
            .build();
        let done = self.write().execute(&sql, &params)?;
        Ok(done.rows_affected)
    }

    /// Run arbitrary SQL, possibly several `;`-separated statements, under the
    /// write lock.
    #[tracing::instrument(level = "debug", skip(self, args))]
    pub fn execute(&self, sql: &str, args: &[Value]) -> Result<ExecResult> {
        self.write().execute(sql, args)
    }

    /// Load the first row matching `fragment` into `out`.
    ///
    /// Fails with `Error::NotFound` when nothing matches; `out` is then left
    /// as it was.
    #[tracing::instrument(level = "debug", skip_all, fields(table = R::TABLE_NAME, fragment = fragment))]
    pub fn read_one<R: Record>(&self, out: &mut R, fragment: &str, args: &[Value]) -> Result<()> {
        let record = decompose_type::<R>()?;
        let (sql, params) = SelectBuilder::new(&record)
            .filter(Where::new(fragment, args))
            .build();

        let row = self
            .read()
            .query_one(&sql, &params)
            .map_err(|e| e.with_detail(read_context(R::TABLE_NAME, fragment, args)))?;

        match row {
            Some(row) => out.load_row(&row),
            None => Err(Error::NotFound(NotFoundError {
                table: R::TABLE_NAME,
                where_clause: fragment.to_string(),
                args: args.to_vec(),
            })),
        }
    }

    /// Append every row matching `fragment` to `out`.
    ///
    /// Nothing is appended when decoding any row fails.
    #[tracing::instrument(level = "debug", skip_all, fields(table = R::TABLE_NAME, fragment = fragment))]
    pub fn read_many<R: Record>(
        &self,
        out: &mut Vec<R>,
        fragment: &str,
        args: &[Value],
    ) -> Result<()> {
        let found = self.find_many::<R>(fragment, args)?;
        out.extend(found);
        Ok(())
    }

    /// The first row matching `fragment`, as an owned record.
    pub fn find_one<R: Record + Default>(&self, fragment: &str, args: &[Value]) -> Result<R> {
        let mut out = R::default();
        self.read_one(&mut out, fragment, args)?;
        Ok(out)
    }

    /// Every row matching `fragment`, as owned records.
    pub fn find_many<R: Record>(&self, fragment: &str, args: &[Value]) -> Result<Vec<R>> {
        let record = decompose_type::<R>()?;
        let (sql, params) = SelectBuilder::new(&record)
            .filter(Where::new(fragment, args))
            .build();

        let rows = self
            .read()
            .query(&sql, &params)
            .map_err(|e| e.with_detail(read_context(R::TABLE_NAME, fragment, args)))?;

        rows.iter().map(R::from_row).collect()
    }

    /// Number of rows of `R`'s table matching `fragment`.
    #[tracing::instrument(level = "debug", skip_all, fields(table = R::TABLE_NAME, fragment = fragment))]
    pub fn count<R: Record>(&self, fragment: &str, args: &[Value]) -> Result<i64> {
        let (sql, params) = CountBuilder::new(R::TABLE_NAME)
            .filter(Where::new(fragment, args))
            .build();

        let row = self.read().query_one(&sql, &params)?;
        match row {
            Some(row) => row.get_as::<i64>(0),
            None => Ok(0),
        }
    }
}

fn read_context(table: &str, fragment: &str, args: &[Value]) -> String {
    format!(
        "reading {} where '{}' with args {}",
        table,
        fragment,
        render_args(args)
    )
}
