//! The `Record` trait: a Rust struct mapped onto one table.

use crate::Result;
use crate::field::FieldInfo;
use crate::row::Row;
use crate::value::Value;

/// A struct whose annotated fields are persisted as table columns.
///
/// Normally implemented with `#[derive(Record)]`:
///
/// ```ignore
/// #[derive(Record, Default)]
/// struct TestStruct {
///     #[sqliter(column = "db_a", primary_key)]
///     a: i32,
///     #[sqliter(column = "db_b")]
///     b: String,
///     scratch: Vec<u8>, // no column: not persisted
/// }
/// ```
///
/// `FIELDS` and `values()` must line up one-to-one, in declaration order.
pub trait Record: Sized {
    /// Table name: the struct's name, lower-cased.
    const TABLE_NAME: &'static str;

    /// Metadata for every persisted field, in declaration order.
    const FIELDS: &'static [FieldInfo];

    /// Metadata for every persisted field, in declaration order.
    fn fields() -> &'static [FieldInfo] {
        Self::FIELDS
    }

    /// Current value of every persisted field, in the order of `FIELDS`.
    fn values(&self) -> Vec<Value>;

    /// Construct a record from a result row.
    ///
    /// Fields without a column take their `Default` value.
    #[allow(clippy::result_large_err)]
    fn from_row(row: &Row) -> Result<Self>;

    /// Overwrite the persisted fields of `self` from a result row.
    ///
    /// Fields without a column are left untouched by the derived impl.
    #[allow(clippy::result_large_err)]
    fn load_row(&mut self, row: &Row) -> Result<()> {
        *self = Self::from_row(row)?;
        Ok(())
    }
}
