//! Record decomposition: turn a record (or just its type) into the ordered
//! field descriptors and table name the statement builders work from.
//!
//! Descriptors are rebuilt on every call and never cached.

use crate::Result;
use crate::error::Error;
use crate::field::ColumnFlags;
use crate::record::Record;
use crate::types::SqlType;
use crate::validate::check_identifier;
use crate::value::Value;

/// One persisted field of a decomposed record.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Column name
    pub key: &'static str,
    /// Value copied out of the record (`Null` for type-only decomposition)
    pub value: Value,
    pub sql_type: SqlType,
    /// Declared Rust type, for diagnostics
    pub rust_type: &'static str,
    pub flags: ColumnFlags,
}

impl FieldDescriptor {
    pub const fn is_primary_key(&self) -> bool {
        self.flags.contains(ColumnFlags::PRIMARY_KEY)
    }

    pub const fn is_unique(&self) -> bool {
        self.flags.contains(ColumnFlags::UNIQUE)
    }

    pub const fn is_indexed(&self) -> bool {
        self.flags.contains(ColumnFlags::INDEX)
    }
}

/// A record broken down into its table name and persisted fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Decomposed {
    pub table: &'static str,
    pub fields: Vec<FieldDescriptor>,
}

impl Decomposed {
    /// Column names in declaration order.
    pub fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.key)
    }

    /// Look up a field by column name.
    pub fn field(&self, key: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.key == key)
    }
}

/// Decompose a record instance.
///
/// References and boxes deref-coerce to the record: `decompose::<T>(&boxed)`.
#[allow(clippy::result_large_err)]
pub fn decompose<R: Record>(record: &R) -> Result<Decomposed> {
    let values = record.values();
    let fields = R::fields();
    if values.len() != fields.len() {
        return Err(Error::unsupported::<R>(format!(
            "produced {} values for {} fields",
            values.len(),
            fields.len()
        )));
    }
    build::<R>(values)
}

/// Decompose a record type without an instance.
///
/// Used for multi-row read targets, where no element exists yet. Every value
/// is `Null`.
#[allow(clippy::result_large_err)]
pub fn decompose_type<R: Record>() -> Result<Decomposed> {
    build::<R>(vec![Value::Null; R::fields().len()])
}

#[allow(clippy::result_large_err)]
fn build<R: Record>(values: Vec<Value>) -> Result<Decomposed> {
    check_identifier("table", R::TABLE_NAME)
        .map_err(|reason| Error::unsupported::<R>(reason))?;

    let fields = R::fields()
        .iter()
        .zip(values)
        .map(|(info, value)| {
            check_identifier("column", info.column_name)
                .map_err(|reason| Error::unsupported::<R>(reason))?;
            Ok(FieldDescriptor {
                key: info.column_name,
                value,
                sql_type: info.sql_type,
                rust_type: info.rust_type,
                flags: info.flags,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    tracing::trace!(table = R::TABLE_NAME, fields = fields.len(), "decomposed record");

    Ok(Decomposed {
        table: R::TABLE_NAME,
        fields,
    })
}
