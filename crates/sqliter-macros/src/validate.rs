//! Compile-time validation for the Record derive macro.
//!
//! Column and table names are spliced into SQL unquoted, so they are checked
//! here and reported at the offending literal.

use std::collections::HashSet;

use sqliter_core::validate::is_identifier;
use syn::Error;

use crate::parse::RecordDef;

/// Validate a parsed record definition, combining every problem found.
pub fn validate_record(record: &RecordDef) -> Result<(), Error> {
    let mut errors = Vec::new();

    if !is_identifier(&record.table_name) {
        errors.push(Error::new(
            record.name.span(),
            format!(
                "table name `{}` derived from the struct name is not a plain SQL identifier",
                record.table_name
            ),
        ));
    }

    let mut seen = HashSet::new();
    for (_, column) in record.persisted() {
        if !is_identifier(&column.name) {
            errors.push(Error::new(
                column.span,
                format!(
                    "column name `{}` must match [A-Za-z_][A-Za-z0-9_]*",
                    column.name
                ),
            ));
        }
        if !seen.insert(column.name.as_str()) {
            errors.push(Error::new(
                column.span,
                format!("duplicate column name `{}`", column.name),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        let mut combined = errors.remove(0);
        for err in errors {
            combined.combine(err);
        }
        Err(combined)
    }
}
