//! Identifier checks applied during decomposition.
//!
//! Table and column names are spliced into SQL text unquoted, so they must be
//! plain identifiers.

use std::sync::OnceLock;

use regex::Regex;

const IDENTIFIER_PATTERN: &str = r"^[A-Za-z_][A-Za-z0-9_]*$";

fn identifier_regex() -> Option<&'static Regex> {
    static IDENTIFIER: OnceLock<Option<Regex>> = OnceLock::new();
    IDENTIFIER
        .get_or_init(|| match Regex::new(IDENTIFIER_PATTERN) {
            Ok(re) => Some(re),
            Err(e) => {
                tracing::error!(pattern = IDENTIFIER_PATTERN, error = %e, "identifier pattern failed to compile");
                None
            }
        })
        .as_ref()
}

/// Check whether `name` is a bare SQL identifier (`[A-Za-z_][A-Za-z0-9_]*`).
///
/// ```
/// use sqliter_core::validate::is_identifier;
///
/// assert!(is_identifier("db_a"));
/// assert!(!is_identifier("1st"));
/// assert!(!is_identifier("a; DROP TABLE t"));
/// ```
#[must_use]
pub fn is_identifier(name: &str) -> bool {
    match identifier_regex() {
        Some(re) => re.is_match(name),
        None => {
            !name.is_empty()
                && name
                    .chars()
                    .next()
                    .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
                && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
    }
}

/// Validate a table or column name, describing the problem on failure.
pub fn check_identifier(kind: &str, name: &str) -> Result<(), String> {
    if name.is_empty() {
        Err(format!("has an empty {kind} name"))
    } else if is_identifier(name) {
        Ok(())
    } else {
        Err(format!("has an invalid {kind} name `{name}`"))
    }
}
