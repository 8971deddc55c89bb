//! WHERE clause handling.

use sqliter_core::Value;

/// A caller-supplied WHERE fragment and its bind arguments.
///
/// The fragment is never parsed. Its `?` placeholders bind to `args` after any
/// values the statement itself binds.
#[derive(Debug, Clone, Copy, Default)]
pub struct Where<'a> {
    fragment: &'a str,
    args: &'a [Value],
}

impl<'a> Where<'a> {
    /// Create a WHERE clause from a raw fragment and its arguments.
    pub fn new(fragment: &'a str, args: &'a [Value]) -> Self {
        Self { fragment, args }
    }

    /// The fragment, or `None` if it is empty or only whitespace.
    pub fn fragment(&self) -> Option<&'a str> {
        if self.fragment.trim().is_empty() {
            None
        } else {
            Some(self.fragment)
        }
    }

    pub fn args(&self) -> &'a [Value] {
        self.args
    }

    /// Append ` WHERE <fragment>` to `sql` unless the fragment is blank.
    pub fn push_to(&self, sql: &mut String) {
        if let Some(fragment) = self.fragment() {
            sql.push_str(" WHERE ");
            sql.push_str(fragment);
        }
    }
}
