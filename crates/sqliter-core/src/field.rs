//! Field and column definitions.

use std::fmt;
use std::ops::BitOr;

use crate::types::SqlType;

/// Column attribute flags: primary key, unique and index.
///
/// The legacy attribute string form (`"PRIMARY KEY UNIQUE"`) is parsed with
/// [`ColumnFlags::parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ColumnFlags(u8);

impl ColumnFlags {
    pub const NONE: Self = Self(0);
    pub const PRIMARY_KEY: Self = Self(1);
    pub const UNIQUE: Self = Self(1 << 1);
    pub const INDEX: Self = Self(1 << 2);

    const ALL: u8 = 0b111;

    /// Build flags from raw bits; unknown bits are dropped.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & Self::ALL)
    }

    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Parse an attribute string such as `"PRIMARY KEY"` or `"unique, index"`.
    ///
    /// Tokens are case-insensitive and may be separated by whitespace or
    /// commas. Unknown tokens are rejected.
    ///
    /// ```
    /// use sqliter_core::ColumnFlags;
    ///
    /// let flags = ColumnFlags::parse("primary key INDEX").unwrap();
    /// assert!(flags.contains(ColumnFlags::PRIMARY_KEY));
    /// assert!(flags.contains(ColumnFlags::INDEX));
    /// assert!(ColumnFlags::parse("NOT NULL").is_err());
    /// ```
    pub fn parse(attr: &str) -> Result<Self, UnknownAttribute> {
        let mut flags = Self::NONE;
        let mut tokens = attr
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty());

        while let Some(token) = tokens.next() {
            match token.to_ascii_uppercase().as_str() {
                "PRIMARY" => match tokens.next() {
                    Some(next) if next.eq_ignore_ascii_case("KEY") => {
                        flags = flags.union(Self::PRIMARY_KEY);
                    }
                    _ => return Err(UnknownAttribute(token.to_string())),
                },
                "UNIQUE" => flags = flags.union(Self::UNIQUE),
                "INDEX" => flags = flags.union(Self::INDEX),
                _ => return Err(UnknownAttribute(token.to_string())),
            }
        }
        Ok(flags)
    }

    /// The attribute clause written after the column type in `CREATE TABLE`.
    ///
    /// The index flag contributes nothing here; indexes are separate statements.
    #[must_use]
    pub const fn column_clause(self) -> Option<&'static str> {
        match (
            self.contains(Self::PRIMARY_KEY),
            self.contains(Self::UNIQUE),
        ) {
            (true, true) => Some("PRIMARY KEY UNIQUE"),
            (true, false) => Some("PRIMARY KEY"),
            (false, true) => Some("UNIQUE"),
            (false, false) => None,
        }
    }
}

impl BitOr for ColumnFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl fmt::Display for ColumnFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::with_capacity(3);
        if self.contains(Self::PRIMARY_KEY) {
            parts.push("PRIMARY KEY");
        }
        if self.contains(Self::UNIQUE) {
            parts.push("UNIQUE");
        }
        if self.contains(Self::INDEX) {
            parts.push("INDEX");
        }
        write!(f, "{}", parts.join(" "))
    }
}

/// An attribute string token that is not a recognized column flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAttribute(pub String);

impl fmt::Display for UnknownAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown column attribute `{}` (expected PRIMARY KEY, UNIQUE or INDEX)",
            self.0
        )
    }
}

impl std::error::Error for UnknownAttribute {}

/// Metadata about a persisted record field.
///
/// Generated as a `const` table by `#[derive(Record)]`, one entry per field
/// that carries a column name, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldInfo {
    /// Rust field name
    pub name: &'static str,
    /// Database column name
    pub column_name: &'static str,
    /// Column category
    pub sql_type: SqlType,
    /// Declared Rust type, as written
    pub rust_type: &'static str,
    /// Primary key / unique / index flags
    pub flags: ColumnFlags,
}

impl FieldInfo {
    /// Create a new field info with no flags.
    pub const fn new(name: &'static str, column_name: &'static str, sql_type: SqlType) -> Self {
        Self {
            name,
            column_name,
            sql_type,
            rust_type: "",
            flags: ColumnFlags::NONE,
        }
    }

    /// Set the declared Rust type name.
    pub const fn rust_type(mut self, rust_type: &'static str) -> Self {
        self.rust_type = rust_type;
        self
    }

    /// Set the column flags.
    pub const fn flags(mut self, flags: ColumnFlags) -> Self {
        self.flags = flags;
        self
    }

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
