//! SQL statement synthesis for sqliter.
//!
//! `sqliter-query` turns a [`Decomposed`](sqliter_core::Decomposed) record into
//! SQLite statement text plus positional bind values. Nothing here touches a
//! connection; the `sqliter` facade executes what these builders produce.
//!
//! Caller WHERE fragments are raw SQL spliced in verbatim. A fragment that is
//! empty or whitespace drops the `WHERE` keyword entirely.

pub mod builder;
pub mod clause;
pub mod create;

pub use builder::{CountBuilder, DeleteBuilder, InsertBuilder, SelectBuilder, UpdateBuilder};
pub use clause::Where;
pub use create::CreateTable;
