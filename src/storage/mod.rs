//! Row storage: the generic [`Row`] record and its SQLite read/write paths.

pub mod query;
pub mod row;

pub use query::{get, insert, query, set_bool, Field, RowQuery};
pub use row::Row;
