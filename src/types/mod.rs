//! Data types for tables and the table collection.

mod collection;
mod table;

pub use collection::*;
pub use table::*;
