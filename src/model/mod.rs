//! Tabular data model: cells, canonical fields and tables.

pub mod field;
pub mod table;
pub mod value;

pub use field::Field;
pub use table::{Record, Table, TableError, TableResult};
pub use value::{Value, ValueKind};
