pub mod catalog;
pub mod resolve;
pub mod types;

pub use catalog::{build_columns_query, parse_column_line};
pub use resolve::{ColumnLookup, LookupError, SchemaResolver};
pub use types::TableIdent;
