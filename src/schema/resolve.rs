// src/schema/resolve.rs

use std::fmt;
use tracing::{debug, instrument, warn};

use super::types::TableIdent;

/// Why a table's target columns could not be determined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// The target has no columns for this table.
    NotFound,
    /// The lookup tool failed or produced output we could not read.
    QueryFailed(String),
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupError::NotFound => write!(f, "table not found in target"),
            LookupError::QueryFailed(msg) => write!(f, "column lookup failed: {}", msg),
        }
    }
}

impl std::error::Error for LookupError {}

/// Source of truth for a table's current columns in the target database.
pub trait ColumnLookup {
    /// Ordered column names of `table`, by ordinal position.
    fn lookup_columns(&self, table: &TableIdent) -> Result<Vec<String>, LookupError>;
}

impl<L: ColumnLookup + ?Sized> ColumnLookup for &L {
    fn lookup_columns(&self, table: &TableIdent) -> Result<Vec<String>, LookupError> {
        (**self).lookup_columns(table)
    }
}

/// Pass-through over a [`ColumnLookup`]: no caching, one call per header.
pub struct SchemaResolver<L> {
    lookup: L,
}

impl<L: ColumnLookup> SchemaResolver<L> {
    pub fn new(lookup: L) -> Self {
        Self { lookup }
    }

    /// Resolve `table` to its target columns.
    ///
    /// An empty column list is reported as [`LookupError::NotFound`], so
    /// `Ok` always carries at least one column. Failures are logged here.
    #[instrument(level = "debug", skip(self), fields(table = %table))]
    pub fn resolve(&self, table: &TableIdent) -> Result<Vec<String>, LookupError> {
        match self.lookup.lookup_columns(table) {
            Ok(cols) if cols.is_empty() => {
                debug!(schema = %table.schema, name = %table.table, "no columns in target");
                Err(LookupError::NotFound)
            }
            Ok(cols) => {
                debug!(columns = cols.len(), "resolved target columns");
                Ok(cols)
            }
            Err(LookupError::NotFound) => {
                debug!(schema = %table.schema, name = %table.table, "no columns in target");
                Err(LookupError::NotFound)
            }
            Err(err) => {
                warn!(table = %table, error = %err, "column lookup failed");
                Err(err)
            }
        }
    }
}
