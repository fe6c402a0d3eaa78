//! Entity contract consumed by generated code.

use crate::runtime::connection::QueryError;
use crate::runtime::value::{Row, SqlValue};

/// Materialise a fetched row.
pub trait FromRow: Sized {
    fn from_row(row: Row) -> Result<Self, QueryError>;
}

impl FromRow for Row {
    fn from_row(row: Row) -> Result<Self, QueryError> {
        Ok(row)
    }
}

/// A table-backed value object.
///
/// Field population and dirty tracking belong to the implementing type;
/// the runtime only needs the table identity and the primary key.
pub trait Entity: FromRow + Send + Sync + 'static {
    const TABLE_NAME: &'static str;
    const PRIMARY_KEYS: &'static [&'static str];

    /// Primary key values in `PRIMARY_KEYS` order.
    fn extract_primary_key_values(&self) -> Vec<SqlValue>;
}
