//! Database access seam consumed by generated repositories and managers.
//!
//! The driver itself lives outside this crate; anything that can prepare,
//! execute and fetch can sit behind [`Connection`].

use crate::runtime::query::Parameters;
use crate::runtime::value::Row;

/// Failure reported by the underlying driver.
///
/// Query errors are not retried; callers that need retries implement them
/// above this layer.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("query failed with driver error {code}: {message}")]
pub struct QueryError {
    pub code: i64,
    pub message: String,
}

impl QueryError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// A live database connection.
///
/// `fetch_all` prepares `sql`, binds `parameters` (positional `?` or named
/// `:name` placeholders) and returns every row. `execute` does the same for
/// statements without a result set and returns the affected row count.
pub trait Connection: Send + Sync {
    fn fetch_all(&self, sql: &str, parameters: &Parameters) -> Result<Vec<Row>, QueryError>;

    fn execute(&self, sql: &str, parameters: &Parameters) -> Result<u64, QueryError>;
}
