//! Entity manager base wrapped by the generated `DynamicEntityManager`.

use crate::runtime::connection::{Connection, QueryError};
use crate::runtime::entity::FromRow;
use crate::runtime::query::{Parameters, SelectQuery};
use std::sync::Arc;

/// Raw statement entry point sitting under the generated facades.
pub struct EntityManager {
    connection: Arc<dyn Connection>,
}

impl EntityManager {
    pub fn new(connection: Arc<dyn Connection>) -> Self {
        Self { connection }
    }

    pub fn connection(&self) -> &Arc<dyn Connection> {
        &self.connection
    }

    /// Lazy select over arbitrary SQL.
    pub fn select_query<T: FromRow>(&self, sql: impl Into<String>, parameters: Parameters) -> SelectQuery<T> {
        SelectQuery::new(Arc::clone(&self.connection), sql, parameters)
    }

    /// Run a statement without a result set, returning the affected row count.
    pub fn execute(&self, sql: &str, parameters: &Parameters) -> Result<u64, QueryError> {
        self.connection.execute(sql, parameters)
    }
}
