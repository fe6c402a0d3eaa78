//! Query builder handles returned by generated finders.
//!
//! A [`QueryBuilder`] only describes a select; nothing reaches the
//! connection until one of the fetch methods of its [`SelectQuery`] runs.

use crate::runtime::cache::CacheResults;
use crate::runtime::connection::{Connection, QueryError};
use crate::runtime::entity::FromRow;
use crate::runtime::value::{Row, SqlValue};
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Values bound to a statement, either by position (`?`) or by name (`:name`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Parameters {
    Positional(Vec<SqlValue>),
    Named(IndexMap<String, SqlValue>),
}

impl Parameters {
    pub fn positional<I>(values: I) -> Self
    where
        I: IntoIterator<Item = SqlValue>,
    {
        Parameters::Positional(values.into_iter().collect())
    }

    pub fn named<K, I>(values: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, SqlValue)>,
    {
        Parameters::Named(values.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn len(&self) -> usize {
        match self {
            Parameters::Positional(values) => values.len(),
            Parameters::Named(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_named(&self) -> bool {
        matches!(self, Parameters::Named(_))
    }

    /// Bound values in binding order, whatever the placeholder style.
    pub fn values(&self) -> Vec<&SqlValue> {
        match self {
            Parameters::Positional(values) => values.iter().collect(),
            Parameters::Named(values) => values.values().collect(),
        }
    }
}

impl Default for Parameters {
    fn default() -> Self {
        Parameters::Positional(Vec::new())
    }
}

/// Select over a single aliased table, filtered by a WHERE fragment.
pub struct QueryBuilder<T> {
    connection: Arc<dyn Connection>,
    table_name: String,
    alias: String,
    where_clause: Option<String>,
    parameters: Parameters,
    cache: Option<CacheResults>,
    use_cache: bool,
    _row: PhantomData<fn() -> T>,
}

impl<T: FromRow> QueryBuilder<T> {
    pub fn new(
        connection: Arc<dyn Connection>,
        table_name: impl Into<String>,
        alias: impl Into<String>,
    ) -> Self {
        Self {
            connection,
            table_name: table_name.into(),
            alias: alias.into(),
            where_clause: None,
            parameters: Parameters::default(),
            cache: None,
            use_cache: false,
            _row: PhantomData,
        }
    }

    /// Attach the cache front; results are only cached once `use_cache(true)` is set.
    pub fn with_cache(mut self, cache: Option<CacheResults>) -> Self {
        self.cache = cache;
        self
    }

    pub fn where_clause(&mut self, clause: impl Into<String>) -> &mut Self {
        self.where_clause = Some(clause.into());
        self
    }

    /// Narrow the current WHERE fragment with another conjunct.
    pub fn and_where(&mut self, clause: impl Into<String>) -> &mut Self {
        let clause = clause.into();
        self.where_clause = Some(match self.where_clause.take() {
            Some(existing) => format!("{} AND {}", existing, clause),
            None => clause,
        });
        self
    }

    pub fn set_parameters(&mut self, parameters: Parameters) -> &mut Self {
        self.parameters = parameters;
        self
    }

    pub fn use_cache(&mut self, enabled: bool) -> &mut Self {
        self.use_cache = enabled;
        self
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn where_fragment(&self) -> Option<&str> {
        self.where_clause.as_deref()
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn sql(&self) -> String {
        let mut sql = format!(
            "SELECT {alias}.* FROM {table} {alias}",
            alias = self.alias,
            table = self.table_name
        );
        if let Some(clause) = &self.where_clause {
            sql.push_str(" WHERE ");
            sql.push_str(clause);
        }
        sql
    }

    /// Freeze the builder into an executable, not yet executed, select.
    pub fn select_query(&self) -> SelectQuery<T> {
        SelectQuery {
            connection: Arc::clone(&self.connection),
            table_name: self.table_name.clone(),
            sql: self.sql(),
            parameters: self.parameters.clone(),
            cache: if self.use_cache { self.cache.clone() } else { None },
            _row: PhantomData,
        }
    }
}

impl<T> fmt::Debug for QueryBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryBuilder")
            .field("table_name", &self.table_name)
            .field("alias", &self.alias)
            .field("where_clause", &self.where_clause)
            .field("parameters", &self.parameters)
            .field("use_cache", &self.use_cache)
            .finish()
    }
}

/// An executable select. Every fetch re-runs the statement unless the
/// result set is served from cache.
pub struct SelectQuery<T> {
    connection: Arc<dyn Connection>,
    table_name: String,
    sql: String,
    parameters: Parameters,
    cache: Option<CacheResults>,
    _row: PhantomData<fn() -> T>,
}

impl<T: FromRow> SelectQuery<T> {
    pub fn new(connection: Arc<dyn Connection>, sql: impl Into<String>, parameters: Parameters) -> Self {
        Self {
            connection,
            table_name: String::new(),
            sql: sql.into(),
            parameters,
            cache: None,
            _row: PhantomData,
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Raw rows, bypassing entity materialisation.
    pub fn fetch_rows(&self) -> Result<Vec<Row>, QueryError> {
        let Some(cache) = &self.cache else {
            return self.connection.fetch_all(&self.sql, &self.parameters);
        };

        let lookup = cache.lookup_query(&self.table_name, &self.sql, &self.parameters);
        if let Some(rows) = lookup.rows {
            tracing::debug!("Cache hit for {}", lookup.key);
            return Ok(rows);
        }

        let rows = self.connection.fetch_all(&self.sql, &self.parameters)?;
        cache.store(&lookup.key, &rows);
        Ok(rows)
    }

    pub fn fetch_all(&self) -> Result<Vec<T>, QueryError> {
        self.fetch_rows()?.into_iter().map(T::from_row).collect()
    }

    pub fn fetch_one(&self) -> Result<Option<T>, QueryError> {
        self.fetch_rows()?.into_iter().next().map(T::from_row).transpose()
    }

    /// First column of the first row.
    pub fn fetch_single_scalar(&self) -> Result<Option<SqlValue>, QueryError> {
        Ok(self
            .fetch_rows()?
            .into_iter()
            .next()
            .and_then(|row| row.into_iter().next().map(|(_, value)| value)))
    }
}
