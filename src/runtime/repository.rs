//! Repository base shared by generated and user-authored repositories.

use crate::runtime::cache::CacheResults;
use crate::runtime::connection::Connection;
use crate::runtime::entity::Entity;
use crate::runtime::query::QueryBuilder;
use std::marker::PhantomData;
use std::sync::Arc;

/// Everything a repository factory needs to build a repository.
#[derive(Clone)]
pub struct RepositoryContext {
    connection: Arc<dyn Connection>,
    table_name: String,
    cache: Option<CacheResults>,
}

impl RepositoryContext {
    pub fn new(
        connection: Arc<dyn Connection>,
        table_name: impl Into<String>,
        cache: Option<CacheResults>,
    ) -> Self {
        Self {
            connection,
            table_name: table_name.into(),
            cache,
        }
    }

    pub fn connection(&self) -> &Arc<dyn Connection> {
        &self.connection
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn cache(&self) -> Option<&CacheResults> {
        self.cache.as_ref()
    }

    /// Typed repository base for entity `E`.
    pub fn repository<E: Entity>(&self) -> EntityRepository<E> {
        EntityRepository::new(self)
    }
}

/// Typed base of every repository: knows its table and how to start a query.
pub struct EntityRepository<E> {
    connection: Arc<dyn Connection>,
    table_name: String,
    cache: Option<CacheResults>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> EntityRepository<E> {
    pub fn new(context: &RepositoryContext) -> Self {
        Self {
            connection: Arc::clone(&context.connection),
            table_name: context.table_name.clone(),
            cache: context.cache.clone(),
            _entity: PhantomData,
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn connection(&self) -> &Arc<dyn Connection> {
        &self.connection
    }

    pub fn cache(&self) -> Option<&CacheResults> {
        self.cache.as_ref()
    }

    /// Start a select over this repository's table under `alias`.
    pub fn create_query_builder(&self, alias: &str) -> QueryBuilder<E> {
        QueryBuilder::new(Arc::clone(&self.connection), self.table_name.clone(), alias)
            .with_cache(self.cache.clone())
    }
}

impl<E> Clone for EntityRepository<E> {
    fn clone(&self) -> Self {
        Self {
            connection: Arc::clone(&self.connection),
            table_name: self.table_name.clone(),
            cache: self.cache.clone(),
            _entity: PhantomData,
        }
    }
}

/// Repository used when neither a user override nor a generated default
/// is registered for a table.
pub struct GenericRepository<E> {
    base: EntityRepository<E>,
}

impl<E: Entity> GenericRepository<E> {
    pub fn new(base: EntityRepository<E>) -> Self {
        Self { base }
    }

    pub fn from_context(context: &RepositoryContext) -> Self {
        Self::new(context.repository())
    }

    pub fn base(&self) -> &EntityRepository<E> {
        &self.base
    }
}
