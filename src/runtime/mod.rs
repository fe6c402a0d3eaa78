//! Runtime support for generated data-access code.
//!
//! Generated repositories, managers and facades compile against this
//! module. The database driver and the cache store stay outside the crate,
//! behind the [`Connection`] and [`CacheStore`] traits.

pub mod value;
pub mod connection;
pub mod entity;
pub mod query;
pub mod cache;
pub mod registry;
pub mod repository;
pub mod manager;
pub mod facade;
pub mod entity_manager;

// Re-export key types
pub use value::{Row, SqlValue};
pub use connection::{Connection, QueryError};
pub use entity::{Entity, FromRow};
pub use query::{Parameters, QueryBuilder, SelectQuery};
pub use cache::{entity_key, query_key, CacheLookup, CacheResults, CacheStore, MemoryCacheStore};
pub use registry::{ComponentRegistry, ComponentSource, Factory, Resolution};
pub use repository::{EntityRepository, GenericRepository, RepositoryContext};
pub use manager::{GenericManager, ManagerContext};
pub use facade::{ComponentMemo, Managers, Repositories};
pub use entity_manager::EntityManager;

// Generated finders over date columns take chrono values.
pub use chrono::{NaiveDate, NaiveDateTime};
