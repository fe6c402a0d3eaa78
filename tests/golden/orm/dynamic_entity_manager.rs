// @generated by repogen. Do not edit by hand.
//
// Entity manager wiring the connection, the repositories and the managers.

use repogen::runtime;
use std::sync::{Arc, Weak};
use crate::orm::default_manager::users_manager;
use crate::orm::default_repository::users_repository;
use crate::orm::dynamic_managers::DynamicManagers;
use crate::orm::dynamic_repositories::DynamicRepositories;

/// Single entry point of the generated data-access layer.
pub struct DynamicEntityManager {
    base: runtime::EntityManager,
    repositories: Arc<DynamicRepositories>,
    managers: DynamicManagers,
}

impl DynamicEntityManager {
    pub fn new(
        connection: Arc<dyn runtime::Connection>,
        registry: runtime::ComponentRegistry,
        cache: Option<runtime::CacheResults>,
    ) -> Arc<Self> {
        let registry = Arc::new(registry);
        Arc::new_cyclic(|this: &Weak<Self>| {
            let repositories = Arc::new(DynamicRepositories::new(
                Arc::clone(&connection),
                Arc::clone(&registry),
                cache,
            ));
            let managers = DynamicManagers::new(
                Arc::clone(&connection),
                registry,
                Arc::clone(&repositories),
                Weak::clone(this),
            );
            Self {
                base: runtime::EntityManager::new(connection),
                repositories,
                managers,
            }
        })
    }

    /// Registry holding every generated default.
    pub fn default_registry() -> runtime::ComponentRegistry {
        let mut registry = runtime::ComponentRegistry::new();
        crate::orm::default_repository::register_defaults(&mut registry);
        crate::orm::default_manager::register_defaults(&mut registry);
        registry
    }

    /// Entity manager over the generated defaults, without overrides.
    pub fn with_defaults(
        connection: Arc<dyn runtime::Connection>,
        cache: Option<runtime::CacheResults>,
    ) -> Arc<Self> {
        Self::new(connection, Self::default_registry(), cache)
    }

    pub fn base(&self) -> &runtime::EntityManager {
        &self.base
    }

    pub fn connection(&self) -> &Arc<dyn runtime::Connection> {
        self.base.connection()
    }

    pub fn repositories(&self) -> &DynamicRepositories {
        &self.repositories
    }

    pub fn managers(&self) -> &DynamicManagers {
        &self.managers
    }

    pub fn get_users_repository(&self) -> Arc<dyn users_repository::UsersRepository> {
        self.repositories.get_users_repository()
    }

    pub fn get_users_manager(&self) -> Arc<dyn users_manager::UsersManager> {
        self.managers.get_users_manager()
    }
}
