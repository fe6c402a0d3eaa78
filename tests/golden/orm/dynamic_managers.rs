// @generated by repogen. Do not edit by hand.
//
// Managers facade: one memoized accessor per table.

use repogen::runtime;
use std::sync::{Arc, Weak};
use crate::orm::default_manager::users_manager;
use crate::orm::dynamic_entity_manager::DynamicEntityManager;
use crate::orm::dynamic_repositories::DynamicRepositories;

/// Override name of the `users` manager.
pub const USERS_MANAGER_OVERRIDE: &str = "crate::manager::UsersManager";
/// Default name of the `users` manager.
pub const USERS_MANAGER_DEFAULT: &str = "crate::orm::default_manager::UsersManager";

/// Resolves each manager once over its table's repository.
///
/// Managers keep a weak back-reference to the owning entity manager.
pub struct DynamicManagers {
    base: runtime::Managers<DynamicEntityManager>,
    repositories: Arc<DynamicRepositories>,
}

impl DynamicManagers {
    pub fn new(
        connection: Arc<dyn runtime::Connection>,
        registry: Arc<runtime::ComponentRegistry>,
        repositories: Arc<DynamicRepositories>,
        entity_manager: Weak<DynamicEntityManager>,
    ) -> Self {
        Self {
            base: runtime::Managers::new(connection, registry, entity_manager),
            repositories,
        }
    }

    pub fn base(&self) -> &runtime::Managers<DynamicEntityManager> {
        &self.base
    }

    pub fn repositories(&self) -> &DynamicRepositories {
        &self.repositories
    }

    /// The owning entity manager, if it is still alive.
    pub fn entity_manager(&self) -> Option<Arc<DynamicEntityManager>> {
        self.base.entity_manager()
    }

    /// Manager of table `users`.
    pub fn get_users_manager(&self) -> Arc<dyn users_manager::UsersManager> {
        self.base.load_and_get(
            USERS_MANAGER_OVERRIDE,
            USERS_MANAGER_DEFAULT,
            || self.repositories.get_users_repository(),
            |context: &users_manager::Context| {
                Arc::new(runtime::GenericManager::new(context.clone())) as Arc<dyn users_manager::UsersManager>
            },
        )
    }
}
