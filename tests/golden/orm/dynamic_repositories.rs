// @generated by repogen. Do not edit by hand.
//
// Repositories facade: one memoized accessor per table.

use repogen::runtime;
use std::sync::Arc;
use crate::orm::default_repository::users_repository;

/// Override name of the `users` repository.
pub const USERS_REPOSITORY_OVERRIDE: &str = "crate::repository::UsersRepository";
/// Default name of the `users` repository.
pub const USERS_REPOSITORY_DEFAULT: &str = "crate::orm::default_repository::UsersRepository";

/// Resolves each repository once: user override, then generated default,
/// then the generic repository.
pub struct DynamicRepositories {
    base: runtime::Repositories,
}

impl DynamicRepositories {
    pub fn new(
        connection: Arc<dyn runtime::Connection>,
        registry: Arc<runtime::ComponentRegistry>,
        cache: Option<runtime::CacheResults>,
    ) -> Self {
        Self {
            base: runtime::Repositories::new(connection, registry, cache),
        }
    }

    pub fn base(&self) -> &runtime::Repositories {
        &self.base
    }

    /// Repository of table `users`.
    pub fn get_users_repository(&self) -> Arc<dyn users_repository::UsersRepository> {
        self.base.load_and_get(
            USERS_REPOSITORY_OVERRIDE,
            USERS_REPOSITORY_DEFAULT,
            "users",
            |context: &runtime::RepositoryContext| {
                Arc::new(runtime::GenericRepository::<crate::entity::Users>::from_context(context))
                    as Arc<dyn users_repository::UsersRepository>
            },
        )
    }
}
