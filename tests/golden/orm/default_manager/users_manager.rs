// @generated by repogen. Do not edit by hand.
//
// Default manager of table `users`.

use repogen::runtime;
use std::sync::Arc;

/// Repository this manager delegates to.
pub type Repository = dyn crate::orm::default_repository::users_repository::UsersRepository;
/// Construction context handed to manager factories.
pub type Context = runtime::ManagerContext<Repository, crate::orm::dynamic_entity_manager::DynamicEntityManager>;

/// Eager finders of table `users`.
///
/// Each finder runs its repository query and returns every match.
/// Register an implementation as `crate::manager::UsersManager` to override them.
pub trait UsersManager: Send + Sync {
    fn repository(&self) -> &Arc<Repository>;

    /// Every row matching `findById(id, useNamedParameters)`.
    fn find_by_id(
        &self,
        id: i64,
        use_named_parameters: bool,
    ) -> Result<Vec<crate::entity::Users>, runtime::QueryError> {
        self.repository()
            .find_by_id(id, use_named_parameters)
            .select_query()
            .fetch_all()
    }

    /// Every row matching `findByEmail(email, useNamedParameters)`.
    fn find_by_email(
        &self,
        email: String,
        use_named_parameters: bool,
    ) -> Result<Vec<crate::entity::Users>, runtime::QueryError> {
        self.repository()
            .find_by_email(email, use_named_parameters)
            .select_query()
            .fetch_all()
    }
}

/// Generated default manager of table `users`.
pub struct DefaultUsersManager {
    context: Context,
}

impl DefaultUsersManager {
    pub fn new(context: &Context) -> Self {
        Self {
            context: context.clone(),
        }
    }

    pub fn context(&self) -> &Context {
        &self.context
    }
}

impl UsersManager for DefaultUsersManager {
    fn repository(&self) -> &Arc<Repository> {
        self.context.repository()
    }
}

impl UsersManager for runtime::GenericManager<Repository, crate::orm::dynamic_entity_manager::DynamicEntityManager> {
    fn repository(&self) -> &Arc<Repository> {
        self.context().repository()
    }
}
