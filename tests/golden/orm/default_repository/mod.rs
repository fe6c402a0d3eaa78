// @generated by repogen. Do not edit by hand.
//
// Generated default repositories, one module per table.

use repogen::runtime;
use std::sync::Arc;

pub mod users_repository;

/// Register every generated default repository.
pub fn register_defaults(registry: &mut runtime::ComponentRegistry) {
    registry.register_default(
        "crate::orm::default_repository::UsersRepository",
        |context: &runtime::RepositoryContext| {
            Arc::new(users_repository::DefaultUsersRepository::new(context))
                as Arc<dyn users_repository::UsersRepository>
        },
    );
}
