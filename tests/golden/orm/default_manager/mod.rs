// @generated by repogen. Do not edit by hand.
//
// Generated default managers, one module per table.

use repogen::runtime;
use std::sync::Arc;

pub mod users_manager;

/// Register every generated default manager.
pub fn register_defaults(registry: &mut runtime::ComponentRegistry) {
    registry.register_default(
        "crate::orm::default_manager::UsersManager",
        |context: &users_manager::Context| {
            Arc::new(users_manager::DefaultUsersManager::new(context))
                as Arc<dyn users_manager::UsersManager>
        },
    );
}
