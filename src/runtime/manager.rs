//! Manager base: eager counterparts of repositories.

use crate::runtime::connection::Connection;
use std::sync::{Arc, Weak};

/// Construction context of a manager: its repository and a weak
/// back-reference to the entity manager that owns it.
pub struct ManagerContext<R: ?Sized, M> {
    connection: Arc<dyn Connection>,
    repository: Arc<R>,
    entity_manager: Weak<M>,
}

impl<R: ?Sized, M> ManagerContext<R, M> {
    pub fn new(connection: Arc<dyn Connection>, repository: Arc<R>, entity_manager: Weak<M>) -> Self {
        Self {
            connection,
            repository,
            entity_manager,
        }
    }

    pub fn connection(&self) -> &Arc<dyn Connection> {
        &self.connection
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    /// The owning entity manager, if it is still alive.
    pub fn entity_manager(&self) -> Option<Arc<M>> {
        self.entity_manager.upgrade()
    }
}

impl<R: ?Sized, M> Clone for ManagerContext<R, M> {
    fn clone(&self) -> Self {
        Self {
            connection: Arc::clone(&self.connection),
            repository: Arc::clone(&self.repository),
            entity_manager: Weak::clone(&self.entity_manager),
        }
    }
}

/// Manager used when neither a user override nor a generated default is
/// registered for a table.
pub struct GenericManager<R: ?Sized, M> {
    context: ManagerContext<R, M>,
}

impl<R: ?Sized, M> GenericManager<R, M> {
    pub fn new(context: ManagerContext<R, M>) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &ManagerContext<R, M> {
        &self.context
    }

    pub fn repository(&self) -> &Arc<R> {
        self.context.repository()
    }
}
