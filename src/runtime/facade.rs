//! Runtime bases of the generated `DynamicRepositories` and
//! `DynamicManagers` facades.
//!
//! Each accessor resolves its component once through the
//! [`ComponentRegistry`] and then keeps returning the same instance for the
//! lifetime of the facade.

use crate::runtime::cache::CacheResults;
use crate::runtime::connection::Connection;
use crate::runtime::manager::ManagerContext;
use crate::runtime::registry::ComponentRegistry;
use crate::runtime::repository::RepositoryContext;
use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

/// Per-facade memo of constructed components, keyed by component name.
///
/// Two threads racing on a first call may both construct; the first one
/// stored is the one every caller gets back.
#[derive(Default)]
pub struct ComponentMemo {
    slots: Mutex<HashMap<String, Box<dyn Any + Send + Sync>>>,
}

impl ComponentMemo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_init<T>(&self, name: &str, init: impl FnOnce() -> Arc<T>) -> Arc<T>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        if let Some(existing) = self.get::<T>(name) {
            return existing;
        }

        let created = init();
        let mut slots = self.lock();
        let slot = slots
            .entry(name.to_string())
            .or_insert_with(|| Box::new(Arc::clone(&created)) as Box<dyn Any + Send + Sync>);
        slot.downcast_ref::<Arc<T>>().cloned().unwrap_or(created)
    }

    pub fn get<T>(&self, name: &str) -> Option<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.lock().get(name)?.downcast_ref::<Arc<T>>().cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lock().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Box<dyn Any + Send + Sync>>> {
        self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Base of the generated repositories facade.
pub struct Repositories {
    connection: Arc<dyn Connection>,
    registry: Arc<ComponentRegistry>,
    cache: Option<CacheResults>,
    loaded: ComponentMemo,
}

impl Repositories {
    pub fn new(
        connection: Arc<dyn Connection>,
        registry: Arc<ComponentRegistry>,
        cache: Option<CacheResults>,
    ) -> Self {
        Self {
            connection,
            registry,
            cache,
            loaded: ComponentMemo::new(),
        }
    }

    pub fn connection(&self) -> &Arc<dyn Connection> {
        &self.connection
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    /// Memoised repository for `table_name`, resolved as `class`, then
    /// `default_class`, then `fallback`.
    pub fn load_and_get<T>(
        &self,
        class: &str,
        default_class: &str,
        table_name: &str,
        fallback: impl FnOnce(&RepositoryContext) -> Arc<T>,
    ) -> Arc<T>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.loaded.get_or_init(class, || {
            let context =
                RepositoryContext::new(Arc::clone(&self.connection), table_name, self.cache.clone());
            let resolution = self.registry.resolve(class, default_class, &context, fallback);
            tracing::debug!("Resolved repository {} ({})", class, resolution.source);
            resolution.component
        })
    }
}

/// Base of the generated managers facade; `M` is the owning entity manager.
pub struct Managers<M> {
    connection: Arc<dyn Connection>,
    registry: Arc<ComponentRegistry>,
    entity_manager: Weak<M>,
    loaded: ComponentMemo,
}

impl<M: Send + Sync + 'static> Managers<M> {
    pub fn new(
        connection: Arc<dyn Connection>,
        registry: Arc<ComponentRegistry>,
        entity_manager: Weak<M>,
    ) -> Self {
        Self {
            connection,
            registry,
            entity_manager,
            loaded: ComponentMemo::new(),
        }
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    /// The owning entity manager, if it is still alive.
    pub fn entity_manager(&self) -> Option<Arc<M>> {
        self.entity_manager.upgrade()
    }

    /// Memoised manager built over the repository returned by `repository`.
    pub fn load_and_get<R, T>(
        &self,
        class: &str,
        default_class: &str,
        repository: impl FnOnce() -> Arc<R>,
        fallback: impl FnOnce(&ManagerContext<R, M>) -> Arc<T>,
    ) -> Arc<T>
    where
        R: ?Sized + Send + Sync + 'static,
        T: ?Sized + Send + Sync + 'static,
    {
        self.loaded.get_or_init(class, || {
            let context = ManagerContext::new(
                Arc::clone(&self.connection),
                repository(),
                Weak::clone(&self.entity_manager),
            );
            let resolution = self.registry.resolve(class, default_class, &context, fallback);
            tracing::debug!("Resolved manager {} ({})", class, resolution.source);
            resolution.component
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_memo_returns_identical_instance() {
        let memo = ComponentMemo::new();
        let builds = AtomicUsize::new(0);

        let first: Arc<String> = memo.get_or_init("a", || {
            builds.fetch_add(1, Ordering::SeqCst);
            Arc::new("a".to_string())
        });
        let second: Arc<String> = memo.get_or_init("a", || {
            builds.fetch_add(1, Ordering::SeqCst);
            Arc::new("other".to_string())
        });

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(builds.load(Ordering::SeqCst), 1);
        assert_eq!(memo.len(), 1);
    }

    #[test]
    fn test_memo_keys_are_independent() {
        let memo = ComponentMemo::new();
        let a: Arc<u32> = memo.get_or_init("a", || Arc::new(1));
        let b: Arc<u32> = memo.get_or_init("b", || Arc::new(2));
        assert_eq!((*a, *b), (1, 2));
        assert!(memo.contains("a") && memo.contains("b"));
    }
}
