//! Component registry for repository and manager overrides.
//!
//! Components are looked up by name through three layers: a user override,
//! a generated default, and finally a generic fallback supplied by the
//! caller. Resolution never fails with "not found".

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Factory building a component of type `T` from a construction context `C`.
pub type Factory<C, T> = Arc<dyn Fn(&C) -> Arc<T> + Send + Sync>;

type ErasedFactory = Box<dyn Any + Send + Sync>;

/// Which layer produced a resolved component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentSource {
    Override,
    Default,
    Fallback,
}

impl fmt::Display for ComponentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentSource::Override => write!(f, "override"),
            ComponentSource::Default => write!(f, "default"),
            ComponentSource::Fallback => write!(f, "fallback"),
        }
    }
}

/// A resolved component and the layer it came from.
pub struct Resolution<T: ?Sized> {
    pub component: Arc<T>,
    pub source: ComponentSource,
}

/// Strategy table mapping component names to factories.
#[derive(Default)]
pub struct ComponentRegistry {
    overrides: HashMap<String, ErasedFactory>,
    defaults: HashMap<String, ErasedFactory>,
}

impl ComponentRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user-authored component under `name`.
    ///
    /// # Example
    ///
    /// ```ignore
    /// registry.register_override(
    ///     "crate::repository::UsersRepository",
    ///     |ctx: &RepositoryContext| Arc::new(MyUsersRepository::new(ctx.repository())) as Arc<dyn UsersRepository>,
    /// );
    /// ```
    pub fn register_override<C, T, F>(&mut self, name: impl Into<String>, factory: F)
    where
        C: 'static,
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&C) -> Arc<T> + Send + Sync + 'static,
    {
        let factory: Factory<C, T> = Arc::new(factory);
        self.overrides.insert(name.into(), Box::new(factory));
    }

    /// Register the generated default component under `name`.
    pub fn register_default<C, T, F>(&mut self, name: impl Into<String>, factory: F)
    where
        C: 'static,
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&C) -> Arc<T> + Send + Sync + 'static,
    {
        let factory: Factory<C, T> = Arc::new(factory);
        self.defaults.insert(name.into(), Box::new(factory));
    }

    pub fn has_override(&self, name: &str) -> bool {
        self.overrides.contains_key(name)
    }

    pub fn has_default(&self, name: &str) -> bool {
        self.defaults.contains_key(name)
    }

    /// Resolve `name`, then `default_name`, then `fallback`.
    ///
    /// A factory registered for a different context or component type is
    /// skipped as if absent.
    pub fn resolve<C, T>(
        &self,
        name: &str,
        default_name: &str,
        context: &C,
        fallback: impl FnOnce(&C) -> Arc<T>,
    ) -> Resolution<T>
    where
        C: 'static,
        T: ?Sized + Send + Sync + 'static,
    {
        if let Some(factory) = Self::typed::<C, T>(&self.overrides, name) {
            return Resolution {
                component: factory(context),
                source: ComponentSource::Override,
            };
        }

        if let Some(factory) = Self::typed::<C, T>(&self.defaults, default_name) {
            return Resolution {
                component: factory(context),
                source: ComponentSource::Default,
            };
        }

        Resolution {
            component: fallback(context),
            source: ComponentSource::Fallback,
        }
    }

    fn typed<'a, C, T>(
        layer: &'a HashMap<String, ErasedFactory>,
        name: &str,
    ) -> Option<&'a Factory<C, T>>
    where
        C: 'static,
        T: ?Sized + Send + Sync + 'static,
    {
        let erased = layer.get(name)?;
        let factory = erased.downcast_ref::<Factory<C, T>>();
        if factory.is_none() {
            tracing::warn!(
                "Component '{}' is registered with a different type; ignoring it",
                name
            );
        }
        factory
    }
}

impl fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut overrides: Vec<_> = self.overrides.keys().collect();
        let mut defaults: Vec<_> = self.defaults.keys().collect();
        overrides.sort();
        defaults.sort();
        f.debug_struct("ComponentRegistry")
            .field("overrides", &overrides)
            .field("defaults", &defaults)
            .finish()
    }
}
