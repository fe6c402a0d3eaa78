/// Template for `dynamic_entity_manager.rs`

use super::{write_header, write_runtime_import, FacadeView};
use std::fmt::{self, Write};

pub fn render_dynamic_entity_manager(view: &FacadeView<'_>) -> Result<String, fmt::Error> {
    let namespaces = view.namespaces;
    let mut out = String::new();

    write_header(
        &mut out,
        "Entity manager wiring the connection, the repositories and the managers.",
    )?;
    write_runtime_import(&mut out, namespaces)?;
    writeln!(out, "use std::sync::{{Arc, Weak}};")?;
    for table in view.tables {
        writeln!(
            out,
            "use {}::{};",
            namespaces.default_manager_module(),
            table.manager_module
        )?;
        writeln!(
            out,
            "use {}::{};",
            namespaces.default_repository_module(),
            table.repository_module
        )?;
    }
    writeln!(
        out,
        "use {};",
        view.output_path("dynamic_managers::DynamicManagers")
    )?;
    writeln!(
        out,
        "use {};",
        view.output_path("dynamic_repositories::DynamicRepositories")
    )?;
    writeln!(out)?;

    writeln!(out, "/// Single entry point of the generated data-access layer.")?;
    writeln!(out, "pub struct DynamicEntityManager {{")?;
    writeln!(out, "    base: runtime::EntityManager,")?;
    writeln!(out, "    repositories: Arc<DynamicRepositories>,")?;
    writeln!(out, "    managers: DynamicManagers,")?;
    writeln!(out, "}}")?;
    writeln!(out)?;
    writeln!(out, "impl DynamicEntityManager {{")?;
    writeln!(out, "    pub fn new(")?;
    writeln!(out, "        connection: Arc<dyn runtime::Connection>,")?;
    writeln!(out, "        registry: runtime::ComponentRegistry,")?;
    writeln!(out, "        cache: Option<runtime::CacheResults>,")?;
    writeln!(out, "    ) -> Arc<Self> {{")?;
    writeln!(out, "        let registry = Arc::new(registry);")?;
    writeln!(out, "        Arc::new_cyclic(|this: &Weak<Self>| {{")?;
    writeln!(out, "            let repositories = Arc::new(DynamicRepositories::new(")?;
    writeln!(out, "                Arc::clone(&connection),")?;
    writeln!(out, "                Arc::clone(&registry),")?;
    writeln!(out, "                cache,")?;
    writeln!(out, "            ));")?;
    writeln!(out, "            let managers = DynamicManagers::new(")?;
    writeln!(out, "                Arc::clone(&connection),")?;
    writeln!(out, "                registry,")?;
    writeln!(out, "                Arc::clone(&repositories),")?;
    writeln!(out, "                Weak::clone(this),")?;
    writeln!(out, "            );")?;
    writeln!(out, "            Self {{")?;
    writeln!(out, "                base: runtime::EntityManager::new(connection),")?;
    writeln!(out, "                repositories,")?;
    writeln!(out, "                managers,")?;
    writeln!(out, "            }}")?;
    writeln!(out, "        }})")?;
    writeln!(out, "    }}")?;
    writeln!(out)?;
    writeln!(out, "    /// Registry holding every generated default.")?;
    writeln!(out, "    pub fn default_registry() -> runtime::ComponentRegistry {{")?;
    writeln!(out, "        let mut registry = runtime::ComponentRegistry::new();")?;
    writeln!(
        out,
        "        {}::register_defaults(&mut registry);",
        namespaces.default_repository_module()
    )?;
    writeln!(
        out,
        "        {}::register_defaults(&mut registry);",
        namespaces.default_manager_module()
    )?;
    writeln!(out, "        registry")?;
    writeln!(out, "    }}")?;
    writeln!(out)?;
    writeln!(out, "    /// Entity manager over the generated defaults, without overrides.")?;
    writeln!(out, "    pub fn with_defaults(")?;
    writeln!(out, "        connection: Arc<dyn runtime::Connection>,")?;
    writeln!(out, "        cache: Option<runtime::CacheResults>,")?;
    writeln!(out, "    ) -> Arc<Self> {{")?;
    writeln!(out, "        Self::new(connection, Self::default_registry(), cache)")?;
    writeln!(out, "    }}")?;
    writeln!(out)?;
    writeln!(out, "    pub fn base(&self) -> &runtime::EntityManager {{")?;
    writeln!(out, "        &self.base")?;
    writeln!(out, "    }}")?;
    writeln!(out)?;
    writeln!(out, "    pub fn connection(&self) -> &Arc<dyn runtime::Connection> {{")?;
    writeln!(out, "        self.base.connection()")?;
    writeln!(out, "    }}")?;
    writeln!(out)?;
    writeln!(out, "    pub fn repositories(&self) -> &DynamicRepositories {{")?;
    writeln!(out, "        &self.repositories")?;
    writeln!(out, "    }}")?;
    writeln!(out)?;
    writeln!(out, "    pub fn managers(&self) -> &DynamicManagers {{")?;
    writeln!(out, "        &self.managers")?;
    writeln!(out, "    }}")?;

    for table in view.tables {
        writeln!(out)?;
        writeln!(
            out,
            "    pub fn {}(&self) -> Arc<dyn {}::{}> {{",
            table.repository_accessor, table.repository_module, table.repository_trait
        )?;
        writeln!(out, "        self.repositories.{}()", table.repository_accessor)?;
        writeln!(out, "    }}")?;
        writeln!(out)?;
        writeln!(
            out,
            "    pub fn {}(&self) -> Arc<dyn {}::{}> {{",
            table.manager_accessor, table.manager_module, table.manager_trait
        )?;
        writeln!(out, "        self.managers.{}()", table.manager_accessor)?;
        writeln!(out, "    }}")?;
    }
    writeln!(out, "}}")?;

    Ok(out)
}
