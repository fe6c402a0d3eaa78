//! Run-wide emission: the three facade units and the two default-layer
//! module indexes. Runs after every table has been emitted.

use crate::codegen::project_config::Namespaces;
use crate::codegen::table_emitter::{TableNames, DEFAULT_MANAGER_DIR, DEFAULT_REPOSITORY_DIR};
use crate::codegen::templates::{self, FacadeView};
use crate::codegen::types::{GeneratedUnit, UnitKind};
use indexmap::IndexMap;
use std::fmt;
use std::path::PathBuf;

pub const DYNAMIC_REPOSITORIES_FILE: &str = "dynamic_repositories.rs";
pub const DYNAMIC_MANAGERS_FILE: &str = "dynamic_managers.rs";
pub const DYNAMIC_ENTITY_MANAGER_FILE: &str = "dynamic_entity_manager.rs";

/// Groups of tables sharing a short alias, in first-seen order.
///
/// Aliases only appear inside single-table queries, so a shared alias is
/// harmless to the generated code but worth knowing about.
pub fn alias_collisions(tables: &[TableNames]) -> Vec<(String, Vec<String>)> {
    let mut by_alias: IndexMap<&str, Vec<String>> = IndexMap::new();
    for table in tables {
        by_alias
            .entry(table.alias.as_str())
            .or_default()
            .push(table.table_name.clone());
    }

    by_alias
        .into_iter()
        .filter(|(_, names)| names.len() > 1)
        .map(|(alias, names)| (alias.to_string(), names))
        .collect()
}

/// Render the run-wide units for `tables`, in emission order.
pub fn emit_facades(
    tables: &[TableNames],
    namespaces: &Namespaces,
) -> Result<Vec<GeneratedUnit>, fmt::Error> {
    for (alias, names) in alias_collisions(tables) {
        tracing::warn!(
            "Tables {} share the alias '{}'",
            names.join(", "),
            alias
        );
    }

    let view = FacadeView { tables, namespaces };
    let output = |item: &str| format!("{}::{}", namespaces.output, item);

    Ok(vec![
        GeneratedUnit {
            kind: UnitKind::RepositoryModule,
            name: namespaces.default_repository_module(),
            path: PathBuf::from(DEFAULT_REPOSITORY_DIR).join("mod.rs"),
            contents: templates::render_repository_module(&view)?,
        },
        GeneratedUnit {
            kind: UnitKind::ManagerModule,
            name: namespaces.default_manager_module(),
            path: PathBuf::from(DEFAULT_MANAGER_DIR).join("mod.rs"),
            contents: templates::render_manager_module(&view)?,
        },
        GeneratedUnit {
            kind: UnitKind::RepositoriesFacade,
            name: output("dynamic_repositories::DynamicRepositories"),
            path: PathBuf::from(DYNAMIC_REPOSITORIES_FILE),
            contents: templates::render_dynamic_repositories(&view)?,
        },
        GeneratedUnit {
            kind: UnitKind::ManagersFacade,
            name: output("dynamic_managers::DynamicManagers"),
            path: PathBuf::from(DYNAMIC_MANAGERS_FILE),
            contents: templates::render_dynamic_managers(&view)?,
        },
        GeneratedUnit {
            kind: UnitKind::EntityManager,
            name: output("dynamic_entity_manager::DynamicEntityManager"),
            path: PathBuf::from(DYNAMIC_ENTITY_MANAGER_FILE),
            contents: templates::render_dynamic_entity_manager(&view)?,
        },
    ])
}
