//! Per-table emission: one repository unit and one manager unit.

use crate::codegen::finder::{synthesize_table, FinderSet};
use crate::codegen::project_config::Namespaces;
use crate::codegen::templates::{self, TableView};
use crate::codegen::types::{GeneratedUnit, TableStructure, UnitKind};
use crate::codegen::utils::{rust_ident, snake_to_pascal, table_alias};
use std::fmt;
use std::path::PathBuf;

/// Generator-owned subdirectory holding per-table repositories
pub const DEFAULT_REPOSITORY_DIR: &str = "default_repository";
/// Generator-owned subdirectory holding per-table managers
pub const DEFAULT_MANAGER_DIR: &str = "default_manager";

/// Every name derived from a table name.
///
/// All of them come from the table name alone, so user overrides can be
/// found by convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableNames {
    pub table_name: String,
    /// `UserAccounts`
    pub entity: String,
    /// `crate::entity::UserAccounts`
    pub entity_path: String,
    /// `user_accounts`
    pub module: String,
    /// `ua`
    pub alias: String,
    pub repository_trait: String,
    pub repository_struct: String,
    pub repository_module: String,
    pub repository_accessor: String,
    pub manager_trait: String,
    pub manager_struct: String,
    pub manager_module: String,
    pub manager_accessor: String,
    /// Registry name of a user repository override
    pub repository_override: String,
    /// Registry name of the generated default repository
    pub repository_default: String,
    pub manager_override: String,
    pub manager_default: String,
}

impl TableNames {
    pub fn derive(table_name: &str, namespaces: &Namespaces) -> Self {
        let mut entity = snake_to_pascal(table_name);
        if entity.starts_with(|c: char| c.is_ascii_digit()) {
            entity.insert(0, '_');
        }
        let module = rust_ident(table_name).trim_start_matches("r#").to_string();

        let repository_trait = format!("{}Repository", entity);
        let manager_trait = format!("{}Manager", entity);

        Self {
            table_name: table_name.to_string(),
            entity_path: format!("{}::{}", namespaces.entities, entity),
            alias: table_alias(table_name),
            repository_struct: format!("Default{}", repository_trait),
            repository_module: format!("{}_repository", module),
            repository_accessor: format!("get_{}_repository", module),
            manager_struct: format!("Default{}", manager_trait),
            manager_module: format!("{}_manager", module),
            manager_accessor: format!("get_{}_manager", module),
            repository_override: format!("{}::{}", namespaces.user_repositories, repository_trait),
            repository_default: format!(
                "{}::{}",
                namespaces.default_repository_module(),
                repository_trait
            ),
            manager_override: format!("{}::{}", namespaces.user_managers, manager_trait),
            manager_default: format!("{}::{}", namespaces.default_manager_module(), manager_trait),
            repository_trait,
            manager_trait,
            module,
            entity,
        }
    }

    /// Prefix of the facade constants naming this table's components
    pub fn const_prefix(&self) -> String {
        self.module.to_uppercase()
    }

    pub fn repository_path(&self) -> PathBuf {
        PathBuf::from(DEFAULT_REPOSITORY_DIR).join(format!("{}.rs", self.repository_module))
    }

    pub fn manager_path(&self) -> PathBuf {
        PathBuf::from(DEFAULT_MANAGER_DIR).join(format!("{}.rs", self.manager_module))
    }
}

/// Rendered units and synthesis results of one table
#[derive(Debug, Clone)]
pub struct TableUnits {
    pub names: TableNames,
    pub finders: FinderSet,
    pub repository: GeneratedUnit,
    pub manager: GeneratedUnit,
}

/// Synthesize the finders of `table` and render its two units.
pub fn emit_table(
    table_name: &str,
    table: &TableStructure,
    namespaces: &Namespaces,
) -> Result<TableUnits, fmt::Error> {
    let names = TableNames::derive(table_name, namespaces);
    let finders = synthesize_table(table_name, table);

    tracing::debug!(
        "Table '{}': {} finder(s), {} skipped index(es), {} duplicate(s)",
        table_name,
        finders.signatures.len(),
        finders.skipped_indexes,
        finders.duplicate_finders
    );

    let view = TableView {
        names: &names,
        finders: &finders.signatures,
        namespaces,
    };
    let repository = GeneratedUnit {
        kind: UnitKind::Repository,
        name: names.repository_default.clone(),
        path: names.repository_path(),
        contents: templates::render_repository(&view)?,
    };
    let manager = GeneratedUnit {
        kind: UnitKind::Manager,
        name: names.manager_default.clone(),
        path: names.manager_path(),
        contents: templates::render_manager(&view)?,
    };

    Ok(TableUnits {
        names,
        finders,
        repository,
        manager,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::types::{ColumnDef, ColumnType, IndexColumnRef};

    fn namespaces() -> Namespaces {
        Namespaces {
            output: "crate::orm".to_string(),
            user_repositories: "crate::repository".to_string(),
            user_managers: "crate::manager".to_string(),
            entities: "crate::entity".to_string(),
            runtime_crate: "repogen".to_string(),
        }
    }

    fn user_accounts() -> TableStructure {
        let mut table = TableStructure::default();
        table.columns.insert("id".to_string(), ColumnDef::new(ColumnType::Int));
        table.columns.insert("last_name".to_string(), ColumnDef::new(ColumnType::String));
        table.columns.insert("first_name".to_string(), ColumnDef::new(ColumnType::String));
        table.indexes = vec![
            vec![IndexColumnRef::new("user_accounts", "id", false)],
            vec![
                IndexColumnRef::new("user_accounts", "last_name", false),
                IndexColumnRef::new("user_accounts", "first_name", false),
            ],
            vec![],
        ];
        table
    }

    #[test]
    fn test_derived_names() {
        let names = TableNames::derive("user_accounts", &namespaces());

        assert_eq!(names.entity, "UserAccounts");
        assert_eq!(names.entity_path, "crate::entity::UserAccounts");
        assert_eq!(names.alias, "ua");
        assert_eq!(names.repository_trait, "UserAccountsRepository");
        assert_eq!(names.repository_struct, "DefaultUserAccountsRepository");
        assert_eq!(names.manager_accessor, "get_user_accounts_manager");
        assert_eq!(names.repository_override, "crate::repository::UserAccountsRepository");
        assert_eq!(
            names.repository_default,
            "crate::orm::default_repository::UserAccountsRepository"
        );
        assert_eq!(names.manager_override, "crate::manager::UserAccountsManager");
        assert_eq!(names.const_prefix(), "USER_ACCOUNTS");
        assert_eq!(
            names.repository_path(),
            PathBuf::from("default_repository/user_accounts_repository.rs")
        );
    }

    #[test]
    fn test_keyword_and_digit_tables() {
        let names = TableNames::derive("type", &namespaces());
        assert_eq!(names.module, "type");
        assert_eq!(names.repository_module, "type_repository");

        let names = TableNames::derive("2024_sales", &namespaces());
        assert_eq!(names.entity, "_2024Sales");
        assert_eq!(names.module, "_2024_sales");
        assert_eq!(names.const_prefix(), "_2024_SALES");
    }

    #[test]
    fn test_emit_table_units() {
        let units = emit_table("user_accounts", &user_accounts(), &namespaces()).unwrap();

        assert_eq!(units.finders.signatures.len(), 2);
        assert_eq!(units.finders.skipped_indexes, 1);
        assert_eq!(units.repository.kind, UnitKind::Repository);
        assert!(units.repository.kind.is_default_layer());
        assert!(units
            .repository
            .contents
            .contains("fn find_by_last_name_and_first_name("));
        assert!(units.manager.contents.contains("pub trait UserAccountsManager"));
    }
}
