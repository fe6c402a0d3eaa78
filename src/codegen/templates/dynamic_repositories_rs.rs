/// Template for `dynamic_repositories.rs`

use super::{write_header, write_runtime_import, FacadeView};
use std::fmt::{self, Write};

pub fn render_dynamic_repositories(view: &FacadeView<'_>) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write_header(
        &mut out,
        "Repositories facade: one memoized accessor per table.",
    )?;
    write_runtime_import(&mut out, view.namespaces)?;
    writeln!(out, "use std::sync::Arc;")?;
    for table in view.tables {
        writeln!(
            out,
            "use {}::{};",
            view.namespaces.default_repository_module(),
            table.repository_module
        )?;
    }
    writeln!(out)?;

    for table in view.tables {
        let prefix = table.const_prefix();
        writeln!(out, "/// Override name of the `{}` repository.", table.table_name)?;
        writeln!(
            out,
            "pub const {}_REPOSITORY_OVERRIDE: &str = \"{}\";",
            prefix, table.repository_override
        )?;
        writeln!(out, "/// Default name of the `{}` repository.", table.table_name)?;
        writeln!(
            out,
            "pub const {}_REPOSITORY_DEFAULT: &str = \"{}\";",
            prefix, table.repository_default
        )?;
        writeln!(out)?;
    }

    writeln!(out, "/// Resolves each repository once: user override, then generated default,")?;
    writeln!(out, "/// then the generic repository.")?;
    writeln!(out, "pub struct DynamicRepositories {{")?;
    writeln!(out, "    base: runtime::Repositories,")?;
    writeln!(out, "}}")?;
    writeln!(out)?;
    writeln!(out, "impl DynamicRepositories {{")?;
    writeln!(out, "    pub fn new(")?;
    writeln!(out, "        connection: Arc<dyn runtime::Connection>,")?;
    writeln!(out, "        registry: Arc<runtime::ComponentRegistry>,")?;
    writeln!(out, "        cache: Option<runtime::CacheResults>,")?;
    writeln!(out, "    ) -> Self {{")?;
    writeln!(out, "        Self {{")?;
    writeln!(
        out,
        "            base: runtime::Repositories::new(connection, registry, cache),"
    )?;
    writeln!(out, "        }}")?;
    writeln!(out, "    }}")?;
    writeln!(out)?;
    writeln!(out, "    pub fn base(&self) -> &runtime::Repositories {{")?;
    writeln!(out, "        &self.base")?;
    writeln!(out, "    }}")?;

    for table in view.tables {
        let prefix = table.const_prefix();
        let component = format!("dyn {}::{}", table.repository_module, table.repository_trait);

        writeln!(out)?;
        writeln!(out, "    /// Repository of table `{}`.", table.table_name)?;
        writeln!(
            out,
            "    pub fn {}(&self) -> Arc<{}> {{",
            table.repository_accessor, component
        )?;
        writeln!(out, "        self.base.load_and_get(")?;
        writeln!(out, "            {}_REPOSITORY_OVERRIDE,", prefix)?;
        writeln!(out, "            {}_REPOSITORY_DEFAULT,", prefix)?;
        writeln!(out, "            \"{}\",", table.table_name)?;
        writeln!(out, "            |context: &runtime::RepositoryContext| {{")?;
        writeln!(
            out,
            "                Arc::new(runtime::GenericRepository::<{}>::from_context(context))",
            table.entity_path
        )?;
        writeln!(out, "                    as Arc<{}>", component)?;
        writeln!(out, "            }},")?;
        writeln!(out, "        )")?;
        writeln!(out, "    }}")?;
    }
    writeln!(out, "}}")?;

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::project_config::Namespaces;
    use crate::codegen::table_emitter::TableNames;

    #[test]
    fn test_accessor_resolves_through_registry_names() {
        let namespaces = Namespaces {
            output: "app::orm".to_string(),
            user_repositories: "app::repository".to_string(),
            user_managers: "app::manager".to_string(),
            entities: "app::entity".to_string(),
            runtime_crate: "repogen".to_string(),
        };
        let tables = vec![TableNames::derive("user_accounts", &namespaces)];
        let code = render_dynamic_repositories(&FacadeView {
            tables: &tables,
            namespaces: &namespaces,
        })
        .unwrap();

        assert!(code.contains("use app::orm::default_repository::user_accounts_repository;\n"));
        assert!(code.contains(
            "pub const USER_ACCOUNTS_REPOSITORY_OVERRIDE: &str = \"app::repository::UserAccountsRepository\";"
        ));
        assert!(code.contains(
            "    pub fn get_user_accounts_repository(&self) -> Arc<dyn user_accounts_repository::UserAccountsRepository> {"
        ));
        assert!(code.contains("runtime::GenericRepository::<app::entity::UserAccounts>::from_context(context)"));
    }
}
