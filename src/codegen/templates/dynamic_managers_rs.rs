/// Template for `dynamic_managers.rs`

use super::{write_header, write_runtime_import, FacadeView};
use std::fmt::{self, Write};

pub fn render_dynamic_managers(view: &FacadeView<'_>) -> Result<String, fmt::Error> {
    let owner = view.output_path("dynamic_entity_manager::DynamicEntityManager");
    let mut out = String::new();

    write_header(&mut out, "Managers facade: one memoized accessor per table.")?;
    write_runtime_import(&mut out, view.namespaces)?;
    writeln!(out, "use std::sync::{{Arc, Weak}};")?;
    for table in view.tables {
        writeln!(
            out,
            "use {}::{};",
            view.namespaces.default_manager_module(),
            table.manager_module
        )?;
    }
    writeln!(out, "use {};", owner)?;
    writeln!(
        out,
        "use {};",
        view.output_path("dynamic_repositories::DynamicRepositories")
    )?;
    writeln!(out)?;

    for table in view.tables {
        let prefix = table.const_prefix();
        writeln!(out, "/// Override name of the `{}` manager.", table.table_name)?;
        writeln!(
            out,
            "pub const {}_MANAGER_OVERRIDE: &str = \"{}\";",
            prefix, table.manager_override
        )?;
        writeln!(out, "/// Default name of the `{}` manager.", table.table_name)?;
        writeln!(
            out,
            "pub const {}_MANAGER_DEFAULT: &str = \"{}\";",
            prefix, table.manager_default
        )?;
        writeln!(out)?;
    }

    writeln!(out, "/// Resolves each manager once over its table's repository.")?;
    writeln!(out, "///")?;
    writeln!(out, "/// Managers keep a weak back-reference to the owning entity manager.")?;
    writeln!(out, "pub struct DynamicManagers {{")?;
    writeln!(out, "    base: runtime::Managers<DynamicEntityManager>,")?;
    writeln!(out, "    repositories: Arc<DynamicRepositories>,")?;
    writeln!(out, "}}")?;
    writeln!(out)?;
    writeln!(out, "impl DynamicManagers {{")?;
    writeln!(out, "    pub fn new(")?;
    writeln!(out, "        connection: Arc<dyn runtime::Connection>,")?;
    writeln!(out, "        registry: Arc<runtime::ComponentRegistry>,")?;
    writeln!(out, "        repositories: Arc<DynamicRepositories>,")?;
    writeln!(out, "        entity_manager: Weak<DynamicEntityManager>,")?;
    writeln!(out, "    ) -> Self {{")?;
    writeln!(out, "        Self {{")?;
    writeln!(
        out,
        "            base: runtime::Managers::new(connection, registry, entity_manager),"
    )?;
    writeln!(out, "            repositories,")?;
    writeln!(out, "        }}")?;
    writeln!(out, "    }}")?;
    writeln!(out)?;
    writeln!(out, "    pub fn base(&self) -> &runtime::Managers<DynamicEntityManager> {{")?;
    writeln!(out, "        &self.base")?;
    writeln!(out, "    }}")?;
    writeln!(out)?;
    writeln!(out, "    pub fn repositories(&self) -> &DynamicRepositories {{")?;
    writeln!(out, "        &self.repositories")?;
    writeln!(out, "    }}")?;
    writeln!(out)?;
    writeln!(out, "    /// The owning entity manager, if it is still alive.")?;
    writeln!(
        out,
        "    pub fn entity_manager(&self) -> Option<Arc<DynamicEntityManager>> {{"
    )?;
    writeln!(out, "        self.base.entity_manager()")?;
    writeln!(out, "    }}")?;

    for table in view.tables {
        let prefix = table.const_prefix();
        let component = format!("dyn {}::{}", table.manager_module, table.manager_trait);

        writeln!(out)?;
        writeln!(out, "    /// Manager of table `{}`.", table.table_name)?;
        writeln!(
            out,
            "    pub fn {}(&self) -> Arc<{}> {{",
            table.manager_accessor, component
        )?;
        writeln!(out, "        self.base.load_and_get(")?;
        writeln!(out, "            {}_MANAGER_OVERRIDE,", prefix)?;
        writeln!(out, "            {}_MANAGER_DEFAULT,", prefix)?;
        writeln!(
            out,
            "            || self.repositories.{}(),",
            table.repository_accessor
        )?;
        writeln!(
            out,
            "            |context: &{}::Context| {{",
            table.manager_module
        )?;
        writeln!(
            out,
            "                Arc::new(runtime::GenericManager::new(context.clone())) as Arc<{}>",
            component
        )?;
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
    fn test_manager_accessor_uses_repository_accessor() {
        let namespaces = Namespaces {
            output: "crate::orm".to_string(),
            user_repositories: "crate::repository".to_string(),
            user_managers: "crate::manager".to_string(),
            entities: "crate::entity".to_string(),
            runtime_crate: "repogen".to_string(),
        };
        let tables = vec![TableNames::derive("users", &namespaces)];
        let code = render_dynamic_managers(&FacadeView {
            tables: &tables,
            namespaces: &namespaces,
        })
        .unwrap();

        assert!(code.contains("use crate::orm::dynamic_entity_manager::DynamicEntityManager;\n"));
        assert!(code.contains("pub const USERS_MANAGER_OVERRIDE: &str = \"crate::manager::UsersManager\";"));
        assert!(code.contains("            || self.repositories.get_users_repository(),\n"));
        assert!(code.contains("|context: &users_manager::Context| {"));
    }
}
