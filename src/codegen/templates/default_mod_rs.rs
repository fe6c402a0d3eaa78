/// Templates for `default_repository/mod.rs` and `default_manager/mod.rs`
///
/// Both declare one module per table and register the generated defaults
/// in a `ComponentRegistry` under their default names.

use super::{write_header, write_runtime_import, FacadeView};
use std::fmt::{self, Write};

pub fn render_repository_module(view: &FacadeView<'_>) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write_header(&mut out, "Generated default repositories, one module per table.")?;
    write_imports(&mut out, view)?;

    for table in view.tables {
        writeln!(out, "pub mod {};", table.repository_module)?;
    }
    if !view.tables.is_empty() {
        writeln!(out)?;
    }

    writeln!(out, "/// Register every generated default repository.")?;
    write_register_fn(&mut out, view)?;
    for table in view.tables {
        writeln!(out, "    registry.register_default(")?;
        writeln!(out, "        \"{}\",", table.repository_default)?;
        writeln!(out, "        |context: &runtime::RepositoryContext| {{")?;
        writeln!(
            out,
            "            Arc::new({}::{}::new(context))",
            table.repository_module, table.repository_struct
        )?;
        writeln!(
            out,
            "                as Arc<dyn {}::{}>",
            table.repository_module, table.repository_trait
        )?;
        writeln!(out, "        }},")?;
        writeln!(out, "    );")?;
    }
    writeln!(out, "}}")?;

    Ok(out)
}

pub fn render_manager_module(view: &FacadeView<'_>) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write_header(&mut out, "Generated default managers, one module per table.")?;
    write_imports(&mut out, view)?;

    for table in view.tables {
        writeln!(out, "pub mod {};", table.manager_module)?;
    }
    if !view.tables.is_empty() {
        writeln!(out)?;
    }

    writeln!(out, "/// Register every generated default manager.")?;
    write_register_fn(&mut out, view)?;
    for table in view.tables {
        writeln!(out, "    registry.register_default(")?;
        writeln!(out, "        \"{}\",", table.manager_default)?;
        writeln!(out, "        |context: &{}::Context| {{", table.manager_module)?;
        writeln!(
            out,
            "            Arc::new({}::{}::new(context))",
            table.manager_module, table.manager_struct
        )?;
        writeln!(
            out,
            "                as Arc<dyn {}::{}>",
            table.manager_module, table.manager_trait
        )?;
        writeln!(out, "        }},")?;
        writeln!(out, "    );")?;
    }
    writeln!(out, "}}")?;

    Ok(out)
}

fn write_imports(out: &mut String, view: &FacadeView<'_>) -> fmt::Result {
    write_runtime_import(out, view.namespaces)?;
    if !view.tables.is_empty() {
        writeln!(out, "use std::sync::Arc;")?;
    }
    writeln!(out)
}

fn write_register_fn(out: &mut String, view: &FacadeView<'_>) -> fmt::Result {
    let param = if view.tables.is_empty() {
        "_registry"
    } else {
        "registry"
    };
    writeln!(
        out,
        "pub fn register_defaults({}: &mut runtime::ComponentRegistry) {{",
        param
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::project_config::Namespaces;
    use crate::codegen::table_emitter::TableNames;

    fn namespaces() -> Namespaces {
        Namespaces {
            output: "crate::orm".to_string(),
            user_repositories: "crate::repository".to_string(),
            user_managers: "crate::manager".to_string(),
            entities: "crate::entity".to_string(),
            runtime_crate: "repogen".to_string(),
        }
    }

    #[test]
    fn test_repository_module_registers_defaults() {
        let namespaces = namespaces();
        let tables = vec![
            TableNames::derive("users", &namespaces),
            TableNames::derive("orders", &namespaces),
        ];
        let code = render_repository_module(&FacadeView {
            tables: &tables,
            namespaces: &namespaces,
        })
        .unwrap();

        assert!(code.contains("pub mod users_repository;\npub mod orders_repository;\n"));
        assert!(code.contains("\"crate::orm::default_repository::UsersRepository\","));
        assert!(code.contains("Arc::new(orders_repository::DefaultOrdersRepository::new(context))"));
    }

    #[test]
    fn test_manager_module_uses_context_alias() {
        let namespaces = namespaces();
        let tables = vec![TableNames::derive("users", &namespaces)];
        let code = render_manager_module(&FacadeView {
            tables: &tables,
            namespaces: &namespaces,
        })
        .unwrap();

        assert!(code.contains("|context: &users_manager::Context| {"));
        assert!(code.contains("as Arc<dyn users_manager::UsersManager>"));
    }

    #[test]
    fn test_empty_module() {
        let namespaces = namespaces();
        let code = render_repository_module(&FacadeView {
            tables: &[],
            namespaces: &namespaces,
        })
        .unwrap();

        assert!(code.contains("pub fn register_defaults(_registry: &mut runtime::ComponentRegistry) {\n}"));
        assert!(!code.contains("use std::sync::Arc;"));
    }
}
