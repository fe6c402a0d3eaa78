/// Template for `default_manager/<table>_manager.rs`

use super::{finder_params, write_header, write_runtime_import, write_signature, TableView};
use crate::codegen::finder::FinderSignature;
use std::fmt::{self, Write};

pub fn render_manager(view: &TableView<'_>) -> Result<String, fmt::Error> {
    let names = view.names;
    let namespaces = view.namespaces;
    let mut out = String::new();

    write_header(
        &mut out,
        &format!("Default manager of table `{}`.", names.table_name),
    )?;
    write_runtime_import(&mut out, namespaces)?;
    writeln!(out, "use std::sync::Arc;")?;
    writeln!(out)?;

    writeln!(out, "/// Repository this manager delegates to.")?;
    writeln!(
        out,
        "pub type Repository = dyn {}::{}::{};",
        namespaces.default_repository_module(),
        names.repository_module,
        names.repository_trait
    )?;
    writeln!(out, "/// Construction context handed to manager factories.")?;
    writeln!(
        out,
        "pub type Context = runtime::ManagerContext<Repository, {}::dynamic_entity_manager::DynamicEntityManager>;",
        namespaces.output
    )?;
    writeln!(out)?;

    writeln!(out, "/// Eager finders of table `{}`.", names.table_name)?;
    writeln!(out, "///")?;
    writeln!(
        out,
        "/// Each finder runs its repository query and returns every match."
    )?;
    writeln!(
        out,
        "/// Register an implementation as `{}` to override them.",
        names.manager_override
    )?;
    writeln!(out, "pub trait {}: Send + Sync {{", names.manager_trait)?;
    writeln!(out, "    fn repository(&self) -> &Arc<Repository>;")?;

    for finder in view.finders {
        writeln!(out)?;
        write_finder(&mut out, view, finder)?;
    }
    writeln!(out, "}}")?;
    writeln!(out)?;

    // Generated default
    writeln!(out, "/// Generated default manager of table `{}`.", names.table_name)?;
    writeln!(out, "pub struct {} {{", names.manager_struct)?;
    writeln!(out, "    context: Context,")?;
    writeln!(out, "}}")?;
    writeln!(out)?;
    writeln!(out, "impl {} {{", names.manager_struct)?;
    writeln!(out, "    pub fn new(context: &Context) -> Self {{")?;
    writeln!(out, "        Self {{")?;
    writeln!(out, "            context: context.clone(),")?;
    writeln!(out, "        }}")?;
    writeln!(out, "    }}")?;
    writeln!(out)?;
    writeln!(out, "    pub fn context(&self) -> &Context {{")?;
    writeln!(out, "        &self.context")?;
    writeln!(out, "    }}")?;
    writeln!(out, "}}")?;
    writeln!(out)?;
    writeln!(out, "impl {} for {} {{", names.manager_trait, names.manager_struct)?;
    writeln!(out, "    fn repository(&self) -> &Arc<Repository> {{")?;
    writeln!(out, "        self.context.repository()")?;
    writeln!(out, "    }}")?;
    writeln!(out, "}}")?;
    writeln!(out)?;

    // Generic fallback
    writeln!(
        out,
        "impl {} for runtime::GenericManager<Repository, {}::dynamic_entity_manager::DynamicEntityManager> {{",
        names.manager_trait, namespaces.output
    )?;
    writeln!(out, "    fn repository(&self) -> &Arc<Repository> {{")?;
    writeln!(out, "        self.context().repository()")?;
    writeln!(out, "    }}")?;
    writeln!(out, "}}")?;

    Ok(out)
}

fn write_finder(out: &mut String, view: &TableView<'_>, finder: &FinderSignature) -> fmt::Result {
    let params = finder_params(finder);
    let args: Vec<&str> = params.iter().map(|(ident, _)| ident.as_str()).collect();
    let method = finder.rust_method_name();

    writeln!(out, "    /// Every row matching `{}`.", finder)?;
    write_signature(
        out,
        "    ",
        &method,
        &params,
        &format!(
            "Result<Vec<{}>, runtime::QueryError>",
            view.names.entity_path
        ),
    )?;
    writeln!(out, "        self.repository()")?;
    writeln!(out, "            .{}({})", method, args.join(", "))?;
    writeln!(out, "            .select_query()")?;
    writeln!(out, "            .fetch_all()")?;
    writeln!(out, "    }}")
}
