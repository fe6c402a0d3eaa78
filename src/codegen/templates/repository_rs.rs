/// Template for `default_repository/<table>_repository.rs`

use super::{bind_expression, finder_params, write_header, write_runtime_import, write_signature, TableView};
use crate::codegen::finder::{BindingStyle, FinderSignature, FINDER_LOCAL};
use crate::codegen::utils::escape_rust_string;
use std::fmt::{self, Write};

pub fn render_repository(view: &TableView<'_>) -> Result<String, fmt::Error> {
    let names = view.names;
    let entity = &names.entity_path;
    let mut out = String::new();

    write_header(
        &mut out,
        &format!("Default repository of table `{}`.", names.table_name),
    )?;
    write_runtime_import(&mut out, view.namespaces)?;
    writeln!(out)?;

    // Trait carrying the finders as default methods
    writeln!(out, "/// Finders of table `{}`.", names.table_name)?;
    writeln!(out, "///")?;
    writeln!(
        out,
        "/// Finders only build queries; nothing runs until the returned builder is fetched."
    )?;
    writeln!(
        out,
        "/// Register an implementation as `{}` to override them.",
        names.repository_override
    )?;
    writeln!(out, "pub trait {}: Send + Sync {{", names.repository_trait)?;
    writeln!(
        out,
        "    fn entity_repository(&self) -> &runtime::EntityRepository<{}>;",
        entity
    )?;

    for finder in view.finders {
        writeln!(out)?;
        write_finder(&mut out, view, finder)?;
    }
    writeln!(out, "}}")?;
    writeln!(out)?;

    // Generated default
    writeln!(out, "/// Generated default repository of table `{}`.", names.table_name)?;
    writeln!(out, "pub struct {} {{", names.repository_struct)?;
    writeln!(out, "    base: runtime::EntityRepository<{}>,", entity)?;
    writeln!(out, "}}")?;
    writeln!(out)?;
    writeln!(out, "impl {} {{", names.repository_struct)?;
    writeln!(out, "    pub fn new(context: &runtime::RepositoryContext) -> Self {{")?;
    writeln!(out, "        Self {{")?;
    writeln!(out, "            base: context.repository(),")?;
    writeln!(out, "        }}")?;
    writeln!(out, "    }}")?;
    writeln!(out, "}}")?;
    writeln!(out)?;
    writeln!(out, "impl {} for {} {{", names.repository_trait, names.repository_struct)?;
    writeln!(
        out,
        "    fn entity_repository(&self) -> &runtime::EntityRepository<{}> {{",
        entity
    )?;
    writeln!(out, "        &self.base")?;
    writeln!(out, "    }}")?;
    writeln!(out, "}}")?;
    writeln!(out)?;

    // Generic fallback
    writeln!(
        out,
        "impl {} for runtime::GenericRepository<{}> {{",
        names.repository_trait, entity
    )?;
    writeln!(
        out,
        "    fn entity_repository(&self) -> &runtime::EntityRepository<{}> {{",
        entity
    )?;
    writeln!(out, "        self.base()")?;
    writeln!(out, "    }}")?;
    writeln!(out, "}}")?;

    Ok(out)
}

fn write_finder(out: &mut String, view: &TableView<'_>, finder: &FinderSignature) -> fmt::Result {
    let params = finder_params(finder);
    let idents: Vec<&str> = params.iter().map(|(ident, _)| ident.as_str()).collect();
    let flag = idents.last().copied().unwrap_or("use_named_parameters");

    writeln!(out, "    /// `{}`", finder)?;
    write_signature(
        out,
        "    ",
        &finder.rust_method_name(),
        &params,
        &format!("runtime::QueryBuilder<{}>", view.names.entity_path),
    )?;
    writeln!(
        out,
        "        let mut {} = self.entity_repository().create_query_builder(\"{}\");",
        FINDER_LOCAL,
        escape_rust_string(&finder.table_alias)
    )?;
    writeln!(out, "        if {} {{", flag)?;
    write_binding(out, finder, &idents, BindingStyle::Named)?;
    writeln!(out, "        }} else {{")?;
    write_binding(out, finder, &idents, BindingStyle::Positional)?;
    writeln!(out, "        }}")?;
    writeln!(out, "        {}", FINDER_LOCAL)?;
    writeln!(out, "    }}")
}

fn write_binding(
    out: &mut String,
    finder: &FinderSignature,
    idents: &[&str],
    style: BindingStyle,
) -> fmt::Result {
    writeln!(out, "            {}", FINDER_LOCAL)?;
    writeln!(
        out,
        "                .where_clause(\"{}\")",
        escape_rust_string(&finder.where_fragment(style))
    )?;

    let constructor = match style {
        BindingStyle::Named => "named",
        BindingStyle::Positional => "positional",
    };
    writeln!(
        out,
        "                .set_parameters(runtime::Parameters::{}([",
        constructor
    )?;
    for binding in finder.bindings(style) {
        let param = &finder.parameters[binding.parameter];
        let value = bind_expression(param, idents[binding.parameter]);
        match &binding.key {
            Some(key) => writeln!(
                out,
                "                    (\"{}\", {}),",
                escape_rust_string(key),
                value
            )?,
            None => writeln!(out, "                    {},", value)?,
        }
    }
    writeln!(out, "                ]));")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::finder::synthesize_table;
    use crate::codegen::project_config::Namespaces;
    use crate::codegen::table_emitter::TableNames;
    use crate::codegen::types::{ColumnDef, ColumnType, IndexColumnRef, TableStructure};

    fn namespaces() -> Namespaces {
        Namespaces {
            output: "crate::orm".to_string(),
            user_repositories: "crate::repository".to_string(),
            user_managers: "crate::manager".to_string(),
            entities: "crate::entity".to_string(),
            runtime_crate: "repogen".to_string(),
        }
    }

    fn render(table: &TableStructure) -> String {
        let namespaces = namespaces();
        let names = TableNames::derive("users", &namespaces);
        let finders = synthesize_table("users", table);
        render_repository(&TableView {
            names: &names,
            finders: &finders.signatures,
            namespaces: &namespaces,
        })
        .unwrap()
    }

    #[test]
    fn test_render_single_column_finder() {
        let mut table = TableStructure::default();
        table.columns.insert("id".to_string(), ColumnDef::new(ColumnType::Int));
        table.indexes = vec![vec![IndexColumnRef::new("users", "id", false)]];

        let code = render(&table);
        let expected = r#"    /// `findById(id, useNamedParameters)`
    fn find_by_id(
        &self,
        id: i64,
        use_named_parameters: bool,
    ) -> runtime::QueryBuilder<crate::entity::Users> {
        let mut query = self.entity_repository().create_query_builder("u");
        if use_named_parameters {
            query
                .where_clause("u.id = :id")
                .set_parameters(runtime::Parameters::named([
                    ("id", runtime::SqlValue::from(id)),
                ]));
        } else {
            query
                .where_clause("u.id = ?")
                .set_parameters(runtime::Parameters::positional([
                    runtime::SqlValue::from(id),
                ]));
        }
        query
    }
"#;
        assert!(code.contains(expected), "{}", code);
        assert!(code.starts_with("// @generated by repogen."));
        assert!(code.contains("use repogen::runtime;\n"));
        assert!(code.contains("pub trait UsersRepository: Send + Sync {"));
        assert!(code.contains("impl UsersRepository for DefaultUsersRepository {"));
        assert!(code.contains("impl UsersRepository for runtime::GenericRepository<crate::entity::Users> {"));
    }

    #[test]
    fn test_render_nullable_formatted_date() {
        let mut table = TableStructure::default();
        table.columns.insert(
            "deleted_at".to_string(),
            ColumnDef::new(ColumnType::Date).nullable().with_date_format("%Y-%m-%d"),
        );
        table.indexes = vec![vec![IndexColumnRef::new("users", "deleted_at", true)]];

        let code = render(&table);
        assert!(code.contains("deleted_at: Option<runtime::NaiveDateTime>"));
        assert!(code.contains(
            "(\"deletedAt\", runtime::SqlValue::from(deleted_at.map(|value| value.format(\"%Y-%m-%d\").to_string()))),"
        ));
    }

    #[test]
    fn test_render_without_finders() {
        let code = render(&TableStructure::default());
        assert!(!code.contains("fn find_by_"));
        assert!(code.contains("pub struct DefaultUsersRepository {"));
    }
}
