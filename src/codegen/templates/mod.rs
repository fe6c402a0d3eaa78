//! Source templates, one per generated unit kind.
//!
//! Templates print what the emitters computed; they hold no naming or
//! synthesis rules of their own. Every template writes into a `String` and
//! returns the finished unit.

mod default_mod_rs;
mod dynamic_entity_manager_rs;
mod dynamic_managers_rs;
mod dynamic_repositories_rs;
mod manager_rs;
mod repository_rs;

pub use default_mod_rs::{render_manager_module, render_repository_module};
pub use dynamic_entity_manager_rs::render_dynamic_entity_manager;
pub use dynamic_managers_rs::render_dynamic_managers;
pub use dynamic_repositories_rs::render_dynamic_repositories;
pub use manager_rs::render_manager;
pub use repository_rs::render_repository;

use crate::codegen::finder::{FinderParameter, FinderSignature, ParamType};
use crate::codegen::project_config::Namespaces;
use crate::codegen::table_emitter::TableNames;
use crate::codegen::utils::escape_rust_string;
use std::fmt::{self, Write};

/// Marker on the first line of every generated unit
pub const GENERATED_MARKER: &str = "@generated";

/// Signatures longer than this are split one parameter per line
const MAX_INLINE_SIGNATURE: usize = 100;

/// Input of the per-table templates
pub struct TableView<'a> {
    pub names: &'a TableNames,
    pub finders: &'a [FinderSignature],
    pub namespaces: &'a Namespaces,
}

/// Input of the facade templates
pub struct FacadeView<'a> {
    pub tables: &'a [TableNames],
    pub namespaces: &'a Namespaces,
}

impl FacadeView<'_> {
    pub(crate) fn output_path(&self, item: &str) -> String {
        format!("{}::{}", self.namespaces.output, item)
    }
}

pub(crate) fn write_header(out: &mut String, description: &str) -> fmt::Result {
    writeln!(out, "// {} by repogen. Do not edit by hand.", GENERATED_MARKER)?;
    writeln!(out, "//")?;
    writeln!(out, "// {}", description)?;
    writeln!(out)
}

pub(crate) fn write_runtime_import(out: &mut String, namespaces: &Namespaces) -> fmt::Result {
    writeln!(out, "use {};", namespaces.runtime_module())
}

/// Rust type of a finder parameter, relative to the imported `runtime` module.
pub(crate) fn rust_type(param: &FinderParameter) -> String {
    let base = match param.param_type {
        ParamType::Text => "String",
        ParamType::Integer => "i64",
        ParamType::Float => "f64",
        ParamType::Boolean => "bool",
        ParamType::DateTime => "runtime::NaiveDateTime",
        ParamType::Value => "runtime::SqlValue",
    };
    if param.nullable {
        format!("Option<{}>", base)
    } else {
        base.to_string()
    }
}

/// Expression turning the argument `ident` into a bound `SqlValue`.
pub(crate) fn bind_expression(param: &FinderParameter, ident: &str) -> String {
    match param.formatted_date() {
        Some(format) if param.nullable => format!(
            "runtime::SqlValue::from({}.map(|value| value.format(\"{}\").to_string()))",
            ident,
            escape_rust_string(format)
        ),
        Some(format) => format!(
            "runtime::SqlValue::from({}.format(\"{}\").to_string())",
            ident,
            escape_rust_string(format)
        ),
        None => format!("runtime::SqlValue::from({})", ident),
    }
}

/// Write a method signature, splitting parameters over lines when long.
///
/// `params` excludes the receiver; `indent` is the indentation of the `fn`.
pub(crate) fn write_signature(
    out: &mut String,
    indent: &str,
    name: &str,
    params: &[(String, String)],
    return_type: &str,
) -> fmt::Result {
    let inline: Vec<String> = params
        .iter()
        .map(|(ident, ty)| format!("{}: {}", ident, ty))
        .collect();
    let single = format!(
        "{}fn {}(&self, {}) -> {} {{",
        indent,
        name,
        inline.join(", "),
        return_type
    );

    if single.len() <= MAX_INLINE_SIGNATURE {
        return writeln!(out, "{}", single);
    }

    writeln!(out, "{}fn {}(", indent, name)?;
    writeln!(out, "{}    &self,", indent)?;
    for param in &inline {
        writeln!(out, "{}    {},", indent, param)?;
    }
    writeln!(out, "{}) -> {} {{", indent, return_type)
}

/// `(identifier, type)` pairs of a finder, trailing flag included.
pub(crate) fn finder_params(finder: &FinderSignature) -> Vec<(String, String)> {
    finder
        .rust_parameter_names()
        .into_iter()
        .zip(finder.parameters.iter())
        .map(|(ident, param)| (ident, rust_type(param)))
        .collect()
}
