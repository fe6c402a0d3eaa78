//! Finder signature synthesis.
//!
//! Every index of a table yields one finder: `findBy` followed by the
//! camel-cased index columns joined with `And`, in index order. Each finder
//! takes one parameter per index column plus a trailing
//! `useNamedParameters` flag that picks `?` or `:name` placeholders when
//! the finder is called.
//!
//! Synthesis never fails. Empty indexes and indexes over unknown columns
//! are skipped; a finder whose name was already produced for the table is
//! dropped and the first one kept.

use crate::codegen::types::{ColumnType, IndexDefinition, TableStructure};
use crate::codegen::utils::{is_identifier, rust_ident, snake_to_camel, snake_to_pascal, table_alias};
use chrono::format::{Item, StrftimeItems};
use std::collections::HashSet;
use std::fmt;

/// Name of the trailing placeholder-style flag
pub const USE_NAMED_PARAMETERS: &str = "useNamedParameters";

/// Local binding holding the query builder inside generated finders
pub const FINDER_LOCAL: &str = "query";

/// Placeholder style of a finder call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingStyle {
    Positional,
    Named,
}

impl BindingStyle {
    pub fn from_flag(use_named_parameters: bool) -> Self {
        if use_named_parameters {
            BindingStyle::Named
        } else {
            BindingStyle::Positional
        }
    }
}

/// Declared type of a finder parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    Text,
    Integer,
    Float,
    Boolean,
    DateTime,
    /// Untyped scalar, for column types the generator does not know
    Value,
}

impl From<&ColumnType> for ParamType {
    fn from(column_type: &ColumnType) -> Self {
        match column_type {
            ColumnType::String => ParamType::Text,
            ColumnType::Int => ParamType::Integer,
            ColumnType::Float => ParamType::Float,
            ColumnType::Bool => ParamType::Boolean,
            ColumnType::Date => ParamType::DateTime,
            ColumnType::Other(_) => ParamType::Value,
        }
    }
}

/// Default value of a finder parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamDefault {
    Required,
    Null,
    False,
}

/// Column a parameter is bound to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnBinding {
    pub column_name: String,
    /// Dates are rendered through this format before binding
    pub date_format: Option<String>,
}

/// One parameter of a finder signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinderParameter {
    /// Canonical lowerCamel name, also the named placeholder
    pub name: String,
    pub param_type: ParamType,
    pub nullable: bool,
    pub default: ParamDefault,
    /// `None` for the trailing `useNamedParameters` flag
    pub column: Option<ColumnBinding>,
}

impl FinderParameter {
    /// Rust identifier used for this parameter in generated code.
    pub fn rust_name(&self) -> String {
        match &self.column {
            Some(binding) => rust_ident(&binding.column_name),
            None => rust_ident("use_named_parameters"),
        }
    }

    /// Date parameter that must be rendered to text before binding.
    pub fn formatted_date(&self) -> Option<&str> {
        match (&self.param_type, &self.column) {
            (ParamType::DateTime, Some(binding)) => binding.date_format.as_deref(),
            _ => None,
        }
    }

    fn use_named_parameters() -> Self {
        Self {
            name: USE_NAMED_PARAMETERS.to_string(),
            param_type: ParamType::Boolean,
            nullable: false,
            default: ParamDefault::False,
            column: None,
        }
    }
}

/// One value-to-placeholder mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterBinding {
    /// `?` or `:name`
    pub placeholder: String,
    /// Key under which the value is bound (`None` for positional)
    pub key: Option<String>,
    /// Index into the signature's parameters
    pub parameter: usize,
}

/// A synthesized finder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinderSignature {
    pub method_name: String,
    /// Index-column parameters in index order, then `useNamedParameters`
    pub parameters: Vec<FinderParameter>,
    pub positional_bindings: Vec<ParameterBinding>,
    pub named_bindings: Vec<ParameterBinding>,
    pub table_alias: String,
}

impl FinderSignature {
    /// snake_case method name used in generated Rust code.
    pub fn rust_method_name(&self) -> String {
        let columns: Vec<String> = self
            .column_parameters()
            .filter_map(|p| p.column.as_ref())
            .map(|binding| rust_ident(&binding.column_name).trim_start_matches("r#").to_string())
            .collect();
        format!("find_by_{}", columns.join("_and_"))
    }

    /// Rust identifiers of all parameters, in order.
    ///
    /// Columns that escape to the same identifier get a numeric suffix, and
    /// `query` is kept free for the generated method body.
    pub fn rust_parameter_names(&self) -> Vec<String> {
        let mut taken: HashSet<String> = HashSet::from([FINDER_LOCAL.to_string()]);
        self.parameters
            .iter()
            .map(|param| {
                let base = param.rust_name();
                let mut candidate = base.clone();
                let mut suffix = 2;
                while !taken.insert(candidate.clone()) {
                    candidate = format!("{}_{}", base.trim_start_matches("r#"), suffix);
                    suffix += 1;
                }
                candidate
            })
            .collect()
    }

    pub fn column_parameters(&self) -> impl Iterator<Item = &FinderParameter> {
        self.parameters.iter().filter(|p| p.column.is_some())
    }

    pub fn bindings(&self, style: BindingStyle) -> &[ParameterBinding] {
        match style {
            BindingStyle::Positional => &self.positional_bindings,
            BindingStyle::Named => &self.named_bindings,
        }
    }

    /// `<alias>.<column> = <placeholder>` clauses joined with `AND`.
    pub fn where_fragment(&self, style: BindingStyle) -> String {
        self.bindings(style)
            .iter()
            .filter_map(|binding| {
                let column = self.parameters[binding.parameter].column.as_ref()?;
                Some(format!(
                    "{}.{} = {}",
                    self.table_alias, column.column_name, binding.placeholder
                ))
            })
            .collect::<Vec<_>>()
            .join(" AND ")
    }
}

impl fmt::Display for FinderSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<&str> = self.parameters.iter().map(|p| p.name.as_str()).collect();
        write!(f, "{}({})", self.method_name, params.join(", "))
    }
}

/// Finders of one table, plus what synthesis dropped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FinderSet {
    pub signatures: Vec<FinderSignature>,
    pub skipped_indexes: usize,
    pub duplicate_finders: usize,
}

/// Empty or unparseable formats fall back to the default date rendering.
fn is_valid_date_format(table_name: &str, column_name: &str, format: &str) -> bool {
    if format.is_empty() {
        return false;
    }
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        tracing::warn!(
            "Ignoring invalid date_format '{}' on {}.{}",
            format,
            table_name,
            column_name
        );
        return false;
    }
    true
}

/// Synthesize the finder for one index.
///
/// Returns `None` for an empty index, or when a column is undeclared, is not
/// a plain identifier, or appears twice.
pub fn synthesize(
    table_name: &str,
    table: &TableStructure,
    index: &IndexDefinition,
) -> Option<FinderSignature> {
    if index.is_empty() {
        return None;
    }

    let mut method_name = String::from("findBy");
    let mut parameters = Vec::with_capacity(index.len() + 1);
    let mut positional_bindings = Vec::with_capacity(index.len());
    let mut named_bindings = Vec::with_capacity(index.len());

    for (position, part) in index.iter().enumerate() {
        let column = table.column(&part.column_name)?;
        if !is_identifier(&part.column_name) {
            return None;
        }

        if position > 0 {
            method_name.push_str("And");
        }
        method_name.push_str(&snake_to_pascal(&part.column_name));

        let name = snake_to_camel(&part.column_name);
        if parameters.iter().any(|p: &FinderParameter| p.name == name) {
            return None;
        }
        let date_format = match column.column_type {
            ColumnType::Date => column
                .date_format
                .as_deref()
                .filter(|format| is_valid_date_format(table_name, &part.column_name, format))
                .map(str::to_string),
            _ => None,
        };

        positional_bindings.push(ParameterBinding {
            placeholder: "?".to_string(),
            key: None,
            parameter: position,
        });
        named_bindings.push(ParameterBinding {
            placeholder: format!(":{}", name),
            key: Some(name.clone()),
            parameter: position,
        });

        parameters.push(FinderParameter {
            name,
            param_type: ParamType::from(&column.column_type),
            nullable: part.allow_null,
            default: if part.allow_null {
                ParamDefault::Null
            } else {
                ParamDefault::Required
            },
            column: Some(ColumnBinding {
                column_name: part.column_name.clone(),
                date_format,
            }),
        });
    }

    parameters.push(FinderParameter::use_named_parameters());

    Some(FinderSignature {
        method_name,
        parameters,
        positional_bindings,
        named_bindings,
        table_alias: table_alias(table_name),
    })
}

/// Synthesize every finder of a table, in index declaration order.
pub fn synthesize_table(table_name: &str, table: &TableStructure) -> FinderSet {
    let mut set = FinderSet::default();
    let mut seen = HashSet::new();

    for index in &table.indexes {
        let Some(signature) = synthesize(table_name, table, index) else {
            tracing::debug!(
                "Skipping index {:?} of '{}': empty or references unknown columns",
                index.iter().map(|p| p.column_name.as_str()).collect::<Vec<_>>(),
                table_name
            );
            set.skipped_indexes += 1;
            continue;
        };

        // Distinct canonical names may still escape to the same Rust name.
        let rust_name = signature.rust_method_name();
        if seen.contains(&signature.method_name) || seen.contains(&rust_name) {
            tracing::debug!(
                "Dropping duplicate finder {} on '{}'",
                signature.method_name,
                table_name
            );
            set.duplicate_finders += 1;
            continue;
        }

        seen.insert(signature.method_name.clone());
        seen.insert(rust_name);
        set.signatures.push(signature);
    }

    set
}
