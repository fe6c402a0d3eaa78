//! Type definitions for table structures and generated units.
//!
//! A table structure is consumed as-is: the generator trusts it and never
//! checks it against a live catalog.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Declared type of a column
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ColumnType {
    String,
    Int,
    Float,
    Bool,
    Date,
    /// Any other declared type, bound as an untyped value
    Other(String),
}

impl From<String> for ColumnType {
    fn from(value: String) -> Self {
        match value.to_lowercase().as_str() {
            "string" | "text" => ColumnType::String,
            "int" | "integer" => ColumnType::Int,
            "float" | "double" => ColumnType::Float,
            "bool" | "boolean" => ColumnType::Bool,
            "date" | "datetime" => ColumnType::Date,
            _ => ColumnType::Other(value),
        }
    }
}

impl From<ColumnType> for String {
    fn from(value: ColumnType) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::String => write!(f, "string"),
            ColumnType::Int => write!(f, "int"),
            ColumnType::Float => write!(f, "float"),
            ColumnType::Bool => write!(f, "bool"),
            ColumnType::Date => write!(f, "date"),
            ColumnType::Other(name) => write!(f, "{}", name),
        }
    }
}

/// Column metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    /// strftime format used to bind values of date columns
    #[serde(default)]
    pub date_format: Option<String>,
    #[serde(default)]
    pub allow_null: bool,
}

impl ColumnDef {
    pub fn new(column_type: ColumnType) -> Self {
        Self {
            column_type,
            date_format: None,
            allow_null: false,
        }
    }

    pub fn nullable(mut self) -> Self {
        self.allow_null = true;
        self
    }

    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = Some(format.into());
        self
    }
}

/// One column position inside an index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexColumnRef {
    pub table_name: String,
    pub column_name: String,
    pub allow_null: bool,
}

impl IndexColumnRef {
    pub fn new(table_name: impl Into<String>, column_name: impl Into<String>, allow_null: bool) -> Self {
        Self {
            table_name: table_name.into(),
            column_name: column_name.into(),
            allow_null,
        }
    }
}

/// Ordered index columns; order fixes parameter order and the finder name.
pub type IndexDefinition = Vec<IndexColumnRef>;

/// Columns and indexes of one table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableStructure {
    #[serde(default)]
    pub columns: IndexMap<String, ColumnDef>,
    #[serde(default)]
    pub indexes: Vec<IndexDefinition>,
}

impl TableStructure {
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.get(name)
    }
}

/// Table name → structure, in retrieval order
pub type TableStructures = IndexMap<String, TableStructure>;

/// Kind of generated source unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitKind {
    Repository,
    Manager,
    RepositoryModule,
    ManagerModule,
    RepositoriesFacade,
    ManagersFacade,
    EntityManager,
}

impl UnitKind {
    /// Per-table units and their module indexes live in the generator-owned
    /// default subdirectories.
    pub fn is_default_layer(&self) -> bool {
        matches!(
            self,
            UnitKind::Repository
                | UnitKind::Manager
                | UnitKind::RepositoryModule
                | UnitKind::ManagerModule
        )
    }
}

/// A rendered source artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedUnit {
    pub kind: UnitKind,
    /// Fully-qualified name of the unit's primary item
    pub name: String,
    /// Path relative to the output directory
    pub path: PathBuf,
    pub contents: String,
}
