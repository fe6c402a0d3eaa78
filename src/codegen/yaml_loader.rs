//! Table structure loading.
//!
//! The generator consumes structures that were retrieved elsewhere; it never
//! introspects a live database. [`TableStructureSource`] is that seam, with
//! a YAML schema file (or a directory of them) as the stock implementation.
//!
//! ```yaml
//! tables:
//!   user_accounts:
//!     columns:
//!       id: { type: int }
//!       last_name: { type: string }
//!       deleted_at: { type: date, allow_null: true }
//!     indexes:
//!       - [id]
//!       - [last_name, first_name]
//!       - - column: deleted_at
//!           allow_null: true
//! ```

use crate::codegen::types::{ColumnDef, IndexColumnRef, IndexDefinition, TableStructure, TableStructures};
use indexmap::IndexMap;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Schema path does not exist: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Table '{table}' is defined in both {first} and {second}")]
    DuplicateTable {
        table: String,
        first: PathBuf,
        second: PathBuf,
    },
}

/// Supplier of table structures for one generation run.
pub trait TableStructureSource {
    /// Structures of the tables named in `filter`, or of every table when
    /// `filter` is empty, in source order.
    fn retrieve(&self, filter: &[String]) -> Result<TableStructures, SchemaError>;
}

impl TableStructureSource for TableStructures {
    fn retrieve(&self, filter: &[String]) -> Result<TableStructures, SchemaError> {
        Ok(select_tables(self, filter))
    }
}

/// Keep the tables named in `filter`, preserving source order.
pub fn select_tables(tables: &TableStructures, filter: &[String]) -> TableStructures {
    tables
        .iter()
        .filter(|(name, _)| filter.is_empty() || filter.contains(name))
        .map(|(name, table)| (name.clone(), table.clone()))
        .collect()
}

/// Schema document as written on disk
#[derive(Debug, Deserialize)]
struct SchemaFile {
    #[serde(default)]
    tables: IndexMap<String, RawTable>,
}

#[derive(Debug, Deserialize)]
struct RawTable {
    #[serde(default)]
    columns: IndexMap<String, ColumnDef>,
    #[serde(default)]
    indexes: Vec<Vec<RawIndexColumn>>,
}

/// Index column given either as a bare name or as a full reference
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawIndexColumn {
    Name(String),
    Reference {
        column: String,
        #[serde(default)]
        table: Option<String>,
        #[serde(default)]
        allow_null: Option<bool>,
    },
}

impl RawTable {
    fn into_structure(self, table_name: &str) -> TableStructure {
        let indexes = self
            .indexes
            .into_iter()
            .map(|index| {
                index
                    .into_iter()
                    .map(|part| resolve_index_column(table_name, &self.columns, part))
                    .collect::<IndexDefinition>()
            })
            .collect();

        TableStructure {
            columns: self.columns,
            indexes,
        }
    }
}

/// Missing fields default from the owning table and the column's own
/// nullability.
fn resolve_index_column(
    table_name: &str,
    columns: &IndexMap<String, ColumnDef>,
    part: RawIndexColumn,
) -> IndexColumnRef {
    let (column, table, allow_null) = match part {
        RawIndexColumn::Name(column) => (column, None, None),
        RawIndexColumn::Reference {
            column,
            table,
            allow_null,
        } => (column, table, allow_null),
    };

    let allow_null = allow_null
        .or_else(|| columns.get(&column).map(|def| def.allow_null))
        .unwrap_or(false);

    IndexColumnRef::new(table.unwrap_or_else(|| table_name.to_string()), column, allow_null)
}

/// Parse a schema document.
pub fn parse_schema(contents: &str, path: &Path) -> Result<TableStructures, SchemaError> {
    let schema: SchemaFile = serde_yaml::from_str(contents).map_err(|source| SchemaError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(schema
        .tables
        .into_iter()
        .map(|(name, table)| {
            let structure = table.into_structure(&name);
            (name, structure)
        })
        .collect())
}

/// Table structures read from a YAML file, or from every `.yaml`/`.yml`
/// file of a directory in file-name order.
#[derive(Debug, Clone)]
pub struct YamlStructureSource {
    path: PathBuf,
}

impl YamlStructureSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every table.
    pub fn load(&self) -> Result<TableStructures, SchemaError> {
        if !self.path.exists() {
            return Err(SchemaError::NotFound(self.path.clone()));
        }

        if self.path.is_file() {
            return load_schema_file(&self.path);
        }

        let mut tables = TableStructures::new();
        let mut origins: IndexMap<String, PathBuf> = IndexMap::new();
        for file in schema_files(&self.path)? {
            for (name, table) in load_schema_file(&file)? {
                if let Some(first) = origins.get(&name) {
                    return Err(SchemaError::DuplicateTable {
                        table: name,
                        first: first.clone(),
                        second: file,
                    });
                }
                origins.insert(name.clone(), file.clone());
                tables.insert(name, table);
            }
        }
        Ok(tables)
    }
}

impl TableStructureSource for YamlStructureSource {
    fn retrieve(&self, filter: &[String]) -> Result<TableStructures, SchemaError> {
        let tables = self.load()?;
        tracing::debug!("Loaded {} table(s) from {}", tables.len(), self.path.display());
        Ok(select_tables(&tables, filter))
    }
}

fn load_schema_file(path: &Path) -> Result<TableStructures, SchemaError> {
    let contents = fs::read_to_string(path).map_err(|source| SchemaError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_schema(&contents, path)
}

fn schema_files(dir: &Path) -> Result<Vec<PathBuf>, SchemaError> {
    let read_error = |source| SchemaError::Read {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_error)? {
        let path = entry.map_err(read_error)?.path();
        let is_yaml = path
            .extension()
            .map_or(false, |ext| ext == "yaml" || ext == "yml");
        if is_yaml && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
