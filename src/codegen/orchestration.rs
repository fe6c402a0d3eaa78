//! Generation driver.
//!
//! Ties the emitters together over a full set of table structures:
//! validates the configuration, renders every unit in memory, then replaces
//! the generator-owned default directories and overwrites the three
//! top-level facade units. Rendering never touches the filesystem, so a
//! render failure leaves the previous output intact.

use crate::codegen::facade_emitter::emit_facades;
use crate::codegen::fs_utils;
use crate::codegen::project_config::{ConfigError, GeneratorConfig, Namespaces};
use crate::codegen::table_emitter::{emit_table, TableNames, DEFAULT_MANAGER_DIR, DEFAULT_REPOSITORY_DIR};
use crate::codegen::types::{GeneratedUnit, TableStructures};
use crate::codegen::utils::is_identifier;
use crate::codegen::yaml_loader::{SchemaError, TableStructureSource};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("Failed to render {unit}")]
    Render {
        unit: String,
        #[source]
        source: fmt::Error,
    },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GenerateError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        GenerateError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Summary of one generation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub tables: usize,
    pub finders: usize,
    pub skipped_indexes: usize,
    pub duplicate_finders: usize,
    /// Tables left out because their names cannot form Rust identifiers
    /// or collide with an earlier table's names
    pub skipped_tables: Vec<String>,
    pub units_written: usize,
    pub files_removed: usize,
}

impl fmt::Display for GenerationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} table(s), {} finder(s), {} unit(s) written, {} stale file(s) removed",
            self.tables, self.finders, self.units_written, self.files_removed
        )?;
        if self.skipped_indexes > 0 || self.duplicate_finders > 0 {
            write!(
                f,
                "; {} index(es) skipped, {} duplicate finder(s) dropped",
                self.skipped_indexes, self.duplicate_finders
            )?;
        }
        if !self.skipped_tables.is_empty() {
            write!(f, "; skipped tables: {}", self.skipped_tables.join(", "))?;
        }
        Ok(())
    }
}

/// Every unit of a run, rendered in memory
#[derive(Debug, Clone)]
pub struct Rendering {
    pub units: Vec<GeneratedUnit>,
    pub report: GenerationReport,
}

/// Why a unit on disk does not match a fresh rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Staleness {
    Missing,
    Modified,
    /// Generator-owned file no current table produces
    Orphaned,
}

impl fmt::Display for Staleness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Staleness::Missing => write!(f, "missing"),
            Staleness::Modified => write!(f, "modified"),
            Staleness::Orphaned => write!(f, "orphaned"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaleUnit {
    /// Relative to the output directory
    pub path: PathBuf,
    pub staleness: Staleness,
}

/// Generation driver over a validated configuration.
#[derive(Debug, Clone)]
pub struct Generator {
    config: GeneratorConfig,
    namespaces: Namespaces,
    output_dir: PathBuf,
}

impl Generator {
    /// Validate `config` eagerly; nothing is generated from an invalid one.
    pub fn new(config: GeneratorConfig) -> Result<Self, GenerateError> {
        let namespaces = config.validate()?;
        let output_dir = config.output_dir();
        Ok(Self {
            config,
            namespaces,
            output_dir,
        })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn namespaces(&self) -> &Namespaces {
        &self.namespaces
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Render every unit for `tables` without touching the filesystem.
    pub fn render(&self, tables: &TableStructures) -> Result<Rendering, GenerateError> {
        let mut report = GenerationReport::default();
        let mut table_units = Vec::new();
        let mut names: Vec<TableNames> = Vec::new();
        let mut taken_entities = HashSet::new();
        let mut taken_modules = HashSet::new();

        for (table_name, table) in tables {
            if !is_identifier(table_name) || !table_name.chars().any(|c| c.is_ascii_alphanumeric()) {
                tracing::warn!("Skipping table '{}': not a valid identifier", table_name);
                report.skipped_tables.push(table_name.clone());
                continue;
            }

            let units = emit_table(table_name, table, &self.namespaces).map_err(|source| {
                GenerateError::Render {
                    unit: format!("table '{}'", table_name),
                    source,
                }
            })?;

            if !taken_entities.insert(units.names.entity.clone())
                || !taken_modules.insert(units.names.module.clone())
            {
                tracing::warn!(
                    "Skipping table '{}': its generated names collide with an earlier table",
                    table_name
                );
                report.skipped_tables.push(table_name.clone());
                continue;
            }

            report.tables += 1;
            report.finders += units.finders.signatures.len();
            report.skipped_indexes += units.finders.skipped_indexes;
            report.duplicate_finders += units.finders.duplicate_finders;

            names.push(units.names);
            table_units.push(units.repository);
            table_units.push(units.manager);
        }

        let facades = emit_facades(&names, &self.namespaces).map_err(|source| {
            GenerateError::Render {
                unit: "facades".to_string(),
                source,
            }
        })?;
        table_units.extend(facades);

        Ok(Rendering {
            units: table_units,
            report,
        })
    }

    /// Retrieve structures from `source` and generate them.
    pub fn generate(
        &self,
        source: &dyn TableStructureSource,
        filter: &[String],
    ) -> Result<GenerationReport, GenerateError> {
        let tables = source.retrieve(filter)?;
        self.generate_tables(&tables)
    }

    /// Replace the default directories and overwrite the facade units.
    ///
    /// Not safe against concurrent runs on the same output directory.
    pub fn generate_tables(&self, tables: &TableStructures) -> Result<GenerationReport, GenerateError> {
        // Directories may have changed since construction.
        self.config.validate()?;

        tracing::info!(
            "Generating {} table(s) into {}",
            tables.len(),
            self.output_dir.display()
        );
        let Rendering { units, mut report } = self.render(tables)?;

        let mut removed = Vec::new();
        for dir in [DEFAULT_REPOSITORY_DIR, DEFAULT_MANAGER_DIR] {
            let path = self.output_dir.join(dir);
            removed.extend(
                fs_utils::clear_directory_files(&path).map_err(|e| GenerateError::io(&path, e))?,
            );
        }

        let mut written = HashSet::new();
        for unit in &units {
            let path = self.output_dir.join(&unit.path);
            fs_utils::write_file(&path, &unit.contents).map_err(|e| GenerateError::io(&path, e))?;
            tracing::debug!("Wrote {} ({})", path.display(), unit.name);
            written.insert(path);
            report.units_written += 1;
        }

        // Only files no current table regenerates count as removed.
        for file in removed.iter().filter(|file| !written.contains(*file)) {
            tracing::info!("Removed stale {}", file.display());
            report.files_removed += 1;
        }

        tracing::info!("Generation complete: {}", report);
        Ok(report)
    }

    /// Compare a fresh rendering of `tables` with the files on disk.
    pub fn check(&self, tables: &TableStructures) -> Result<Vec<StaleUnit>, GenerateError> {
        let Rendering { units, .. } = self.render(tables)?;
        let mut stale = Vec::new();
        let mut expected = HashSet::new();

        for unit in &units {
            expected.insert(unit.path.clone());
            let path = self.output_dir.join(&unit.path);
            let staleness = match fs::read_to_string(&path) {
                Ok(contents) if contents == unit.contents => continue,
                Ok(_) => Staleness::Modified,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Staleness::Missing,
                Err(e) => return Err(GenerateError::io(&path, e)),
            };
            stale.push(StaleUnit {
                path: unit.path.clone(),
                staleness,
            });
        }

        for dir in [DEFAULT_REPOSITORY_DIR, DEFAULT_MANAGER_DIR] {
            let path = self.output_dir.join(dir);
            if !path.is_dir() {
                continue;
            }
            let mut orphans = Vec::new();
            for entry in fs::read_dir(&path).map_err(|e| GenerateError::io(&path, e))? {
                let entry = entry.map_err(|e| GenerateError::io(&path, e))?;
                let relative = Path::new(dir).join(entry.file_name());
                if entry.path().is_file() && !expected.contains(&relative) {
                    orphans.push(relative);
                }
            }
            orphans.sort();
            stale.extend(orphans.into_iter().map(|path| StaleUnit {
                path,
                staleness: Staleness::Orphaned,
            }));
        }

        Ok(stale)
    }
}
