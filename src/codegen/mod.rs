//! Code generation from table structures.
//!
//! Each table yields a default repository unit with one finder per index
//! and a default manager unit mirroring those finders. The run as a whole
//! yields the two default module indexes and three facade units: the
//! repositories facade, the managers facade and the entity manager.

pub mod types;
pub mod utils;
pub mod finder;
pub mod templates;
pub mod table_emitter;
pub mod facade_emitter;
pub mod yaml_loader;
pub mod project_config;
pub mod fs_utils;
pub mod orchestration;

// Re-export key types
pub use types::{
    ColumnDef, ColumnType, GeneratedUnit, IndexColumnRef, IndexDefinition, TableStructure,
    TableStructures, UnitKind,
};
pub use finder::{synthesize, synthesize_table, FinderSet, FinderSignature};
pub use table_emitter::{emit_table, TableNames, TableUnits};
pub use facade_emitter::emit_facades;
pub use yaml_loader::{SchemaError, TableStructureSource, YamlStructureSource};
pub use project_config::{ConfigError, GeneratorConfig, Location, Namespaces};
pub use orchestration::{GenerateError, GenerationReport, Generator, StaleUnit, Staleness};

/// Generate every unit from a repogen.yaml configuration and a schema file
/// or directory.
///
/// This is the main entry point from build.rs.
///
/// # Example
///
/// ```rust,no_run
/// fn main() {
///     repogen::codegen::generate_from_yaml("repogen.yaml", "schema/")
///         .expect("Code generation failed");
/// }
/// ```
pub fn generate_from_yaml(
    config_path: impl AsRef<std::path::Path>,
    schema_path: impl AsRef<std::path::Path>,
) -> Result<GenerationReport, GenerateError> {
    let config = GeneratorConfig::from_file(config_path)?;
    let generator = Generator::new(config)?;
    generator.generate(&YamlStructureSource::new(schema_path), &[])
}
