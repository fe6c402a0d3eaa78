//! End-to-end generation into a temporary project tree

use repogen::codegen::{
    generate_from_yaml, ConfigError, GenerateError, Generator, GeneratorConfig, Staleness,
    YamlStructureSource,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const CONFIG: &str = r#"
output:
  directory: src/orm
  namespace: crate::orm
user_repositories:
  directory: src/repository
  namespace: crate::repository
user_managers:
  directory: src/manager
  namespace: crate::manager
entity_namespace: crate::entity
"#;

const SCHEMA: &str = r#"
tables:
  users:
    columns:
      id: { type: int }
      email: { type: string }
      created_at: { type: date, date_format: "%Y-%m-%d" }
    indexes:
      - [id]
      - [email]
      - [created_at]
  order_items:
    columns:
      order_id: { type: int }
      product_id: { type: int }
      note: { type: string, allow_null: true }
    indexes:
      - [order_id, product_id]
      - [note]
      - [order_id]
      - [order_id]
"#;

struct Project {
    dir: TempDir,
}

impl Project {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        for sub in ["src/orm", "src/repository", "src/manager"] {
            fs::create_dir_all(dir.path().join(sub)).unwrap();
        }
        fs::write(dir.path().join("repogen.yaml"), CONFIG).unwrap();
        fs::write(dir.path().join("schema.yaml"), SCHEMA).unwrap();
        Self { dir }
    }

    fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.path(relative)).unwrap()
    }

    fn generator(&self) -> Generator {
        Generator::new(GeneratorConfig::from_file(self.path("repogen.yaml")).unwrap()).unwrap()
    }

    fn source(&self) -> YamlStructureSource {
        YamlStructureSource::new(self.path("schema.yaml"))
    }
}

fn list(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_generation_layout() {
    let project = Project::new();
    let report = generate_from_yaml(project.path("repogen.yaml"), project.path("schema.yaml")).unwrap();

    assert_eq!(report.tables, 2);
    // users: 3, order_items: 3 after dropping the repeated [order_id]
    assert_eq!(report.finders, 6);
    assert_eq!(report.duplicate_finders, 1);
    assert_eq!(report.units_written, 9);
    assert_eq!(report.files_removed, 0);

    assert_eq!(
        list(&project.path("src/orm")),
        [
            "default_manager",
            "default_repository",
            "dynamic_entity_manager.rs",
            "dynamic_managers.rs",
            "dynamic_repositories.rs",
        ]
    );
    assert_eq!(
        list(&project.path("src/orm/default_repository")),
        ["mod.rs", "order_items_repository.rs", "users_repository.rs"]
    );
    assert_eq!(
        list(&project.path("src/orm/default_manager")),
        ["mod.rs", "order_items_manager.rs", "users_manager.rs"]
    );
}

#[test]
fn test_generated_finders() {
    let project = Project::new();
    project.generator().generate(&project.source(), &[]).unwrap();

    let repository = project.read("src/orm/default_repository/order_items_repository.rs");
    assert!(repository.contains("pub trait OrderItemsRepository: Send + Sync {"));
    assert!(repository.contains("fn find_by_order_id_and_product_id("));
    assert!(repository.contains("\"oi.order_id = :orderId AND oi.product_id = :productId\""));
    assert!(repository.contains("\"oi.order_id = ? AND oi.product_id = ?\""));
    assert!(repository.contains("note: Option<String>,"));
    assert_eq!(repository.matches("fn find_by_order_id(").count(), 1);

    let users = project.read("src/orm/default_repository/users_repository.rs");
    assert!(users.contains("created_at: runtime::NaiveDateTime,"));
    assert!(users.contains("created_at.format(\"%Y-%m-%d\").to_string()"));

    let manager = project.read("src/orm/default_manager/users_manager.rs");
    assert!(manager.contains("pub trait UsersManager: Send + Sync {"));
    assert!(manager.contains("Result<Vec<crate::entity::Users>, runtime::QueryError>"));
    assert!(manager.contains(".select_query()"));
}

#[test]
fn test_generated_facades() {
    let project = Project::new();
    project.generator().generate(&project.source(), &[]).unwrap();

    let repositories = project.read("src/orm/dynamic_repositories.rs");
    assert!(repositories.contains(
        "pub const ORDER_ITEMS_REPOSITORY_OVERRIDE: &str = \"crate::repository::OrderItemsRepository\";"
    ));
    assert!(repositories.contains(
        "pub const USERS_REPOSITORY_DEFAULT: &str = \"crate::orm::default_repository::UsersRepository\";"
    ));
    assert!(repositories.contains("pub fn get_users_repository(&self)"));

    let managers = project.read("src/orm/dynamic_managers.rs");
    assert!(managers.contains("pub fn get_order_items_manager(&self)"));

    let entity_manager = project.read("src/orm/dynamic_entity_manager.rs");
    assert!(entity_manager.contains("pub struct DynamicEntityManager {"));
    assert!(entity_manager.contains("pub fn get_order_items_repository(&self)"));

    let module = project.read("src/orm/default_repository/mod.rs");
    assert!(module.contains("pub mod order_items_repository;\n"));
    assert!(module.contains("pub mod users_repository;\n"));
    assert!(module.contains("pub fn register_defaults(registry: &mut runtime::ComponentRegistry)"));
}

#[test]
fn test_regeneration_is_byte_identical() {
    let project = Project::new();
    let generator = project.generator();
    generator.generate(&project.source(), &[]).unwrap();
    let first = project.read("src/orm/default_repository/users_repository.rs");
    let first_facade = project.read("src/orm/dynamic_entity_manager.rs");

    let report = generator.generate(&project.source(), &[]).unwrap();
    assert_eq!(report.files_removed, 0);
    assert_eq!(project.read("src/orm/default_repository/users_repository.rs"), first);
    assert_eq!(project.read("src/orm/dynamic_entity_manager.rs"), first_facade);
    assert!(generator
        .check(&project.source().load().unwrap())
        .unwrap()
        .is_empty());
}

#[test]
fn test_stale_defaults_removed_and_user_files_kept() {
    let project = Project::new();
    let user_file = project.path("src/repository/users_repository.rs");
    fs::write(&user_file, "// hand written\n").unwrap();
    fs::create_dir_all(project.path("src/orm/default_repository")).unwrap();
    fs::write(
        project.path("src/orm/default_repository/dropped_table_repository.rs"),
        "// stale\n",
    )
    .unwrap();

    let report = project.generator().generate(&project.source(), &[]).unwrap();

    assert_eq!(report.files_removed, 1);
    assert!(!project
        .path("src/orm/default_repository/dropped_table_repository.rs")
        .exists());
    assert_eq!(fs::read_to_string(&user_file).unwrap(), "// hand written\n");
}

#[test]
fn test_table_filter_limits_run() {
    let project = Project::new();
    let report = project
        .generator()
        .generate(&project.source(), &["users".to_string()])
        .unwrap();

    assert_eq!(report.tables, 1);
    assert_eq!(
        list(&project.path("src/orm/default_manager")),
        ["mod.rs", "users_manager.rs"]
    );
    assert!(!project
        .read("src/orm/dynamic_repositories.rs")
        .contains("order_items"));
}

#[test]
fn test_check_detects_drift() {
    let project = Project::new();
    let generator = project.generator();
    let tables = project.source().load().unwrap();
    generator.generate_tables(&tables).unwrap();

    fs::write(project.path("src/orm/dynamic_managers.rs"), "// edited\n").unwrap();
    fs::remove_file(project.path("src/orm/default_manager/users_manager.rs")).unwrap();
    fs::write(project.path("src/orm/default_manager/extra.rs"), "").unwrap();

    let stale = generator.check(&tables).unwrap();
    let summary: Vec<(String, Staleness)> = stale
        .iter()
        .map(|unit| (unit.path.to_string_lossy().replace('\\', "/"), unit.staleness))
        .collect();
    assert_eq!(
        summary,
        [
            ("default_manager/users_manager.rs".to_string(), Staleness::Missing),
            ("dynamic_managers.rs".to_string(), Staleness::Modified),
            ("default_manager/extra.rs".to_string(), Staleness::Orphaned),
        ]
    );
}

#[test]
fn test_missing_output_directory_fails_without_writing() {
    let project = Project::new();
    fs::remove_dir_all(project.path("src/orm")).unwrap();

    let err = generate_from_yaml(project.path("repogen.yaml"), project.path("schema.yaml")).unwrap_err();
    assert!(matches!(
        err,
        GenerateError::Config(ConfigError::MissingDirectory { setting: "output.directory", .. })
    ));
    assert!(!project.path("src/orm").exists());
}

#[test]
fn test_missing_schema_is_reported() {
    let project = Project::new();
    let err = generate_from_yaml(project.path("repogen.yaml"), project.path("nope.yaml")).unwrap_err();
    assert!(matches!(err, GenerateError::Schema(_)));
    assert!(list(&project.path("src/orm")).is_empty());
}
