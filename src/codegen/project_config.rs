//! Generator configuration schema for repogen.yaml
//!
//! Settings are loaded once and validated eagerly: every problem surfaces as
//! a [`ConfigError`] before a single file is written.

use crate::codegen::fs_utils;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;

/// Configuration errors. All of them are fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
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

    #[error("{setting}: directory {path} does not exist")]
    MissingDirectory { setting: &'static str, path: PathBuf },

    #[error("{setting}: directory {path} is not writable")]
    NotWritable { setting: &'static str, path: PathBuf },

    #[error("{setting}: invalid namespace '{value}'")]
    InvalidNamespace { setting: &'static str, value: String },
}

/// A directory paired with the Rust module path its code lives under
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Location {
    pub directory: PathBuf,
    pub namespace: String,
}

impl Location {
    pub fn new(directory: impl Into<PathBuf>, namespace: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            namespace: namespace.into(),
        }
    }
}

/// Top-level configuration from repogen.yaml
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneratorConfig {
    /// Generator-owned tree
    pub output: Location,
    /// User-authored repository overrides
    pub user_repositories: Location,
    /// User-authored manager overrides
    pub user_managers: Location,
    /// Module path of the entity types
    pub entity_namespace: String,
    /// Crate generated code imports the runtime from
    #[serde(default = "default_runtime_crate")]
    pub runtime_crate: String,
    /// Directory relative paths are resolved against
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

fn default_runtime_crate() -> String {
    "repogen".to_string()
}

/// Validated module paths used by the emitters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespaces {
    pub output: String,
    pub user_repositories: String,
    pub user_managers: String,
    pub entities: String,
    pub runtime_crate: String,
}

impl Namespaces {
    /// `use` path of the runtime module from generated code
    pub fn runtime_module(&self) -> String {
        format!("{}::runtime", self.runtime_crate)
    }

    pub fn default_repository_module(&self) -> String {
        format!("{}::default_repository", self.output)
    }

    pub fn default_manager_module(&self) -> String {
        format!("{}::default_manager", self.output)
    }
}

// Constant pattern, so compilation cannot fail at runtime.
static NAMESPACE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_]+(::[A-Za-z0-9_]+)*$").expect("constant namespace pattern")
});

/// Trim surrounding `::` and check the strict module-path syntax.
pub fn normalize_namespace(setting: &'static str, value: &str) -> Result<String, ConfigError> {
    let trimmed = value.trim().trim_matches(':');
    if NAMESPACE_PATTERN.is_match(trimmed) {
        Ok(trimmed.to_string())
    } else {
        Err(ConfigError::InvalidNamespace {
            setting,
            value: value.to_string(),
        })
    }
}

impl GeneratorConfig {
    pub fn new(output: Location, user_repositories: Location, user_managers: Location, entity_namespace: impl Into<String>) -> Self {
        Self {
            output,
            user_repositories,
            user_managers,
            entity_namespace: entity_namespace.into(),
            runtime_crate: default_runtime_crate(),
            base_dir: None,
        }
    }

    pub fn with_runtime_crate(mut self, runtime_crate: impl Into<String>) -> Self {
        self.runtime_crate = runtime_crate.into();
        self
    }

    /// Load configuration from repogen.yaml; relative directories resolve
    /// against the file's own directory.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config: Self =
            serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        Ok(config)
    }

    /// Resolve a configured directory against `base_dir`.
    pub fn resolve(&self, directory: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if directory.is_relative() => base.join(directory),
            _ => directory.to_path_buf(),
        }
    }

    pub fn output_dir(&self) -> PathBuf {
        self.resolve(&self.output.directory)
    }

    /// Validate every setting and return the normalized namespaces.
    pub fn validate(&self) -> Result<Namespaces, ConfigError> {
        let namespaces = Namespaces {
            output: normalize_namespace("output.namespace", &self.output.namespace)?,
            user_repositories: normalize_namespace(
                "user_repositories.namespace",
                &self.user_repositories.namespace,
            )?,
            user_managers: normalize_namespace(
                "user_managers.namespace",
                &self.user_managers.namespace,
            )?,
            entities: normalize_namespace("entity_namespace", &self.entity_namespace)?,
            runtime_crate: normalize_namespace("runtime_crate", &self.runtime_crate)?,
        };

        self.require_directory("output.directory", &self.output.directory, true)?;
        self.require_directory(
            "user_repositories.directory",
            &self.user_repositories.directory,
            false,
        )?;
        self.require_directory("user_managers.directory", &self.user_managers.directory, false)?;

        Ok(namespaces)
    }

    fn require_directory(
        &self,
        setting: &'static str,
        directory: &Path,
        writable: bool,
    ) -> Result<(), ConfigError> {
        let path = self.resolve(directory);
        if !path.is_dir() {
            return Err(ConfigError::MissingDirectory { setting, path });
        }
        if writable && !fs_utils::is_writable(&path) {
            return Err(ConfigError::NotWritable { setting, path });
        }
        Ok(())
    }
}
