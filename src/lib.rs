//! # Repogen: Schema-Driven Data-Access Layer Generator
//!
//! Repogen reads table structures (columns and indexes) and emits a typed
//! data-access layer over them, plus the runtime that layer compiles against.
//!
//! ## Features
//!
//! - **Default repositories**: one finder per index, returning a lazily
//!   configured query builder
//! - **Default managers**: the same finders, executed and materialized into
//!   entities
//! - **Dynamic facades**: per-table accessors that resolve a user override,
//!   then the generated default, then a generic fallback, exactly once
//! - **Result cache keys**: stable FNV-1 keys for entities and query results
//!
//! ## Example: repogen.yaml
//!
//! ```yaml
//! output:
//!   directory: src/orm
//!   namespace: crate::orm
//! user_repositories:
//!   directory: src/repository
//!   namespace: crate::repository
//! user_managers:
//!   directory: src/manager
//!   namespace: crate::manager
//! entity_namespace: crate::entity
//! ```
//!
//! ## Example: schema
//!
//! ```yaml
//! tables:
//!   users:
//!     columns:
//!       id: { type: int }
//!       email: { type: string }
//!       created_at: { type: date, date_format: "%Y-%m-%d" }
//!     indexes:
//!       - [id]
//!       - [email]
//!       - [created_at]
//! ```
//!
//! Running `repogen generate` over these rewrites `src/orm/default_repository/`
//! and `src/orm/default_manager/` and overwrites the three facade files in
//! `src/orm/`. Files under the user override directories are never touched.

// Code generation framework
pub mod codegen;

// Support library for generated code
pub mod runtime;

// Re-export key types
pub use codegen::{generate_from_yaml, GenerateError, Generator, GeneratorConfig};
