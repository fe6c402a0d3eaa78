//! Result cache addressing and the best-effort cache front.
//!
//! Keys are namespaced by table name and fingerprinted with 64-bit FNV-1.
//! This is an addressing scheme for a cache, not a security boundary.
//!
//! The canonical rendering of a value list is the nested-array dump the
//! reference keys were produced with:
//!
//! ```text
//! Array
//! (
//!     [0] => 1
//! )
//! ```
//!
//! Floats keep 14 significant digits and switch to `1.0E+20` exponent form
//! outside the plain range; see [`render_float`](crate::runtime::value::render_float).

use crate::runtime::entity::Entity;
use crate::runtime::query::Parameters;
use crate::runtime::value::{Row, SqlValue};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

const FNV64_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV64_PRIME: u64 = 0x0000_0100_0000_01b3;

pub const ENTITY_KEY_PREFIX: &str = "ORM-ENTITY_";
pub const QUERY_KEY_PREFIX: &str = "ORM-SQL-RESULTS_";

/// FNV-1 (multiply, then xor) over the UTF-8 bytes of `data`, as 16 hex digits.
pub fn fingerprint(data: &str) -> String {
    let hash = data.bytes().fold(FNV64_OFFSET_BASIS, |hash, byte| {
        hash.wrapping_mul(FNV64_PRIME) ^ u64::from(byte)
    });
    format!("{:016x}", hash)
}

fn render_entries<'a, K, I>(entries: I) -> String
where
    K: std::fmt::Display,
    I: IntoIterator<Item = (K, &'a SqlValue)>,
{
    let mut out = String::from("Array\n(\n");
    for (key, value) in entries {
        out.push_str(&format!("    [{}] => {}\n", key, value.render_loose()));
    }
    out.push_str(")\n");
    out
}

/// Canonical rendering of an ordered value list (keys are 0-based positions).
pub fn render_values(values: &[SqlValue]) -> String {
    render_entries(values.iter().enumerate())
}

/// Canonical rendering of a parameter set, in its own order.
///
/// Named parameters keep insertion order; reordering the same names yields
/// a different rendering, so callers must supply parameters consistently
/// for a given query shape.
pub fn render_parameters(parameters: &Parameters) -> String {
    match parameters {
        Parameters::Positional(values) => render_values(values),
        Parameters::Named(values) => render_entries(values.iter()),
    }
}

/// Cache key for one entity, addressed by its ordered primary-key values.
pub fn entity_key(table_name: &str, primary_key_values: &[SqlValue]) -> String {
    format!(
        "{}{}_{}",
        ENTITY_KEY_PREFIX,
        table_name,
        fingerprint(&render_values(primary_key_values))
    )
}

/// Cache key for the result set of `sql` run with `parameters`.
pub fn query_key(table_name: &str, sql: &str, parameters: &Parameters) -> String {
    format!(
        "{}{}_{}{}",
        QUERY_KEY_PREFIX,
        table_name,
        fingerprint(sql),
        fingerprint(&render_parameters(parameters))
    )
}

/// Key-value store backing the result cache.
///
/// Store failures are indistinguishable from misses to the caller.
pub trait CacheStore: Send + Sync {
    fn get(&self, key: &str) -> Option<Value>;

    fn set(&self, key: &str, value: Value) -> bool;
}

/// Process-local cache store.
#[derive(Debug, Default)]
pub struct MemoryCacheStore {
    entries: Mutex<HashMap<String, Value>>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CacheStore for MemoryCacheStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) -> bool {
        match self.entries.lock() {
            Ok(mut entries) => {
                entries.insert(key.to_string(), value);
                true
            }
            Err(_) => false,
        }
    }
}

/// Outcome of a cache read: the derived key plus the cached rows, if any.
///
/// The key is handed back to the caller so the matching write does not
/// hash it again.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheLookup {
    pub key: String,
    pub rows: Option<Vec<Row>>,
}

impl CacheLookup {
    pub fn is_hit(&self) -> bool {
        self.rows.is_some()
    }
}

/// Cache front used by cache-aware select queries.
#[derive(Clone)]
pub struct CacheResults {
    store: Arc<dyn CacheStore>,
}

impl CacheResults {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    pub fn lookup_entity(&self, table_name: &str, primary_key_values: &[SqlValue]) -> CacheLookup {
        self.lookup(entity_key(table_name, primary_key_values))
    }

    pub fn lookup_query(&self, table_name: &str, sql: &str, parameters: &Parameters) -> CacheLookup {
        self.lookup(query_key(table_name, sql, parameters))
    }

    /// Write `rows` under a key obtained from a previous lookup.
    pub fn store(&self, key: &str, rows: &[Row]) -> bool {
        match serde_json::to_value(rows) {
            Ok(value) => self.store.set(key, value),
            Err(e) => {
                tracing::debug!("Skipping cache write for {}: {}", key, e);
                false
            }
        }
    }

    /// Write the cached row data of `entity` under its primary-key key.
    pub fn store_entity<E: Entity>(&self, entity: &E, rows: &[Row]) -> bool {
        let key = entity_key(E::TABLE_NAME, &entity.extract_primary_key_values());
        self.store(&key, rows)
    }

    fn lookup(&self, key: String) -> CacheLookup {
        let rows = self
            .store
            .get(&key)
            .and_then(|value| serde_json::from_value::<Vec<Row>>(value).ok());
        CacheLookup { key, rows }
    }
}
