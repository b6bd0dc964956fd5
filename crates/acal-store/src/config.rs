//! Store and catalog configuration
//!
//! Both structs deserialize from the `[store]` and `[catalog]` tables of the
//! CLI's TOML config; every field has a default.

use acal_core::AcademicTerm;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// How to reach the store
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path to the SQLite database file; the file must already exist
    pub path: PathBuf,
    /// How long a statement waits on a lock held by another writer
    pub busy_timeout_ms: u64,
    /// Enforce foreign keys declared by the schema
    pub foreign_keys: bool,
}

impl StoreConfig {
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("acal.db"),
            busy_timeout_ms: 5_000,
            foreign_keys: true,
        }
    }
}

/// Settings the catalog binds on behalf of the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Term used by the popular-courses and ranking queries
    pub reporting_term: AcademicTerm,
}

impl CatalogConfig {
    pub fn with_term(reporting_term: AcademicTerm) -> Self {
        Self { reporting_term }
    }
}
