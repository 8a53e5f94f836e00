use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Which driver implementation to construct. Decided once, at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverKind {
    #[default]
    Tantivy,
    Null,
}

/// Search layer configuration, merged from `seekdb.toml` and `SEEKDB_*`
/// environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub driver: DriverKind,
    pub index_dir: String,
    /// Schema field holding the unique document id. Mutations match on it.
    pub id_field: String,
    /// Schema field the driver filters on when a search is scoped to
    /// document types.
    pub doc_type_field: String,
    /// Page size used by `get`, which always fetches the first page.
    pub default_limit: usize,
    pub per_page: usize,
    pub writer_heap_bytes: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            driver: DriverKind::default(),
            index_dir: "data/index".to_string(),
            id_field: "id".to_string(),
            doc_type_field: "doc_type".to_string(),
            default_limit: 10,
            per_page: 15,
            writer_heap_bytes: 50_000_000,
        }
    }
}

impl SearchConfig {
    pub fn load() -> Result<Self> {
        Figment::new()
            .merge(Toml::file("seekdb.toml"))
            .merge(Env::prefixed("SEEKDB_"))
            .extract()
            .map_err(|e| Error::InvalidConfig(e.to_string()))
    }

    /// The index directory with `~` and `$VAR` references expanded.
    pub fn index_path(&self) -> PathBuf {
        expand_path(&self.index_dir)
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}
