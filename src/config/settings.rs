//! Settings structures for asma-search configuration

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Largest edit distance the fuzzy automaton supports
pub const MAX_FUZZINESS: u8 = 2;

/// Main settings structure matching settings.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub index: IndexSettings,
    pub static_files: StaticSettings,
    pub search: SearchSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings from {}", path.display()))?;
        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("parsing settings from {}", path.display()))?;
        Ok(settings)
    }

    /// Merge with environment variables (ASMA_* prefix)
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("ASMA_INDEX_PATH") {
            self.index.path = PathBuf::from(val);
        }
        if let Ok(val) = std::env::var("ASMA_ARCHIVE_DIR") {
            self.static_files.dir = Some(PathBuf::from(val));
        }
        if let Ok(val) = std::env::var("ASMA_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("ASMA_BIND_ADDRESS") {
            self.server.bind_address = val;
        }
        if let Ok(val) = std::env::var("ASMA_SEARCH_TIMEOUT") {
            if let Ok(secs) = val.parse() {
                self.search.timeout_secs = secs;
            }
        }
    }

    /// Reject combinations the search layer cannot honour
    pub fn validate(&self) -> Result<()> {
        if self.search.fuzziness > MAX_FUZZINESS {
            bail!(
                "search.fuzziness must be at most {}, got {}",
                MAX_FUZZINESS,
                self.search.fuzziness
            );
        }
        if self.search.timeout_secs == 0 {
            bail!("search.timeout_secs must be greater than zero");
        }
        if self.search.max_size == 0 {
            bail!("search.max_size must be greater than zero");
        }
        if !self.static_files.url_prefix.starts_with('/') {
            bail!(
                "static_files.url_prefix must start with '/', got {:?}",
                self.static_files.url_prefix
            );
        }
        Ok(())
    }
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server port
    pub port: u16,
    /// Bind address
    pub bind_address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_address: "0.0.0.0".to_string(),
        }
    }
}

/// Location and layout of the pre-built index
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexSettings {
    /// Index directory on disk
    pub path: PathBuf,
    /// Stored field holding the external document id
    pub id_field: String,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("asma.bleve"),
            id_field: "id".to_string(),
        }
    }
}

/// Static archive served next to the API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticSettings {
    /// Directory with archive assets (none = static serving disabled)
    pub dir: Option<PathBuf>,
    /// URL prefix the directory is mounted under
    pub url_prefix: String,
}

impl Default for StaticSettings {
    fn default() -> Self {
        Self {
            dir: None,
            url_prefix: "/static".to_string(),
        }
    }
}

/// Search behavior settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Offset used when `f` is missing or malformed
    pub default_from: usize,
    /// Page size used when `s` is missing or malformed
    pub default_size: usize,
    /// Facet bucket count used when `fa` is missing or malformed
    pub default_facet_size: usize,
    /// Upper bound for page size and facet bucket count
    pub max_size: usize,
    /// Upper bound for the offset of the first hit
    pub max_from: usize,
    /// Edit distance for the fuzzy endpoint
    pub fuzziness: u8,
    /// Name of the facet returned by the standard endpoint
    pub facet_name: String,
    /// Field the standard endpoint facets over
    pub facet_field: String,
    /// Per-request search timeout in seconds
    pub timeout_secs: u64,
    /// Maximum characters per highlighted fragment
    pub fragment_max_chars: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            default_from: 0,
            default_size: 10,
            default_facet_size: 8,
            max_size: 100,
            max_from: 10_000,
            fuzziness: 2,
            facet_name: "Date".to_string(),
            facet_field: "Date".to_string(),
            timeout_secs: 10,
            fragment_max_chars: 150,
        }
    }
}

impl SearchSettings {
    /// Per-request timeout as a duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
