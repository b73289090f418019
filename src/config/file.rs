use crate::utils::error::{CatalogError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// TOML settings file. Every field has a default, so a missing file or a
/// partial file both work; CLI flags override on top.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub paths: PathsConfig,
    pub comicvine: ComicVineConfig,
    pub library: LibraryConfig,
    pub publishers: PublisherConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub data_file: String,
    pub reading_lists: String,
    pub results_dir: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_file: "Data/data.csv".to_string(),
            reading_lists: "ReadingLists".to_string(),
            results_dir: "Results".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ComicVineConfig {
    pub enabled: bool,
    pub base_url: String,
    pub api_key: String,
    /// Seconds between metadata-service calls. The service rate-limits hard
    /// at roughly 450 requests per 15 minutes; 2 seconds stays well under.
    pub rate_seconds: u64,
    /// Maximum volume searches per run.
    pub search_limit: u64,
    pub force_recheck: bool,
    pub validate_issues: bool,
}

impl Default for ComicVineConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "https://comicvine.gamespot.com/api".to_string(),
            api_key: String::new(),
            rate_seconds: 2,
            search_limit: 10_000,
            force_recheck: false,
            validate_issues: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    pub enabled: bool,
    pub base_url: String,
    pub api_key: String,
    pub force_recheck: bool,
    pub auto_add: bool,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: "http://localhost:8090/".to_string(),
            api_key: String::new(),
            force_recheck: false,
            auto_add: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PublisherConfig {
    pub blacklist: Vec<String>,
    pub preferred: Vec<String>,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            blacklist: vec![
                "Panini Comics".to_string(),
                "Editorial Televisa".to_string(),
                "Planeta DeAgostini".to_string(),
                "Unknown".to_string(),
            ],
            preferred: vec!["Marvel".to_string(), "DC Comics".to_string()],
        }
    }
}

impl FileConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CatalogError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Load the settings file, falling back to defaults when it does not
    /// exist (so a fresh checkout runs without any setup beyond an API key).
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::warn!(
                "settings file {} not found, using defaults",
                path.display()
            );
            Ok(Self::default())
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = substitute_env_vars(content);
        toml::from_str(&processed).map_err(|e| CatalogError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }
}

/// Replace `${VAR_NAME}` placeholders so API keys can live in the
/// environment instead of the settings file. Unset variables are left as-is.
fn substitute_env_vars(content: &str) -> String {
    use regex::Regex;
    let re = Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern is valid");

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    })
    .to_string()
}
