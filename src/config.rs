//! Configuration file handling.
//!
//! This module provides loading and parsing of `.graphql_typegen.json`
//! configuration files. Every setting is optional; command-line arguments
//! take precedence over the file, and the file over built-in defaults.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the current directory.
pub const CONFIG_FILE_NAME: &str = ".graphql_typegen.json";

/// Top-level configuration file structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Metadata dump to read entities from
    #[serde(default)]
    pub metadata: Option<PathBuf>,

    /// Project root that `types_path` is resolved against
    #[serde(default)]
    pub project_root: Option<PathBuf>,

    /// Output directory for generated types, relative to the project root
    #[serde(default)]
    pub types_path: Option<PathBuf>,

    /// Entity namespaces replacing the ones recorded in the metadata dump
    #[serde(default)]
    pub entity_namespaces: Option<Vec<String>>,
}

impl Config {
    /// Load configuration.
    ///
    /// With an explicit path the file must exist. Without one,
    /// `.graphql_typegen.json` in the current directory is used when present
    /// and defaults otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - An explicitly given file doesn't exist
    /// - The file cannot be read
    /// - The JSON is invalid or has unknown fields
    pub fn load(explicit: Option<&Path>) -> Result<Self, Box<dyn Error>> {
        let config_path = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(format!("Configuration file not found: {}", path.display()).into());
                }
                path.to_path_buf()
            }
            None => {
                let path = PathBuf::from(CONFIG_FILE_NAME);
                if !path.exists() {
                    return Ok(Self::default());
                }
                path
            }
        };

        Self::from_file(&config_path)
    }

    fn from_file(path: &Path) -> Result<Self, Box<dyn Error>> {
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| format!("Invalid JSON in {}: {}", path.display(), e))?;

        Ok(config)
    }
}
