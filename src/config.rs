use crate::domain::VersionBump;
use crate::error::{SemverGitError, Result};
use crate::resolver::SearchMode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name looked up in the working directory and the user config directory
pub const CONFIG_FILE_NAME: &str = "semver-git.toml";

/// Defaults for the tag commands.
///
/// Every key is optional; command-line flags take precedence over values
/// loaded here.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// Tag namespace, e.g. "release" for `release/v1.2.3`
    #[serde(default)]
    pub prefix: String,

    /// Create annotated tags instead of lightweight ones
    #[serde(default)]
    pub annotated: bool,

    /// Remote used when pushing new tags
    #[serde(default = "default_remote")]
    pub remote: String,

    /// Field bumped by `create-tag` when no increment type is given
    #[serde(default)]
    pub increment: VersionBump,

    /// Version used by `create-tag` when no previous tag exists
    #[serde(default)]
    pub initial_version: Option<String>,

    /// Match mode used to locate the previous tag
    #[serde(default)]
    pub search: SearchMode,
}

/// Returns the default remote name.
fn default_remote() -> String {
    "origin".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            prefix: String::new(),
            annotated: false,
            remote: default_remote(),
            increment: VersionBump::default(),
            initial_version: None,
            search: SearchMode::default(),
        }
    }
}

impl Config {
    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

/// Candidate configuration paths, in lookup order, when none is given explicitly
fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = vec![Path::new(".").join(CONFIG_FILE_NAME)];
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join(CONFIG_FILE_NAME));
    }
    paths
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `semver-git.toml` in current directory
/// 3. `semver-git.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If the file exists but cannot be read or parsed, or an explicit
///   path does not exist
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let path = match config_path {
        Some(path) => PathBuf::from(path),
        None => match default_config_paths().into_iter().find(|p| p.exists()) {
            Some(path) => path,
            None => return Ok(Config::default()),
        },
    };

    let content = fs::read_to_string(&path).map_err(|e| {
        SemverGitError::config(format!("cannot read '{}': {}", path.display(), e))
    })?;

    let config = Config::from_toml(&content).map_err(|e| {
        SemverGitError::config(format!("invalid config '{}': {}", path.display(), e))
    })?;
    debug!(path = %path.display(), "loaded configuration");
    Ok(config)
}
