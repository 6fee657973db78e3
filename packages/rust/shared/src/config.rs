//! Application configuration for gitingester.
//!
//! User config lives at `~/.gitingester/gitingester.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{IngesterError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "gitingester.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".gitingester";

/// Default maximum size of a single ingested file (20 KiB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 20 * 1024;

/// Default output root, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "_processed";

// ---------------------------------------------------------------------------
// Config structs (matching gitingester.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Ingestion safety limits.
    #[serde(default)]
    pub limits: LimitsConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Directory that receives digest files.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Files larger than this many bytes are skipped.
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            max_file_size: default_max_file_size(),
        }
    }
}

fn default_output_dir() -> String {
    DEFAULT_OUTPUT_DIR.into()
}
fn default_max_file_size() -> u64 {
    DEFAULT_MAX_FILE_SIZE
}

/// `[limits]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Stop collecting after this many files.
    #[serde(default = "default_max_files")]
    pub max_files: usize,

    /// Maximum directory depth below the ingestion root.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Stop collecting once the combined size of kept files would exceed this.
    #[serde(default = "default_max_total_size")]
    pub max_total_size: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_files: default_max_files(),
            max_depth: default_max_depth(),
            max_total_size: default_max_total_size(),
        }
    }
}

fn default_max_files() -> usize {
    10_000
}
fn default_max_depth() -> usize {
    20
}
fn default_max_total_size() -> u64 {
    500 * 1024 * 1024
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.gitingester/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| IngesterError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.gitingester/gitingester.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = match config_file_path() {
        Ok(path) => path,
        Err(e) => {
            tracing::debug!(error = %e, "no home directory, using default config");
            return Ok(AppConfig::default());
        }
    };

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| IngesterError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        IngesterError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    tracing::debug!(?path, "loaded config file");

    Ok(config)
}
