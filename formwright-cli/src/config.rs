use directories::ProjectDirs;
use formwright::config::{self as core_config, FormwrightConfig};
use std::{
    fs,
    io,
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid config file {path}: {message}")]
    Invalid { path: PathBuf, message: String },

    #[error("No home directory found")]
    NoHomeDir,

    #[error("Failed to create store directory: {0}")]
    CreateStoreDir(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Reads the config file if it exists. A missing file is not an error; the
/// caller falls back to defaults.
pub fn load_config(path: &Path) -> ConfigResult<Option<FormwrightConfig>> {
    if !path.exists() {
        return Ok(None);
    }
    core_config::from_file(path)
        .map(Some)
        .map_err(|e| ConfigError::Invalid {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

/// Where saved schemas live.
/// Precedence:
/// - `--store` argument or `FORMWRIGHT_STORE` (by clap)
/// - `storage.base_dir` of a loaded config file
/// - the platform data directory
pub fn resolve_store_dir(
    explicit: Option<&Path>,
    config: Option<&FormwrightConfig>,
) -> ConfigResult<PathBuf> {
    if let Some(dir) = explicit {
        return Ok(dir.to_path_buf());
    }
    if let Some(config) = config {
        return Ok(config.storage.base_dir.clone());
    }
    let proj_dirs =
        ProjectDirs::from("com", "formwright", "formwright").ok_or(ConfigError::NoHomeDir)?;
    let data_dir = proj_dirs.data_dir();
    if !data_dir.exists() {
        fs::create_dir_all(data_dir).map_err(|e| ConfigError::CreateStoreDir(e.to_string()))?;
    }
    Ok(data_dir.to_path_buf())
}
