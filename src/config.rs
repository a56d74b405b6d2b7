use serde::{Deserialize, Serialize};
use std::{fs::File, io::BufReader, path::Path, path::PathBuf};

use crate::{Error, InternalResult};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct FormwrightConfig {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub preview: PreviewConfig,
}

/// Where the local file repository keeps saved schemas.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageConfig {
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,

    #[serde(default = "default_file_name")]
    pub file_name: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            file_name: default_file_name(),
        }
    }
}

impl StorageConfig {
    pub fn file_path(&self) -> PathBuf {
        self.base_dir.join(&self.file_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PreviewConfig {
    /// Upper bound on derived-value recomputation rounds per refresh.
    #[serde(default = "default_max_derivation_passes")]
    pub max_derivation_passes: usize,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            max_derivation_passes: default_max_derivation_passes(),
        }
    }
}

pub fn from_file<T: for<'de> Deserialize<'de>, P: AsRef<Path>>(path: P) -> InternalResult<T> {
    let file = File::open(path)
        .map_err(|e| Error::Config(format!("Failed to open config file: {}", e)))?;
    let reader = BufReader::new(file);
    let config = serde_json::from_reader(reader)
        .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))?;
    Ok(config)
}

pub fn from_str<T: for<'de> Deserialize<'de>>(s: &str) -> InternalResult<T> {
    let config = serde_json::from_str(s)
        .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;
    Ok(config)
}

fn default_base_dir() -> PathBuf {
    PathBuf::from(".formwright")
}
fn default_file_name() -> String {
    "formBuilder_savedForms.json".to_string()
}
fn default_max_derivation_passes() -> usize {
    8
}
