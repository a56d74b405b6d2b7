//! Local file backend for saved schemas.
//!
//! All schemas live in a single JSON array file. Every mutation rewrites the
//! whole file through a temporary file in the same directory followed by a
//! rename, so readers never observe a half-written collection.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use super::{SchemaRepository, StorageError};
use crate::config::StorageConfig;
use crate::schema::FormSchema;

pub struct LocalFileSchemaRepository {
    config: StorageConfig,
    /// Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl LocalFileSchemaRepository {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            write_lock: Mutex::new(()),
        }
    }

    pub fn in_dir<P: Into<PathBuf>>(base_dir: P) -> Self {
        Self::new(StorageConfig {
            base_dir: base_dir.into(),
            ..StorageConfig::default()
        })
    }

    pub fn file_path(&self) -> PathBuf {
        self.config.file_path()
    }

    async fn read_all(&self) -> Result<Vec<FormSchema>, StorageError> {
        let path = self.file_path();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let contents = fs::read(&path)
            .await
            .map_err(|e| StorageError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        if contents.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        serde_json::from_slice(&contents).map_err(|e| {
            StorageError::Serialization(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    async fn write_all(&self, schemas: &[FormSchema]) -> Result<(), StorageError> {
        let json = serde_json::to_vec_pretty(schemas)
            .map_err(|e| StorageError::Serialization(format!("Failed to serialize schemas: {}", e)))?;
        write_atomically(&self.file_path(), &json).await
    }
}

async fn write_atomically(path: &Path, data: &[u8]) -> Result<(), StorageError> {
    let dir = path.parent().ok_or_else(|| {
        StorageError::InvalidPath(format!("{} has no parent directory", path.display()))
    })?;
    fs::create_dir_all(dir)
        .await
        .map_err(|e| StorageError::InvalidPath(format!("Failed to create directory: {}", e)))?;

    let temp_file = NamedTempFile::new_in(dir)
        .map_err(|e| StorageError::Io(format!("Failed to create temporary file: {}", e)))?;
    let temp_path = temp_file.path().to_path_buf();

    let mut file = fs::File::create(&temp_path)
        .await
        .map_err(|e| StorageError::Io(format!("Failed to open temporary file: {}", e)))?;
    file.write_all(data)
        .await
        .map_err(|e| StorageError::Io(format!("Failed to write temporary file: {}", e)))?;
    file.flush()
        .await
        .map_err(|e| StorageError::Io(format!("Failed to flush temporary file: {}", e)))?;
    drop(file);

    fs::rename(&temp_path, path)
        .await
        .map_err(|e| StorageError::Io(format!("Failed to replace {}: {}", path.display(), e)))?;
    tracing::debug!("wrote {} bytes to {}", data.len(), path.display());
    Ok(())
}

#[async_trait]
impl SchemaRepository for LocalFileSchemaRepository {
    async fn list(&self) -> Result<Vec<FormSchema>, StorageError> {
        self.read_all().await
    }

    async fn save(&self, schema: &FormSchema) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut schemas = self.read_all().await?;
        match schemas.iter_mut().find(|existing| existing.id == schema.id) {
            Some(existing) => *existing = schema.clone(),
            None => schemas.push(schema.clone()),
        }
        self.write_all(&schemas).await
    }

    async fn load(&self, id: &str) -> Result<FormSchema, StorageError> {
        self.read_all()
            .await?
            .into_iter()
            .find(|schema| schema.id == id)
            .ok_or_else(|| StorageError::NotFound(id.to_string()))
    }

    async fn delete(&self, id: &str) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut schemas = self.read_all().await?;
        let before = schemas.len();
        schemas.retain(|schema| schema.id != id);
        if schemas.len() == before {
            return Err(StorageError::NotFound(id.to_string()));
        }
        self.write_all(&schemas).await
    }
}
