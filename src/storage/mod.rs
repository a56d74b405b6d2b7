//! Schema persistence.
//!
//! [`SchemaRepository`] is the seam between the editor and wherever saved
//! schemas live. Two backends are provided:
//!
//! - [`InMemorySchemaRepository`] keeps schemas in process memory.
//! - [`LocalFileSchemaRepository`] keeps every schema in one JSON array file,
//!   the same layout the browser app stored under `formBuilder_savedForms`.
//!
//! # Usage Example
//!
//! ```no_run
//! use formwright::storage::{InMemorySchemaRepository, SchemaRepository};
//! use formwright::FormSchema;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let repo = InMemorySchemaRepository::new();
//! let mut schema = FormSchema::new("Signup");
//! schema.id = "1718438400000".to_string();
//! repo.save(&schema).await?;
//! assert_eq!(repo.load("1718438400000").await?.name, "Signup");
//! # Ok(())
//! # }
//! ```

pub mod in_memory;
pub mod local_fs;

use async_trait::async_trait;
use thiserror::Error;

use crate::schema::FormSchema;

pub use in_memory::InMemorySchemaRepository;
pub use local_fs::LocalFileSchemaRepository;

/// Saved schema collection.
///
/// Implementations must keep insertion order for `list`, and `save` must
/// replace a schema with the same id in place rather than append a second
/// copy.
#[async_trait]
pub trait SchemaRepository: Send + Sync {
    /// All saved schemas, oldest first. An empty store is not an error.
    async fn list(&self) -> Result<Vec<FormSchema>, StorageError>;

    async fn save(&self, schema: &FormSchema) -> Result<(), StorageError>;

    async fn load(&self, id: &str) -> Result<FormSchema, StorageError>;

    async fn delete(&self, id: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum StorageError {
    #[error("Schema not found: {0}")]
    NotFound(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}
