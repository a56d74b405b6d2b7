use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;

use super::{SchemaRepository, StorageError};
use crate::schema::FormSchema;

/// Process-local repository. Each entry remembers when it was first saved so
/// `list` can return insertion order.
#[derive(Debug, Default)]
pub struct InMemorySchemaRepository {
    schemas: DashMap<String, (u64, FormSchema)>,
    next_seq: AtomicU64,
}

impl InMemorySchemaRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

#[async_trait]
impl SchemaRepository for InMemorySchemaRepository {
    async fn list(&self) -> Result<Vec<FormSchema>, StorageError> {
        let mut entries: Vec<(u64, FormSchema)> = self
            .schemas
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        entries.sort_by_key(|(seq, _)| *seq);
        Ok(entries.into_iter().map(|(_, schema)| schema).collect())
    }

    async fn save(&self, schema: &FormSchema) -> Result<(), StorageError> {
        self.schemas
            .entry(schema.id.clone())
            .and_modify(|(_, existing)| *existing = schema.clone())
            .or_insert_with(|| {
                let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
                (seq, schema.clone())
            });
        Ok(())
    }

    async fn load(&self, id: &str) -> Result<FormSchema, StorageError> {
        self.schemas
            .get(id)
            .map(|entry| entry.value().1.clone())
            .ok_or_else(|| StorageError::NotFound(id.to_string()))
    }

    async fn delete(&self, id: &str) -> Result<(), StorageError> {
        self.schemas
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StorageError::NotFound(id.to_string()))
    }
}
