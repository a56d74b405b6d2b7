//! Schema editor state.

use thiserror::Error;

use crate::preview::FormPreview;
use crate::schema::{FieldDef, FormSchema};
use crate::storage::{SchemaRepository, StorageError};
use crate::timestamp::Timestamp;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BuilderError {
    #[error("Field index {index} out of range ({len} fields)")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("Field id '{0}' is already in use")]
    DuplicateFieldId(String),
    #[error("Form name cannot be empty")]
    EmptyName,
    #[error("Saved form not found: {0}")]
    FormNotFound(String),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// The schema being edited plus the list of saved schemas.
#[derive(Debug, Clone, Default)]
pub struct FormBuilder {
    current: FormSchema,
    saved: Vec<FormSchema>,
    preview_mode: bool,
}

impl FormBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &FormSchema {
        &self.current
    }

    pub fn saved(&self) -> &[FormSchema] {
        &self.saved
    }

    pub fn add_field(&mut self, field: FieldDef) -> Result<(), BuilderError> {
        if self.current.field(&field.id).is_some() {
            return Err(BuilderError::DuplicateFieldId(field.id));
        }
        self.current.fields.push(field);
        Ok(())
    }

    pub fn update_field(&mut self, index: usize, field: FieldDef) -> Result<(), BuilderError> {
        self.check_index(index)?;
        let clash = self
            .current
            .fields
            .iter()
            .enumerate()
            .any(|(i, existing)| i != index && existing.id == field.id);
        if clash {
            return Err(BuilderError::DuplicateFieldId(field.id));
        }
        self.current.fields[index] = field;
        Ok(())
    }

    pub fn delete_field(&mut self, index: usize) -> Result<FieldDef, BuilderError> {
        self.check_index(index)?;
        Ok(self.current.fields.remove(index))
    }

    /// Moves the field at `from` so that it ends up at position `to`.
    pub fn reorder_fields(&mut self, from: usize, to: usize) -> Result<(), BuilderError> {
        self.check_index(from)?;
        self.check_index(to)?;
        let field = self.current.fields.remove(from);
        self.current.fields.insert(to, field);
        Ok(())
    }

    fn check_index(&self, index: usize) -> Result<(), BuilderError> {
        let len = self.current.fields.len();
        if index < len {
            Ok(())
        } else {
            Err(BuilderError::IndexOutOfRange { index, len })
        }
    }

    /// Saves a copy of the current schema under `name` with a fresh
    /// millisecond-timestamp id. The current schema itself is left as is.
    pub async fn save_form(
        &mut self,
        name: &str,
        repo: &dyn SchemaRepository,
    ) -> Result<FormSchema, BuilderError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(BuilderError::EmptyName);
        }
        let created_at = Timestamp::now();
        let mut millis = created_at.timestamp_millis();
        while self.saved.iter().any(|s| s.id == millis.to_string()) {
            millis += 1;
        }

        let schema = FormSchema {
            id: millis.to_string(),
            name: name.to_string(),
            fields: self.current.fields.clone(),
            created_at,
        };
        repo.save(&schema).await?;
        tracing::info!(id = %schema.id, name = %schema.name, "form saved");
        self.saved.push(schema.clone());
        Ok(schema)
    }

    /// Replaces the saved list with the repository's contents.
    pub async fn load_saved_forms(&mut self, repo: &dyn SchemaRepository) -> Result<(), BuilderError> {
        self.saved = repo.list().await?;
        tracing::debug!("loaded {} saved form(s)", self.saved.len());
        Ok(())
    }

    /// Makes a copy of a saved schema the current one.
    pub fn load_form(&mut self, id: &str) -> Result<(), BuilderError> {
        let schema = self
            .saved
            .iter()
            .find(|schema| schema.id == id)
            .ok_or_else(|| BuilderError::FormNotFound(id.to_string()))?;
        self.current = schema.clone();
        Ok(())
    }

    pub fn clear_current_form(&mut self) {
        self.current = FormSchema::default();
    }

    pub fn set_preview_mode(&mut self, enabled: bool) {
        self.preview_mode = enabled;
    }

    pub fn preview_mode(&self) -> bool {
        self.preview_mode
    }

    /// Fields `field_id` may derive from: every non-derived field except itself.
    pub fn available_parent_fields(&self, field_id: &str) -> Vec<&FieldDef> {
        self.current
            .fields
            .iter()
            .filter(|field| field.id != field_id && !field.is_derived)
            .collect()
    }

    pub fn preview(&self) -> FormPreview {
        FormPreview::new(self.current.fields.clone())
    }
}
