//! # Form Schema Model
//!
//! A [`FormSchema`] is a named, ordered list of [`FieldDef`]s. Field order is
//! both display order and the order in which derived fields are resolved.
//! Everything here serializes to the camelCase JSON layout saved schemas use
//! on disk (`validationRules`, `isDerived`, `derivedConfig`, `createdAt`).

pub mod check;
pub mod field;
pub mod value;

use serde::{Deserialize, Serialize};

use crate::timestamp::Timestamp;

pub use check::{check_schema, schema_issues, SchemaError};
pub use field::{
    DerivationLogic, DerivedConfig, FieldDef, FieldKind, RuleKind, RuleOperand, SelectOption,
    ValidationRule,
};
pub use value::{FormData, FormValue};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSchema {
    /// Empty until the schema is saved.
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldDef>,
    #[serde(default)]
    pub created_at: Timestamp,
}

impl FormSchema {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            fields: Vec::new(),
            created_at: Timestamp::now(),
        }
    }

    pub fn with_fields(mut self, fields: Vec<FieldDef>) -> Self {
        self.fields = fields;
        self
    }

    pub fn field(&self, id: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|field| field.id == id)
    }

    pub fn derived_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter().filter(|field| field.derivation().is_some())
    }
}

impl Default for FormSchema {
    fn default() -> Self {
        Self::new("")
    }
}
