//! Live form preview.
//!
//! [`FormPreview`] owns the value map for one fill-in session. Every change
//! recomputes derived fields and then rebuilds the error map, in that order,
//! so errors always describe the values the user sees.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use thiserror::Error;

use crate::config::PreviewConfig;
use crate::eval::{calculate_derived_value, calculate_derived_value_at};
use crate::schema::{FieldDef, FormData, FormValue};
use crate::validator::validate_form;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PreviewError {
    #[error("Unknown field: {0}")]
    UnknownField(String),
    #[error("Field '{0}' is derived and cannot be edited")]
    ReadOnlyField(String),
    #[error("Form has {} invalid field(s)", .0.len())]
    Invalid(BTreeMap<String, String>),
}

#[derive(Debug, Clone)]
pub struct FormPreview {
    fields: Vec<FieldDef>,
    data: FormData,
    errors: BTreeMap<String, String>,
    max_passes: usize,
    today: Option<NaiveDate>,
}

impl FormPreview {
    pub fn new(fields: Vec<FieldDef>) -> Self {
        Self::with_config(fields, &PreviewConfig::default())
    }

    /// Seeds non-derived fields from their default values (an empty default
    /// string counts as no default) and runs an initial refresh.
    pub fn with_config(fields: Vec<FieldDef>, config: &PreviewConfig) -> Self {
        let data = fields
            .iter()
            .filter(|field| field.derivation().is_none())
            .filter_map(|field| match &field.default_value {
                None | Some(FormValue::Null) => None,
                Some(FormValue::String(s)) if s.is_empty() => None,
                Some(value) => Some((field.id.clone(), value.clone())),
            })
            .collect();
        let mut preview = Self {
            fields,
            data,
            errors: BTreeMap::new(),
            max_passes: config.max_derivation_passes.max(1),
            today: None,
        };
        preview.refresh();
        preview
    }

    /// Pins the date `age_from_dob` measures against.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self.refresh();
        self
    }

    pub fn set_value<V: Into<FormValue>>(&mut self, id: &str, value: V) -> Result<(), PreviewError> {
        let field = self
            .fields
            .iter()
            .find(|field| field.id == id)
            .ok_or_else(|| PreviewError::UnknownField(id.to_string()))?;
        if field.is_derived {
            return Err(PreviewError::ReadOnlyField(id.to_string()));
        }
        self.data.insert(id, value);
        self.refresh();
        Ok(())
    }

    pub fn clear_value(&mut self, id: &str) -> Result<(), PreviewError> {
        self.set_value(id, FormValue::Null)
    }

    /// Recomputes derived values until they settle, then revalidates.
    ///
    /// Each pass computes every derived field from the values as they were at
    /// the start of the pass, so chains of derived fields settle one link per
    /// pass. Cycles never settle and are cut off after `max_derivation_passes`.
    pub fn refresh(&mut self) {
        let mut settled = false;
        for _ in 0..self.max_passes {
            if !self.derive_pass() {
                settled = true;
                break;
            }
        }
        if !settled {
            tracing::warn!(
                passes = self.max_passes,
                "derived values did not settle; check the schema for derivation cycles"
            );
        }
        self.errors = validate_form(&self.fields, &self.data);
    }

    /// Returns whether any derived value changed.
    fn derive_pass(&mut self) -> bool {
        let snapshot = self.data.clone();
        let mut changed = false;
        for field in self.fields.iter().filter(|field| field.derivation().is_some()) {
            let value = match self.today {
                Some(today) => calculate_derived_value_at(field, &snapshot, &self.fields, today),
                None => calculate_derived_value(field, &snapshot, &self.fields),
            };
            if !same_value(snapshot.get(&field.id), &value) {
                self.data.insert(field.id.clone(), value);
                changed = true;
            }
        }
        changed
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn values(&self) -> &FormData {
        &self.data
    }

    pub fn value(&self, id: &str) -> &FormValue {
        self.data.get(id)
    }

    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    pub fn error(&self, id: &str) -> Option<&str> {
        self.errors.get(id).map(String::as_str)
    }

    pub fn is_submittable(&self) -> bool {
        self.errors.is_empty()
    }

    /// The collected values, if every field is valid.
    pub fn submit(&self) -> Result<FormData, PreviewError> {
        if self.is_submittable() {
            tracing::info!(fields = self.data.len(), "form submitted");
            Ok(self.data.clone())
        } else {
            Err(PreviewError::Invalid(self.errors.clone()))
        }
    }
}

/// Equality for settle checks. NaN equals NaN here, otherwise a NaN derived
/// value would look changed on every pass.
fn same_value(a: &FormValue, b: &FormValue) -> bool {
    match (a, b) {
        (FormValue::Number(x), FormValue::Number(y)) if x.is_nan() && y.is_nan() => true,
        _ => a == b,
    }
}
