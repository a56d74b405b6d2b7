use clap::ValueEnum;
use formwright::{FieldDef, FormPreview, FormSchema, FormValue, Value};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaSummary {
    pub id: String,
    pub name: String,
    pub created_at: String,
    pub fields: usize,
}

impl From<&FormSchema> for SchemaSummary {
    fn from(schema: &FormSchema) -> Self {
        Self {
            id: schema.id.clone(),
            name: schema.name.clone(),
            created_at: schema.created_at.to_string(),
            fields: schema.fields.len(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PreviewReport<'a> {
    pub values: &'a formwright::FormData,
    pub errors: &'a BTreeMap<String, String>,
    pub submittable: bool,
}

impl<'a> From<&'a FormPreview> for PreviewReport<'a> {
    fn from(preview: &'a FormPreview) -> Self {
        Self {
            values: preview.values(),
            errors: preview.errors(),
            submittable: preview.is_submittable(),
        }
    }
}

pub fn to_json<T: Serialize>(data: &T) -> Result<String, String> {
    serde_json::to_string_pretty(data).map_err(|e| format!("JSON serialization error: {}", e))
}

pub fn schema_table(schemas: &[FormSchema]) -> String {
    if schemas.is_empty() {
        return "No saved forms".to_string();
    }
    let rows: Vec<[String; 4]> = schemas
        .iter()
        .map(SchemaSummary::from)
        .map(|s| [s.id, s.name, s.created_at, s.fields.to_string()])
        .collect();
    table(["ID", "NAME", "CREATED", "FIELDS"], &rows)
}

pub fn preview_table(preview: &FormPreview) -> String {
    let rows: Vec<[String; 4]> = preview
        .fields()
        .iter()
        .map(|field| {
            [
                field.label.clone(),
                kind_label(field),
                display_value(preview.value(&field.id)),
                preview.error(&field.id).unwrap_or("").to_string(),
            ]
        })
        .collect();
    let mut out = table(["FIELD", "TYPE", "VALUE", "ERROR"], &rows);
    let status = if preview.is_submittable() {
        "ready to submit"
    } else {
        "has errors"
    };
    let _ = write!(out, "\nForm {}", status);
    out
}

pub fn formula_result(value: &Value) -> String {
    value.to_string()
}

fn kind_label(field: &FieldDef) -> String {
    match field.derivation() {
        Some(config) => format!("{} ({})", field.kind, config.logic),
        None => field.kind.to_string(),
    }
}

fn display_value(value: &FormValue) -> String {
    match value {
        FormValue::Null => "-".to_string(),
        other => other.to_string(),
    }
}

fn table<const N: usize>(headers: [&str; N], rows: &[[String; N]]) -> String {
    let mut widths: [usize; N] = headers.map(|h| h.chars().count());
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let mut push_row = |cells: Vec<&str>| {
        let line: Vec<String> = cells
            .iter()
            .zip(widths.iter())
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect();
        let _ = writeln!(out, "{}", line.join("  ").trim_end());
    };
    push_row(headers.to_vec());
    for row in rows {
        push_row(row.iter().map(String::as_str).collect());
    }
    out.trim_end().to_string()
}
