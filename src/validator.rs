//! # Field Validation
//!
//! A value is checked in two stages: first against the type its field kind
//! expects, then against the field's rules in declared order. Only the first
//! failure is reported. `Null` is "nothing entered" and always passes the
//! type stage; whether it may stay empty is up to `required`/`notEmpty`.

use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use crate::calendar::parse_calendar_date;
use crate::numeric::parse_number_text;
use crate::schema::{FieldDef, FieldKind, FormData, FormValue, RuleKind, ValidationRule};

lazy_static! {
    static ref EMAIL_PATTERN: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

const MIN_PASSWORD_CHARS: usize = 8;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid type: expected {expected} but got {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },
    #[error("This field should contain text, not numbers")]
    NumericText,
    #[error("Please enter a valid number")]
    InvalidNumber,
    #[error("Please enter a valid date")]
    InvalidDate,
    #[error("{message}")]
    Rule { kind: RuleKind, message: String },
}

/// The user-facing message for the first failed check, if any.
pub fn validate_field(field: &FieldDef, value: &FormValue) -> Option<String> {
    check_field(field, value).err().map(|e| e.to_string())
}

pub fn check_field(field: &FieldDef, value: &FormValue) -> Result<(), ValidationError> {
    check_type(field.kind, value)?;
    field
        .validation_rules
        .iter()
        .try_for_each(|rule| check_rule(rule, &field.label, value))
}

/// Error messages for every failing field, keyed by field id. Fields without
/// a value are validated as `Null`.
pub fn validate_form(fields: &[FieldDef], data: &FormData) -> BTreeMap<String, String> {
    fields
        .iter()
        .filter_map(|field| {
            validate_field(field, data.get(&field.id)).map(|message| (field.id.clone(), message))
        })
        .collect()
}

fn expected_type(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Text | FieldKind::Textarea => "text",
        FieldKind::Number => "number",
        FieldKind::Checkbox => "boolean",
        FieldKind::Select | FieldKind::Radio => "string",
        FieldKind::Date => "date string",
    }
}

fn check_type(kind: FieldKind, value: &FormValue) -> Result<(), ValidationError> {
    let mismatch = || ValidationError::TypeMismatch {
        expected: expected_type(kind),
        actual: value.type_name(),
    };
    match (kind, value) {
        (_, FormValue::Null) => Ok(()),
        (FieldKind::Text | FieldKind::Textarea, FormValue::String(s)) => {
            // Blank text reads as the number 0, so only "" escapes this check.
            if !s.is_empty() && (s.trim().is_empty() || parse_number_text(s).is_some()) {
                Err(ValidationError::NumericText)
            } else {
                Ok(())
            }
        }
        (FieldKind::Number, FormValue::Number(n)) if n.is_nan() => {
            Err(ValidationError::InvalidNumber)
        }
        (FieldKind::Number, FormValue::Number(_)) => Ok(()),
        (FieldKind::Checkbox, FormValue::Boolean(_)) => Ok(()),
        (FieldKind::Select | FieldKind::Radio, FormValue::String(_)) => Ok(()),
        (FieldKind::Date, FormValue::String(s)) => parse_calendar_date(s)
            .map(|_| ())
            .ok_or(ValidationError::InvalidDate),
        _ => Err(mismatch()),
    }
}

fn is_blank(value: &FormValue) -> bool {
    match value {
        FormValue::String(s) => s.trim().is_empty(),
        other => !other.is_truthy(),
    }
}

fn check_rule(rule: &ValidationRule, label: &str, value: &FormValue) -> Result<(), ValidationError> {
    let failed = match rule.kind {
        RuleKind::Required | RuleKind::NotEmpty => is_blank(value),
        RuleKind::MinLength => match (value.as_str(), rule.operand()) {
            (Some(s), Some(min)) => (s.chars().count() as f64) < min,
            _ => false,
        },
        RuleKind::MaxLength => match (value.as_str(), rule.operand()) {
            (Some(s), Some(max)) => (s.chars().count() as f64) > max,
            _ => false,
        },
        RuleKind::Email => value.as_str().is_some_and(|s| !EMAIL_PATTERN.is_match(s)),
        RuleKind::Password => value.as_str().is_some_and(|s| {
            s.chars().count() < MIN_PASSWORD_CHARS || !s.chars().any(|c| c.is_ascii_digit())
        }),
    };
    if !failed {
        return Ok(());
    }
    let message = if rule.message.is_empty() {
        default_message(rule, label)
    } else {
        rule.message.clone()
    };
    Err(ValidationError::Rule {
        kind: rule.kind,
        message,
    })
}

fn default_message(rule: &ValidationRule, label: &str) -> String {
    let operand = rule
        .value
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_default();
    match rule.kind {
        RuleKind::Required => format!("{} is required", label),
        RuleKind::NotEmpty => format!("{} cannot be empty", label),
        RuleKind::MinLength => format!("{} must be at least {} characters", label, operand),
        RuleKind::MaxLength => format!("{} must be no more than {} characters", label, operand),
        RuleKind::Email => format!("{} must be a valid email address", label),
        RuleKind::Password => format!(
            "{} must be at least {} characters and contain a number",
            label, MIN_PASSWORD_CHARS
        ),
    }
}
