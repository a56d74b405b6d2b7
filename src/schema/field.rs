use std::fmt;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use uuid::Uuid;

use super::value::FormValue;
use crate::numeric::{format_number, parse_number_text};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FieldKind {
    Text,
    Number,
    Textarea,
    Select,
    Radio,
    Checkbox,
    Date,
}

impl FieldKind {
    pub fn is_textual(&self) -> bool {
        matches!(self, FieldKind::Text | FieldKind::Textarea)
    }

    /// Kinds whose values come from a fixed option list.
    pub fn has_options(&self) -> bool {
        matches!(self, FieldKind::Select | FieldKind::Radio)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum RuleKind {
    Required,
    NotEmpty,
    MinLength,
    MaxLength,
    Email,
    Password,
}

impl RuleKind {
    pub fn takes_length(&self) -> bool {
        matches!(self, RuleKind::MinLength | RuleKind::MaxLength)
    }
}

/// Rule operand as stored: editors write numbers, older data has numeric text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleOperand {
    Number(f64),
    Text(String),
}

impl RuleOperand {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            RuleOperand::Number(n) if !n.is_nan() => Some(*n),
            RuleOperand::Number(_) => None,
            RuleOperand::Text(s) => parse_number_text(s),
        }
    }
}

impl fmt::Display for RuleOperand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleOperand::Number(n) => write!(f, "{}", format_number(*n)),
            RuleOperand::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<usize> for RuleOperand {
    fn from(n: usize) -> Self {
        RuleOperand::Number(n as f64)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationRule {
    #[serde(rename = "type")]
    pub kind: RuleKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<RuleOperand>,
    /// Overrides the default message when non-empty.
    #[serde(default)]
    pub message: String,
}

impl ValidationRule {
    pub fn new(kind: RuleKind) -> Self {
        Self {
            kind,
            value: None,
            message: String::new(),
        }
    }

    pub fn required() -> Self {
        Self::new(RuleKind::Required)
    }

    pub fn not_empty() -> Self {
        Self::new(RuleKind::NotEmpty)
    }

    pub fn min_length(n: usize) -> Self {
        Self::new(RuleKind::MinLength).with_value(n)
    }

    pub fn max_length(n: usize) -> Self {
        Self::new(RuleKind::MaxLength).with_value(n)
    }

    pub fn email() -> Self {
        Self::new(RuleKind::Email)
    }

    pub fn password() -> Self {
        Self::new(RuleKind::Password)
    }

    pub fn with_value<V: Into<RuleOperand>>(mut self, value: V) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_message<S: Into<String>>(mut self, message: S) -> Self {
        self.message = message.into();
        self
    }

    pub fn operand(&self) -> Option<f64> {
        self.value.as_ref().and_then(RuleOperand::as_number)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

impl SelectOption {
    pub fn new<L: Into<String>, V: Into<String>>(label: L, value: V) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DerivationLogic {
    AgeFromDob,
    Sum,
    Concat,
    Custom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedConfig {
    /// Ordered; `age_from_dob` only looks at the first entry.
    #[serde(default)]
    pub parent_fields: Vec<String>,
    /// Only read by `custom`.
    #[serde(default)]
    pub formula: String,
    pub logic: DerivationLogic,
}

impl DerivedConfig {
    pub fn new<I, S>(logic: DerivationLogic, parents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            parent_fields: parents.into_iter().map(Into::into).collect(),
            formula: String::new(),
            logic,
        }
    }

    pub fn custom<I, S, F>(formula: F, parents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Into<String>,
    {
        Self {
            formula: formula.into(),
            ..Self::new(DerivationLogic::Custom, parents)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDef {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    pub label: String,
    /// Display flag; validation only looks at `validation_rules`.
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<FormValue>,
    #[serde(default)]
    pub validation_rules: Vec<ValidationRule>,
    #[serde(default)]
    pub options: Vec<SelectOption>,
    #[serde(default)]
    pub is_derived: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub derived_config: Option<DerivedConfig>,
}

impl FieldDef {
    pub fn new<S: Into<String>>(kind: FieldKind, label: S) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), kind, label)
    }

    pub fn with_id<I: Into<String>, S: Into<String>>(id: I, kind: FieldKind, label: S) -> Self {
        Self {
            id: id.into(),
            kind,
            label: label.into(),
            required: false,
            default_value: None,
            validation_rules: Vec::new(),
            options: Vec::new(),
            is_derived: false,
            derived_config: None,
        }
    }

    /// Sets the required flag and adds a `required` rule if none exists, so
    /// the flag and the rules agree.
    pub fn mark_required(mut self) -> Self {
        self.required = true;
        if !self
            .validation_rules
            .iter()
            .any(|rule| rule.kind == RuleKind::Required)
        {
            self.validation_rules.insert(0, ValidationRule::required());
        }
        self
    }

    pub fn with_rule(mut self, rule: ValidationRule) -> Self {
        self.validation_rules.push(rule);
        self
    }

    pub fn with_option<L: Into<String>, V: Into<String>>(mut self, label: L, value: V) -> Self {
        self.options.push(SelectOption::new(label, value));
        self
    }

    pub fn with_default<V: Into<FormValue>>(mut self, value: V) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn derived(mut self, config: DerivedConfig) -> Self {
        self.is_derived = true;
        self.derived_config = Some(config);
        self
    }

    /// The derivation config, present only for fields flagged as derived.
    pub fn derivation(&self) -> Option<&DerivedConfig> {
        if self.is_derived {
            self.derived_config.as_ref()
        } else {
            None
        }
    }
}
