use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::numeric::format_number;

/// A single entered (or derived) value, shaped like the JSON it is stored as.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormValue {
    #[default]
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
    List(Vec<String>),
}

pub static NULL: FormValue = FormValue::Null;

impl FormValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FormValue::Null)
    }

    /// Script truthiness: `Null`, `false`, `0`, NaN and `""` are falsy.
    /// Lists are always truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            FormValue::Null => false,
            FormValue::Boolean(b) => *b,
            FormValue::Number(n) => *n != 0.0 && !n.is_nan(),
            FormValue::String(s) => !s.is_empty(),
            FormValue::List(_) => true,
        }
    }

    /// Name used in type mismatch messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            FormValue::Null => "null",
            FormValue::Boolean(_) => "boolean",
            FormValue::Number(_) => "number",
            FormValue::String(_) => "string",
            FormValue::List(_) => "array",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FormValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FormValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Text spliced into a formula for a `{label}` placeholder.
    pub fn to_formula_text(&self) -> String {
        match self {
            FormValue::String(s) => s.clone(),
            FormValue::Number(n) => format_number(*n),
            _ => "0".to_string(),
        }
    }
}

impl fmt::Display for FormValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormValue::Null => write!(f, "null"),
            FormValue::Boolean(b) => write!(f, "{}", b),
            FormValue::Number(n) => write!(f, "{}", format_number(*n)),
            FormValue::String(s) => write!(f, "{}", s),
            FormValue::List(items) => write!(f, "{}", items.join(", ")),
        }
    }
}

impl From<bool> for FormValue {
    fn from(b: bool) -> Self {
        FormValue::Boolean(b)
    }
}

impl From<f64> for FormValue {
    fn from(n: f64) -> Self {
        FormValue::Number(n)
    }
}

impl From<i32> for FormValue {
    fn from(n: i32) -> Self {
        FormValue::Number(f64::from(n))
    }
}

impl From<&str> for FormValue {
    fn from(s: &str) -> Self {
        FormValue::String(s.to_string())
    }
}

impl From<String> for FormValue {
    fn from(s: String) -> Self {
        FormValue::String(s)
    }
}

impl From<Vec<String>> for FormValue {
    fn from(items: Vec<String>) -> Self {
        FormValue::List(items)
    }
}

impl<T: Into<FormValue>> From<Option<T>> for FormValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FormValue::Null, Into::into)
    }
}

/// Values keyed by field id. Sparse: an absent id reads as `Null`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormData(BTreeMap<String, FormValue>);

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> &FormValue {
        self.0.get(id).unwrap_or(&NULL)
    }

    /// True when the id has a non-null value.
    pub fn has_value(&self, id: &str) -> bool {
        !self.get(id).is_null()
    }

    pub fn insert<K: Into<String>, V: Into<FormValue>>(&mut self, id: K, value: V) -> Option<FormValue> {
        self.0.insert(id.into(), value.into())
    }

    pub fn remove(&mut self, id: &str) -> Option<FormValue> {
        self.0.remove(id)
    }

    pub fn with<K: Into<String>, V: Into<FormValue>>(mut self, id: K, value: V) -> Self {
        self.insert(id, value);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FormValue)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<FormValue>> FromIterator<(K, V)> for FormData {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl IntoIterator for FormData {
    type Item = (String, FormValue);
    type IntoIter = std::collections::btree_map::IntoIter<String, FormValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
