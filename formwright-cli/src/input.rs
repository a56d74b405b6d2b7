use formwright::FormValue;
use serde::de::DeserializeOwned;
use std::{fs, path::Path};

/// Splits `key=value`. The value is read as JSON when it parses (`3`, `true`,
/// `null`, `["a","b"]`, `"quoted"`) and taken as plain text otherwise.
pub fn parse_assignment(s: &str) -> Result<(String, FormValue), String> {
    let (key, raw) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in '{}'", s));
    }
    let value = serde_json::from_str::<FormValue>(raw).unwrap_or_else(|_| FormValue::from(raw));
    Ok((key.to_string(), value))
}

pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    serde_json::from_str(&contents).map_err(|e| format!("Failed to parse {}: {}", path.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("age=42").unwrap(),
            ("age".to_string(), FormValue::Number(42.0))
        );
        assert_eq!(
            parse_assignment("agree=true").unwrap(),
            ("agree".to_string(), FormValue::Boolean(true))
        );
        assert_eq!(
            parse_assignment("name=Ada Lovelace").unwrap(),
            ("name".to_string(), FormValue::from("Ada Lovelace"))
        );
        assert_eq!(
            parse_assignment("code=\"123\"").unwrap(),
            ("code".to_string(), FormValue::from("123"))
        );
        assert_eq!(
            parse_assignment("expr=a=b").unwrap(),
            ("expr".to_string(), FormValue::from("a=b"))
        );
    }

    #[test]
    fn test_parse_assignment_errors() {
        assert!(parse_assignment("novalue").is_err());
        assert!(parse_assignment("=3").is_err());
    }
}
