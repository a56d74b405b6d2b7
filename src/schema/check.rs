//! Integrity checks over a whole schema.
//!
//! Validation and derivation tolerate broken schemas (they degrade to
//! `Null` or passing rules); these checks are how editors and the CLI find
//! out about the breakage.

use std::collections::{BTreeSet, HashMap, HashSet};

use thiserror::Error;

use super::{DerivationLogic, FieldKind, FormSchema, RuleKind};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Duplicate field id '{id}'")]
    DuplicateFieldId { id: String },
    #[error("Field '{field}' has duplicate option value '{value}'")]
    DuplicateOptionValue { field: String, value: String },
    #[error("Field '{field}' of type {kind} has options but does not use them")]
    UnexpectedOptions { field: String, kind: FieldKind },
    #[error("Derived field '{field}' has no derivation config")]
    MissingDerivedConfig { field: String },
    #[error("Derived field '{field}' references unknown parent '{parent}'")]
    UnknownParent { field: String, parent: String },
    #[error("Derived field '{field}' lists itself as a parent")]
    SelfReference { field: String },
    #[error("Age field '{field}' needs a date field as its first parent")]
    AgeRequiresDateParent { field: String },
    #[error("Field '{field}' has a {rule} rule without a numeric length")]
    MissingLengthOperand { field: String, rule: RuleKind },
    #[error("Derivation cycle between fields: {}", .fields.join(" -> "))]
    DerivationCycle { fields: Vec<String> },
}

/// Returns the first issue found, if any.
pub fn check_schema(schema: &FormSchema) -> Result<(), SchemaError> {
    match schema_issues(schema).into_iter().next() {
        Some(issue) => Err(issue),
        None => Ok(()),
    }
}

/// Every issue in the schema, in field order, cycles last.
#[tracing::instrument(level = "debug", skip(schema), fields(schema = %schema.id))]
pub fn schema_issues(schema: &FormSchema) -> Vec<SchemaError> {
    let mut issues = Vec::new();
    let kinds: HashMap<&str, FieldKind> = schema
        .fields
        .iter()
        .map(|field| (field.id.as_str(), field.kind))
        .collect();

    let mut seen_ids = HashSet::new();
    for field in &schema.fields {
        if !seen_ids.insert(field.id.as_str()) {
            issues.push(SchemaError::DuplicateFieldId {
                id: field.id.clone(),
            });
        }

        if !field.options.is_empty() && !field.kind.has_options() {
            issues.push(SchemaError::UnexpectedOptions {
                field: field.id.clone(),
                kind: field.kind,
            });
        }
        let mut seen_values = HashSet::new();
        for option in &field.options {
            if !seen_values.insert(option.value.as_str()) {
                issues.push(SchemaError::DuplicateOptionValue {
                    field: field.id.clone(),
                    value: option.value.clone(),
                });
            }
        }

        for rule in &field.validation_rules {
            if rule.kind.takes_length() && rule.operand().is_none() {
                issues.push(SchemaError::MissingLengthOperand {
                    field: field.id.clone(),
                    rule: rule.kind,
                });
            }
        }

        if !field.is_derived {
            continue;
        }
        let Some(config) = &field.derived_config else {
            issues.push(SchemaError::MissingDerivedConfig {
                field: field.id.clone(),
            });
            continue;
        };
        for parent in &config.parent_fields {
            if *parent == field.id {
                issues.push(SchemaError::SelfReference {
                    field: field.id.clone(),
                });
            } else if !kinds.contains_key(parent.as_str()) {
                issues.push(SchemaError::UnknownParent {
                    field: field.id.clone(),
                    parent: parent.clone(),
                });
            }
        }
        if config.logic == DerivationLogic::AgeFromDob {
            let first_kind = config
                .parent_fields
                .first()
                .and_then(|parent| kinds.get(parent.as_str()));
            if first_kind != Some(&FieldKind::Date) {
                issues.push(SchemaError::AgeRequiresDateParent {
                    field: field.id.clone(),
                });
            }
        }
    }

    issues.extend(
        derivation_cycles(schema)
            .into_iter()
            .map(|fields| SchemaError::DerivationCycle { fields }),
    );
    if !issues.is_empty() {
        tracing::debug!("schema has {} issue(s)", issues.len());
    }
    issues
}

#[derive(Clone, Copy, PartialEq)]
enum Visit {
    InProgress,
    Done,
}

/// Cycles among derived fields, each reported once, starting from the member
/// that comes first in the schema. Self references are left to
/// [`SchemaError::SelfReference`].
fn derivation_cycles(schema: &FormSchema) -> Vec<Vec<String>> {
    let edges: HashMap<&str, Vec<&str>> = schema
        .fields
        .iter()
        .filter_map(|field| {
            field.derivation().map(|config| {
                let parents = config
                    .parent_fields
                    .iter()
                    .map(String::as_str)
                    .filter(|parent| *parent != field.id)
                    .collect();
                (field.id.as_str(), parents)
            })
        })
        .collect();

    let mut state: HashMap<&str, Visit> = HashMap::new();
    let mut stack: Vec<&str> = Vec::new();
    let mut seen: HashSet<BTreeSet<&str>> = HashSet::new();
    let mut cycles = Vec::new();

    for field in &schema.fields {
        visit(
            field.id.as_str(),
            &edges,
            &mut state,
            &mut stack,
            &mut seen,
            &mut cycles,
        );
    }

    let order: HashMap<&str, usize> = schema
        .fields
        .iter()
        .enumerate()
        .map(|(i, field)| (field.id.as_str(), i))
        .collect();
    cycles
        .into_iter()
        .map(|mut cycle: Vec<&str>| {
            if let Some(start) = (0..cycle.len()).min_by_key(|&i| order.get(cycle[i])) {
                cycle.rotate_left(start);
            }
            cycle.into_iter().map(str::to_string).collect()
        })
        .collect()
}

fn visit<'a>(
    node: &'a str,
    edges: &HashMap<&'a str, Vec<&'a str>>,
    state: &mut HashMap<&'a str, Visit>,
    stack: &mut Vec<&'a str>,
    seen: &mut HashSet<BTreeSet<&'a str>>,
    cycles: &mut Vec<Vec<&'a str>>,
) {
    match state.get(node) {
        Some(Visit::Done) => return,
        Some(Visit::InProgress) => {
            if let Some(start) = stack.iter().position(|n| *n == node) {
                let cycle = stack[start..].to_vec();
                if seen.insert(cycle.iter().copied().collect()) {
                    cycles.push(cycle);
                }
            }
            return;
        }
        None => {}
    }

    let Some(parents) = edges.get(node) else {
        state.insert(node, Visit::Done);
        return;
    };
    state.insert(node, Visit::InProgress);
    stack.push(node);
    for &parent in parents {
        visit(parent, edges, state, stack, seen, cycles);
    }
    stack.pop();
    state.insert(node, Visit::Done);
}
