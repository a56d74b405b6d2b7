//! Derived field computation.
//!
//! Every strategy reads parent values out of the value map and never fails
//! outward: whatever cannot be computed is `Null`.

use chrono::{Local, NaiveDate};

use crate::calendar::{parse_calendar_date, whole_years_between};
use crate::numeric::{format_number, parse_float_prefix};
use crate::schema::{DerivationLogic, DerivedConfig, FieldDef, FieldKind, FormData, FormValue};

use super::{formula, Value};

/// Computes `field`'s derived value as of the local calendar date.
pub fn calculate_derived_value(field: &FieldDef, data: &FormData, fields: &[FieldDef]) -> FormValue {
    calculate_derived_value_at(field, data, fields, Local::now().date_naive())
}

/// Same as [`calculate_derived_value`] with an explicit "today" for
/// `age_from_dob`.
pub fn calculate_derived_value_at(
    field: &FieldDef,
    data: &FormData,
    fields: &[FieldDef],
    today: NaiveDate,
) -> FormValue {
    let Some(config) = field.derivation() else {
        return FormValue::Null;
    };
    if let Some(missing) = config.parent_fields.iter().find(|id| !data.has_value(id)) {
        tracing::trace!(field = %field.id, parent = %missing, "parent value missing");
        return FormValue::Null;
    }

    match config.logic {
        DerivationLogic::AgeFromDob => age_from_dob(config, data, fields, today),
        DerivationLogic::Sum => sum(config, data, fields),
        DerivationLogic::Concat => concat(config, data, fields),
        DerivationLogic::Custom => custom(field, config, data, fields),
    }
}

/// Parent fields that exist in the schema, in declared order.
fn parents<'a>(config: &'a DerivedConfig, fields: &'a [FieldDef]) -> impl Iterator<Item = &'a FieldDef> {
    config
        .parent_fields
        .iter()
        .filter_map(move |id| fields.iter().find(|field| field.id == *id))
}

fn age_from_dob(config: &DerivedConfig, data: &FormData, fields: &[FieldDef], today: NaiveDate) -> FormValue {
    let Some(dob_id) = config.parent_fields.first() else {
        return FormValue::Null;
    };
    if !fields
        .iter()
        .any(|field| field.id == *dob_id && field.kind == FieldKind::Date)
    {
        return FormValue::Null;
    }
    data.get(dob_id)
        .as_str()
        .and_then(parse_calendar_date)
        .map_or(FormValue::Null, |dob| {
            FormValue::Number(f64::from(whole_years_between(dob, today)))
        })
}

fn sum(config: &DerivedConfig, data: &FormData, fields: &[FieldDef]) -> FormValue {
    let total = parents(config, fields)
        .filter(|field| field.kind == FieldKind::Number)
        .map(|field| match data.get(&field.id) {
            FormValue::Number(n) => *n,
            FormValue::String(s) => parse_float_prefix(s).unwrap_or(0.0),
            _ => 0.0,
        })
        .sum();
    FormValue::Number(total)
}

fn concat(config: &DerivedConfig, data: &FormData, fields: &[FieldDef]) -> FormValue {
    let parts: Vec<String> = parents(config, fields)
        .filter(|field| field.kind.is_textual())
        .map(|field| match data.get(&field.id) {
            FormValue::String(s) => s.trim().to_string(),
            FormValue::Number(n) => format_number(*n),
            _ => String::new(),
        })
        .filter(|part| !part.is_empty())
        .collect();
    FormValue::String(parts.join(" "))
}

fn custom(field: &FieldDef, config: &DerivedConfig, data: &FormData, fields: &[FieldDef]) -> FormValue {
    let bindings: Vec<(&str, String)> = parents(config, fields)
        .map(|parent| (parent.label.as_str(), data.get(&parent.id).to_formula_text()))
        .collect();
    let text = formula::substitute_placeholders(&config.formula, &bindings);

    match formula::evaluate_formula(&text) {
        Ok(Value::Number(n)) => FormValue::Number(n),
        Ok(Value::String(s)) => FormValue::String(s),
        Ok(other) => {
            tracing::debug!(field = %field.id, "formula produced a {} value", other.type_name());
            FormValue::Null
        }
        Err(e) => {
            tracing::warn!(field = %field.id, formula = %text, "Error calculating derived value: {}", e);
            FormValue::Null
        }
    }
}
