use chrono::NaiveDate;
use formwright::{
    calculate_derived_value_at, evaluate_formula, validate_field, validate_form, DerivationLogic,
    DerivedConfig, FieldDef, FieldKind, FormData, FormValue, Value, ValidationRule,
};
use proptest::prelude::*;

fn any_kind() -> impl Strategy<Value = FieldKind> {
    prop_oneof![
        Just(FieldKind::Text),
        Just(FieldKind::Textarea),
        Just(FieldKind::Number),
        Just(FieldKind::Select),
        Just(FieldKind::Radio),
        Just(FieldKind::Checkbox),
        Just(FieldKind::Date),
    ]
}

fn any_value() -> impl Strategy<Value = FormValue> {
    prop_oneof![
        Just(FormValue::Null),
        any::<bool>().prop_map(FormValue::Boolean),
        (-1.0e6..1.0e6f64).prop_map(FormValue::Number),
        Just(FormValue::Number(0.0)),
        Just(FormValue::from("")),
        Just(FormValue::from("   ")),
        "[ a-zA-Z0-9@.]{0,16}".prop_map(FormValue::String),
        prop::collection::vec("[a-z]{1,4}", 0..3).prop_map(FormValue::List),
    ]
}

proptest! {
    #[test]
    fn test_null_passes_fields_without_required_rules(kind in any_kind()) {
        let field = FieldDef::with_id("f", kind, "Field")
            .with_rule(ValidationRule::min_length(3))
            .with_rule(ValidationRule::email())
            .with_rule(ValidationRule::password());
        prop_assert_eq!(validate_field(&field, &FormValue::Null), None);
    }

    #[test]
    fn test_required_always_rejects_null(kind in any_kind()) {
        let field = FieldDef::with_id("f", kind, "Field").mark_required();
        prop_assert_eq!(
            validate_field(&field, &FormValue::Null),
            Some("Field is required".to_string())
        );
    }

    #[test]
    fn test_required_and_not_empty_agree(kind in any_kind(), value in any_value()) {
        let required = FieldDef::with_id("f", kind, "Field").with_rule(ValidationRule::required());
        let not_empty = FieldDef::with_id("f", kind, "Field").with_rule(ValidationRule::not_empty());
        prop_assert_eq!(
            validate_field(&required, &value).is_some(),
            validate_field(&not_empty, &value).is_some()
        );
    }

    #[test]
    fn test_field_validation_is_idempotent(kind in any_kind(), value in any_value()) {
        let field = FieldDef::with_id("f", kind, "Field")
            .mark_required()
            .with_rule(ValidationRule::min_length(2))
            .with_rule(ValidationRule::email());
        let first = validate_field(&field, &value);
        prop_assert_eq!(validate_field(&field, &value), first);
    }

    #[test]
    fn test_error_map_matches_field_validation(
        entries in prop::collection::vec((any_kind(), any_value()), 1..8)
    ) {
        let fields: Vec<FieldDef> = entries
            .iter()
            .enumerate()
            .map(|(i, (kind, _))| FieldDef::with_id(format!("f{}", i), *kind, format!("Field {}", i)))
            .collect();
        let data: FormData = entries
            .iter()
            .enumerate()
            .map(|(i, (_, value))| (format!("f{}", i), value.clone()))
            .collect();
        let errors = validate_form(&fields, &data);
        for field in &fields {
            prop_assert_eq!(
                errors.get(&field.id).cloned(),
                validate_field(field, data.get(&field.id))
            );
        }
        prop_assert!(errors.keys().all(|id| fields.iter().any(|f| &f.id == id)));
    }

    #[test]
    fn test_sum_matches_arithmetic(values in prop::collection::vec(-1000i32..1000, 1..6)) {
        let mut fields: Vec<FieldDef> = (0..values.len())
            .map(|i| FieldDef::with_id(format!("n{}", i), FieldKind::Number, format!("N{}", i)))
            .collect();
        let parents: Vec<String> = fields.iter().map(|f| f.id.clone()).collect();
        fields.push(
            FieldDef::with_id("total", FieldKind::Number, "Total")
                .derived(DerivedConfig::new(DerivationLogic::Sum, parents)),
        );
        let data: FormData = values
            .iter()
            .enumerate()
            .map(|(i, v)| (format!("n{}", i), *v))
            .collect();
        let expected: i32 = values.iter().sum();
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let total = calculate_derived_value_at(&fields[values.len()], &data, &fields, today);
        prop_assert_eq!(total, FormValue::Number(f64::from(expected)));
    }

    #[test]
    fn test_integer_arithmetic_matches_rust(a in -10_000i64..10_000, b in -10_000i64..10_000, c in 1i64..100) {
        let formula = format!("{} + {} * {}", a, b, c);
        prop_assert_eq!(evaluate_formula(&formula).unwrap(), Value::Number((a + b * c) as f64));
        let formula = format!("({} - {}) * {}", a, b, c);
        prop_assert_eq!(evaluate_formula(&formula).unwrap(), Value::Number(((a - b) * c) as f64));
    }

    #[test]
    fn test_formula_evaluation_never_panics(text in "[0-9a-z '+*/()-]{0,24}") {
        let _ = evaluate_formula(&text);
    }
}
