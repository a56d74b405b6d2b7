use chrono::NaiveDate;
use formwright::{
    calculate_derived_value_at, evaluate_formula, DerivationLogic, DerivedConfig, FieldDef,
    FieldKind, FormData, FormValue, FormulaError, Value,
};
use pretty_assertions::assert_eq;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

fn order_fields() -> Vec<FieldDef> {
    vec![
        FieldDef::with_id("qty", FieldKind::Number, "Quantity"),
        FieldDef::with_id("price", FieldKind::Number, "Unit Price"),
        FieldDef::with_id("note", FieldKind::Text, "Note"),
        FieldDef::with_id("total", FieldKind::Number, "Total").derived(DerivedConfig::custom(
            "{Quantity} * {Unit Price}",
            ["qty", "price"],
        )),
    ]
}

fn derive(field_id: &str, fields: &[FieldDef], data: &FormData) -> FormValue {
    let field = fields.iter().find(|f| f.id == field_id).unwrap();
    calculate_derived_value_at(field, data, fields, today())
}

#[test]
fn test_custom_formula_uses_labels() {
    let fields = order_fields();
    let data = FormData::new().with("qty", 4).with("price", 2.5);
    assert_eq!(derive("total", &fields, &data), FormValue::Number(10.0));
}

#[test]
fn test_custom_formula_waits_for_all_parents() {
    let fields = order_fields();
    let data = FormData::new().with("qty", 4);
    assert_eq!(derive("total", &fields, &data), FormValue::Null);
}

#[test]
fn test_custom_formula_failures_are_null() {
    let mut fields = order_fields();
    fields.push(
        FieldDef::with_id("ratio", FieldKind::Number, "Ratio")
            .derived(DerivedConfig::custom("{Quantity} / {Unit Price}", ["qty", "price"])),
    );
    fields.push(
        FieldDef::with_id("broken", FieldKind::Number, "Broken")
            .derived(DerivedConfig::custom("{Quantity} *", ["qty"])),
    );
    let data = FormData::new().with("qty", 4).with("price", 0);
    assert_eq!(derive("ratio", &fields, &data), FormValue::Null);
    assert_eq!(derive("broken", &fields, &data), FormValue::Null);
}

#[test]
fn test_custom_formula_with_text_parent() {
    let fields = vec![
        FieldDef::with_id("first", FieldKind::Text, "First"),
        FieldDef::with_id("greeting", FieldKind::Text, "Greeting")
            .derived(DerivedConfig::custom("'Dear ' + '{First}'", ["first"])),
    ];
    let data = FormData::new().with("first", "Grace");
    assert_eq!(
        derive("greeting", &fields, &data),
        FormValue::String("Dear Grace".to_string())
    );
}

#[test]
fn test_sum_ignores_non_number_parents() {
    let fields = vec![
        FieldDef::with_id("a", FieldKind::Number, "A"),
        FieldDef::with_id("b", FieldKind::Number, "B"),
        FieldDef::with_id("c", FieldKind::Text, "C"),
        FieldDef::with_id("s", FieldKind::Number, "S")
            .derived(DerivedConfig::new(DerivationLogic::Sum, ["a", "b", "c"])),
    ];
    let data = FormData::new().with("a", 1.5).with("b", "2.5kg").with("c", "100");
    assert_eq!(derive("s", &fields, &data), FormValue::Number(4.0));
}

#[test]
fn test_concat_joins_trimmed_text() {
    let fields = vec![
        FieldDef::with_id("first", FieldKind::Text, "First"),
        FieldDef::with_id("middle", FieldKind::Text, "Middle"),
        FieldDef::with_id("last", FieldKind::Textarea, "Last"),
        FieldDef::with_id("full", FieldKind::Text, "Full").derived(DerivedConfig::new(
            DerivationLogic::Concat,
            ["first", "middle", "last"],
        )),
    ];
    let data = FormData::new()
        .with("first", "  Ada ")
        .with("middle", "")
        .with("last", "Lovelace");
    assert_eq!(
        derive("full", &fields, &data),
        FormValue::String("Ada Lovelace".to_string())
    );
}

#[test]
fn test_age_from_date_of_birth() {
    let fields = vec![
        FieldDef::with_id("dob", FieldKind::Date, "Birthday"),
        FieldDef::with_id("age", FieldKind::Number, "Age")
            .derived(DerivedConfig::new(DerivationLogic::AgeFromDob, ["dob"])),
    ];
    let cases = [
        ("2000-06-15", FormValue::Number(24.0)),
        ("2000-06-16", FormValue::Number(23.0)),
        ("1990-01-01", FormValue::Number(34.0)),
        ("not a date", FormValue::Null),
    ];
    for (dob, expected) in cases {
        let data = FormData::new().with("dob", dob);
        assert_eq!(derive("age", &fields, &data), expected, "dob {}", dob);
    }
}

#[test]
fn test_deeply_nested_formulas_become_null() {
    let nested = format!("{}1{}", "(".repeat(5000), ")".repeat(5000));
    assert!(matches!(
        evaluate_formula(&nested),
        Err(FormulaError::Parse(_))
    ));

    let fields = vec![
        FieldDef::with_id("qty", FieldKind::Number, "Quantity"),
        FieldDef::with_id("deep", FieldKind::Number, "Deep").derived(DerivedConfig::custom(
            format!("{}{{Quantity}}{}", "(".repeat(5000), ")".repeat(5000)),
            ["qty"],
        )),
        FieldDef::with_id("signs", FieldKind::Number, "Signs").derived(DerivedConfig::custom(
            format!("{}{{Quantity}}", "-".repeat(20000)),
            ["qty"],
        )),
    ];
    let data = FormData::new().with("qty", 3);
    assert_eq!(derive("deep", &fields, &data), FormValue::Null);
    assert_eq!(derive("signs", &fields, &data), FormValue::Null);
}

#[test]
fn test_formula_engine_semantics() {
    let cases = [
        ("1 + 2 * 3", Value::Number(7.0)),
        ("(1 + 2) * 3", Value::Number(9.0)),
        ("'3' + 4", Value::String("34".to_string())),
        ("'10' - 4", Value::Number(6.0)),
        ("-'2' * 3", Value::Number(-6.0)),
        ("7 / 2", Value::Number(3.5)),
    ];
    for (formula, expected) in cases {
        assert_eq!(evaluate_formula(formula).unwrap(), expected, "{}", formula);
    }
    assert!(evaluate_formula("1 / 0").is_err());
    assert!(evaluate_formula("undefinedName + 1").is_err());
    assert!(evaluate_formula("'abc' * 2").is_err());
}
