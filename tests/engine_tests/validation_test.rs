use formwright::{
    check_field, validate_field, validate_form, FieldDef, FieldKind, FormData, FormSchema,
    FormValue, ValidationError, ValidationRule,
};
use pretty_assertions::assert_eq;

fn registration_schema() -> FormSchema {
    serde_json::from_str(
        r#"{
            "id": "1718438400000",
            "name": "Registration",
            "createdAt": "2024-06-15T08:00:00.000Z",
            "fields": [
                {"id": "user", "type": "text", "label": "Username", "required": true,
                 "validationRules": [
                    {"type": "required", "message": ""},
                    {"type": "minLength", "value": 3, "message": ""},
                    {"type": "maxLength", "value": 12, "message": "Keep it short"}
                 ]},
                {"id": "mail", "type": "text", "label": "Email",
                 "validationRules": [{"type": "email", "message": ""}]},
                {"id": "pass", "type": "text", "label": "Password",
                 "validationRules": [{"type": "password", "message": ""}]},
                {"id": "age", "type": "number", "label": "Age"},
                {"id": "plan", "type": "radio", "label": "Plan",
                 "options": [{"label": "Free", "value": "free"}, {"label": "Pro", "value": "pro"}]},
                {"id": "terms", "type": "checkbox", "label": "Terms",
                 "validationRules": [{"type": "required", "message": "You must accept the terms"}]},
                {"id": "start", "type": "date", "label": "Start date"}
            ]
        }"#,
    )
    .unwrap()
}

#[test]
fn test_valid_submission_has_no_errors() {
    let schema = registration_schema();
    let data = FormData::new()
        .with("user", "ada")
        .with("mail", "ada@example.com")
        .with("pass", "analytical1")
        .with("age", 36)
        .with("plan", "pro")
        .with("terms", true)
        .with("start", "1843-07-01");
    assert!(validate_form(&schema.fields, &data).is_empty());
}

#[test]
fn test_error_map_lists_every_failing_field() {
    let schema = registration_schema();
    let data = FormData::new()
        .with("user", "a very long username")
        .with("mail", "ada@example")
        .with("pass", "password")
        .with("age", "thirty")
        .with("plan", FormValue::List(vec!["free".to_string()]))
        .with("terms", false)
        .with("start", "soon");
    let errors = validate_form(&schema.fields, &data);
    let expected: Vec<(&str, &str)> = vec![
        ("age", "Invalid type: expected number but got string"),
        ("mail", "Email must be a valid email address"),
        ("pass", "Password must be at least 8 characters and contain a number"),
        ("plan", "Invalid type: expected string but got array"),
        ("start", "Please enter a valid date"),
        ("terms", "You must accept the terms"),
        ("user", "Keep it short"),
    ];
    let actual: Vec<(&str, &str)> = errors
        .iter()
        .map(|(id, message)| (id.as_str(), message.as_str()))
        .collect();
    assert_eq!(actual, expected);
}

#[test]
fn test_empty_form_only_flags_required_fields() {
    let schema = registration_schema();
    let errors = validate_form(&schema.fields, &FormData::new());
    let ids: Vec<&str> = errors.keys().map(String::as_str).collect();
    assert_eq!(ids, vec!["terms", "user"]);
    assert_eq!(errors["user"], "Username is required");
}

#[test]
fn test_typed_errors() {
    let number = FieldDef::new(FieldKind::Number, "Amount");
    assert_eq!(
        check_field(&number, &FormValue::from(f64::NAN)),
        Err(ValidationError::InvalidNumber)
    );
    let text = FieldDef::new(FieldKind::Textarea, "Notes").with_rule(ValidationRule::not_empty());
    assert!(matches!(
        check_field(&text, &FormValue::from("")),
        Err(ValidationError::Rule { .. })
    ));
    assert_eq!(
        check_field(&text, &FormValue::from("12")).unwrap_err().to_string(),
        "This field should contain text, not numbers"
    );
    let plain = FieldDef::new(FieldKind::Text, "Comment");
    assert_eq!(
        check_field(&plain, &FormValue::from("   ")),
        Err(ValidationError::NumericText)
    );
}

#[test]
fn test_required_flag_alone_does_not_validate() {
    let mut field = FieldDef::new(FieldKind::Text, "Nickname");
    field.required = true;
    assert_eq!(validate_field(&field, &FormValue::Null), None);
    let field = field.mark_required();
    assert_eq!(
        validate_field(&field, &FormValue::Null),
        Some("Nickname is required".to_string())
    );
}
