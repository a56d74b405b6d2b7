use chrono::NaiveDate;
use formwright::storage::InMemorySchemaRepository;
use formwright::{
    check_schema, BuilderError, DerivationLogic, DerivedConfig, FieldDef, FieldKind, FormBuilder,
    FormPreview, FormValue, PreviewError, SchemaRepository, ValidationRule,
};
use pretty_assertions::assert_eq;

fn profile_builder() -> FormBuilder {
    let mut builder = FormBuilder::new();
    builder
        .add_field(FieldDef::with_id("first", FieldKind::Text, "First Name").mark_required())
        .unwrap();
    builder
        .add_field(FieldDef::with_id("last", FieldKind::Text, "Last Name"))
        .unwrap();
    builder
        .add_field(FieldDef::with_id("dob", FieldKind::Date, "Date of Birth"))
        .unwrap();
    builder
        .add_field(
            FieldDef::with_id("full", FieldKind::Text, "Full Name")
                .derived(DerivedConfig::new(DerivationLogic::Concat, ["first", "last"])),
        )
        .unwrap();
    builder
        .add_field(
            FieldDef::with_id("age", FieldKind::Number, "Age")
                .derived(DerivedConfig::new(DerivationLogic::AgeFromDob, ["dob"])),
        )
        .unwrap();
    builder
}

#[tokio::test]
async fn test_build_save_and_reload() {
    let repo = InMemorySchemaRepository::new();
    let mut builder = profile_builder();
    assert_eq!(check_schema(builder.current()), Ok(()));

    let saved = builder.save_form("Profile", &repo).await.unwrap();
    assert_eq!(saved.fields, builder.current().fields);
    assert!(saved.id.parse::<i64>().is_ok());

    let mut editor = FormBuilder::new();
    editor.load_saved_forms(&repo).await.unwrap();
    assert_eq!(editor.saved().len(), 1);
    editor.load_form(&saved.id).unwrap();
    assert_eq!(editor.current().name, "Profile");
    assert_eq!(editor.current().fields.len(), 5);

    assert_eq!(
        editor.load_form("missing"),
        Err(BuilderError::FormNotFound("missing".to_string()))
    );
}

#[tokio::test]
async fn test_saving_twice_creates_distinct_entries() {
    let repo = InMemorySchemaRepository::new();
    let mut builder = profile_builder();
    let first = builder.save_form("Profile", &repo).await.unwrap();
    let second = builder.save_form("Profile v2", &repo).await.unwrap();
    assert_ne!(first.id, second.id);

    let names: Vec<String> = repo.list().await.unwrap().into_iter().map(|s| s.name).collect();
    assert_eq!(names, vec!["Profile", "Profile v2"]);
}

#[test]
fn test_parent_candidates_exclude_derived_fields() {
    let builder = profile_builder();
    let ids: Vec<&str> = builder
        .available_parent_fields("first")
        .into_iter()
        .map(|f| f.id.as_str())
        .collect();
    assert_eq!(ids, vec!["last", "dob"]);
}

#[test]
fn test_preview_session() {
    let builder = profile_builder();
    let mut preview = builder
        .preview()
        .with_today(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap());

    assert!(!preview.is_submittable());
    assert_eq!(preview.error("first"), Some("First Name is required"));
    assert_eq!(preview.value("full"), &FormValue::Null);

    preview.set_value("first", "Ada").unwrap();
    assert_eq!(preview.value("full"), &FormValue::Null);
    preview.set_value("last", "Lovelace").unwrap();
    preview.set_value("dob", "1990-06-16").unwrap();

    assert_eq!(preview.value("full"), &FormValue::from("Ada Lovelace"));
    assert_eq!(preview.value("age"), &FormValue::Number(33.0));
    assert!(preview.is_submittable());

    let submitted = preview.submit().unwrap();
    assert_eq!(submitted.get("full"), &FormValue::from("Ada Lovelace"));

    assert_eq!(
        preview.set_value("age", 40),
        Err(PreviewError::ReadOnlyField("age".to_string()))
    );
    preview.clear_value("last").unwrap();
    assert_eq!(preview.value("full"), &FormValue::Null);
}

#[test]
fn test_preview_chained_derivations_settle() {
    let fields = vec![
        FieldDef::with_id("price", FieldKind::Number, "Price").with_default(10),
        FieldDef::with_id("qty", FieldKind::Number, "Qty").with_default(3),
        FieldDef::with_id("subtotal", FieldKind::Number, "Subtotal")
            .derived(DerivedConfig::custom("{Price} * {Qty}", ["price", "qty"])),
        FieldDef::with_id("total", FieldKind::Number, "Total")
            .derived(DerivedConfig::custom("{Subtotal} * 1.5", ["subtotal"])),
    ];
    let mut preview = FormPreview::new(fields);
    assert_eq!(preview.value("subtotal"), &FormValue::Number(30.0));
    assert_eq!(preview.value("total"), &FormValue::Number(45.0));

    preview.set_value("qty", 4).unwrap();
    assert_eq!(preview.value("total"), &FormValue::Number(60.0));
}

#[test]
fn test_preview_rejects_invalid_submission() {
    let fields = vec![FieldDef::with_id("mail", FieldKind::Text, "Email")
        .with_rule(ValidationRule::email())];
    let mut preview = FormPreview::new(fields);
    assert!(preview.is_submittable());

    preview.set_value("mail", "nope").unwrap();
    match preview.submit() {
        Err(PreviewError::Invalid(errors)) => {
            assert_eq!(errors["mail"], "Email must be a valid email address");
        }
        other => panic!("expected invalid form, got {:?}", other),
    }
    assert_eq!(
        preview.set_value("unknown", "x"),
        Err(PreviewError::UnknownField("unknown".to_string()))
    );
}
