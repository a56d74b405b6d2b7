use std::sync::Arc;

use formwright::config::{FormwrightConfig, StorageConfig};
use formwright::storage::{InMemorySchemaRepository, LocalFileSchemaRepository};
use formwright::{
    DerivedConfig, FieldDef, FieldKind, FormBuilder, FormSchema, SchemaRepository, StorageError,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn schema(id: &str, name: &str) -> FormSchema {
    let mut schema = FormSchema::new(name).with_fields(vec![
        FieldDef::with_id("qty", FieldKind::Number, "Qty"),
        FieldDef::with_id("double", FieldKind::Number, "Double")
            .derived(DerivedConfig::custom("{Qty} * 2", ["qty"])),
    ]);
    schema.id = id.to_string();
    schema
}

async fn exercise(repo: &dyn SchemaRepository) {
    assert!(repo.list().await.unwrap().is_empty());

    repo.save(&schema("1", "First")).await.unwrap();
    repo.save(&schema("2", "Second")).await.unwrap();
    repo.save(&schema("1", "First, renamed")).await.unwrap();

    let names: Vec<String> = repo.list().await.unwrap().into_iter().map(|s| s.name).collect();
    assert_eq!(names, vec!["First, renamed", "Second"]);
    assert_eq!(repo.load("2").await.unwrap(), schema("2", "Second"));

    repo.delete("1").await.unwrap();
    assert_eq!(
        repo.load("1").await,
        Err(StorageError::NotFound("1".to_string()))
    );
    assert_eq!(repo.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_in_memory_repository_contract() {
    exercise(&InMemorySchemaRepository::new()).await;
}

#[tokio::test]
async fn test_local_file_repository_contract() {
    let temp_dir = TempDir::new().unwrap();
    exercise(&LocalFileSchemaRepository::in_dir(temp_dir.path())).await;
}

#[tokio::test]
async fn test_local_file_layout_is_a_json_array() {
    let temp_dir = TempDir::new().unwrap();
    let config = StorageConfig {
        base_dir: temp_dir.path().join("nested"),
        file_name: "forms.json".to_string(),
    };
    let repo = LocalFileSchemaRepository::new(config);
    repo.save(&schema("1718438400000", "Order")).await.unwrap();

    let path = temp_dir.path().join("nested").join("forms.json");
    assert_eq!(repo.file_path(), path);
    let raw: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let entry = &raw[0];
    assert_eq!(entry["id"], "1718438400000");
    assert_eq!(entry["name"], "Order");
    assert_eq!(entry["fields"][1]["isDerived"], true);
    assert_eq!(entry["fields"][1]["derivedConfig"]["parentFields"][0], "qty");
    assert_eq!(entry["fields"][1]["derivedConfig"]["logic"], "custom");
    assert!(entry["createdAt"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn test_corrupt_store_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    let repo = LocalFileSchemaRepository::in_dir(temp_dir.path());
    std::fs::write(repo.file_path(), "{ not json").unwrap();
    assert!(matches!(
        repo.list().await,
        Err(StorageError::Serialization(_))
    ));
}

#[tokio::test]
async fn test_concurrent_saves_keep_every_schema() {
    let temp_dir = TempDir::new().unwrap();
    let repo = Arc::new(LocalFileSchemaRepository::in_dir(temp_dir.path()));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let repo = Arc::clone(&repo);
            tokio::spawn(async move { repo.save(&schema(&i.to_string(), "Form")).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }
    assert_eq!(repo.list().await.unwrap().len(), 8);
}

#[tokio::test]
async fn test_builder_persists_through_configured_store() {
    let temp_dir = TempDir::new().unwrap();
    let json = serde_json::json!({ "storage": { "base_dir": temp_dir.path() } });
    let config: FormwrightConfig = formwright::config::from_str(&json.to_string()).unwrap();
    assert_eq!(config.storage.base_dir, temp_dir.path());
    let repo = LocalFileSchemaRepository::new(config.storage.clone());

    let mut builder = FormBuilder::new();
    builder
        .add_field(FieldDef::with_id("name", FieldKind::Text, "Name"))
        .unwrap();
    let saved = builder.save_form("Contact", &repo).await.unwrap();

    let reopened = LocalFileSchemaRepository::new(config.storage);
    assert_eq!(reopened.load(&saved.id).await.unwrap(), saved);
}
