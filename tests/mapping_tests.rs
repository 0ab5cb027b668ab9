//! End-to-end tests: inference, materialization and payload mapping

use std::sync::Arc;

use integration_mapping_sdk::{
    FieldType, JsonMapper, MapService, MapperError, MemoryStore, SchemaService, StoreError,
    TransformerKind, infer,
};
use integration_mapping_sdk::{MappingStore, SchemaStore};
use serde_json::{Value, json};
use uuid::Uuid;

fn source_document() -> Value {
    json!({
        "id": 123456,
        "first_name": "Mike",
        "last_name": "Shean",
        "date_of_birth": "1990-11-10T00:00:00Z",
        "gender": "MALE",
        "skills": [
            {"id": "s1", "name": "Sweeping"},
            {"id": "s2", "name": "Typing"}
        ],
        "jobs": ["Cleaning", "Programming"],
        "address": {"id": "a1", "street": "123 Road"}
    })
}

/// Rename every object key to `target_<name>` at every nesting level
fn rename_keys(value: &Value) -> Value {
    match value {
        Value::Object(entries) => Value::Object(
            entries
                .iter()
                .map(|(k, v)| (format!("target_{k}"), rename_keys(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(rename_keys).collect()),
        other => other.clone(),
    }
}

/// Wire field maps between two structurally equal schema trees, attaching
/// transformers to the named source fields
fn wire_by_position(
    store: &MemoryStore,
    maps: &MapService,
    source_model: Uuid,
    target_model: Uuid,
    map_id: Uuid,
    transformers: &[(&str, Uuid)],
) {
    let source_fields = store.fields_of_model(source_model).unwrap();
    let target_fields = store.fields_of_model(target_model).unwrap();
    assert_eq!(source_fields.len(), target_fields.len());

    for (source, target) in source_fields.iter().zip(target_fields.iter()) {
        let transformer_id = transformers
            .iter()
            .find(|(name, _)| *name == source.name)
            .map(|(_, id)| *id);
        maps.create_field_map(source.id, target.id, map_id, transformer_id)
            .unwrap();
        if let (Some(s), Some(t)) = (source.object_model_id, target.object_model_id) {
            maps.create_model_map(s, t, map_id).unwrap();
            wire_by_position(store, maps, s, t, map_id, transformers);
        }
    }
}

mod inference_tests {
    use super::*;

    #[test]
    fn test_descriptor_document_shape() {
        let descriptor = infer(&source_document()).to_value();

        assert_eq!(descriptor["type"], "object");
        let properties = &descriptor["properties"];
        assert_eq!(properties["id"], json!({"type": "number"}));
        assert_eq!(properties["first_name"], json!({"type": "string"}));
        assert_eq!(properties["last_name"], json!({"type": "string"}));
        assert_eq!(properties["date_of_birth"], json!({"type": "string"}));
        assert_eq!(properties["gender"], json!({"type": "string"}));
        assert_eq!(
            properties["skills"],
            json!({
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "id": {"type": "string"},
                        "name": {"type": "string"}
                    }
                }
            })
        );
        assert_eq!(
            properties["jobs"],
            json!({"type": "array", "items": {"type": "string"}})
        );
        assert_eq!(
            properties["address"],
            json!({
                "type": "object",
                "properties": {
                    "id": {"type": "string"},
                    "street": {"type": "string"}
                }
            })
        );
    }

    #[test]
    fn test_inference_is_idempotent() {
        let document = source_document();
        assert_eq!(infer(&document), infer(&document));
    }

    #[test]
    fn test_empty_array_does_not_raise() {
        let descriptor = infer(&json!({"tags": []}));
        assert_eq!(
            descriptor.to_value()["properties"]["tags"],
            json!({"type": "array", "items": {"type": "unknown"}})
        );
    }
}

mod materialization_tests {
    use super::*;

    #[test]
    fn test_materialized_schema_matches_document_shape() {
        let store = Arc::new(MemoryStore::new());
        let schemas = SchemaService::new(store.clone());
        let model = schemas
            .infer_and_materialize(&source_document(), "employee")
            .unwrap();

        let (_, fields) = schemas.model_with_fields(model.id).unwrap();
        let summary: Vec<(&str, FieldType)> = fields
            .iter()
            .map(|f| (f.name.as_str(), f.field_type))
            .collect();
        assert_eq!(
            summary,
            [
                ("id", FieldType::Number),
                ("first_name", FieldType::String),
                ("last_name", FieldType::String),
                ("date_of_birth", FieldType::String),
                ("gender", FieldType::String),
                ("skills", FieldType::List),
                ("jobs", FieldType::List),
                ("address", FieldType::Object),
            ]
        );

        // skills is a list of objects backed by its own item model
        let skills = fields.iter().find(|f| f.name == "skills").unwrap();
        assert_eq!(skills.list_item_type, Some(FieldType::Object));
        let skills_model = skills.object_model_id.unwrap();
        let (item_model, item_fields) = schemas.model_with_fields(skills_model).unwrap();
        assert_eq!(item_model.name, "skills_item");
        assert_eq!(item_fields.len(), 2);
        assert!(
            item_fields
                .iter()
                .all(|f| f.field_type == FieldType::String)
        );

        // jobs is a list of strings with no nested model
        let jobs = fields.iter().find(|f| f.name == "jobs").unwrap();
        assert_eq!(jobs.list_item_type, Some(FieldType::String));
        assert_eq!(jobs.object_model_id, None);

        // address is a nested object model named after the field
        let address = fields.iter().find(|f| f.name == "address").unwrap();
        let (address_model, address_fields) = schemas
            .model_with_fields(address.object_model_id.unwrap())
            .unwrap();
        assert_eq!(address_model.name, "address");
        assert_eq!(address_fields.len(), 2);
    }

    #[test]
    fn test_unresolved_array_fails_materialization() {
        let schemas = SchemaService::new(Arc::new(MemoryStore::new()));
        let err = schemas
            .infer_and_materialize(&json!({"tags": []}), "root")
            .unwrap_err();
        assert!(matches!(
            err,
            integration_mapping_sdk::SchemaError::InvalidType(_)
        ));
    }
}

mod mapping_tests {
    use super::*;

    #[test]
    fn test_identity_mapping_round_trips() {
        let store = Arc::new(MemoryStore::new());
        let schemas = SchemaService::new(store.clone());
        let maps = MapService::new(store.clone(), store.clone());

        let document = source_document();
        let model = schemas.infer_and_materialize(&document, "employee").unwrap();
        let map = maps.create_map(model.id, model.id).unwrap();
        wire_by_position(store.as_ref(), &maps, model.id, model.id, map.id, &[]);

        let mapper = JsonMapper::new(store.clone(), store);
        let result = mapper.map_to_target(&document, model.id, map.id).unwrap();
        assert_eq!(result, document);
    }

    #[test]
    fn test_unmapped_field_fails_not_silently_drops() {
        let store = Arc::new(MemoryStore::new());
        let schemas = SchemaService::new(store.clone());
        let maps = MapService::new(store.clone(), store.clone());

        let document = json!({"id": 1, "name": "x"});
        let source = schemas.infer_and_materialize(&document, "source").unwrap();
        let target = schemas.infer_and_materialize(&document, "target").unwrap();
        let map = maps.create_map(source.id, target.id).unwrap();

        // Only wire id, leaving name unmapped
        let source_fields = store.fields_of_model(source.id).unwrap();
        let target_fields = store.fields_of_model(target.id).unwrap();
        maps.create_field_map(source_fields[0].id, target_fields[0].id, map.id, None)
            .unwrap();

        let mapper = JsonMapper::new(store.clone(), store);
        let err = mapper.map_to_target(&document, source.id, map.id).unwrap_err();
        assert!(matches!(err, MapperError::Store(StoreError::NotFound(_))));
    }

    #[test]
    fn test_rename_with_uppercase_transformer() {
        let store = Arc::new(MemoryStore::new());
        let schemas = SchemaService::new(store.clone());
        let maps = MapService::new(store.clone(), store.clone());

        let document = source_document();
        let source = schemas.infer_and_materialize(&document, "employee").unwrap();
        let target = schemas
            .infer_and_materialize(&rename_keys(&document), "target_employee")
            .unwrap();
        let map = maps.create_map(source.id, target.id).unwrap();

        let uppercase = maps.create_transformer(TransformerKind::Uppercase).unwrap();
        wire_by_position(
            store.as_ref(),
            &maps,
            source.id,
            target.id,
            map.id,
            &[("first_name", uppercase.id)],
        );

        let mapper = JsonMapper::new(store.clone(), store);
        let result = mapper.map_to_target(&document, source.id, map.id).unwrap();

        assert_eq!(
            result,
            json!({
                "target_id": 123456,
                "target_first_name": "MIKE",
                "target_last_name": "Shean",
                "target_date_of_birth": "1990-11-10T00:00:00Z",
                "target_gender": "MALE",
                "target_skills": [
                    {"target_id": "s1", "target_name": "Sweeping"},
                    {"target_id": "s2", "target_name": "Typing"}
                ],
                "target_jobs": ["Cleaning", "Programming"],
                "target_address": {"target_id": "a1", "target_street": "123 Road"}
            })
        );
    }

    #[test]
    fn test_mapping_has_no_side_effects() {
        let store = Arc::new(MemoryStore::new());
        let schemas = SchemaService::new(store.clone());
        let maps = MapService::new(store.clone(), store.clone());

        let document = json!({"name": "Mike"});
        let model = schemas.infer_and_materialize(&document, "employee").unwrap();
        let map = maps.create_map(model.id, model.id).unwrap();
        wire_by_position(store.as_ref(), &maps, model.id, model.id, map.id, &[]);

        let fields_before = store.fields_of_model(model.id).unwrap();
        let field_maps_before = store.field_maps_of_map(map.id).unwrap();

        let mapper = JsonMapper::new(store.clone(), store.clone());
        mapper.map_to_target(&document, model.id, map.id).unwrap();

        assert_eq!(store.fields_of_model(model.id).unwrap(), fields_before);
        assert_eq!(store.field_maps_of_map(map.id).unwrap(), field_maps_before);
    }
}

#[cfg(feature = "sled-backend")]
mod sled_backend_tests {
    use super::*;
    use integration_mapping_sdk::SledStore;

    #[test]
    fn test_full_scenario_on_sled() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(SledStore::open(dir.path().join("db")).unwrap());
        let schemas = SchemaService::new(store.clone());
        let maps = MapService::new(store.clone(), store.clone());

        let document = source_document();
        let source = schemas.infer_and_materialize(&document, "employee").unwrap();
        let target = schemas
            .infer_and_materialize(&rename_keys(&document), "target_employee")
            .unwrap();
        let map = maps.create_map(source.id, target.id).unwrap();

        // Wire by position, as in the memory-backed scenario
        fn wire(
            store: &SledStore,
            maps: &MapService,
            source_model: Uuid,
            target_model: Uuid,
            map_id: Uuid,
        ) {
            let source_fields = store.fields_of_model(source_model).unwrap();
            let target_fields = store.fields_of_model(target_model).unwrap();
            for (source, target) in source_fields.iter().zip(target_fields.iter()) {
                maps.create_field_map(source.id, target.id, map_id, None)
                    .unwrap();
                if let (Some(s), Some(t)) = (source.object_model_id, target.object_model_id) {
                    wire(store, maps, s, t, map_id);
                }
            }
        }
        wire(store.as_ref(), &maps, source.id, target.id, map.id);

        let mapper = JsonMapper::new(store.clone(), store);
        let result = mapper.map_to_target(&document, source.id, map.id).unwrap();
        assert_eq!(result["target_first_name"], "Mike");
        assert_eq!(result["target_address"], json!({"target_id": "a1", "target_street": "123 Road"}));
        assert_eq!(result["target_jobs"], json!(["Cleaning", "Programming"]));
    }
}
