//! Map service - creating maps, model maps, field maps and transformers

use std::sync::Arc;

use uuid::Uuid;

use crate::models::{FieldMap, Map, ModelMap, Transformer, TransformerKind};
use crate::storage::{MappingStore, SchemaStore, StoreError};

/// Creation and lookup of mapping records
///
/// Referential checks run here: a create that names a model, field or
/// transformer that does not exist fails `Unprocessable` before anything is
/// written.
pub struct MapService {
    schema: Arc<dyn SchemaStore>,
    mappings: Arc<dyn MappingStore>,
}

impl MapService {
    pub fn new(schema: Arc<dyn SchemaStore>, mappings: Arc<dyn MappingStore>) -> Self {
        Self { schema, mappings }
    }

    /// Create the root correspondence between two models
    pub fn create_map(
        &self,
        source_model_id: Uuid,
        target_model_id: Uuid,
    ) -> Result<Map, StoreError> {
        self.require_model(source_model_id)?;
        self.require_model(target_model_id)?;
        let map = Map::new(source_model_id, target_model_id);
        self.mappings.create_map(&map)?;
        tracing::info!(map_id = %map.id, %source_model_id, %target_model_id, "created map");
        Ok(map)
    }

    /// Create a nested model correspondence scoped to a map
    pub fn create_model_map(
        &self,
        source_model_id: Uuid,
        target_model_id: Uuid,
        map_id: Uuid,
    ) -> Result<ModelMap, StoreError> {
        self.require_map(map_id)?;
        self.require_model(source_model_id)?;
        self.require_model(target_model_id)?;
        let model_map = ModelMap::new(map_id, source_model_id, target_model_id);
        self.mappings.create_model_map(&model_map)?;
        Ok(model_map)
    }

    /// Create a field correspondence scoped to a map, optionally with a
    /// transformer applied when mapping values
    pub fn create_field_map(
        &self,
        source_field_id: Uuid,
        target_field_id: Uuid,
        map_id: Uuid,
        transformer_id: Option<Uuid>,
    ) -> Result<FieldMap, StoreError> {
        self.require_map(map_id)?;
        self.require_field(source_field_id)?;
        self.require_field(target_field_id)?;
        let mut field_map = FieldMap::new(map_id, source_field_id, target_field_id);
        if let Some(transformer_id) = transformer_id {
            self.mappings.transformer(transformer_id).map_err(|_| {
                StoreError::Unprocessable(format!("transformer {transformer_id} does not exist"))
            })?;
            field_map = field_map.with_transformer(transformer_id);
        }
        self.mappings.create_field_map(&field_map)?;
        Ok(field_map)
    }

    pub fn create_transformer(&self, kind: TransformerKind) -> Result<Transformer, StoreError> {
        let transformer = Transformer::new(kind);
        self.mappings.create_transformer(&transformer)?;
        Ok(transformer)
    }

    pub fn map(&self, id: Uuid) -> Result<Map, StoreError> {
        self.mappings.map(id)
    }

    /// The target-side correspondence of a source field under a map
    pub fn target_field_map(
        &self,
        map_id: Uuid,
        source_field_id: Uuid,
    ) -> Result<FieldMap, StoreError> {
        self.mappings.field_map_for_source(map_id, source_field_id)
    }

    /// The transformer attached to a field map, if any
    pub fn transformer_of(
        &self,
        field_map: &FieldMap,
    ) -> Result<Option<Transformer>, StoreError> {
        field_map
            .transformer_id
            .map(|id| self.mappings.transformer(id))
            .transpose()
    }

    fn require_model(&self, id: Uuid) -> Result<(), StoreError> {
        self.schema
            .model(id)
            .map(|_| ())
            .map_err(|_| StoreError::Unprocessable(format!("model {id} does not exist")))
    }

    fn require_field(&self, id: Uuid) -> Result<(), StoreError> {
        self.schema
            .field(id)
            .map(|_| ())
            .map_err(|_| StoreError::Unprocessable(format!("field {id} does not exist")))
    }

    fn require_map(&self, id: Uuid) -> Result<(), StoreError> {
        self.mappings
            .map(id)
            .map(|_| ())
            .map_err(|_| StoreError::Unprocessable(format!("map {id} does not exist")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaService;
    use crate::storage::memory::MemoryStore;
    use serde_json::json;

    fn fixture() -> (Arc<MemoryStore>, SchemaService, MapService) {
        let store = Arc::new(MemoryStore::new());
        (
            store.clone(),
            SchemaService::new(store.clone()),
            MapService::new(store.clone(), store),
        )
    }

    #[test]
    fn test_create_map_requires_models() {
        let (_, _, maps) = fixture();
        let err = maps.create_map(Uuid::new_v4(), Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, StoreError::Unprocessable(_)));
    }

    #[test]
    fn test_duplicate_map_rejected() {
        let (_, schemas, maps) = fixture();
        let source = schemas
            .infer_and_materialize(&json!({"a": 1}), "source")
            .unwrap();
        let target = schemas
            .infer_and_materialize(&json!({"a": 1}), "target")
            .unwrap();

        maps.create_map(source.id, target.id).unwrap();
        assert!(matches!(
            maps.create_map(source.id, target.id),
            Err(StoreError::AlreadyExists(_))
        ));
    }

    #[test]
    fn test_field_map_requires_existing_transformer() {
        let (store, schemas, maps) = fixture();
        let source = schemas
            .infer_and_materialize(&json!({"a": 1}), "source")
            .unwrap();
        let target = schemas
            .infer_and_materialize(&json!({"a": 1}), "target")
            .unwrap();
        let map = maps.create_map(source.id, target.id).unwrap();

        let source_field = &store.fields_of_model(source.id).unwrap()[0];
        let target_field = &store.fields_of_model(target.id).unwrap()[0];
        let err = maps
            .create_field_map(source_field.id, target_field.id, map.id, Some(Uuid::new_v4()))
            .unwrap_err();
        assert!(matches!(err, StoreError::Unprocessable(_)));
    }

    #[test]
    fn test_transformer_of_field_map() {
        let (store, schemas, maps) = fixture();
        let source = schemas
            .infer_and_materialize(&json!({"a": "x"}), "source")
            .unwrap();
        let target = schemas
            .infer_and_materialize(&json!({"a": "x"}), "target")
            .unwrap();
        let map = maps.create_map(source.id, target.id).unwrap();
        let source_field = &store.fields_of_model(source.id).unwrap()[0];
        let target_field = &store.fields_of_model(target.id).unwrap()[0];

        let transformer = maps.create_transformer(TransformerKind::Uppercase).unwrap();
        let field_map = maps
            .create_field_map(source_field.id, target_field.id, map.id, Some(transformer.id))
            .unwrap();

        let found = maps.transformer_of(&field_map).unwrap();
        assert_eq!(found, Some(transformer));

        let bare = FieldMap::new(map.id, source_field.id, target_field.id);
        assert_eq!(maps.transformer_of(&bare).unwrap(), None);
    }
}
