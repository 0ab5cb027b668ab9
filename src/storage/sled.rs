//! Durable store backed by sled trees

use std::path::Path;

use serde::{Serialize, de::DeserializeOwned};
use sled::Transactional;
use sled::transaction::TransactionError;
use uuid::Uuid;

use super::{CatalogStore, MappingStore, SchemaStore, StoreError};
use crate::models::{
    Category, Domain, Endpoint, Field, FieldMap, Integration, Map, Model, ModelMap, Transformer,
};

/// Embedded persistent store, one sled tree per entity
pub struct SledStore {
    db: sled::Db,
    models: sled::Tree,
    fields: sled::Tree,
    maps: sled::Tree,
    model_maps: sled::Tree,
    field_maps: sled::Tree,
    transformers: sled::Tree,
    categories: sled::Tree,
    integrations: sled::Tree,
    domains: sled::Tree,
    endpoints: sled::Tree,
}

impl SledStore {
    /// Open (or create) a store at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let db = sled::open(path).map_err(|e| StoreError::Backend(format!("open: {e}")))?;
        Self::with_db(db)
    }

    fn with_db(db: sled::Db) -> Result<Self, StoreError> {
        let open = |name: &str| {
            db.open_tree(name)
                .map_err(|e| StoreError::Backend(format!("open tree '{name}': {e}")))
        };
        let models = open("models")?;
        let fields = open("fields")?;
        let maps = open("maps")?;
        let model_maps = open("model_maps")?;
        let field_maps = open("field_maps")?;
        let transformers = open("transformers")?;
        let categories = open("categories")?;
        let integrations = open("integrations")?;
        let domains = open("domains")?;
        let endpoints = open("endpoints")?;
        Ok(Self {
            db,
            models,
            fields,
            maps,
            model_maps,
            field_maps,
            transformers,
            categories,
            integrations,
            domains,
            endpoints,
        })
    }

    fn store_in_tree<T: Serialize>(
        &self,
        tree: &sled::Tree,
        id: Uuid,
        item: &T,
    ) -> Result<(), StoreError> {
        let bytes =
            serde_json::to_vec(item).map_err(|e| StoreError::Serialization(e.to_string()))?;
        tree.insert(id.as_bytes(), bytes)
            .map_err(|e| StoreError::Backend(format!("insert: {e}")))?;
        tree.flush()
            .map_err(|e| StoreError::Backend(format!("flush: {e}")))?;
        Ok(())
    }

    fn get_from_tree<T: DeserializeOwned>(
        &self,
        tree: &sled::Tree,
        id: Uuid,
        entity: &str,
    ) -> Result<T, StoreError> {
        let bytes = tree
            .get(id.as_bytes())
            .map_err(|e| StoreError::Backend(format!("get: {e}")))?
            .ok_or_else(|| StoreError::NotFound(format!("{entity} {id}")))?;
        serde_json::from_slice(&bytes).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    fn list_tree<T: DeserializeOwned>(&self, tree: &sled::Tree) -> Result<Vec<T>, StoreError> {
        let mut items = Vec::new();
        for entry in tree.iter() {
            let (_, bytes) =
                entry.map_err(|e| StoreError::Backend(format!("tree iteration: {e}")))?;
            items
                .push(serde_json::from_slice(&bytes).map_err(|e| {
                    StoreError::Serialization(e.to_string())
                })?);
        }
        Ok(items)
    }

    fn fields_unfiltered(&self) -> Result<Vec<Field>, StoreError> {
        self.list_tree(&self.fields)
    }

    /// Reject fields whose (model, name) pair already exists
    fn check_field_unique(&self, field: &Field) -> Result<(), StoreError> {
        let duplicate = self
            .fields_unfiltered()?
            .into_iter()
            .any(|f| f.model_id == field.model_id && f.name == field.name && f.id != field.id);
        if duplicate {
            return Err(StoreError::AlreadyExists(format!(
                "field '{}' on model {}",
                field.name, field.model_id
            )));
        }
        Ok(())
    }

    fn model_exists(&self, id: Uuid) -> Result<bool, StoreError> {
        self.models
            .contains_key(id.as_bytes())
            .map_err(|e| StoreError::Backend(format!("contains: {e}")))
    }
}

impl SchemaStore for SledStore {
    fn insert_model(&self, model: &Model) -> Result<(), StoreError> {
        self.store_in_tree(&self.models, model.id, model)
    }

    fn model(&self, id: Uuid) -> Result<Model, StoreError> {
        self.get_from_tree(&self.models, id, "model")
    }

    fn insert_field(&self, field: &Field) -> Result<(), StoreError> {
        if !self.model_exists(field.model_id)? {
            return Err(StoreError::Unprocessable(format!(
                "model {} for field '{}' does not exist",
                field.model_id, field.name
            )));
        }
        self.check_field_unique(field)?;
        self.store_in_tree(&self.fields, field.id, field)
    }

    fn update_field(&self, field: &Field) -> Result<(), StoreError> {
        if !self
            .fields
            .contains_key(field.id.as_bytes())
            .map_err(|e| StoreError::Backend(format!("contains: {e}")))?
        {
            return Err(StoreError::NotFound(format!("field {}", field.id)));
        }
        self.store_in_tree(&self.fields, field.id, field)
    }

    fn field(&self, id: Uuid) -> Result<Field, StoreError> {
        self.get_from_tree(&self.fields, id, "field")
    }

    fn fields_of_model(&self, model_id: Uuid) -> Result<Vec<Field>, StoreError> {
        if !self.model_exists(model_id)? {
            return Err(StoreError::NotFound(format!("model {model_id}")));
        }
        let mut fields: Vec<Field> = self
            .fields_unfiltered()?
            .into_iter()
            .filter(|f| f.model_id == model_id)
            .collect();
        fields.sort_by_key(|f| f.position);
        Ok(fields)
    }

    fn insert_schema_tree(&self, models: &[Model], fields: &[Field]) -> Result<(), StoreError> {
        // Validate the batch up front; the write below is all-or-nothing
        for field in fields {
            let owned_by_batch = models.iter().any(|m| m.id == field.model_id);
            if !owned_by_batch {
                if !self.model_exists(field.model_id)? {
                    return Err(StoreError::Unprocessable(format!(
                        "model {} for field '{}' does not exist",
                        field.model_id, field.name
                    )));
                }
                self.check_field_unique(field)?;
            }
            let duplicate = fields
                .iter()
                .any(|f| f.model_id == field.model_id && f.name == field.name && f.id != field.id);
            if duplicate {
                return Err(StoreError::AlreadyExists(format!(
                    "field '{}' on model {}",
                    field.name, field.model_id
                )));
            }
        }

        let mut model_rows = Vec::with_capacity(models.len());
        for model in models {
            let bytes = serde_json::to_vec(model)
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
            model_rows.push((model.id, bytes));
        }
        let mut field_rows = Vec::with_capacity(fields.len());
        for field in fields {
            let bytes = serde_json::to_vec(field)
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
            field_rows.push((field.id, bytes));
        }

        (&self.models, &self.fields)
            .transaction(|(model_tree, field_tree)| {
                for (id, bytes) in &model_rows {
                    model_tree.insert(id.as_bytes(), bytes.clone())?;
                }
                for (id, bytes) in &field_rows {
                    field_tree.insert(id.as_bytes(), bytes.clone())?;
                }
                Ok(())
            })
            .map_err(|e: TransactionError<()>| match e {
                TransactionError::Abort(()) => {
                    StoreError::Backend("schema tree write aborted".to_string())
                }
                TransactionError::Storage(e) => {
                    StoreError::Backend(format!("schema tree write: {e}"))
                }
            })?;

        self.db
            .flush()
            .map_err(|e| StoreError::Backend(format!("flush: {e}")))?;
        Ok(())
    }
}

impl MappingStore for SledStore {
    fn create_map(&self, map: &Map) -> Result<(), StoreError> {
        let duplicate = self.list_tree::<Map>(&self.maps)?.into_iter().any(|m| {
            m.source_model_id == map.source_model_id && m.target_model_id == map.target_model_id
        });
        if duplicate {
            return Err(StoreError::AlreadyExists(format!(
                "map from {} to {}",
                map.source_model_id, map.target_model_id
            )));
        }
        self.store_in_tree(&self.maps, map.id, map)
    }

    fn map(&self, id: Uuid) -> Result<Map, StoreError> {
        self.get_from_tree(&self.maps, id, "map")
    }

    fn create_model_map(&self, model_map: &ModelMap) -> Result<(), StoreError> {
        let duplicate = self
            .list_tree::<ModelMap>(&self.model_maps)?
            .into_iter()
            .any(|m| {
                m.map_id == model_map.map_id
                    && m.source_model_id == model_map.source_model_id
                    && m.target_model_id == model_map.target_model_id
            });
        if duplicate {
            return Err(StoreError::AlreadyExists(format!(
                "model map from {} to {} under map {}",
                model_map.source_model_id, model_map.target_model_id, model_map.map_id
            )));
        }
        self.store_in_tree(&self.model_maps, model_map.id, model_map)
    }

    fn create_field_map(&self, field_map: &FieldMap) -> Result<(), StoreError> {
        let duplicate = self
            .list_tree::<FieldMap>(&self.field_maps)?
            .into_iter()
            .any(|m| {
                m.map_id == field_map.map_id
                    && m.source_field_id == field_map.source_field_id
                    && m.target_field_id == field_map.target_field_id
            });
        if duplicate {
            return Err(StoreError::AlreadyExists(format!(
                "field map from {} to {} under map {}",
                field_map.source_field_id, field_map.target_field_id, field_map.map_id
            )));
        }
        self.store_in_tree(&self.field_maps, field_map.id, field_map)
    }

    fn field_map_for_source(
        &self,
        map_id: Uuid,
        source_field_id: Uuid,
    ) -> Result<FieldMap, StoreError> {
        self.list_tree::<FieldMap>(&self.field_maps)?
            .into_iter()
            .find(|m| m.map_id == map_id && m.source_field_id == source_field_id)
            .ok_or_else(|| {
                StoreError::NotFound(format!(
                    "field map for source field {source_field_id} under map {map_id}"
                ))
            })
    }

    fn field_maps_of_map(&self, map_id: Uuid) -> Result<Vec<FieldMap>, StoreError> {
        Ok(self
            .list_tree::<FieldMap>(&self.field_maps)?
            .into_iter()
            .filter(|m| m.map_id == map_id)
            .collect())
    }

    fn create_transformer(&self, transformer: &Transformer) -> Result<(), StoreError> {
        self.store_in_tree(&self.transformers, transformer.id, transformer)
    }

    fn transformer(&self, id: Uuid) -> Result<Transformer, StoreError> {
        self.get_from_tree(&self.transformers, id, "transformer")
    }
}

impl CatalogStore for SledStore {
    fn create_category(&self, category: &Category) -> Result<(), StoreError> {
        let duplicate = self
            .list_tree::<Category>(&self.categories)?
            .into_iter()
            .any(|c| c.name == category.name);
        if duplicate {
            return Err(StoreError::AlreadyExists(format!(
                "category '{}'",
                category.name
            )));
        }
        self.store_in_tree(&self.categories, category.id, category)
    }

    fn category(&self, id: Uuid) -> Result<Category, StoreError> {
        self.get_from_tree(&self.categories, id, "category")
    }

    fn category_by_name(&self, name: &str) -> Result<Category, StoreError> {
        self.list_tree::<Category>(&self.categories)?
            .into_iter()
            .find(|c| c.name == name)
            .ok_or_else(|| StoreError::NotFound(format!("category '{name}'")))
    }

    fn create_integration(&self, integration: &Integration) -> Result<(), StoreError> {
        let duplicate = self
            .list_tree::<Integration>(&self.integrations)?
            .into_iter()
            .any(|i| i.name == integration.name && i.category_id == integration.category_id);
        if duplicate {
            return Err(StoreError::AlreadyExists(format!(
                "integration '{}' in category {}",
                integration.name, integration.category_id
            )));
        }
        self.store_in_tree(&self.integrations, integration.id, integration)
    }

    fn integration(&self, id: Uuid) -> Result<Integration, StoreError> {
        self.get_from_tree(&self.integrations, id, "integration")
    }

    fn integration_by_name(
        &self,
        name: &str,
        category_id: Uuid,
    ) -> Result<Integration, StoreError> {
        self.list_tree::<Integration>(&self.integrations)?
            .into_iter()
            .find(|i| i.name == name && i.category_id == category_id)
            .ok_or_else(|| {
                StoreError::NotFound(format!("integration '{name}' in category {category_id}"))
            })
    }

    fn create_domain(&self, domain: &Domain) -> Result<(), StoreError> {
        let duplicate = self
            .list_tree::<Domain>(&self.domains)?
            .into_iter()
            .any(|d| d.integration_id == domain.integration_id && d.domain == domain.domain);
        if duplicate {
            return Err(StoreError::AlreadyExists(format!(
                "domain '{}' on integration {}",
                domain.domain, domain.integration_id
            )));
        }
        self.store_in_tree(&self.domains, domain.id, domain)
    }

    fn create_endpoint(&self, endpoint: &Endpoint) -> Result<(), StoreError> {
        let duplicate = self
            .list_tree::<Endpoint>(&self.endpoints)?
            .into_iter()
            .any(|e| {
                e.integration_id == endpoint.integration_id
                    && e.path == endpoint.path
                    && e.method == endpoint.method
            });
        if duplicate {
            return Err(StoreError::AlreadyExists(format!(
                "endpoint {} {} on integration {}",
                endpoint.method, endpoint.path, endpoint.integration_id
            )));
        }
        self.store_in_tree(&self.endpoints, endpoint.id, endpoint)
    }

    fn endpoint(&self, id: Uuid) -> Result<Endpoint, StoreError> {
        self.get_from_tree(&self.endpoints, id, "endpoint")
    }

    fn update_endpoint(&self, endpoint: &Endpoint) -> Result<(), StoreError> {
        if !self
            .endpoints
            .contains_key(endpoint.id.as_bytes())
            .map_err(|e| StoreError::Backend(format!("contains: {e}")))?
        {
            return Err(StoreError::NotFound(format!("endpoint {}", endpoint.id)));
        }
        self.store_in_tree(&self.endpoints, endpoint.id, endpoint)
    }

    fn delete_endpoint(&self, id: Uuid) -> Result<(), StoreError> {
        let existed = self
            .endpoints
            .remove(id.as_bytes())
            .map_err(|e| StoreError::Backend(format!("remove: {e}")))?
            .is_some();
        if !existed {
            return Err(StoreError::NotFound(format!("endpoint {id}")));
        }
        self.endpoints
            .flush()
            .map_err(|e| StoreError::Backend(format!("flush: {e}")))?;
        Ok(())
    }

    fn endpoints(&self) -> Result<Vec<Endpoint>, StoreError> {
        let mut endpoints = self.list_tree::<Endpoint>(&self.endpoints)?;
        endpoints.sort_by_key(|e| e.created_at);
        Ok(endpoints)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FieldType;

    fn temp_store() -> (tempfile::TempDir, SledStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SledStore::open(dir.path().join("db")).unwrap();
        (dir, store)
    }

    #[test]
    fn test_model_round_trip() {
        let (_dir, store) = temp_store();
        let model = Model::new("root");
        store.insert_model(&model).unwrap();
        assert_eq!(SchemaStore::model(&store, model.id).unwrap(), model);
    }

    #[test]
    fn test_schema_tree_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db");
        let model = Model::new("root");
        let field = Field::new(model.id, "name", FieldType::String, 0);
        {
            let store = SledStore::open(&path).unwrap();
            store
                .insert_schema_tree(&[model.clone()], &[field.clone()])
                .unwrap();
        }

        let store = SledStore::open(&path).unwrap();
        assert_eq!(SchemaStore::model(&store, model.id).unwrap(), model);
        assert_eq!(store.fields_of_model(model.id).unwrap(), vec![field]);
    }

    #[test]
    fn test_schema_tree_rejects_duplicate_names() {
        let (_dir, store) = temp_store();
        let model = Model::new("root");
        let fields = vec![
            Field::new(model.id, "a", FieldType::String, 0),
            Field::new(model.id, "a", FieldType::Number, 1),
        ];
        let result = store.insert_schema_tree(&[model.clone()], &fields);
        assert!(matches!(result, Err(StoreError::AlreadyExists(_))));
        assert!(matches!(
            SchemaStore::model(&store, model.id),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_field_map_lookup() {
        let (_dir, store) = temp_store();
        let field_map = FieldMap::new(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        store.create_field_map(&field_map).unwrap();

        let found = store
            .field_map_for_source(field_map.map_id, field_map.source_field_id)
            .unwrap();
        assert_eq!(found, field_map);

        assert!(matches!(
            store.field_map_for_source(field_map.map_id, Uuid::new_v4()),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_endpoint_delete() {
        let (_dir, store) = temp_store();
        let endpoint = Endpoint::new(Uuid::new_v4(), "GET", "/users");
        store.create_endpoint(&endpoint).unwrap();
        store.delete_endpoint(endpoint.id).unwrap();
        assert!(matches!(
            store.delete_endpoint(endpoint.id),
            Err(StoreError::NotFound(_))
        ));
    }
}
